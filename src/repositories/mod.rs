//! # Repository Layer
//!
//! 인증 세션 엔진이 의존하는 저장소 인터페이스와 구현체입니다.
//! 서비스는 트레이트 객체(`Arc<dyn ...>`)만 알고, 구현체는 기동 시 선택됩니다.
//!
//! | 트레이트 | 메모리 구현 | 외부 저장소 구현 |
//! |----------|-------------|------------------|
//! | [`UserStore`](users::UserStore) | `InMemoryUserStore` | `MongoUserStore` |
//! | [`StateStore`](tokens::StateStore) | `MemoryStateStore` | `RedisStateStore` |
//! | [`RevocationStore`](tokens::RevocationStore) | `MemoryRevocationStore` | `RedisRevocationStore` |

pub mod tokens;
pub mod users;

use crate::errors::AppError;

/// 잠금 오염(poisoned lock)을 내부 오류로 변환합니다.
pub(crate) fn lock_poisoned<E>(_: E) -> AppError {
    AppError::InternalError("in-memory store lock poisoned".to_string())
}
