//! 애플리케이션 상태 조립
//!
//! ```text
//! AuthSettings ─┬─> TokenCodec ──────────────┬─> SessionIssuer ─> UserStore
//!               ├─> StateGuard ─> StateStore │
//!               ├─> ProviderExchange         │
//!               └─> RevocationRegistry ─> RevocationStore
//! ```
//!
//! 저장소 구현은 [`StorageBackends`]로 주입되므로 테스트는 메모리 저장소로,
//! 운영 환경은 MongoDB/Redis 저장소로 같은 로직을 실행합니다.

use std::sync::Arc;

use crate::config::AuthSettings;
use crate::errors::AppResult;
use crate::repositories::tokens::{MemoryRevocationStore, MemoryStateStore, RevocationStore, StateStore};
use crate::repositories::users::{InMemoryUserStore, UserStore};
use crate::services::auth::{ProviderExchange, RevocationRegistry, SessionIssuer, StateGuard, TokenCodec};

/// 저장소 구현 묶음
#[derive(Clone)]
pub struct StorageBackends {
    pub users: Arc<dyn UserStore>,
    pub states: Arc<dyn StateStore>,
    pub revocations: Arc<dyn RevocationStore>,
}

impl StorageBackends {
    /// 모두 프로세스 메모리 저장소
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserStore::new()),
            states: Arc::new(MemoryStateStore::new()),
            revocations: Arc::new(MemoryRevocationStore::new()),
        }
    }
}

/// 핸들러와 미들웨어가 공유하는 상태
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<AuthSettings>,
    pub codec: TokenCodec,
    pub state_guard: StateGuard,
    pub exchange: ProviderExchange,
    pub sessions: SessionIssuer,
    pub revocations: RevocationRegistry,
}

impl AppState {
    pub fn new(settings: AuthSettings, backends: StorageBackends) -> AppResult<Self> {
        let codec = TokenCodec::from_settings(&settings);
        let exchange = ProviderExchange::from_settings(&settings)?;

        Ok(Self {
            state_guard: StateGuard::new(backends.states, settings.state_ttl),
            sessions: SessionIssuer::new(backends.users, codec.clone(), settings.user_store_timeout),
            revocations: RevocationRegistry::new(backends.revocations),
            exchange,
            codec,
            settings: Arc::new(settings),
        })
    }

    /// 메모리 저장소로 상태를 만듭니다.
    pub fn in_memory(settings: AuthSettings) -> AppResult<Self> {
        Self::new(settings, StorageBackends::in_memory())
    }
}
