//! 로그아웃된 액세스 토큰 폐기 목록
//!
//! 기본 구현은 프로세스 메모리에만 존재합니다. 재시작하면 사라지고
//! 인스턴스 간에 공유되지 않으므로, 다중 인스턴스 배포에서는 Redis 저장소를 주입합니다.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::models::token::TokenClaims;
use crate::errors::AppResult;
use crate::repositories::tokens::RevocationStore;

#[derive(Clone)]
pub struct RevocationRegistry {
    store: Arc<dyn RevocationStore>,
}

impl RevocationRegistry {
    pub fn new(store: Arc<dyn RevocationStore>) -> Self {
        Self { store }
    }

    /// 토큰을 자연 만료 시각까지 폐기합니다.
    ///
    /// 이미 만료된 토큰은 어차피 거부되므로 기록하지 않습니다.
    pub async fn revoke(&self, token: &str, claims: &TokenClaims) -> AppResult<()> {
        if claims.is_expired_at(Utc::now()) {
            return Ok(());
        }

        self.store.revoke(token, claims.expires_at()).await?;
        log::info!("🔒 액세스 토큰 폐기: user={}", claims.sub);
        Ok(())
    }

    pub async fn is_revoked(&self, token: &str) -> AppResult<bool> {
        self.store.is_revoked(token).await
    }
}
