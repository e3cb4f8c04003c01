//! CSRF state 가드
//!
//! 로그인 시작 시 일회용 state 를 발급하고, 콜백에서 한 번만 검증합니다.
//! 검증 시도는 결과와 관계없이 저장된 state 를 소모합니다.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::config::AuthProvider;
use crate::domain::models::oauth::{OAuthState, PendingHandshake};
use crate::errors::{AppError, AppResult};
use crate::repositories::tokens::StateStore;
use crate::utils::crypto_utils::{constant_time_eq, random_token, STATE_BYTES};

#[derive(Clone)]
pub struct StateGuard {
    store: Arc<dyn StateStore>,
    ttl: Duration,
}

impl StateGuard {
    pub fn new(store: Arc<dyn StateStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 새 핸드셰이크를 시작합니다.
    ///
    /// 핸드셰이크 ID 와 state 는 서로 독립적인 256 bit 랜덤 값입니다.
    pub async fn begin(&self, provider: AuthProvider) -> AppResult<PendingHandshake> {
        let now = Utc::now();
        let handshake_id = random_token(STATE_BYTES);
        let state = OAuthState {
            value: random_token(STATE_BYTES),
            provider,
            created_at: now,
            expires_at: now + self.ttl,
        };

        self.store.put(&handshake_id, state.clone()).await?;
        log::debug!("OAuth 핸드셰이크 시작: {}", provider);

        Ok(PendingHandshake {
            handshake_id,
            state: state.value,
            provider,
            expires_at: state.expires_at,
        })
    }

    /// 제시된 state 를 검증합니다.
    ///
    /// 핸드셰이크 ID 가 있으면 저장된 state 는 이 호출로 소모됩니다.
    /// 누락, 만료, 프로바이더 불일치, 값 불일치는 모두 `false`입니다.
    pub async fn validate(
        &self,
        handshake_id: Option<&str>,
        presented: Option<&str>,
        provider: AuthProvider,
    ) -> AppResult<bool> {
        let Some(handshake_id) = handshake_id else {
            log::debug!("state 검증 실패: 핸드셰이크 쿠키 없음");
            return Ok(false);
        };

        let Some(stored) = self.store.take(handshake_id).await? else {
            log::debug!("state 검증 실패: 저장된 state 없음 (재사용 또는 만료)");
            return Ok(false);
        };

        let Some(presented) = presented else {
            log::debug!("state 검증 실패: state 파라미터 없음");
            return Ok(false);
        };

        if stored.is_expired_at(Utc::now()) {
            log::debug!("state 검증 실패: 만료");
            return Ok(false);
        }

        if stored.provider != provider {
            log::debug!("state 검증 실패: 프로바이더 불일치 ({} != {})", stored.provider, provider);
            return Ok(false);
        }

        Ok(constant_time_eq(stored.value.as_bytes(), presented.as_bytes()))
    }

    /// [`validate`](Self::validate)가 `false`이면 `CsrfStateInvalid`를 반환합니다.
    pub async fn require_valid(
        &self,
        handshake_id: Option<&str>,
        presented: Option<&str>,
        provider: AuthProvider,
    ) -> AppResult<()> {
        if self.validate(handshake_id, presented, provider).await? {
            Ok(())
        } else {
            Err(AppError::CsrfStateInvalid)
        }
    }
}
