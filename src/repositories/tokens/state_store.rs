//! OAuth state 저장소
//!
//! 핸드셰이크 ID → [`OAuthState`] 매핑을 보관합니다.
//! `take`는 읽기와 삭제를 한 번에 수행하므로 같은 state 는 두 번 꺼낼 수 없습니다.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use crate::caching::redis::RedisClient;
use crate::domain::models::oauth::OAuthState;
use crate::errors::{AppError, AppResult};
use crate::repositories::lock_poisoned;

#[async_trait]
pub trait StateStore: Send + Sync {
    /// 핸드셰이크 ID 에 state 를 저장합니다.
    async fn put(&self, handshake_id: &str, state: OAuthState) -> AppResult<()>;

    /// state 를 꺼내면서 삭제합니다.
    async fn take(&self, handshake_id: &str) -> AppResult<Option<OAuthState>>;
}

/// 단일 인스턴스용 메모리 저장소
///
/// 만료된 항목은 다음 `put` 때 정리합니다.
#[derive(Clone, Default)]
pub struct MemoryStateStore {
    states: Arc<RwLock<HashMap<String, OAuthState>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.read().map(|states| states.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn put(&self, handshake_id: &str, state: OAuthState) -> AppResult<()> {
        let now = Utc::now();
        let mut states = self.states.write().map_err(lock_poisoned)?;
        states.retain(|_, pending| !pending.is_expired_at(now));
        states.insert(handshake_id.to_string(), state);
        Ok(())
    }

    async fn take(&self, handshake_id: &str) -> AppResult<Option<OAuthState>> {
        Ok(self.states.write().map_err(lock_poisoned)?.remove(handshake_id))
    }
}

/// 다중 인스턴스용 Redis 저장소
///
/// `SET EX`로 저장하고 `GETDEL`로 꺼냅니다. 만료는 Redis TTL 에 맡깁니다.
#[derive(Clone)]
pub struct RedisStateStore {
    redis: Arc<RedisClient>,
}

impl RedisStateStore {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }

    fn key(handshake_id: &str) -> String {
        format!("oauth_state:{}", handshake_id)
    }
}

#[async_trait]
impl StateStore for RedisStateStore {
    async fn put(&self, handshake_id: &str, state: OAuthState) -> AppResult<()> {
        let ttl = (state.expires_at - Utc::now()).num_seconds().max(1) as u64;
        self.redis
            .set_with_expiry(&Self::key(handshake_id), &state, ttl)
            .await
            .map_err(|e| AppError::InternalError(format!("state 저장 실패: {}", e)))
    }

    async fn take(&self, handshake_id: &str) -> AppResult<Option<OAuthState>> {
        self.redis
            .take(&Self::key(handshake_id))
            .await
            .map_err(|e| AppError::InternalError(format!("state 조회 실패: {}", e)))
    }
}
