//! 폐기된 액세스 토큰 저장소
//!
//! 토큰 원문 대신 SHA-256 지문을 키로 저장합니다.
//! 항목은 토큰 자체의 만료 시각까지만 의미가 있습니다.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::caching::redis::RedisClient;
use crate::errors::{AppError, AppResult};
use crate::repositories::lock_poisoned;

/// 토큰의 SHA-256 지문 (16진수)
pub fn token_fingerprint(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// 토큰을 `expires_at`까지 폐기 목록에 올립니다.
    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> AppResult<()>;

    async fn is_revoked(&self, token: &str) -> AppResult<bool>;
}

/// 프로세스 메모리 폐기 목록
///
/// 재시작하면 비워지고 인스턴스 간에 공유되지 않습니다.
/// 액세스 토큰 수명이 짧다는 전제에서만 충분합니다.
#[derive(Clone, Default)]
pub struct MemoryRevocationStore {
    revoked: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.revoked.read().map(|revoked| revoked.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> AppResult<()> {
        let now = Utc::now();
        let mut revoked = self.revoked.write().map_err(lock_poisoned)?;
        revoked.retain(|_, until| *until > now);
        revoked.insert(token_fingerprint(token), expires_at);
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> AppResult<bool> {
        let revoked = self.revoked.read().map_err(lock_poisoned)?;
        Ok(revoked.contains_key(&token_fingerprint(token)))
    }
}

/// Redis 폐기 목록
///
/// 남은 토큰 수명을 TTL 로 설정하므로 만료된 항목은 Redis 가 지웁니다.
#[derive(Clone)]
pub struct RedisRevocationStore {
    redis: Arc<RedisClient>,
}

impl RedisRevocationStore {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }

    fn key(token: &str) -> String {
        format!("revoked_token:{}", token_fingerprint(token))
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> AppResult<()> {
        let remaining = (expires_at - Utc::now()).num_seconds();
        if remaining <= 0 {
            return Ok(());
        }

        self.redis
            .set_with_expiry(&Self::key(token), &expires_at.timestamp(), remaining as u64)
            .await
            .map_err(|e| AppError::InternalError(format!("토큰 폐기 저장 실패: {}", e)))
    }

    async fn is_revoked(&self, token: &str) -> AppResult<bool> {
        self.redis
            .exists(&Self::key(token))
            .await
            .map_err(|e| AppError::InternalError(format!("토큰 폐기 조회 실패: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_fingerprint_is_stable_hex() {
        let a = token_fingerprint("token");
        assert_eq!(a, token_fingerprint("token"));
        assert_eq!(a.len(), 64);
        assert_ne!(a, token_fingerprint("token2"));
    }

    #[actix_web::test]
    async fn test_revoke_and_lookup() {
        let store = MemoryRevocationStore::new();
        assert!(!store.is_revoked("t1").await.unwrap());

        store.revoke("t1", Utc::now() + Duration::hours(1)).await.unwrap();
        assert!(store.is_revoked("t1").await.unwrap());
        assert!(!store.is_revoked("t2").await.unwrap());
    }

    #[actix_web::test]
    async fn test_expired_entries_are_purged() {
        let store = MemoryRevocationStore::new();
        store.revoke("old", Utc::now() - Duration::seconds(1)).await.unwrap();
        store.revoke("new", Utc::now() + Duration::hours(1)).await.unwrap();
        assert_eq!(store.len(), 1);
    }
}
