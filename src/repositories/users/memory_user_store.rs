//! 메모리 사용자 저장소
//!
//! 외부 DB 없이 실행하거나 테스트할 때 사용합니다.
//! 모든 변경은 쓰기 잠금 하나 안에서 끝나므로 레코드 단위로 원자적입니다.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::users::User;
use crate::domain::models::oauth::ProviderProfile;
use crate::errors::{AppError, AppResult};
use crate::repositories::users::UserStore;

#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

fn poisoned<E>(_: E) -> AppError {
    AppError::UserStoreFailure("user store lock poisoned".to_string())
}

fn not_found(user_id: &str) -> AppError {
    AppError::UserStoreFailure(format!("user {} not found", user_id))
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 사용자 수
    pub fn len(&self) -> usize {
        self.users.read().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_or_create_by_provider_id(&self, profile: &ProviderProfile) -> AppResult<User> {
        let mut users = self.users.write().map_err(poisoned)?;

        if let Some(existing) = users
            .values()
            .find(|user| user.provider_id(profile.provider) == Some(profile.provider_user_id.as_str()))
        {
            return Ok(existing.clone());
        }

        let user = User::from_profile(profile, Utc::now());
        users.insert(user.id.clone(), user.clone());
        log::info!("👤 신규 사용자 생성: {} ({})", user.id, profile.provider);
        Ok(user)
    }

    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().map_err(poisoned)?.get(user_id).cloned())
    }

    async fn find_by_refresh_token(&self, token: &str) -> AppResult<Option<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users
            .values()
            .find(|user| user.refresh_token.as_deref() == Some(token))
            .cloned())
    }

    async fn set_refresh_token(&self, user_id: &str, token: &str, expires_at: DateTime<Utc>) -> AppResult<()> {
        let mut users = self.users.write().map_err(poisoned)?;
        let user = users.get_mut(user_id).ok_or_else(|| not_found(user_id))?;

        user.refresh_token = Some(token.to_string());
        user.refresh_token_expires_at = Some(expires_at);
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn replace_refresh_token(
        &self,
        user_id: &str,
        expected: &str,
        new_token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut users = self.users.write().map_err(poisoned)?;
        let user = users.get_mut(user_id).ok_or_else(|| not_found(user_id))?;

        if user.refresh_token.as_deref() != Some(expected) {
            return Ok(false);
        }

        user.refresh_token = Some(new_token.to_string());
        user.refresh_token_expires_at = Some(expires_at);
        user.updated_at = Utc::now();
        Ok(true)
    }

    async fn clear_refresh_token(&self, user_id: &str) -> AppResult<()> {
        let mut users = self.users.write().map_err(poisoned)?;
        if let Some(user) = users.get_mut(user_id) {
            user.refresh_token = None;
            user.refresh_token_expires_at = None;
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}
