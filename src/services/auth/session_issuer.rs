//! 세션 발급기
//!
//! 프로바이더 인증이 끝난 프로필로 로컬 사용자를 찾거나 만들고 토큰 쌍을 발급합니다.
//! 리프레시 토큰은 갱신할 때마다 회전합니다.
//!
//! ## 갱신 정책 (회전)
//!
//! 1. 리프레시 토큰의 서명, 용도, 만료를 검증
//! 2. 저장된 값과 정확히 일치하는 사용자를 조회 (저장 만료 포함)
//! 3. 새 액세스/리프레시 토큰을 발급하고, 저장된 토큰을 compare-and-set 으로 교체
//!
//! 교체에 실패하면(다른 요청이 먼저 회전) 발급한 토큰은 버리고 `RefreshTokenNotRecognized`를 반환합니다.
//! 따라서 회전된 이전 토큰의 재사용은 항상 거부됩니다.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Utc;

use crate::config::AuthSettings;
use crate::domain::entities::users::User;
use crate::domain::models::oauth::ProviderProfile;
use crate::domain::models::token::{TokenKind, TokenPair};
use crate::errors::{AppError, AppResult};
use crate::repositories::users::UserStore;
use crate::services::auth::token_codec::TokenCodec;

#[derive(Clone)]
pub struct SessionIssuer {
    users: Arc<dyn UserStore>,
    codec: TokenCodec,
    store_timeout: StdDuration,
}

impl SessionIssuer {
    pub fn new(users: Arc<dyn UserStore>, codec: TokenCodec, store_timeout: StdDuration) -> Self {
        Self { users, codec, store_timeout }
    }

    pub fn from_settings(users: Arc<dyn UserStore>, settings: &AuthSettings) -> Self {
        Self::new(users, TokenCodec::from_settings(settings), settings.user_store_timeout)
    }

    /// 사용자 저장소 호출에 타임아웃을 적용합니다.
    async fn with_store<T>(&self, operation: &str, call: impl Future<Output = AppResult<T>>) -> AppResult<T> {
        match actix_web::rt::time::timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(AppError::UserStoreFailure(format!("{} timed out", operation))),
        }
    }

    fn mint_pair(&self, user: &User) -> AppResult<TokenPair> {
        let access = self.codec.issue(TokenKind::Access, &user.id, &user.nickname)?;
        let refresh = self.codec.issue(TokenKind::Refresh, &user.id, &user.nickname)?;
        Ok(TokenPair::from_issued(access, refresh))
    }

    /// 로그인을 완료합니다.
    ///
    /// 사용자에게 저장돼 있던 이전 리프레시 토큰은 덮어써지므로 더 이상 사용할 수 없습니다.
    pub async fn complete_login(&self, profile: &ProviderProfile) -> AppResult<(User, TokenPair)> {
        let user = self
            .with_store("find_or_create_by_provider_id", self.users.find_or_create_by_provider_id(profile))
            .await?;

        let pair = self.mint_pair(&user)?;
        self.with_store(
            "set_refresh_token",
            self.users.set_refresh_token(&user.id, &pair.refresh_token, pair.refresh_expires_at),
        )
        .await?;

        log::info!("🔑 로그인 완료: user={} provider={}", user.id, profile.provider);
        Ok((user, pair))
    }

    /// 리프레시 토큰으로 새 토큰 쌍을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `ExpiredToken` / `MalformedToken` / `SignatureMismatch` - 토큰 자체가 유효하지 않음
    /// * `RefreshTokenNotRecognized` - 저장된 토큰과 다르거나, 저장 만료되었거나, 이미 회전됨
    /// * `UserStoreFailure` - 저장소 실패 또는 타임아웃
    pub async fn refresh(&self, presented: &str) -> AppResult<TokenPair> {
        let claims = self.codec.verify(presented, TokenKind::Refresh)?;

        let user = self
            .with_store("find_by_refresh_token", self.users.find_by_refresh_token(presented))
            .await?
            .ok_or(AppError::RefreshTokenNotRecognized)?;

        if user.id != claims.sub || !user.holds_refresh_token(presented, Utc::now()) {
            log::warn!("리프레시 토큰 불일치 또는 저장 만료: user={}", user.id);
            return Err(AppError::RefreshTokenNotRecognized);
        }

        let pair = self.mint_pair(&user)?;
        let rotated = self
            .with_store(
                "replace_refresh_token",
                self.users.replace_refresh_token(&user.id, presented, &pair.refresh_token, pair.refresh_expires_at),
            )
            .await?;

        if !rotated {
            log::warn!("리프레시 토큰 동시 회전 감지: user={}", user.id);
            return Err(AppError::RefreshTokenNotRecognized);
        }

        log::info!("🔄 토큰 갱신 완료: user={}", user.id);
        Ok(pair)
    }

    /// 사용자의 저장된 리프레시 토큰을 지웁니다 (로그아웃).
    pub async fn end_session(&self, user_id: &str) -> AppResult<()> {
        self.with_store("clear_refresh_token", self.users.clear_refresh_token(user_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration};
    use crate::config::AuthProvider;
    use crate::repositories::users::InMemoryUserStore;

    fn profile(id: &str) -> ProviderProfile {
        ProviderProfile {
            provider: AuthProvider::Kakao,
            provider_user_id: id.to_string(),
            email: Some("u@kakao.com".to_string()),
            display_name: Some("철수".to_string()),
            avatar_url: None,
        }
    }

    fn codec() -> TokenCodec {
        TokenCodec::new("session-secret", Duration::hours(1), Duration::days(14))
    }

    fn issuer(store: InMemoryUserStore) -> SessionIssuer {
        SessionIssuer::new(Arc::new(store), codec(), StdDuration::from_secs(5))
    }

    #[actix_web::test]
    async fn test_complete_login_issues_pair_for_user() {
        let store = InMemoryUserStore::new();
        let issuer = issuer(store.clone());

        let (user, pair) = issuer.complete_login(&profile("1")).await.unwrap();
        let access = codec().verify(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(access.sub, user.id);
        assert_eq!(access.nickname, "철수");

        let stored = store.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some(pair.refresh_token.as_str()));
        assert_eq!(stored.refresh_token_expires_at, Some(pair.refresh_expires_at));
    }

    #[actix_web::test]
    async fn test_duplicate_login_keeps_one_user_and_latest_refresh_token() {
        let store = InMemoryUserStore::new();
        let issuer = issuer(store.clone());

        let (first_user, first_pair) = issuer.complete_login(&profile("1")).await.unwrap();
        let (second_user, second_pair) = issuer.complete_login(&profile("1")).await.unwrap();

        assert_eq!(first_user.id, second_user.id);
        assert_eq!(store.len(), 1);
        assert!(matches!(
            issuer.refresh(&first_pair.refresh_token).await,
            Err(AppError::RefreshTokenNotRecognized)
        ));
        assert!(issuer.refresh(&second_pair.refresh_token).await.is_ok());
    }

    #[actix_web::test]
    async fn test_refresh_rotates_and_rejects_replay() {
        let issuer = issuer(InMemoryUserStore::new());
        let (user, pair) = issuer.complete_login(&profile("1")).await.unwrap();

        let rotated = issuer.refresh(&pair.refresh_token).await.unwrap();
        assert_ne!(rotated.refresh_token, pair.refresh_token);
        assert_eq!(codec().verify(&rotated.access_token, TokenKind::Access).unwrap().sub, user.id);

        assert!(matches!(
            issuer.refresh(&pair.refresh_token).await,
            Err(AppError::RefreshTokenNotRecognized)
        ));
        assert!(issuer.refresh(&rotated.refresh_token).await.is_ok());
    }

    #[actix_web::test]
    async fn test_access_token_cannot_refresh() {
        let issuer = issuer(InMemoryUserStore::new());
        let (_, pair) = issuer.complete_login(&profile("1")).await.unwrap();

        assert!(matches!(
            issuer.refresh(&pair.access_token).await,
            Err(AppError::MalformedToken(_))
        ));
    }

    #[actix_web::test]
    async fn test_expired_refresh_token() {
        let store = InMemoryUserStore::new();
        let issuer = issuer(store.clone());
        let (user, _) = issuer.complete_login(&profile("1")).await.unwrap();

        // 과거에 발급되어 이미 만료된 토큰을 저장소에 직접 기록
        let old = codec()
            .issue_at(TokenKind::Refresh, &user.id, "철수", Duration::seconds(10), Utc::now() - Duration::hours(1))
            .unwrap();
        store.set_refresh_token(&user.id, &old.token, old.expires_at()).await.unwrap();

        assert!(matches!(issuer.refresh(&old.token).await, Err(AppError::ExpiredToken)));
    }

    #[actix_web::test]
    async fn test_stored_expiry_is_enforced() {
        let store = InMemoryUserStore::new();
        let issuer = issuer(store.clone());
        let (user, pair) = issuer.complete_login(&profile("1")).await.unwrap();

        store
            .set_refresh_token(&user.id, &pair.refresh_token, Utc::now() - Duration::seconds(1))
            .await
            .unwrap();

        assert!(matches!(
            issuer.refresh(&pair.refresh_token).await,
            Err(AppError::RefreshTokenNotRecognized)
        ));
    }

    #[actix_web::test]
    async fn test_end_session_blocks_refresh() {
        let issuer = issuer(InMemoryUserStore::new());
        let (user, pair) = issuer.complete_login(&profile("1")).await.unwrap();

        issuer.end_session(&user.id).await.unwrap();
        assert!(matches!(
            issuer.refresh(&pair.refresh_token).await,
            Err(AppError::RefreshTokenNotRecognized)
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_refresh_has_single_winner() {
        let issuer = issuer(InMemoryUserStore::new());
        let (_, pair) = issuer.complete_login(&profile("1")).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let issuer = issuer.clone();
                let token = pair.refresh_token.clone();
                tokio::spawn(async move { issuer.refresh(&token).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(e) => assert!(matches!(e, AppError::RefreshTokenNotRecognized)),
            }
        }
        assert_eq!(successes, 1);
    }

    /// 응답하지 않는 저장소
    struct HangingStore;

    #[async_trait]
    impl UserStore for HangingStore {
        async fn find_or_create_by_provider_id(&self, _: &ProviderProfile) -> AppResult<User> {
            std::future::pending().await
        }
        async fn find_by_id(&self, _: &str) -> AppResult<Option<User>> {
            std::future::pending().await
        }
        async fn find_by_refresh_token(&self, _: &str) -> AppResult<Option<User>> {
            std::future::pending().await
        }
        async fn set_refresh_token(&self, _: &str, _: &str, _: DateTime<Utc>) -> AppResult<()> {
            std::future::pending().await
        }
        async fn replace_refresh_token(&self, _: &str, _: &str, _: &str, _: DateTime<Utc>) -> AppResult<bool> {
            std::future::pending().await
        }
        async fn clear_refresh_token(&self, _: &str) -> AppResult<()> {
            std::future::pending().await
        }
    }

    #[actix_web::test]
    async fn test_hung_store_times_out() {
        let issuer = SessionIssuer::new(Arc::new(HangingStore), codec(), StdDuration::from_millis(50));
        assert!(matches!(
            issuer.complete_login(&profile("1")).await,
            Err(AppError::UserStoreFailure(_))
        ));
    }
}
