//! 사용자 저장소 인터페이스

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::users::User;
use crate::domain::models::oauth::ProviderProfile;
use crate::errors::AppResult;

/// 세션 발급기가 사용하는 사용자 레코드 조회/갱신 인터페이스
///
/// 모든 실패는 `AppError::UserStoreFailure`로 보고합니다.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 프로바이더 신원으로 사용자를 찾고, 없으면 프로필로 생성합니다.
    ///
    /// 같은 신원으로 동시에 호출되어도 레코드는 하나만 생겨야 합니다.
    async fn find_or_create_by_provider_id(&self, profile: &ProviderProfile) -> AppResult<User>;

    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<User>>;

    /// 저장된 리프레시 토큰이 정확히 일치하는 사용자를 찾습니다. 만료는 확인하지 않습니다.
    async fn find_by_refresh_token(&self, token: &str) -> AppResult<Option<User>>;

    /// 리프레시 토큰을 무조건 덮어씁니다 (로그인).
    async fn set_refresh_token(&self, user_id: &str, token: &str, expires_at: DateTime<Utc>) -> AppResult<()>;

    /// 저장된 토큰이 `expected`일 때만 `new_token`으로 교체합니다 (갱신).
    ///
    /// 교체했으면 `true`, 다른 요청이 먼저 교체했거나 토큰이 지워졌으면 `false`.
    async fn replace_refresh_token(
        &self,
        user_id: &str,
        expected: &str,
        new_token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// 저장된 리프레시 토큰을 지웁니다 (로그아웃).
    async fn clear_refresh_token(&self, user_id: &str) -> AppResult<()>;
}
