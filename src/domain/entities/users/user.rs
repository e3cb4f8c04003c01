//! User Entity Implementation
//!
//! 소셜 로그인 사용자 레코드입니다.
//! 프로바이더 신원(kakao_id / google_id)과 현재 유효한 리프레시 토큰 하나를 보관합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AuthProvider;
use crate::domain::models::oauth::ProviderProfile;

/// 사용자 엔티티
///
/// 사용자당 저장된 리프레시 토큰은 최대 하나이며,
/// 로그인이나 갱신 시 새 토큰으로 덮어씁니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    /// 카카오 회원번호
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kakao_id: Option<String>,
    /// Google 계정 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    /// `{provider}_{provider_user_id}` 형태의 로그인 ID
    pub login_id: String,
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// 현재 유효한 리프레시 토큰
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// 정규화된 프로필로 새 사용자를 생성합니다.
    ///
    /// 닉네임이 없으면 로그인 ID를 사용합니다.
    pub fn from_profile(profile: &ProviderProfile, now: DateTime<Utc>) -> Self {
        let login_id = profile.login_id();
        let nickname = profile
            .display_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| login_id.clone());

        let mut user = Self {
            id: uuid::Uuid::new_v4().to_string(),
            kakao_id: None,
            google_id: None,
            login_id,
            nickname,
            email: profile.email.clone(),
            avatar_url: profile.avatar_url.clone(),
            refresh_token: None,
            refresh_token_expires_at: None,
            created_at: now,
            updated_at: now,
        };

        match profile.provider {
            AuthProvider::Kakao => user.kakao_id = Some(profile.provider_user_id.clone()),
            AuthProvider::Google => user.google_id = Some(profile.provider_user_id.clone()),
        }

        user
    }

    /// 주어진 프로바이더의 사용자 ID
    pub fn provider_id(&self, provider: AuthProvider) -> Option<&str> {
        match provider {
            AuthProvider::Kakao => self.kakao_id.as_deref(),
            AuthProvider::Google => self.google_id.as_deref(),
        }
    }

    /// 저장된 리프레시 토큰이 주어진 값과 같고 아직 만료되지 않았는지 확인합니다.
    pub fn holds_refresh_token(&self, token: &str, now: DateTime<Utc>) -> bool {
        match (&self.refresh_token, self.refresh_token_expires_at) {
            (Some(stored), Some(expires_at)) => stored == token && now < expires_at,
            _ => false,
        }
    }
}

/// 프로바이더 신원에 해당하는 MongoDB 필드 이름
pub fn provider_field(provider: AuthProvider) -> &'static str {
    match provider {
        AuthProvider::Kakao => "kakao_id",
        AuthProvider::Google => "google_id",
    }
}
