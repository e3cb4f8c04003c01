use serde::{Deserialize, Serialize};

use crate::config::AuthProvider;

/// 토큰 엔드포인트 응답
///
/// 카카오와 Google 모두 `access_token` 필드를 돌려줍니다.
/// 나머지 필드(refresh_token, id_token 등)는 보관하지 않습니다.
#[derive(Debug, Deserialize)]
pub struct ProviderTokenResponse {
    pub access_token: String,
}

/// 프로바이더와 무관하게 정규화된 사용자 프로필
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub provider: AuthProvider,
    /// 프로바이더 내에서 안정적인 사용자 ID. 비어 있을 수 없음
    pub provider_user_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProviderProfile {
    /// 로컬 로그인 ID (`kakao_12345` 형태)
    pub fn login_id(&self) -> String {
        format!("{}_{}", self.provider.as_str(), self.provider_user_id)
    }
}
