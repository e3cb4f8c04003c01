use crate::config::AuthProvider;

/// OAuth 프로바이더 디스크립터
///
/// 프로바이더를 추가할 때는 새 교환 로직이 아니라 디스크립터와
/// 프로필 정규화 규칙만 추가합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    pub provider: AuthProvider,
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub client_id: String,
    /// 카카오는 콘솔에서 활성화한 경우에만 필요
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl ProviderDescriptor {
    /// 카카오 로그인 기본 엔드포인트
    pub fn kakao(client_id: String, client_secret: Option<String>, redirect_uri: String) -> Self {
        Self {
            provider: AuthProvider::Kakao,
            authorize_url: "https://kauth.kakao.com/oauth/authorize".to_string(),
            token_url: "https://kauth.kakao.com/oauth/token".to_string(),
            userinfo_url: "https://kapi.kakao.com/v2/user/me".to_string(),
            client_id,
            client_secret,
            redirect_uri,
            scopes: vec!["profile_nickname".to_string(), "profile_image".to_string()],
        }
    }

    /// Google OAuth 2.0 기본 엔드포인트
    pub fn google(client_id: String, client_secret: Option<String>, redirect_uri: String) -> Self {
        Self {
            provider: AuthProvider::Google,
            authorize_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_url: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
            client_id,
            client_secret,
            redirect_uri,
            scopes: vec![
                "openid".to_string(),
                "email".to_string(),
                "profile".to_string(),
            ],
        }
    }

    /// 공백으로 구분된 scope 파라미터 값
    pub fn scope_param(&self) -> String {
        self.scopes.join(" ")
    }
}
