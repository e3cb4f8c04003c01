//! # Authentication Configuration Module
//!
//! JWT 토큰 수명, OAuth 핸드셰이크, 프로바이더 자격 증명, 쿠키 정책 등
//! 인증 세션 관련 설정을 환경 변수에서 읽어옵니다.
//!
//! 개별 값은 `JwtConfig::secret()`처럼 정적 함수로 읽을 수 있고,
//! 서버 기동 시에는 [`AuthSettings::from_env`]로 한 번에 모아서 서비스에 주입합니다.
//!
//! ## 필수 환경 변수 설정
//!
//! ### JWT 토큰 설정
//! ```bash
//! export JWT_SECRET="your-super-secret-jwt-key"
//! export JWT_ACCESS_TTL_MINUTES="60"
//! export JWT_REFRESH_TTL_DAYS="14"
//! ```
//!
//! ### 프로바이더 설정
//! ```bash
//! export KAKAO_CLIENT_ID="kakao-rest-api-key"
//! export KAKAO_REDIRECT_URI="https://api.example.com/auth/kakao/callback"
//! export GOOGLE_CLIENT_ID="123-abc.apps.googleusercontent.com"
//! export GOOGLE_CLIENT_SECRET="google-secret"
//! export GOOGLE_REDIRECT_URI="https://api.example.com/auth/google/callback"
//! ```
//!
//! ### 클라이언트 설정
//! ```bash
//! export CLIENT_REDIRECT_URL="https://app.example.com/"
//! ```

use std::env;
use std::str::FromStr;

use crate::config::Environment;
use crate::domain::models::oauth::ProviderDescriptor;
use crate::errors::AppError;

const DEV_JWT_SECRET: &str = "dev-only-jwt-secret-change-me";

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// 액세스 토큰 수명 상한 (1일)
const MAX_ACCESS_TTL_MINUTES: i64 = 24 * 60;
/// 리프레시 토큰 수명 상한 (1년)
const MAX_REFRESH_TTL_DAYS: i64 = 365;
/// OAuth state 수명 상한 (1시간)
const MAX_STATE_TTL_SECONDS: i64 = 60 * 60;

/// 설정 값을 `1..=max` 범위에서 수명으로 변환합니다.
fn bounded_ttl(
    key: &str,
    value: i64,
    max: i64,
    to_delta: fn(i64) -> Option<chrono::TimeDelta>,
) -> Result<chrono::TimeDelta, AppError> {
    if !(1..=max).contains(&value) {
        return Err(AppError::InternalError(format!(
            "{} must be between 1 and {}, got {}",
            key, max, value
        )));
    }
    to_delta(value).ok_or_else(|| AppError::InternalError(format!("{} is out of range", key)))
}

/// JSON Web Token (JWT) 관련 설정
///
/// 액세스 토큰은 짧게, 리프레시 토큰은 길게 유지합니다.
pub struct JwtConfig;

impl JwtConfig {
    /// JWT 서명에 사용할 비밀키를 반환합니다.
    ///
    /// 설정되지 않은 경우 `None`을 반환하며, 기본값 적용 여부는
    /// [`AuthSettings::from_env`]가 실행 환경을 보고 결정합니다.
    ///
    /// ```bash
    /// # 안전한 JWT 키 생성
    /// openssl rand -base64 32
    /// ```
    pub fn secret() -> Option<String> {
        env_opt("JWT_SECRET")
    }

    /// 액세스 토큰 수명 (분). 기본값 60분
    pub fn access_ttl_minutes() -> i64 {
        env_or("JWT_ACCESS_TTL_MINUTES", 60)
    }

    /// 리프레시 토큰 수명 (일). 기본값 14일
    pub fn refresh_ttl_days() -> i64 {
        env_or("JWT_REFRESH_TTL_DAYS", 14)
    }
}

/// OAuth 핸드셰이크 공통 설정
pub struct OAuthConfig;

impl OAuthConfig {
    /// CSRF state 유효 시간 (초). 기본값 300초
    pub fn state_ttl_seconds() -> i64 {
        env_or("OAUTH_STATE_TTL_SECONDS", 300)
    }

    /// 프로바이더 HTTP 호출 타임아웃 (초). 기본값 10초
    pub fn http_timeout_seconds() -> u64 {
        env_or("OAUTH_HTTP_TIMEOUT_SECONDS", 10)
    }

    /// 사용자 저장소 호출 타임아웃 (초). 기본값 5초
    pub fn user_store_timeout_seconds() -> u64 {
        env_or("USER_STORE_TIMEOUT_SECONDS", 5)
    }
}

/// 카카오 로그인 설정
///
/// 카카오 디벨로퍼스의 REST API 키가 client id 입니다.
/// client secret 은 콘솔에서 활성화한 경우에만 필요합니다.
pub struct KakaoOAuthConfig;

impl KakaoOAuthConfig {
    pub fn client_id() -> Option<String> {
        env_opt("KAKAO_CLIENT_ID")
    }

    pub fn client_secret() -> Option<String> {
        env_opt("KAKAO_CLIENT_SECRET")
    }

    pub fn redirect_uri() -> Option<String> {
        env_opt("KAKAO_REDIRECT_URI")
    }

    pub fn auth_uri() -> String {
        env_opt("KAKAO_AUTH_URI").unwrap_or_else(|| "https://kauth.kakao.com/oauth/authorize".to_string())
    }

    pub fn token_uri() -> String {
        env_opt("KAKAO_TOKEN_URI").unwrap_or_else(|| "https://kauth.kakao.com/oauth/token".to_string())
    }

    pub fn userinfo_uri() -> String {
        env_opt("KAKAO_USERINFO_URI").unwrap_or_else(|| "https://kapi.kakao.com/v2/user/me".to_string())
    }
}

/// Google OAuth 2.0 설정
///
/// Google Cloud Console 에서 생성한 OAuth 2.0 클라이언트 정보를 관리합니다.
/// `client_secret`은 절대 클라이언트 사이드에 노출되어서는 안 됩니다.
pub struct GoogleOAuthConfig;

impl GoogleOAuthConfig {
    pub fn client_id() -> Option<String> {
        env_opt("GOOGLE_CLIENT_ID")
    }

    pub fn client_secret() -> Option<String> {
        env_opt("GOOGLE_CLIENT_SECRET")
    }

    pub fn redirect_uri() -> Option<String> {
        env_opt("GOOGLE_REDIRECT_URI")
    }

    pub fn auth_uri() -> String {
        env_opt("GOOGLE_AUTH_URI").unwrap_or_else(|| "https://accounts.google.com/o/oauth2/v2/auth".to_string())
    }

    pub fn token_uri() -> String {
        env_opt("GOOGLE_TOKEN_URI").unwrap_or_else(|| "https://oauth2.googleapis.com/token".to_string())
    }

    pub fn userinfo_uri() -> String {
        env_opt("GOOGLE_USERINFO_URI")
            .unwrap_or_else(|| "https://www.googleapis.com/oauth2/v2/userinfo".to_string())
    }
}

/// 로그인 완료 후 브라우저를 보낼 프론트엔드 설정
pub struct ClientConfig;

impl ClientConfig {
    /// 기본값 `http://localhost:3000/`
    pub fn redirect_url() -> String {
        env_opt("CLIENT_REDIRECT_URL").unwrap_or_else(|| "http://localhost:3000/".to_string())
    }
}

/// 자격 증명 쿠키 정책
pub struct CookieConfig;

impl CookieConfig {
    /// `Secure` 속성 사용 여부. 기본값 true
    ///
    /// `SameSite=None` 쿠키는 브라우저가 `Secure` 없이 받아주지 않으므로
    /// 로컬 http 개발 환경에서만 끄세요.
    pub fn secure() -> bool {
        env_or("COOKIE_SECURE", true)
    }
}

/// 지원하는 OAuth 프로바이더
///
/// 프로바이더마다 다른 것은 디스크립터(엔드포인트, 자격 증명)와
/// 프로필 정규화 규칙뿐이며, 교환 흐름은 하나입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// 카카오 로그인
    Kakao,
    /// Google OAuth 2.0
    Google,
}

impl AuthProvider {
    /// 문자열에서 AuthProvider를 생성합니다. (대소문자 무관)
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "kakao" => Ok(AuthProvider::Kakao),
            "google" => Ok(AuthProvider::Google),
            _ => Err(format!("Unsupported auth provider: {}", s)),
        }
    }

    /// AuthProvider를 소문자 문자열로 변환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Kakao => "kakao",
            AuthProvider::Google => "google",
        }
    }
}

impl std::fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 서버 기동 시 한 번 읽어서 서비스들에 주입하는 인증 설정 묶음
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// HMAC 서명 비밀키
    pub jwt_secret: String,
    /// 액세스 토큰 수명
    pub access_ttl: chrono::Duration,
    /// 리프레시 토큰 수명
    pub refresh_ttl: chrono::Duration,
    /// OAuth state 수명
    pub state_ttl: chrono::Duration,
    /// 프로바이더 HTTP 호출 타임아웃
    pub provider_timeout: std::time::Duration,
    /// 사용자 저장소 호출 타임아웃
    pub user_store_timeout: std::time::Duration,
    /// 로그인 성공 후 리다이렉트할 클라이언트 URL
    pub client_redirect_url: String,
    /// 쿠키 `Secure` 속성
    pub cookie_secure: bool,
    /// 등록된 프로바이더 디스크립터
    pub providers: Vec<ProviderDescriptor>,
}

impl AuthSettings {
    /// 기본 수명 값과 주어진 비밀키로 설정을 만듭니다. 프로바이더는 비어 있습니다.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_ttl: chrono::Duration::minutes(60),
            refresh_ttl: chrono::Duration::days(14),
            state_ttl: chrono::Duration::seconds(300),
            provider_timeout: std::time::Duration::from_secs(10),
            user_store_timeout: std::time::Duration::from_secs(5),
            client_redirect_url: "http://localhost:3000/".to_string(),
            cookie_secure: true,
            providers: Vec::new(),
        }
    }

    /// 환경 변수에서 전체 인증 설정을 읽습니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InternalError` - 프로덕션 환경에서 `JWT_SECRET`이 없거나
    ///   토큰/state 수명이 `1..=상한` 범위를 벗어난 경우
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = match JwtConfig::secret() {
            Some(secret) => secret,
            None if Environment::current() == Environment::Production => {
                return Err(AppError::InternalError(
                    "JWT_SECRET must be set in production".to_string(),
                ));
            }
            None => {
                log::warn!("JWT_SECRET not set, using default (not secure for production!)");
                DEV_JWT_SECRET.to_string()
            }
        };

        let access_ttl = bounded_ttl(
            "JWT_ACCESS_TTL_MINUTES",
            JwtConfig::access_ttl_minutes(),
            MAX_ACCESS_TTL_MINUTES,
            chrono::TimeDelta::try_minutes,
        )?;
        let refresh_ttl = bounded_ttl(
            "JWT_REFRESH_TTL_DAYS",
            JwtConfig::refresh_ttl_days(),
            MAX_REFRESH_TTL_DAYS,
            chrono::TimeDelta::try_days,
        )?;
        let state_ttl = bounded_ttl(
            "OAUTH_STATE_TTL_SECONDS",
            OAuthConfig::state_ttl_seconds(),
            MAX_STATE_TTL_SECONDS,
            chrono::TimeDelta::try_seconds,
        )?;

        Ok(Self {
            jwt_secret,
            access_ttl,
            refresh_ttl,
            state_ttl,
            provider_timeout: std::time::Duration::from_secs(OAuthConfig::http_timeout_seconds()),
            user_store_timeout: std::time::Duration::from_secs(OAuthConfig::user_store_timeout_seconds()),
            client_redirect_url: ClientConfig::redirect_url(),
            cookie_secure: CookieConfig::secure(),
            providers: Self::providers_from_env(),
        })
    }

    /// client id 와 redirect URI 가 설정된 프로바이더만 등록합니다.
    fn providers_from_env() -> Vec<ProviderDescriptor> {
        let mut providers = Vec::new();

        match (KakaoOAuthConfig::client_id(), KakaoOAuthConfig::redirect_uri()) {
            (Some(client_id), Some(redirect_uri)) => {
                let mut kakao = ProviderDescriptor::kakao(client_id, KakaoOAuthConfig::client_secret(), redirect_uri);
                kakao.authorize_url = KakaoOAuthConfig::auth_uri();
                kakao.token_url = KakaoOAuthConfig::token_uri();
                kakao.userinfo_url = KakaoOAuthConfig::userinfo_uri();
                providers.push(kakao);
            }
            _ => log::warn!("카카오 로그인 비활성화: KAKAO_CLIENT_ID / KAKAO_REDIRECT_URI 미설정"),
        }

        match (GoogleOAuthConfig::client_id(), GoogleOAuthConfig::redirect_uri()) {
            (Some(client_id), Some(redirect_uri)) => {
                let mut google = ProviderDescriptor::google(client_id, GoogleOAuthConfig::client_secret(), redirect_uri);
                google.authorize_url = GoogleOAuthConfig::auth_uri();
                google.token_url = GoogleOAuthConfig::token_uri();
                google.userinfo_url = GoogleOAuthConfig::userinfo_uri();
                providers.push(google);
            }
            _ => log::warn!("구글 로그인 비활성화: GOOGLE_CLIENT_ID / GOOGLE_REDIRECT_URI 미설정"),
        }

        providers
    }
}
