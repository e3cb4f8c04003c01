//! OAuth 프로바이더 교환
//!
//! authorization code → 프로바이더 액세스 토큰 → 사용자 프로필 왕복을 수행합니다.
//! 흐름은 하나이고, 프로바이더별 차이는 [`ProviderDescriptor`]와 [`normalize`] 규칙뿐입니다.
//!
//! ## 실패 매핑
//!
//! | 상황 | AppError |
//! |------|----------|
//! | 연결 실패, 타임아웃 | `ProviderUnreachable` |
//! | 비 2xx 응답, 파싱 불가 응답 | `ProviderRejected` |
//! | 안정적인 사용자 ID 없음 | `ProfileIncomplete` |
//!
//! 프로바이더 응답 본문은 로그에만 남기고 클라이언트에는 전달하지 않습니다.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

use crate::config::{AuthProvider, AuthSettings};
use crate::domain::models::oauth::{ProviderDescriptor, ProviderProfile, ProviderTokenResponse};
use crate::errors::{AppError, AppResult};
use crate::utils::string_utils::{json_id, json_string};

#[derive(Clone)]
pub struct ProviderExchange {
    client: reqwest::Client,
    providers: HashMap<AuthProvider, ProviderDescriptor>,
}

impl ProviderExchange {
    /// 등록할 디스크립터와 HTTP 타임아웃으로 생성합니다.
    pub fn new(providers: Vec<ProviderDescriptor>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        let providers = providers
            .into_iter()
            .map(|descriptor| (descriptor.provider, descriptor))
            .collect();

        Ok(Self { client, providers })
    }

    pub fn from_settings(settings: &AuthSettings) -> AppResult<Self> {
        Self::new(settings.providers.clone(), settings.provider_timeout)
    }

    /// 경로 파라미터의 프로바이더 이름을 등록된 프로바이더로 해석합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::UnknownProvider` - 지원하지 않거나 설정되지 않은 프로바이더
    pub fn resolve(&self, name: &str) -> AppResult<&ProviderDescriptor> {
        let provider = AuthProvider::from_str(name).map_err(|_| AppError::UnknownProvider(name.to_string()))?;
        self.descriptor(provider)
    }

    pub fn descriptor(&self, provider: AuthProvider) -> AppResult<&ProviderDescriptor> {
        self.providers
            .get(&provider)
            .ok_or_else(|| AppError::UnknownProvider(provider.as_str().to_string()))
    }

    /// 등록된 프로바이더 목록
    pub fn registered(&self) -> Vec<AuthProvider> {
        let mut providers: Vec<AuthProvider> = self.providers.keys().copied().collect();
        providers.sort_by_key(|p| p.as_str());
        providers
    }

    /// 브라우저를 보낼 프로바이더 authorize URL 을 만듭니다.
    pub fn authorize_url(&self, descriptor: &ProviderDescriptor, state: &str) -> String {
        let scope = descriptor.scope_param();
        let mut params = vec![
            ("client_id", descriptor.client_id.as_str()),
            ("redirect_uri", descriptor.redirect_uri.as_str()),
            ("response_type", "code"),
            ("state", state),
        ];
        if !scope.is_empty() {
            params.push(("scope", scope.as_str()));
        }

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let separator = if descriptor.authorize_url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", descriptor.authorize_url, separator, query_string)
    }

    /// authorization code 를 프로바이더 액세스 토큰으로 교환합니다.
    pub async fn exchange_code(&self, descriptor: &ProviderDescriptor, code: &str) -> AppResult<String> {
        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("client_id", descriptor.client_id.as_str()),
            ("redirect_uri", descriptor.redirect_uri.as_str()),
            ("code", code),
        ];
        if let Some(secret) = descriptor.client_secret.as_deref() {
            params.push(("client_secret", secret));
        }

        let response = self.client
            .post(&descriptor.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ProviderUnreachable(format!("{} 토큰 요청 실패: {}", descriptor.provider, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            log::warn!("{} 토큰 교환 거부: {} {}", descriptor.provider, status, error_text);
            return Err(AppError::ProviderRejected(format!(
                "{} token endpoint returned {}", descriptor.provider, status
            )));
        }

        let token = response
            .json::<ProviderTokenResponse>()
            .await
            .map_err(|e| AppError::ProviderRejected(format!("{} 토큰 응답 파싱 실패: {}", descriptor.provider, e)))?;

        if token.access_token.trim().is_empty() {
            return Err(AppError::ProviderRejected(format!("{} 빈 액세스 토큰", descriptor.provider)));
        }

        Ok(token.access_token)
    }

    /// 프로바이더 액세스 토큰으로 원본 프로필을 조회합니다.
    pub async fn fetch_profile(&self, descriptor: &ProviderDescriptor, access_token: &str) -> AppResult<Value> {
        let response = self.client
            .get(&descriptor.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::ProviderUnreachable(format!("{} 사용자 정보 요청 실패: {}", descriptor.provider, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            log::warn!("{} 사용자 정보 조회 거부: {} {}", descriptor.provider, status, error_text);
            return Err(AppError::ProviderRejected(format!(
                "{} userinfo endpoint returned {}", descriptor.provider, status
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::ProviderRejected(format!("{} 사용자 정보 파싱 실패: {}", descriptor.provider, e)))
    }

    /// code 교환부터 프로필 정규화까지 전체 왕복을 수행합니다.
    pub async fn authenticate(&self, descriptor: &ProviderDescriptor, code: &str) -> AppResult<ProviderProfile> {
        let access_token = self.exchange_code(descriptor, code).await?;
        let raw = self.fetch_profile(descriptor, &access_token).await?;
        let profile = normalize(descriptor.provider, &raw)?;

        log::info!("✅ {} 프로필 조회 성공: {}", descriptor.provider, profile.provider_user_id);
        Ok(profile)
    }
}

/// 프로바이더 원본 프로필을 정규화합니다.
///
/// # Errors
///
/// * `AppError::ProfileIncomplete` - 비어 있지 않은 사용자 ID 를 찾지 못한 경우
pub fn normalize(provider: AuthProvider, raw: &Value) -> AppResult<ProviderProfile> {
    let profile = match provider {
        AuthProvider::Kakao => normalize_kakao(raw),
        AuthProvider::Google => normalize_google(raw),
    };

    profile.ok_or_else(|| AppError::ProfileIncomplete(format!("{} 응답에 사용자 ID 없음", provider)))
}

/// 카카오 `/v2/user/me`
///
/// 회원번호 `id`는 숫자입니다. 닉네임은 `kakao_account.profile`을 먼저 보고
/// 구 버전 응답의 `properties`로 대체합니다.
fn normalize_kakao(raw: &Value) -> Option<ProviderProfile> {
    Some(ProviderProfile {
        provider: AuthProvider::Kakao,
        provider_user_id: json_id(raw, "/id")?,
        email: json_string(raw, "/kakao_account/email"),
        display_name: json_string(raw, "/kakao_account/profile/nickname")
            .or_else(|| json_string(raw, "/properties/nickname")),
        avatar_url: json_string(raw, "/kakao_account/profile/profile_image_url")
            .or_else(|| json_string(raw, "/properties/profile_image")),
    })
}

/// Google userinfo (v2 는 `id`, OpenID Connect 는 `sub`)
fn normalize_google(raw: &Value) -> Option<ProviderProfile> {
    Some(ProviderProfile {
        provider: AuthProvider::Google,
        provider_user_id: json_id(raw, "/id").or_else(|| json_id(raw, "/sub"))?,
        email: json_string(raw, "/email"),
        display_name: json_string(raw, "/name"),
        avatar_url: json_string(raw, "/picture"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn google_descriptor(base: &str) -> ProviderDescriptor {
        let mut descriptor = ProviderDescriptor::google(
            "google-client".to_string(),
            Some("google-secret".to_string()),
            "http://localhost:8080/auth/google/callback".to_string(),
        );
        descriptor.token_url = format!("{}/token", base);
        descriptor.userinfo_url = format!("{}/userinfo", base);
        descriptor
    }

    fn exchange(descriptor: ProviderDescriptor, timeout: Duration) -> ProviderExchange {
        ProviderExchange::new(vec![descriptor], timeout).unwrap()
    }

    #[test]
    fn test_normalize_kakao_numeric_id() {
        let raw = json!({
            "id": 3141592653u64,
            "kakao_account": {
                "email": "chulsoo@kakao.com",
                "profile": { "nickname": "철수", "profile_image_url": "http://k.kakaocdn.net/p.jpg" }
            }
        });

        let profile = normalize(AuthProvider::Kakao, &raw).unwrap();
        assert_eq!(profile.provider_user_id, "3141592653");
        assert_eq!(profile.email.as_deref(), Some("chulsoo@kakao.com"));
        assert_eq!(profile.display_name.as_deref(), Some("철수"));
        assert_eq!(profile.login_id(), "kakao_3141592653");
    }

    #[test]
    fn test_normalize_kakao_legacy_properties() {
        let raw = json!({ "id": 1, "properties": { "nickname": "영희" } });
        let profile = normalize(AuthProvider::Kakao, &raw).unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("영희"));
        assert!(profile.email.is_none());
    }

    #[test]
    fn test_normalize_google_sub_fallback() {
        let raw = json!({ "sub": "1099", "email": "a@gmail.com", "name": "Alice", "picture": "http://p" });
        let profile = normalize(AuthProvider::Google, &raw).unwrap();
        assert_eq!(profile.provider_user_id, "1099");
        assert_eq!(profile.avatar_url.as_deref(), Some("http://p"));
    }

    #[test]
    fn test_normalize_without_id_is_incomplete() {
        for raw in [json!({}), json!({ "id": "" }), json!({ "id": null, "email": "x@y.z" })] {
            assert!(matches!(
                normalize(AuthProvider::Google, &raw),
                Err(AppError::ProfileIncomplete(_))
            ));
        }
    }

    #[test]
    fn test_authorize_url_contains_encoded_params() {
        let exchange = exchange(google_descriptor("http://idp"), Duration::from_secs(1));
        let descriptor = exchange.descriptor(AuthProvider::Google).unwrap();
        let url = exchange.authorize_url(descriptor, "S1/+=");

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=google-client"));
        assert!(url.contains("state=S1%2F%2B%3D"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=openid%20email%20profile"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fauth%2Fgoogle%2Fcallback"));
    }

    #[test]
    fn test_unregistered_provider_is_unknown() {
        let exchange = exchange(google_descriptor("http://idp"), Duration::from_secs(1));
        assert!(matches!(exchange.resolve("kakao"), Err(AppError::UnknownProvider(_))));
        assert!(matches!(exchange.resolve("twitter"), Err(AppError::UnknownProvider(_))));
        assert!(exchange.resolve("GOOGLE").is_ok());
        assert_eq!(exchange.registered(), vec![AuthProvider::Google]);
    }

    #[tokio::test]
    async fn test_authenticate_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("code=C1"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("client_secret=google-secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "provider-at",
                "token_type": "Bearer",
                "expires_in": 3599
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(header("authorization", "Bearer provider-at"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "g-123", "email": "a@gmail.com", "name": "Alice"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let exchange = exchange(google_descriptor(&server.uri()), Duration::from_secs(5));
        let descriptor = exchange.descriptor(AuthProvider::Google).unwrap();
        let profile = exchange.authenticate(descriptor, "C1").await.unwrap();

        assert_eq!(profile.provider, AuthProvider::Google);
        assert_eq!(profile.provider_user_id, "g-123");
        assert_eq!(profile.display_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_token_endpoint_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })))
            .mount(&server)
            .await;

        let exchange = exchange(google_descriptor(&server.uri()), Duration::from_secs(5));
        let descriptor = exchange.descriptor(AuthProvider::Google).unwrap();
        let result = exchange.exchange_code(descriptor, "used-code").await;

        match result {
            Err(AppError::ProviderRejected(detail)) => assert!(!detail.contains("invalid_grant")),
            other => panic!("expected ProviderRejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unparseable_token_response_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let exchange = exchange(google_descriptor(&server.uri()), Duration::from_secs(5));
        let descriptor = exchange.descriptor(AuthProvider::Google).unwrap();
        assert!(matches!(
            exchange.exchange_code(descriptor, "C1").await,
            Err(AppError::ProviderRejected(_))
        ));
    }

    #[tokio::test]
    async fn test_userinfo_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let exchange = exchange(google_descriptor(&server.uri()), Duration::from_secs(5));
        let descriptor = exchange.descriptor(AuthProvider::Google).unwrap();
        assert!(matches!(
            exchange.fetch_profile(descriptor, "stale").await,
            Err(AppError::ProviderRejected(_))
        ));
    }

    #[tokio::test]
    async fn test_hung_provider_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "access_token": "late" }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let exchange = exchange(google_descriptor(&server.uri()), Duration::from_millis(200));
        let descriptor = exchange.descriptor(AuthProvider::Google).unwrap();
        assert!(matches!(
            exchange.exchange_code(descriptor, "C1").await,
            Err(AppError::ProviderUnreachable(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_provider() {
        // 바인딩되지 않은 포트
        let exchange = exchange(google_descriptor("http://127.0.0.1:9"), Duration::from_secs(2));
        let descriptor = exchange.descriptor(AuthProvider::Google).unwrap();
        assert!(matches!(
            exchange.exchange_code(descriptor, "C1").await,
            Err(AppError::ProviderUnreachable(_))
        ));
    }
}
