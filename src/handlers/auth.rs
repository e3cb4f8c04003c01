//! Authentication HTTP Handlers
//!
//! 소셜 로그인 핸드셰이크와 세션 토큰 수명주기를 다루는 엔드포인트입니다.
//!
//! # Endpoints
//!
//! - `GET  /auth/{provider}` - 프로바이더 authorize URL 로 302 리다이렉트
//! - `GET  /auth/{provider}/callback` - state 검증, code 교환, 세션 발급
//! - `POST /auth/refresh` - 리프레시 토큰 회전
//! - `POST /auth/logout` - 액세스 토큰 폐기, 쿠키 삭제
//! - `GET  /auth/me` - 인증 게이트를 통과한 사용자 정보
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::http::header::LOCATION;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use validator::Validate;

use crate::core::AppState;
use crate::domain::dto::{ApiResponse, MeResponse, OAuthCallbackQuery, RefreshTokenRequest, TokenRefreshResponse};
use crate::domain::{AuthenticatedUser, TokenClaims, TokenKind, TokenPair, User};
use crate::errors::AppError;
use crate::middlewares::token_extractor::{
    extract_token, TokenSource, ACCESS_TOKEN_COOKIE, DEFAULT_ACCESS_SOURCES, REFRESH_TOKEN_COOKIE,
};
use crate::middlewares::AuthMiddleware;

/// 브라우저와 핸드셰이크를 묶는 쿠키 이름
pub const HANDSHAKE_COOKIE: &str = "oauth_handshake";

/// 핸드셰이크/리프레시 쿠키 경로
const AUTH_COOKIE_PATH: &str = "/auth";

/// 소셜 로그인 시작
///
/// 일회용 state 를 발급하고 핸드셰이크 쿠키를 심은 뒤 프로바이더로 보냅니다.
///
/// # Endpoint
/// `GET /auth/{provider}`
#[get("/{provider}")]
pub async fn begin_login(
    state: web::Data<AppState>,
    provider: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let descriptor = state.exchange.resolve(&provider)?;
    let pending = state.state_guard.begin(descriptor.provider).await?;
    let location = state.exchange.authorize_url(descriptor, &pending.state);

    let handshake = Cookie::build(HANDSHAKE_COOKIE, pending.handshake_id)
        .path(AUTH_COOKIE_PATH)
        .http_only(true)
        .secure(state.settings.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(state.state_guard.ttl().num_seconds()))
        .finish();

    log::info!("🚪 소셜 로그인 시작: {}", descriptor.provider);
    Ok(HttpResponse::Found()
        .insert_header((LOCATION, location))
        .cookie(handshake)
        .finish())
}

/// OAuth 콜백 처리 핸들러
///
/// state 는 다른 어떤 검사보다 먼저 소모됩니다. 프로바이더가 `error`를 돌려준 경우에도
/// 같은 state 로 다시 시도할 수 없습니다.
///
/// 성공하면 자격 증명 쿠키를 설정하고 클라이언트 URL 로 리다이렉트합니다.
/// 쿠키를 쓰지 않는 클라이언트를 위해 토큰과 사용자 정보를 쿼리에도 싣습니다.
///
/// # Endpoint
/// `GET /auth/{provider}/callback?code={code}&state={state}`
#[get("/{provider}/callback")]
pub async fn oauth_callback(
    req: HttpRequest,
    state: web::Data<AppState>,
    provider: web::Path<String>,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse, AppError> {
    let descriptor = state.exchange.resolve(&provider)?;

    let handshake_id = req.cookie(HANDSHAKE_COOKIE).map(|c| c.value().to_string());
    state
        .state_guard
        .require_valid(handshake_id.as_deref(), query.state.as_deref(), descriptor.provider)
        .await
        .inspect_err(|_| log::warn!("OAuth state 검증 실패: {}", descriptor.provider))?;

    // 에러 체크 (사용자가 거부했거나 에러 발생)
    if let Some(error) = &query.error {
        log::warn!(
            "{} OAuth 에러: {} - {}",
            descriptor.provider,
            error,
            query.error_description.as_deref().unwrap_or("-")
        );
        return Err(AppError::ProviderRejected(format!("authorization denied: {}", error)));
    }

    // 유효성 검사
    query.validate().map_err(|e| AppError::ValidationError(e.to_string()))?;
    let code = query
        .code
        .as_deref()
        .ok_or_else(|| AppError::ValidationError("code is required".to_string()))?;

    let profile = state.exchange.authenticate(descriptor, code).await?;
    let (user, pair) = state.sessions.complete_login(&profile).await?;

    let location = client_redirect(&state.settings.client_redirect_url, &user, &pair);
    log::info!("✅ {} 로그인 성공: {}", descriptor.provider, user.login_id);

    let mut handshake = Cookie::build(HANDSHAKE_COOKIE, "").path(AUTH_COOKIE_PATH).finish();
    handshake.make_removal();

    Ok(HttpResponse::Found()
        .insert_header((LOCATION, location))
        .cookie(access_cookie(&state, &pair))
        .cookie(refresh_cookie(&state, &pair))
        .cookie(handshake)
        .finish())
}

/// 토큰 갱신 엔드포인트
///
/// 리프레시 토큰은 `refreshToken` 쿠키, JSON 본문, Bearer 헤더 순서로 찾습니다.
/// 성공하면 회전된 토큰 쌍을 본문과 쿠키로 모두 돌려줍니다.
///
/// # Endpoint
/// `POST /auth/refresh`
#[post("/refresh")]
pub async fn refresh_tokens(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> Result<HttpResponse, AppError> {
    let presented = extract_refresh_token(&req, body.as_deref()).ok_or(AppError::MissingCredential)?;
    let pair = state.sessions.refresh(&presented).await?;

    Ok(HttpResponse::Ok()
        .cookie(access_cookie(&state, &pair))
        .cookie(refresh_cookie(&state, &pair))
        .json(ApiResponse::success(TokenRefreshResponse::from(pair))))
}

/// 로그아웃 엔드포인트
///
/// 가능한 만큼 정리합니다. 토큰이 없거나 유효하지 않아도 쿠키를 지우고 200을 반환합니다.
/// 액세스 토큰이 유효하면 폐기합니다. 서명이 맞고 만료된 지 액세스 토큰 수명 이내인
/// 액세스 토큰이면 해당 사용자의 리프레시 토큰을 지웁니다.
///
/// # Endpoint
/// `POST /auth/logout`
#[post("/logout")]
pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    if let Some(token) = extract_token(&req, &DEFAULT_ACCESS_SOURCES) {
        if let Ok(claims) = state.codec.verify(&token, TokenKind::Access) {
            if let Err(e) = state.revocations.revoke(&token, &claims).await {
                log::error!("액세스 토큰 폐기 실패: {}", e);
            }
        }

        match state.codec.verify_signature(&token) {
            Ok(claims) if within_logout_grace(&state, &claims) => {
                if let Err(e) = state.sessions.end_session(&claims.sub).await {
                    log::error!("리프레시 토큰 삭제 실패: user={} {}", claims.sub, e);
                }
                log::info!("👋 로그아웃: user={}", claims.sub);
            }
            Ok(claims) => log::debug!("오래 만료된 토큰의 로그아웃 요청 무시: user={}", claims.sub),
            Err(e) => log::debug!("로그아웃 토큰 무시: {}", e),
        }
    }

    let mut access = Cookie::build(ACCESS_TOKEN_COOKIE, "").path("/").finish();
    access.make_removal();
    let mut refresh = Cookie::build(REFRESH_TOKEN_COOKIE, "").path(AUTH_COOKIE_PATH).finish();
    refresh.make_removal();

    HttpResponse::Ok()
        .cookie(access)
        .cookie(refresh)
        .json(ApiResponse::<()>::message("로그아웃되었습니다."))
}

/// 현재 인증된 사용자 정보 조회 엔드포인트
///
/// # Endpoint
/// `GET /auth/me`
#[get("/me", wrap = "AuthMiddleware::required()")]
pub async fn get_current_user(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(MeResponse::from(user)))
}

/// 로그아웃이 세션을 끝낼 수 있는 토큰인지 확인
///
/// 액세스 토큰이어야 하고, 만료 후 경과 시간이 액세스 토큰 수명을 넘지 않아야 합니다.
fn within_logout_grace(state: &AppState, claims: &TokenClaims) -> bool {
    let grace = state.codec.ttl(TokenKind::Access);
    let cutoff = Utc::now()
        .checked_sub_signed(grace)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    claims.typ == TokenKind::Access && !claims.is_expired_at(cutoff)
}

/// HTTP 요청에서 리프레시 토큰 추출
fn extract_refresh_token(req: &HttpRequest, body: Option<&RefreshTokenRequest>) -> Option<String> {
    // 1. 쿠키
    if let Some(token) = TokenSource::Cookie(REFRESH_TOKEN_COOKIE).read(req) {
        return Some(token);
    }

    // 2. 요청 본문
    if let Some(body) = body.filter(|b| b.validate().is_ok()) {
        return Some(body.refresh_token.clone());
    }

    // 3. Authorization 헤더
    TokenSource::BearerHeader.read(req)
}

fn access_cookie(state: &AppState, pair: &TokenPair) -> Cookie<'static> {
    Cookie::build(ACCESS_TOKEN_COOKIE, pair.access_token.clone())
        .path("/")
        .http_only(true)
        .secure(state.settings.cookie_secure)
        .same_site(SameSite::None)
        .max_age(CookieDuration::seconds(state.codec.ttl(TokenKind::Access).num_seconds()))
        .finish()
}

fn refresh_cookie(state: &AppState, pair: &TokenPair) -> Cookie<'static> {
    Cookie::build(REFRESH_TOKEN_COOKIE, pair.refresh_token.clone())
        .path(AUTH_COOKIE_PATH)
        .http_only(true)
        .secure(state.settings.cookie_secure)
        .same_site(SameSite::None)
        .max_age(CookieDuration::seconds(state.codec.ttl(TokenKind::Refresh).num_seconds()))
        .finish()
}

/// 로그인 성공 후 클라이언트로 돌아갈 URL
fn client_redirect(base: &str, user: &User, pair: &TokenPair) -> String {
    let params = [
        ("token", pair.access_token.as_str()),
        ("userId", user.id.as_str()),
        ("loginId", user.login_id.as_str()),
        ("nickname", user.nickname.as_str()),
    ];

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}", base, separator, query_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use chrono::Duration;

    use crate::config::{AuthProvider, AuthSettings};
    use crate::domain::ProviderDescriptor;

    fn settings() -> AuthSettings {
        let mut settings = AuthSettings::new("handler-secret");
        settings.providers = vec![ProviderDescriptor::kakao(
            "kakao-client".to_string(),
            None,
            "http://localhost:8080/auth/kakao/callback".to_string(),
        )];
        settings
    }

    macro_rules! auth_app {
        ($state:expr) => {
            test::init_service(
                App::new().app_data(web::Data::new($state.clone())).service(
                    web::scope("/auth")
                        .service(get_current_user)
                        .service(refresh_tokens)
                        .service(logout)
                        .service(oauth_callback)
                        .service(begin_login),
                ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_begin_login_redirects_with_state_and_cookie() {
        let state = AppState::in_memory(settings()).unwrap();
        let app = auth_app!(state);

        let res = test::call_service(&app, test::TestRequest::get().uri("/auth/kakao").to_request()).await;
        assert_eq!(res.status(), StatusCode::FOUND);

        let location = res.headers().get(LOCATION).unwrap().to_str().unwrap();
        assert!(location.starts_with("https://kauth.kakao.com/oauth/authorize?"));
        assert!(location.contains("state="));

        let cookie = res
            .response()
            .cookies()
            .find(|c| c.name() == HANDSHAKE_COOKIE)
            .unwrap();
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/auth"));
    }

    #[actix_web::test]
    async fn test_unknown_or_unregistered_provider_is_not_found() {
        let state = AppState::in_memory(settings()).unwrap();
        let app = auth_app!(state);

        for uri in ["/auth/naver", "/auth/google"] {
            let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(res.status(), StatusCode::NOT_FOUND);
        }
    }

    #[actix_web::test]
    async fn test_callback_without_handshake_is_forbidden() {
        let state = AppState::in_memory(settings()).unwrap();
        let app = auth_app!(state);

        let req = test::TestRequest::get()
            .uri("/auth/kakao/callback?code=abc&state=forged")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_callback_provider_error_consumes_state() {
        let state = AppState::in_memory(settings()).unwrap();
        let app = auth_app!(state);
        let pending = state.state_guard.begin(AuthProvider::Kakao).await.unwrap();

        let uri = format!("/auth/kakao/callback?error=access_denied&state={}", pending.state);
        let req = test::TestRequest::get()
            .uri(&uri)
            .cookie(Cookie::new(HANDSHAKE_COOKIE, pending.handshake_id.clone()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // 같은 state 로 재시도하면 CSRF 실패
        let uri = format!("/auth/kakao/callback?code=abc&state={}", pending.state);
        let req = test::TestRequest::get()
            .uri(&uri)
            .cookie(Cookie::new(HANDSHAKE_COOKIE, pending.handshake_id))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_callback_without_code_is_bad_request() {
        let state = AppState::in_memory(settings()).unwrap();
        let app = auth_app!(state);
        let pending = state.state_guard.begin(AuthProvider::Kakao).await.unwrap();

        let uri = format!("/auth/kakao/callback?state={}", pending.state);
        let req = test::TestRequest::get()
            .uri(&uri)
            .cookie(Cookie::new(HANDSHAKE_COOKIE, pending.handshake_id))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_refresh_without_token_is_unauthorized() {
        let state = AppState::in_memory(settings()).unwrap();
        let app = auth_app!(state);

        let res = test::call_service(&app, test::TestRequest::post().uri("/auth/refresh").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_refresh_accepts_json_body() {
        let state = AppState::in_memory(settings()).unwrap();
        let app = auth_app!(state);
        let profile = crate::domain::ProviderProfile {
            provider: AuthProvider::Kakao,
            provider_user_id: "42".to_string(),
            email: None,
            display_name: Some("민수".to_string()),
            avatar_url: None,
        };
        let (user, pair) = state.sessions.complete_login(&profile).await.unwrap();

        let req = test::TestRequest::post()
            .uri("/auth/refresh")
            .set_json(serde_json::json!({ "refreshToken": pair.refresh_token }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        let access = body["data"]["accessToken"].as_str().unwrap();
        let claims = state.codec.verify(access, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, user.id);
    }

    #[actix_web::test]
    async fn test_logout_without_token_still_clears_cookies() {
        let state = AppState::in_memory(settings()).unwrap();
        let app = auth_app!(state);

        let res = test::call_service(&app, test::TestRequest::post().uri("/auth/logout").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);

        let cleared: Vec<_> = res.response().cookies().map(|c| c.name().to_string()).collect();
        assert!(cleared.contains(&ACCESS_TOKEN_COOKIE.to_string()));
        assert!(cleared.contains(&REFRESH_TOKEN_COOKIE.to_string()));
    }

    async fn logout_with_token_expired_since(
        state: &AppState,
        expired_for: Duration,
    ) -> (StatusCode, StatusCode) {
        let app = auth_app!(state);
        let profile = crate::domain::ProviderProfile {
            provider: AuthProvider::Kakao,
            provider_user_id: "7".to_string(),
            email: None,
            display_name: Some("영희".to_string()),
            avatar_url: None,
        };
        let (user, pair) = state.sessions.complete_login(&profile).await.unwrap();

        let ttl = Duration::minutes(10);
        let issued_at = Utc::now() - ttl - expired_for;
        let stale = state
            .codec
            .issue_at(TokenKind::Access, &user.id, &user.nickname, ttl, issued_at)
            .unwrap();

        let req = test::TestRequest::post()
            .uri("/auth/logout")
            .insert_header((actix_web::http::header::AUTHORIZATION, format!("Bearer {}", stale.token)))
            .to_request();
        let logout_status = test::call_service(&app, req).await.status();

        let req = test::TestRequest::post()
            .uri("/auth/refresh")
            .set_json(serde_json::json!({ "refreshToken": pair.refresh_token }))
            .to_request();
        let refresh_status = test::call_service(&app, req).await.status();

        (logout_status, refresh_status)
    }

    #[actix_web::test]
    async fn test_logout_with_recently_expired_token_ends_session() {
        let state = AppState::in_memory(settings()).unwrap();
        let (logout_status, refresh_status) = logout_with_token_expired_since(&state, Duration::minutes(1)).await;
        assert_eq!(logout_status, StatusCode::OK);
        assert_eq!(refresh_status, StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_logout_with_long_expired_token_keeps_session() {
        let state = AppState::in_memory(settings()).unwrap();
        let (logout_status, refresh_status) = logout_with_token_expired_since(&state, Duration::days(3)).await;
        assert_eq!(logout_status, StatusCode::OK);
        assert_eq!(refresh_status, StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_me_requires_token() {
        let state = AppState::in_memory(settings()).unwrap();
        let app = auth_app!(state);

        let res = test::call_service(&app, test::TestRequest::get().uri("/auth/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_client_redirect_encodes_values() {
        let now = Utc::now();
        let profile = crate::domain::ProviderProfile {
            provider: AuthProvider::Google,
            provider_user_id: "g-1".to_string(),
            email: None,
            display_name: Some("김 철수".to_string()),
            avatar_url: None,
        };
        let user = User::from_profile(&profile, now);
        let pair = TokenPair {
            access_token: "a.b.c".to_string(),
            refresh_token: "r".to_string(),
            access_expires_at: now,
            refresh_expires_at: now,
        };

        let url = client_redirect("http://localhost:3000/login?from=oauth", &user, &pair);
        assert!(url.starts_with("http://localhost:3000/login?from=oauth&token=a.b.c&userId="));
        assert!(url.contains("loginId=google_g-1"));
        assert!(url.contains("nickname=%EA%B9%80%20%EC%B2%A0%EC%88%98"));
    }
}
