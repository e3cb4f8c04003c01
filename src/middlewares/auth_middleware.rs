//! 액세스 토큰 인증 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 액세스 토큰을 검증하고 사용자 정보를 요청에 붙입니다.
//!
//! ```text
//! 토큰 없음                  -> 401
//! 토큰 있음 -> 검증 실패      -> 403
//!           -> 폐기된 토큰    -> 403
//!           -> 통과           -> AuthenticatedUser 부착 후 다음 서비스로
//! ```

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
    body::EitherBody,
};
use crate::middlewares::auth_inner::AuthMiddlewareService;
use crate::middlewares::token_extractor::{TokenSource, DEFAULT_ACCESS_SOURCES};

/// 액세스 토큰 인증 미들웨어
///
/// 검증에 필요한 [`AppState`](crate::core::AppState)는 `app_data`에서 가져오므로
/// 앱에 `web::Data<AppState>`가 등록되어 있어야 합니다.
pub struct AuthMiddleware {
    /// 토큰을 찾을 위치 (앞쪽 우선)
    sources: Rc<[TokenSource]>,
}

impl AuthMiddleware {
    /// 기본 출처(Bearer 헤더, `token` 쿠키)를 사용하는 필수 인증 미들웨어
    pub fn required() -> Self {
        Self::with_sources(&DEFAULT_ACCESS_SOURCES)
    }

    /// 토큰 출처와 우선순위를 직접 지정합니다.
    pub fn with_sources(sources: &[TokenSource]) -> Self {
        Self {
            sources: Rc::from(sources),
        }
    }
}

/// ActixWeb Transform trait 구현
impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            sources: self.sources.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{get, http::StatusCode, test, web, App, HttpResponse};
    use actix_web::cookie::Cookie;
    use actix_web::http::header::AUTHORIZATION;
    use chrono::{Duration, Utc};

    use crate::config::AuthSettings;
    use crate::core::AppState;
    use crate::domain::models::auth::AuthenticatedUser;
    use crate::domain::models::token::TokenKind;

    #[get("/protected")]
    async fn protected(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.user_id)
    }

    fn state() -> AppState {
        AppState::in_memory(AuthSettings::new("gate-secret")).unwrap()
    }

    macro_rules! gated_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .service(web::scope("").wrap(AuthMiddleware::required()).service(protected)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let state = state();
        let app = gated_app!(state);

        let res = test::call_service(&app, test::TestRequest::get().uri("/protected").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_valid_bearer_token_attaches_identity() {
        let state = state();
        let app = gated_app!(state);
        let token = state.codec.issue(TokenKind::Access, "user-1", "철수").unwrap();

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header((AUTHORIZATION, format!("Bearer {}", token.token)))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "user-1");
    }

    #[actix_web::test]
    async fn test_cookie_token_is_accepted() {
        let state = state();
        let app = gated_app!(state);
        let token = state.codec.issue(TokenKind::Access, "user-2", "영희").unwrap();

        let req = test::TestRequest::get()
            .uri("/protected")
            .cookie(Cookie::new("token", token.token))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_invalid_tokens_are_forbidden() {
        let state = state();
        let app = gated_app!(state);

        let refresh = state.codec.issue(TokenKind::Refresh, "user-1", "n").unwrap();
        let expired = state
            .codec
            .issue_at(TokenKind::Access, "user-1", "n", Duration::seconds(5), Utc::now() - Duration::hours(1))
            .unwrap();
        let foreign = crate::services::auth::TokenCodec::new("other-secret", Duration::hours(1), Duration::days(1))
            .issue(TokenKind::Access, "user-1", "n")
            .unwrap();

        for token in ["garbage".to_string(), refresh.token, expired.token, foreign.token] {
            let req = test::TestRequest::get()
                .uri("/protected")
                .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::FORBIDDEN);
        }
    }

    #[actix_web::test]
    async fn test_revoked_token_is_forbidden() {
        let state = state();
        let app = gated_app!(state);
        let token = state.codec.issue(TokenKind::Access, "user-1", "n").unwrap();
        state.revocations.revoke(&token.token, &token.claims).await.unwrap();

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header((AUTHORIZATION, format!("Bearer {}", token.token)))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_error_body_does_not_reveal_failed_check() {
        let state = state();
        let app = gated_app!(state);
        let expired = state
            .codec
            .issue_at(TokenKind::Access, "user-1", "n", Duration::seconds(5), Utc::now() - Duration::hours(1))
            .unwrap();

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header((AUTHORIZATION, format!("Bearer {}", expired.token)))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["error"], "invalid_token");
        assert!(!body["message"].as_str().unwrap_or_default().contains("expire"));
    }
}
