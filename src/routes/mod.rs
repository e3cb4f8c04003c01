//! API 라우트 설정 모듈
//!
//! 소셜 로그인/세션 엔드포인트와 헬스체크 엔드포인트를 등록합니다.
//!
//! # Auth Middleware Usage
//!
//! 로그인 핸드셰이크와 갱신/로그아웃은 인증 없이 접근 가능하고,
//! `GET /auth/me`만 핸들러 단위로 [`AuthMiddleware`](crate::middlewares::AuthMiddleware)가 적용됩니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//!
//! let app = App::new()
//!     .app_data(web::Data::new(state))
//!     .configure(configure_all_routes);
//! ```

use crate::handlers;
use actix_web::web;
use serde_json::json;

/// 모든 라우트를 설정합니다
///
/// # Arguments
///
/// * `cfg` - Actix-web 서비스 설정 객체
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    // Health check endpoint
    cfg.service(health_check);

    configure_auth_routes(cfg);
}

/// 인증 관련 라우트를 설정합니다
///
/// 고정 경로(`/me`, `/refresh`, `/logout`)를 `/{provider}`보다 먼저 등록해야
/// 프로바이더 이름으로 잘못 매칭되지 않습니다.
///
/// # Available Routes
///
/// - `GET /auth/me` - 현재 사용자 정보 (인증 필요)
/// - `POST /auth/refresh` - 토큰 갱신
/// - `POST /auth/logout` - 로그아웃
/// - `GET /auth/{provider}` - 소셜 로그인 시작 (`kakao`, `google`)
/// - `GET /auth/{provider}/callback` - OAuth 콜백
///
/// # Examples
///
/// ```bash
/// # 카카오 로그인 시작 (브라우저)
/// curl -i http://localhost:8080/auth/kakao
///
/// # 토큰 갱신 (쿠키 없는 클라이언트)
/// curl -X POST http://localhost:8080/auth/refresh \
///   -H "Content-Type: application/json" \
///   -d '{"refreshToken":"eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."}'
/// ```
fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(handlers::auth::get_current_user)
            .service(handlers::auth::refresh_tokens)
            .service(handlers::auth::logout)
            .service(handlers::auth::oauth_callback)
            .service(handlers::auth::begin_login),
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// # Examples
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
///
/// Response:
/// ```json
/// {
///   "status": "healthy",
///   "service": "social_auth_backend",
///   "version": "0.1.0",
///   "timestamp": "2026-01-01T00:00:00Z"
/// }
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
