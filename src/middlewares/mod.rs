//! 미들웨어 모듈
//!
//! ActixWeb 애플리케이션의 요청 처리 파이프라인에서 사용되는 미들웨어들을 제공합니다.
//!
//! # 제공 미들웨어
//!
//! ### 1. 인증 미들웨어 (AuthMiddleware)
//! - Bearer 헤더 또는 `token` 쿠키에서 액세스 토큰 추출 (헤더 우선)
//! - 서명, 용도, 만료, 폐기 여부 검증
//! - 사용자 정보를 request extension에 저장
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//!
//! App::new()
//!     .app_data(web::Data::new(state))
//!     .service(
//!         web::scope("/auth")
//!             .service(
//!                 web::resource("/me")
//!                     .wrap(AuthMiddleware::required())
//!                     .route(web::get().to(me)),
//!             )
//!     )
//! ```

pub mod auth_middleware;
mod auth_inner;
pub mod token_extractor;

// 미들웨어 재export
pub use auth_middleware::AuthMiddleware;
pub use token_extractor::{extract_token, TokenSource};
