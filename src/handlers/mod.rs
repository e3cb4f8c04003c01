//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//! 핸들러는 요청을 해석하고 쿠키를 다루는 일만 하며, 판단은 서비스 계층에 맡깁니다.
//!
//! ## 아키텍처 위치
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Client (Browser, Mobile App)
//! └─────────────────────┬───────────────────────┘
//!                       │ HTTP Request/Response
//! ┌─────────────────────▼───────────────────────┐
//!   Handlers (이 모듈)              ← Web Layer
//!   AuthMiddleware                  ← 인증 게이트
//! ├─────────────────────────────────────────────┤
//!   Services - StateGuard, ProviderExchange,
//!              SessionIssuer, RevocationRegistry
//! ├─────────────────────────────────────────────┤
//!   Repositories - UserStore, StateStore, RevocationStore
//! └─────────────────────────────────────────────┘
//! ```
//!
//! 서비스는 전역 싱글톤이 아니라 `web::Data<AppState>`로 주입됩니다.
//!
//! ```rust,ignore
//! #[post("/refresh")]
//! pub async fn refresh_tokens(
//!     state: web::Data<AppState>,
//!     ...
//! ) -> Result<HttpResponse, AppError> {
//!     let pair = state.sessions.refresh(&presented).await?;
//!     ...
//! }
//! ```
//!
//! ## 에러 처리
//!
//! 핸들러는 `Result<HttpResponse, AppError>`를 반환하고 `?`로 에러를 전파합니다.
//! `AppError`의 `ResponseError` 구현이 상태 코드와 일반화된 JSON 본문을 만듭니다.
//!
//! ## 모듈 구성
//!
//! - **`auth`**: 소셜 로그인과 세션 엔드포인트
//!   - 로그인 시작 (`GET /auth/{provider}`)
//!   - OAuth 콜백 (`GET /auth/{provider}/callback`)
//!   - 토큰 갱신 (`POST /auth/refresh`)
//!   - 로그아웃 (`POST /auth/logout`)
//!   - 내 정보 (`GET /auth/me`)

pub mod auth;
