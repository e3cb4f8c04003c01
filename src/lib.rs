//! 소셜 로그인 인증 서비스 백엔드
//!
//! 카카오/구글 OAuth 2.0 로그인을 완료한 사용자에게 자체 서명한
//! 액세스/리프레시 토큰 세션을 발급하고, 이후 요청을 검증하는 서비스입니다.
//!
//! # Features
//!
//! - **CSRF state**: 일회용 state 발급과 상수 시간 비교 검증
//! - **프로바이더 교환**: authorization code 교환, 프로필 조회와 정규화
//! - **세션 발급**: HS256 액세스/리프레시 토큰, 리프레시 토큰 회전
//! - **인증 게이트**: Bearer 헤더/쿠키 토큰 검증 미들웨어
//! - **폐기 목록**: 로그아웃된 액세스 토큰 거부
//! - **저장소**: 메모리 기본, MongoDB 사용자 저장소, Redis state/폐기 목록
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답, 쿠키 처리 (+ AuthMiddleware)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← TokenCodec, StateGuard, ProviderExchange,
//! └─────────────────┘   SessionIssuer, RevocationRegistry
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← UserStore, StateStore, RevocationStore
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Memory / Mongo  │ ← 저장소
//! │     / Redis     │
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use social_auth_backend::config::AuthSettings;
//! use social_auth_backend::core::AppState;
//!
//! let state = AppState::in_memory(AuthSettings::from_env()?)?;
//! let (user, tokens) = state.sessions.complete_login(&profile).await?;
//! let rotated = state.sessions.refresh(&tokens.refresh_token).await?;
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
