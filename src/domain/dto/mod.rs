//! # Data Transfer Objects (DTO) Module
//!
//! HTTP 경계에서 주고받는 요청/응답 구조체입니다.
//! 필드 이름은 기존 프론트엔드 계약(`refreshToken`, `accessToken`)을 따라 camelCase 입니다.
//!
//! ```text
//! dto/
//! └── auth/
//!     ├── request.rs   # 콜백 쿼리, 토큰 갱신 요청
//!     └── response.rs  # 토큰 갱신 응답, 내 정보 응답, 공통 래퍼
//! ```

pub mod auth;

pub use auth::*;
