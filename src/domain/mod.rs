//! # Domain Layer Module
//!
//! 인증 세션 엔진이 다루는 데이터 구조를 정의합니다.
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── Entities  - 저장소에 영속되는 사용자 레코드
//! ├── DTOs      - HTTP 요청/응답 계약
//! └── Models    - 토큰 클레임, OAuth 핸드셰이크, 프로바이더 프로필
//! ```
//!
//! 도메인 타입은 저장소나 HTTP 프레임워크를 직접 호출하지 않습니다.
//! 인증 게이트가 사용하는 [`AuthenticatedUser`](models::auth::AuthenticatedUser) 추출자만 예외입니다.

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::users::User;
pub use models::auth::AuthenticatedUser;
pub use models::oauth::{ProviderDescriptor, ProviderProfile};
pub use models::token::{TokenClaims, TokenKind, TokenPair};
