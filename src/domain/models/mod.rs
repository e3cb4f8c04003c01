//! 도메인 모델
//!
//! - [`token`] - 자체 발급 토큰의 클레임과 토큰 쌍
//! - [`auth`] - 인증 게이트가 요청에 첨부하는 사용자 신원
//! - [`oauth`] - OAuth 핸드셰이크 상태, 프로바이더 디스크립터, 정규화된 프로필

pub mod auth;
pub mod oauth;
pub mod token;
