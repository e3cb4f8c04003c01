//! # Service Layer
//!
//! 인증 세션 엔진의 핵심 로직입니다. 저장소는 트레이트로만 의존합니다.

pub mod auth;
