//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 프로바이더 응답 값 정리
//! - [`crypto_utils`] - 랜덤 토큰 생성, 상수 시간 비교

pub mod crypto_utils;
pub mod string_utils;
