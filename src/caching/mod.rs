//! 캐싱 계층
//!
//! - [`redis`] - 공유 state / 폐기 토큰 저장에 쓰는 Redis 클라이언트

pub mod redis;
