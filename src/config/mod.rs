//! # Configuration Module
//!
//! 소셜 로그인 백엔드의 설정 관리를 담당하는 모듈입니다.
//! 모든 설정값은 환경 변수(`.env.dev`, `.env.prod` 프로필 파일 포함)에서 읽습니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버, 저장소, CORS 설정
//! - [`auth_config`] - JWT, OAuth 프로바이더, 쿠키, 리다이렉트 설정
//!
//! ## 설계 원칙
//!
//! - 민감한 정보는 환경 변수로만 제공
//! - 기본값은 개발 환경에서만 안전
//! - 프로덕션에서 `JWT_SECRET` 누락 시 기동 실패
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::{AuthSettings, Environment, ServerConfig};
//!
//! let env = Environment::current();
//! let settings = AuthSettings::from_env()?;
//! let bind = format!("{}:{}", ServerConfig::host(), ServerConfig::port());
//! ```
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 서버 설정
//! export HOST="0.0.0.0"
//! export PORT="8080"
//!
//! # 저장소 (미설정 시 메모리 저장소)
//! export MONGODB_URI="mongodb://localhost:27017"
//! export DATABASE_NAME="social_auth"
//! export REDIS_URL="redis://127.0.0.1:6379"
//!
//! # 환경
//! export ENVIRONMENT="production"  # development, test, staging, production
//! ```

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;
