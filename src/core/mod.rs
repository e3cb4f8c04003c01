//! # Core Module
//!
//! 서버 전역에서 공유하는 애플리케이션 상태를 정의합니다.
//! 서비스와 저장소는 전역 싱글톤이 아니라 [`AppState`]로 조립되어
//! `web::Data`로 핸들러와 미들웨어에 주입됩니다.

pub mod app_state;

pub use app_state::*;
