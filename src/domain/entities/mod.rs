//! # Domain Entities Module
//!
//! 저장소에 영속되는 엔티티를 정의합니다.
//! 현재는 소셜 로그인 사용자 레코드 하나뿐입니다.

pub mod users;
