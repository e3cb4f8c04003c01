//! OAuth 핸드셰이크 관련 모델
//!
//! - [`oauth_state`] - 진행 중인 핸드셰이크의 일회용 CSRF state
//! - [`provider_descriptor`] - 프로바이더 엔드포인트와 자격 증명 (데이터 기반 디스크립터)
//! - [`provider_profile`] - 프로바이더 응답과 정규화된 프로필

pub mod oauth_state;
pub mod provider_descriptor;
pub mod provider_profile;

pub use oauth_state::*;
pub use provider_descriptor::*;
pub use provider_profile::*;
