//! 인증 세션 엔진
//!
//! - [`token_codec`] - 액세스/리프레시 토큰 발급과 검증
//! - [`state_guard`] - 일회용 CSRF state
//! - [`provider_exchange`] - authorization code → 프로필 왕복
//! - [`session_issuer`] - 로그인 완료, 토큰 갱신(회전), 세션 종료
//! - [`revocation`] - 로그아웃된 액세스 토큰 폐기 목록

pub mod provider_exchange;
pub mod revocation;
pub mod session_issuer;
pub mod state_guard;
pub mod token_codec;

pub use provider_exchange::ProviderExchange;
pub use revocation::RevocationRegistry;
pub use session_issuer::SessionIssuer;
pub use state_guard::StateGuard;
pub use token_codec::TokenCodec;
