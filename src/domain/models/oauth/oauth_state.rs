use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AuthProvider;

/// 진행 중인 OAuth 핸드셰이크에 묶인 일회용 CSRF state
///
/// 핸드셰이크 ID(브라우저 쿠키에 저장)를 키로 저장소에 보관되며,
/// 첫 검증 시도에서 성공 여부와 관계없이 삭제됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthState {
    /// 프로바이더 authorize URL 에 실리는 불투명한 랜덤 값
    pub value: String,
    /// 핸드셰이크를 시작한 프로바이더
    pub provider: AuthProvider,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl OAuthState {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// `begin()` 결과
///
/// `handshake_id`는 브라우저 쿠키로, `state`는 authorize URL 쿼리로 나갑니다.
#[derive(Debug, Clone)]
pub struct PendingHandshake {
    pub handshake_id: String,
    pub state: String,
    pub provider: AuthProvider,
    pub expires_at: DateTime<Utc>,
}
