//! 인증 게이트를 통과한 요청의 사용자 신원
//!
//! [`AuthMiddleware`](crate::middlewares::AuthMiddleware)가 검증한 액세스 토큰의
//! 클레임을 요청 extensions 에 넣고, 핸들러는 이 추출자로 꺼내 씁니다.

use std::future::{ready, Ready};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::models::token::TokenClaims;

/// 액세스 토큰에서 추출된 사용자 정보
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    /// 사용자 고유 ID (토큰의 `sub`)
    pub user_id: String,

    /// 표시 이름
    pub nickname: String,

    pub issued_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

impl From<TokenClaims> for AuthenticatedUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            issued_at: claims.issued_at(),
            expires_at: claims.expires_at(),
            user_id: claims.sub,
            nickname: claims.nickname,
        }
    }
}

/// ActixWeb FromRequest trait 구현
///
/// 미들웨어가 적용되지 않은 경로에서 사용하면 401을 반환합니다.
impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(crate::errors::AppError::MissingCredential.into())),
        }
    }
}
