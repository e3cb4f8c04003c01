//! 자체 발급 토큰 코덱
//!
//! HS256 으로 서명된 액세스/리프레시 토큰을 만들고 검증합니다.
//! 전송 방식(헤더, 쿠키, 쿼리)과는 무관합니다.
//!
//! 검증 순서는 항상 서명 → 용도(`typ`) → 만료입니다.
//! 라이브러리의 만료 검사는 끄고, 주입된 현재 시각으로 직접 비교합니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::config::AuthSettings;
use crate::domain::models::token::{IssuedToken, TokenClaims, TokenKind};
use crate::errors::{AppError, AppResult};

/// 토큰 발급/검증기
///
/// 프로세스 전체에서 하나의 비밀키를 공유합니다.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(&settings.jwt_secret, settings.access_ttl, settings.refresh_ttl)
    }

    /// 용도별 기본 수명
    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    /// 현재 시각 기준으로 기본 수명의 토큰을 발급합니다.
    pub fn issue(&self, kind: TokenKind, subject: &str, nickname: &str) -> AppResult<IssuedToken> {
        self.issue_at(kind, subject, nickname, self.ttl(kind), Utc::now())
    }

    /// 지정한 시각과 수명으로 토큰을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InternalError` - 수명이 0 이하이거나, 만료 시각이 표현 범위를 넘거나,
    ///   서명에 실패한 경우
    pub fn issue_at(
        &self,
        kind: TokenKind,
        subject: &str,
        nickname: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> AppResult<IssuedToken> {
        if ttl <= Duration::zero() {
            return Err(AppError::InternalError("token ttl must be positive".to_string()));
        }
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::InternalError("token expiry out of range".to_string()))?;

        let claims = TokenClaims {
            sub: subject.to_string(),
            nickname: nickname.to_string(),
            typ: kind,
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("{} 토큰 생성 실패: {}", kind.as_str(), e)))?;

        Ok(IssuedToken { token, claims })
    }

    /// 현재 시각 기준으로 토큰을 검증하고 용도를 확인합니다.
    pub fn verify(&self, token: &str, expected: TokenKind) -> AppResult<TokenClaims> {
        self.verify_at(token, expected, Utc::now())
    }

    /// 지정한 시각 기준으로 토큰을 검증하고 용도를 확인합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::SignatureMismatch` - 서명 불일치 (페이로드 변조 포함)
    /// * `AppError::MalformedToken` - 구조/인코딩 오류 또는 용도 불일치
    /// * `AppError::ExpiredToken` - `now >= exp`
    pub fn verify_at(
        &self,
        token: &str,
        expected: TokenKind,
        now: DateTime<Utc>,
    ) -> AppResult<TokenClaims> {
        let claims = self.verify_signature(token)?;

        if claims.typ != expected {
            return Err(AppError::MalformedToken(format!(
                "expected {} token, got {}",
                expected.as_str(),
                claims.typ.as_str()
            )));
        }

        if claims.is_expired_at(now) {
            return Err(AppError::ExpiredToken);
        }

        Ok(claims)
    }

    /// 서명만 검증하고 클레임을 돌려줍니다. 만료와 용도는 확인하지 않습니다.
    ///
    /// 로그아웃처럼 만료된 토큰의 주체도 알아야 하는 경우에 사용합니다.
    pub fn verify_signature(&self, token: &str) -> AppResult<TokenClaims> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AppError::SignatureMismatch,
                _ => AppError::MalformedToken(e.to_string()),
            })
    }
}
