//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 인증 세션 엔진의 모든 실패를 하나의 열거형으로 모으고,
//! `actix_web::ResponseError`를 통해 HTTP 응답으로 변환합니다.
//!
//! 토큰 검증 실패는 어떤 검사에서 실패했는지 클라이언트에 알려주지 않습니다.
//! 상세 원인은 로그에만 남기고, 응답 본문에는 일반화된 메시지만 담습니다.
//!
//! ## HTTP 응답 매핑
//!
//! | AppError | HTTP Status |
//! |----------|-------------|
//! | `MissingCredential` | 401 Unauthorized |
//! | `MalformedToken`, `ExpiredToken`, `SignatureMismatch`, `RevokedToken` | 403 Forbidden |
//! | `CsrfStateInvalid`, `RefreshTokenNotRecognized` | 403 Forbidden |
//! | `ValidationError` | 400 Bad Request |
//! | `UnknownProvider` | 404 Not Found |
//! | `ProviderRejected`, `ProviderUnreachable`, `ProfileIncomplete` | 500 Internal Server Error |
//! | `UserStoreFailure`, `InternalError` | 500 Internal Server Error |
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::errors::AppError;
//!
//! let user = user_store.find_by_refresh_token(token).await?
//!     .ok_or(AppError::RefreshTokenNotRecognized)?;
//! ```

use actix_web::http::StatusCode;
use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// `Display` 출력은 로그용이며 내부 원인을 포함할 수 있습니다.
/// 클라이언트 응답에는 [`AppError::public_message`]만 사용됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 요청에 자격 증명(토큰)이 없음 (401)
    #[error("missing credential")]
    MissingCredential,

    /// 토큰 형식 오류 또는 용도(typ) 불일치 (403)
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// 토큰 만료 (403)
    #[error("expired token")]
    ExpiredToken,

    /// 서명 불일치 (403)
    #[error("token signature mismatch")]
    SignatureMismatch,

    /// 로그아웃 등으로 명시적으로 폐기된 토큰 (403)
    #[error("revoked token")]
    RevokedToken,

    /// OAuth state 누락/불일치/만료 (403)
    #[error("csrf state invalid")]
    CsrfStateInvalid,

    /// 저장된 리프레시 토큰과 일치하는 사용자가 없거나 저장 만료됨 (403)
    #[error("refresh token not recognized")]
    RefreshTokenNotRecognized,

    /// 프로바이더가 요청을 거부함 (비 2xx 응답, 파싱 불가 응답 등)
    #[error("provider rejected request: {0}")]
    ProviderRejected(String),

    /// 프로바이더에 연결할 수 없음 (타임아웃 포함)
    #[error("provider unreachable: {0}")]
    ProviderUnreachable(String),

    /// 프로필에서 안정적인 프로바이더 사용자 ID를 얻지 못함
    #[error("provider profile incomplete: {0}")]
    ProfileIncomplete(String),

    /// 사용자 저장소 실패 (타임아웃 포함)
    #[error("user store failure: {0}")]
    UserStoreFailure(String),

    /// 등록되지 않은 OAuth 프로바이더 (404)
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// 입력값 검증 에러 (400)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// 내부 서버 에러 (500)
    #[error("internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 클라이언트에 노출되는 에러 코드
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingCredential => "authentication_required",
            AppError::MalformedToken(_)
            | AppError::ExpiredToken
            | AppError::SignatureMismatch
            | AppError::RevokedToken
            | AppError::RefreshTokenNotRecognized => "invalid_token",
            AppError::CsrfStateInvalid => "invalid_state",
            AppError::ProviderRejected(_)
            | AppError::ProviderUnreachable(_)
            | AppError::ProfileIncomplete(_) => "provider_failure",
            AppError::UnknownProvider(_) => "unknown_provider",
            AppError::ValidationError(_) => "invalid_request",
            AppError::UserStoreFailure(_) | AppError::InternalError(_) => "internal_error",
        }
    }

    /// 클라이언트에 노출되는 일반화된 메시지
    ///
    /// 토큰 관련 실패는 모두 같은 메시지를 사용합니다.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::MissingCredential => "인증 토큰이 없습니다.",
            AppError::MalformedToken(_)
            | AppError::ExpiredToken
            | AppError::SignatureMismatch
            | AppError::RevokedToken
            | AppError::RefreshTokenNotRecognized => "유효하지 않은 토큰입니다.",
            AppError::CsrfStateInvalid => "유효하지 않은 로그인 요청입니다.",
            AppError::ProviderRejected(_)
            | AppError::ProviderUnreachable(_)
            | AppError::ProfileIncomplete(_) => "소셜 로그인 처리 중 오류가 발생했습니다.",
            AppError::UnknownProvider(_) => "지원하지 않는 로그인 방식입니다.",
            AppError::ValidationError(_) => "잘못된 요청입니다.",
            AppError::UserStoreFailure(_) | AppError::InternalError(_) => "서버 오류가 발생하였습니다.",
        }
    }

    /// 토큰 검증 계열 실패인지 여부
    pub fn is_token_failure(&self) -> bool {
        matches!(
            self,
            AppError::MalformedToken(_)
                | AppError::ExpiredToken
                | AppError::SignatureMismatch
                | AppError::RevokedToken
                | AppError::RefreshTokenNotRecognized
        )
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingCredential => StatusCode::UNAUTHORIZED,
            AppError::MalformedToken(_)
            | AppError::ExpiredToken
            | AppError::SignatureMismatch
            | AppError::RevokedToken
            | AppError::CsrfStateInvalid
            | AppError::RefreshTokenNotRecognized => StatusCode::FORBIDDEN,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownProvider(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 5xx 에러는 원인을 로그에 남기고, 응답에는 일반 메시지만 담습니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            log::error!("요청 처리 실패: {}", self);
        } else {
            log::debug!("요청 거부: {}", self);
        }

        actix_web::HttpResponse::build(status).json(serde_json::json!({
            "success": false,
            "error": self.code(),
            "message": self.public_message(),
        }))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;
