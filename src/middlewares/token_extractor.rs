//! 요청에서 토큰 문자열을 찾아내는 규칙
//!
//! 여러 출처를 순서대로 확인하고 처음 발견된 값 하나만 사용합니다.
//! 출처끼리 값을 합치지 않습니다.

use actix_web::http::header::AUTHORIZATION;
use actix_web::HttpRequest;

/// 액세스 토큰 쿠키 이름
pub const ACCESS_TOKEN_COOKIE: &str = "token";
/// 리프레시 토큰 쿠키 이름
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// 토큰을 찾을 위치
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// `Authorization: Bearer <token>`
    BearerHeader,
    /// 이름이 지정된 쿠키
    Cookie(&'static str),
}

impl TokenSource {
    /// 이 출처에서 토큰을 읽습니다. 비어 있는 값은 없는 것으로 봅니다.
    pub fn read(&self, req: &HttpRequest) -> Option<String> {
        let value = match self {
            TokenSource::BearerHeader => req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(bearer_token)
                .map(str::to_string),
            TokenSource::Cookie(name) => req.cookie(name).map(|c| c.value().to_string()),
        };

        value.filter(|v| !v.trim().is_empty())
    }
}

/// 기본 순서: Bearer 헤더, 그다음 `token` 쿠키
pub const DEFAULT_ACCESS_SOURCES: [TokenSource; 2] =
    [TokenSource::BearerHeader, TokenSource::Cookie(ACCESS_TOKEN_COOKIE)];

/// 주어진 순서대로 확인해 처음 발견된 토큰을 반환합니다.
pub fn extract_token(req: &HttpRequest, sources: &[TokenSource]) -> Option<String> {
    sources.iter().find_map(|source| source.read(req))
}

/// `Bearer ` 접두사를 떼어냅니다. 다른 스킴이면 `None`.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(token.trim())
    } else {
        None
    }
}
