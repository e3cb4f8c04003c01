//! 인증 요청 관련 DTO
use serde::Deserialize;
use validator::Validate;

/// OAuth 콜백 쿼리 파라미터
///
/// `code`와 `state`가 없는 요청도 역직렬화는 성공해야 합니다.
/// 누락 여부는 핸들러가 state 검증 단계에서 판단합니다.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct OAuthCallbackQuery {
    #[validate(length(min = 1, max = 2048, message = "Authorization code 형식이 올바르지 않습니다"))]
    pub code: Option<String>,

    #[validate(length(max = 512, message = "State 형식이 올바르지 않습니다"))]
    pub state: Option<String>,

    /// 사용자가 동의를 거부했거나 프로바이더 측 오류
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// 토큰 갱신 요청 본문
///
/// 쿠키를 쓰지 않는 클라이언트가 `{"refreshToken": "..."}` 형태로 보냅니다.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "리프레시 토큰이 필요합니다"))]
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_query_allows_missing_fields() {
        let query: OAuthCallbackQuery = serde_json::from_str("{}").unwrap();
        assert!(query.code.is_none());
        assert!(query.state.is_none());
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_callback_query_rejects_empty_code() {
        let query = OAuthCallbackQuery {
            code: Some(String::new()),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_refresh_request_uses_camel_case() {
        let req: RefreshTokenRequest = serde_json::from_str(r#"{"refreshToken":"abc"}"#).unwrap();
        assert_eq!(req.refresh_token, "abc");
        assert!(req.validate().is_ok());

        let empty: RefreshTokenRequest = serde_json::from_str(r#"{"refreshToken":""}"#).unwrap();
        assert!(empty.validate().is_err());
    }
}
