//! # 문자열 유틸리티
//!
//! 프로바이더 JSON 응답에서 값을 꺼낼 때 쓰는 함수들입니다.

use serde_json::Value;

/// 공백을 제거하고, 비어 있으면 `None`을 반환합니다.
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// JSON 포인터 위치의 문자열 값을 꺼냅니다.
pub fn json_string(raw: &Value, pointer: &str) -> Option<String> {
    clean_optional_string(raw.pointer(pointer).and_then(Value::as_str).map(str::to_string))
}

/// 문자열 또는 숫자로 오는 ID 값을 문자열로 꺼냅니다.
///
/// 카카오 회원번호는 숫자, Google ID 는 문자열입니다.
pub fn json_id(raw: &Value, pointer: &str) -> Option<String> {
    match raw.pointer(pointer)? {
        Value::String(s) => clean_optional_string(Some(s.clone())),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("Hello".to_string())), Some("Hello".to_string()));
        assert_eq!(clean_optional_string(Some("  World  ".to_string())), Some("World".to_string()));
        assert_eq!(clean_optional_string(Some("".to_string())), None);
        assert_eq!(clean_optional_string(Some("   ".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_json_id_accepts_numbers_and_strings() {
        let raw = json!({ "id": 1234567890u64, "sub": " abc ", "bad": true, "empty": "" });
        assert_eq!(json_id(&raw, "/id"), Some("1234567890".to_string()));
        assert_eq!(json_id(&raw, "/sub"), Some("abc".to_string()));
        assert_eq!(json_id(&raw, "/bad"), None);
        assert_eq!(json_id(&raw, "/empty"), None);
        assert_eq!(json_id(&raw, "/missing"), None);
    }

    #[test]
    fn test_json_string_nested() {
        let raw = json!({ "kakao_account": { "profile": { "nickname": "철수" } } });
        assert_eq!(json_string(&raw, "/kakao_account/profile/nickname"), Some("철수".to_string()));
        assert_eq!(json_string(&raw, "/kakao_account/email"), None);
    }
}
