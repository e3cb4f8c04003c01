//! # 암호 유틸리티
//!
//! OAuth state 와 핸드셰이크 ID 에 쓰는 랜덤 값, 비밀값 비교 함수입니다.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;

/// state 값 바이트 수 (256 bit)
pub const STATE_BYTES: usize = 32;

/// OS 난수로 `bytes` 바이트를 만들어 URL-safe base64 로 인코딩합니다.
pub fn random_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

/// 길이가 같으면 내용과 무관하게 같은 시간이 걸리는 비교
///
/// 길이 차이는 숨기지 않습니다. state 값의 길이는 고정이라 비밀이 아닙니다.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
