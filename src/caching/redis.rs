//! Redis 클라이언트 래퍼
//!
//! 다중 인스턴스 배포에서 OAuth state 와 폐기 토큰 목록을 공유할 때 사용합니다.
//! 값은 JSON 문자열로 저장합니다.

use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};

/// Redis 연결 핸들
///
/// 호출마다 멀티플렉스 연결을 얻어 사용합니다.
#[derive(Clone)]
pub struct RedisClient {
    client: Client,
}

fn serialization_error(e: serde_json::Error) -> redis::RedisError {
    redis::RedisError::from((redis::ErrorKind::TypeError, "Serialization failed", e.to_string()))
}

impl RedisClient {
    /// 클라이언트를 만들고 PING 으로 서버 가용성을 확인합니다.
    pub async fn new(redis_url: &str) -> Result<Self, redis::RedisError> {
        let client = Client::open(redis_url)?;

        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<()>(&mut conn).await?;

        log::info!("✅ Redis 연결 성공");

        Ok(Self { client })
    }

    /// 값을 읽으면서 삭제합니다 (`GETDEL`). 일회용 값에 사용합니다.
    pub async fn take<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = redis::cmd("GETDEL").arg(key).query_async(&mut conn).await?;

        value
            .map(|json| serde_json::from_str(&json).map_err(serialization_error))
            .transpose()
    }

    pub async fn set_with_expiry<T: Serialize>(&self, key: &str, value: &T, seconds: u64) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(value).map_err(serialization_error)?;
        conn.set_ex(key, json, seconds.max(1)).await
    }

    pub async fn exists(&self, key: &str) -> Result<bool, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.exists(key).await
    }
}
