//! MongoDB 연결 관리
//!
//! `MONGODB_URI`가 설정된 경우에만 사용됩니다.
//! 설정되지 않으면 서버는 메모리 사용자 저장소로 기동합니다.

use mongodb::{Client, options::ClientOptions};
use log::info;

/// MongoDB 클라이언트와 데이터베이스 이름
#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// 연결을 만들고 `ping` 명령으로 확인합니다.
    ///
    /// # Errors
    ///
    /// * `mongodb::error::Error` - URI 파싱 실패 또는 서버 응답 없음
    pub async fn new(mongodb_uri: &str, database_name: &str) -> Result<Self, mongodb::error::Error> {
        let mut client_options = ClientOptions::parse(mongodb_uri).await?;

        // 서버 측 모니터링/로그에서 식별용
        client_options.app_name = Some("social_auth_backend".to_string());

        let client = Client::with_options(client_options)?;

        client
            .database(database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self {
            client,
            database_name: database_name.to_string(),
        })
    }

    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }
}
