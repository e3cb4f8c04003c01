//! 소셜 로그인 인증 서비스 메인 애플리케이션
//!
//! Actix-web 기반의 HTTP 서버를 구동하고 인증 상태를 조립합니다.
//! `MONGODB_URI`/`REDIS_URL`이 설정되어 있으면 해당 저장소를, 아니면 메모리 저장소를 사용합니다.

use std::io;
use std::sync::Arc;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use actix_governor::{Governor, GovernorConfigBuilder};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};
use social_auth_backend::caching::redis::RedisClient;
use social_auth_backend::config::{AuthSettings, CorsConfig, RateLimitConfig, ServerConfig, StorageConfig};
use social_auth_backend::core::{AppState, StorageBackends};
use social_auth_backend::db::Database;
use social_auth_backend::repositories::tokens::{RedisRevocationStore, RedisStateStore};
use social_auth_backend::repositories::users::MongoUserStore;
use social_auth_backend::routes::configure_all_routes;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 소셜 로그인 인증 서비스 시작중...");

    let settings = AuthSettings::from_env().map_err(|e| {
        error!("인증 설정 로드 실패: {}", e);
        io::Error::other(e.to_string())
    })?;

    // 데이터 스토어 초기화
    let backends = initialize_data_stores().await?;

    let state = AppState::new(settings, backends).map_err(|e| {
        error!("서비스 초기화 실패: {}", e);
        io::Error::other(e.to_string())
    })?;

    let providers = state.exchange.registered();
    if providers.is_empty() {
        warn!("등록된 OAuth 프로바이더가 없습니다. KAKAO_*/GOOGLE_* 환경변수를 확인하세요.");
    }
    for provider in providers {
        info!("🔌 프로바이더 등록: {}", provider);
    }

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    // HTTP 서버 시작
    start_http_server(web::Data::new(state)).await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// Rate Limiting, CORS, 로깅, 경로 정규화 미들웨어를 포함합니다.
///
/// # Errors
///
/// * `std::io::Error` - 포트 바인딩 실패 또는 서버 실행 오류
async fn start_http_server(state: web::Data<AppState>) -> io::Result<()> {
    let bind_address = format!("{}:{}", ServerConfig::host(), ServerConfig::port());

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    // Rate Limiting 설정
    let rate_limit_config = RateLimitConfig::from_env();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other("Rate Limiting 설정이 올바르지 않습니다"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit_config.per_second,
        rate_limit_config.burst_size
    );

    let allowed_origins = CorsConfig::allowed_origins();
    info!("CORS 허용 Origin: {:?}", allowed_origins);

    HttpServer::new(move || {
        // CORS 설정
        let cors = configure_cors(&allowed_origins);

        App::new()
            .app_data(state.clone())
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            // 라우트 설정
            .configure(configure_all_routes)
    })
        .bind(bind_address)?
        .workers(ServerConfig::workers())
        .run()
        .await
}

/// 환경별 설정 파일을 로드합니다
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
///
/// 로거 초기화 전에 호출되므로 결과는 표준 에러로 출력합니다.
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => {
            if let Err(e) = dotenv::from_filename(".env.prod") {
                eprintln!(".env.prod 파일 로드 실패: {}", e);
            }
        }
        "dev" => {
            if let Err(e) = dotenv::from_filename(".env.dev") {
                eprintln!(".env.dev 파일 로드 실패: {}", e);
            }
        }
        _ => {
            // 기본 .env 파일 로드
            dotenv().ok();
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// # Environment Variables
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info,actix_web=info")
///
/// ```bash
/// # 인증 서비스만 debug
/// RUST_LOG=info,social_auth_backend::services=debug cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
    info!("Current profile: {}", std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string()));
}

/// 설정된 저장소에 연결하고 저장소 구현을 선택합니다
///
/// * `MONGODB_URI` 설정 시 - MongoDB 사용자 저장소 (인덱스 생성 포함)
/// * `REDIS_URL` 설정 시 - Redis state/폐기 목록 저장소
/// * 그 외 - 프로세스 메모리 저장소
///
/// # Errors
///
/// 설정된 저장소에 연결할 수 없으면 기동을 중단합니다.
async fn initialize_data_stores() -> io::Result<StorageBackends> {
    let mut backends = StorageBackends::in_memory();

    match StorageConfig::mongodb_uri() {
        Some(uri) => {
            info!("📡 MongoDB 연결 중...");
            let database = Database::new(&uri, &StorageConfig::database_name())
                .await
                .map_err(|e| {
                    error!("MongoDB 연결 실패: {}", e);
                    io::Error::other(e.to_string())
                })?;

            let users = MongoUserStore::new(Arc::new(database));
            users.create_indexes().await.map_err(|e| io::Error::other(e.to_string()))?;
            backends.users = Arc::new(users);
        }
        None => warn!("MONGODB_URI 미설정: 메모리 사용자 저장소를 사용합니다 (재시작 시 초기화)"),
    }

    match StorageConfig::redis_url() {
        Some(url) => {
            info!("📡 Redis 연결 중...");
            let redis = Arc::new(RedisClient::new(&url).await.map_err(|e| {
                error!("Redis 연결 실패: {}", e);
                io::Error::other(e.to_string())
            })?);

            backends.states = Arc::new(RedisStateStore::new(redis.clone()));
            backends.revocations = Arc::new(RedisRevocationStore::new(redis));
        }
        None => warn!("REDIS_URL 미설정: OAuth state 와 폐기 목록은 이 프로세스에만 저장됩니다"),
    }

    Ok(backends)
}

/// CORS 설정을 구성합니다
///
/// 자격 증명 쿠키를 주고받아야 하므로 허용 Origin 을 명시하고 `supports_credentials`를 켭니다.
fn configure_cors(allowed_origins: &[String]) -> Cors {
    let cors = allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin));

    cors
        // 허용할 HTTP 메서드
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        // 허용할 헤더
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        // 자격 증명(쿠키 등) 지원
        .supports_credentials()
        // Preflight 요청 캐시 시간 (초)
        .max_age(3600)
}
