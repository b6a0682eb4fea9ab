//! Shoparena API 서버 진입점.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use shoparena_api::{
    create_router, setup_metrics_recorder, shutdown_signal, spawn_revocation_purge, AppState,
    JwtConfig, PurgeTarget,
};
use shoparena_core::{init_logging, AccountStore, AppConfig, RevocationStore};
use shoparena_data::{Database, MemoryAccountStore, MemoryRevocationStore, RedisRevocationStore};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// 만료된 폐기 항목 정리 주기.
const PURGE_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// 선택된 저장소 구성.
struct Storage {
    accounts: Arc<dyn AccountStore>,
    revocations: Arc<dyn RevocationStore>,
    purge: Option<PurgeTarget>,
    backend: &'static str,
}

/// 설정에 따라 저장소를 연결합니다.
///
/// `database.url`이 있으면 PostgreSQL, 없으면 메모리 저장소를 사용합니다.
/// `redis.url`이 있으면 폐기 목록만 Redis로 옮깁니다.
async fn connect_storage(config: &AppConfig) -> anyhow::Result<Storage> {
    let mut storage = match config.database.url.as_deref() {
        Some(url) => {
            let db = Database::connect(url, &config.database)
                .await
                .context("failed to connect to PostgreSQL")?;
            db.migrate().await.context("failed to run migrations")?;
            db.health_check()
                .await
                .context("PostgreSQL health check failed")?;

            let revocations = db.revocations();
            Storage {
                accounts: Arc::new(db.accounts()),
                revocations: Arc::new(revocations.clone()),
                purge: Some(PurgeTarget::Postgres(revocations)),
                backend: "postgres",
            }
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory storage (data is lost on restart)");
            let revocations = MemoryRevocationStore::new();
            Storage {
                accounts: Arc::new(MemoryAccountStore::new()),
                revocations: Arc::new(revocations.clone()),
                purge: Some(PurgeTarget::Memory(revocations)),
                backend: "memory",
            }
        }
    };

    if let Some(url) = config.redis.url.as_deref() {
        let redis = RedisRevocationStore::connect(url, config.redis.key_prefix.clone())
            .await
            .context("failed to connect to Redis")?;
        redis
            .health_check()
            .await
            .context("Redis health check failed")?;
        storage.revocations = Arc::new(redis);
        // 키 TTL로 만료되므로 정리 작업 불필요
        storage.purge = None;
    }

    Ok(storage)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = AppConfig::load_default().context("failed to load configuration")?;

    init_logging(&config.logging).context("failed to initialize logging")?;

    info!("Starting Shoparena API server...");

    // Prometheus 메트릭 레코더 설정
    let metrics_handle = match setup_metrics_recorder() {
        Ok(handle) => {
            info!("Prometheus metrics recorder initialized");
            Some(handle)
        }
        Err(e) => {
            warn!(error = %e, "Metrics recorder unavailable, /metrics disabled");
            None
        }
    };

    let (jwt, secret_configured) = JwtConfig::from_settings(&config.auth);
    if !secret_configured {
        warn!("JWT_SECRET not set, using default (INSECURE for development only)");
    }

    let storage = connect_storage(&config).await?;
    let revocation_backend = if config.redis.url.is_some() {
        "redis"
    } else {
        storage.backend
    };

    let state = Arc::new(
        AppState::new(jwt, storage.accounts, storage.revocations)
            .with_cors(config.cors.clone())
            .with_request_timeout(Duration::from_secs(config.server.request_timeout_secs)),
    );

    info!(version = %state.version, "Application state initialized");
    info!(
        accounts = storage.backend,
        revocations = revocation_backend,
        "Storage backends selected"
    );

    // 전역 종료 토큰 (백그라운드 태스크에 종료 전파)
    let shutdown_token = CancellationToken::new();

    let purge_handle = storage
        .purge
        .map(|target| spawn_revocation_purge(target, PURGE_INTERVAL, shutdown_token.clone()));

    let app = create_router(state, metrics_handle);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(%addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token.clone()))
        .await?;

    info!("Server shutdown initiated, cleaning up...");
    shutdown_token.cancel();

    if let Some(handle) = purge_handle {
        if tokio::time::timeout(Duration::from_secs(10), handle)
            .await
            .is_err()
        {
            warn!("Cleanup timeout, forcing shutdown");
        }
    }

    info!("Server stopped gracefully");

    Ok(())
}
