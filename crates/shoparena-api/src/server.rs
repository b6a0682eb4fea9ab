//! 서버 조립.
//!
//! API 라우터에 공통 레이어(메트릭, 트레이싱, 타임아웃, CORS)를 씌우고,
//! 종료 시그널과 백그라운드 정리 작업을 관리합니다.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use shoparena_data::{MemoryRevocationStore, PgRevocationStore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};

use crate::middleware::{cors_layer, metrics_layer};
use crate::routes::create_api_router;
use crate::state::AppState;

/// 전체 애플리케이션 라우터 생성.
///
/// CORS가 가장 바깥 레이어이므로 게이트의 401, 폴백 404, 타임아웃 408
/// 응답에도 CORS 헤더가 붙습니다.
pub fn create_router(state: Arc<AppState>, metrics_handle: Option<PrometheusHandle>) -> Router {
    let cors = cors_layer(&state.cors);
    let timeout = state.request_timeout;

    let mut router = create_api_router(state);

    if let Some(handle) = metrics_handle {
        let metrics_router = Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(handle);
        router = router.merge(metrics_router);
    }

    router
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(cors)
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 수신 시 종료 토큰을 취소합니다.
pub async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
        _ = shutdown_token.cancelled() => {}
    }

    shutdown_token.cancel();
    info!("Shutdown signal propagated to background tasks");
}

// =============================================================================
// 폐기 목록 정리
// =============================================================================

/// 만료 항목 정리가 필요한 폐기 목록.
///
/// Redis는 키 TTL로 스스로 정리하므로 포함되지 않습니다.
#[derive(Clone)]
pub enum PurgeTarget {
    Memory(MemoryRevocationStore),
    Postgres(PgRevocationStore),
}

impl PurgeTarget {
    async fn purge(&self) -> Result<u64, String> {
        match self {
            PurgeTarget::Memory(store) => Ok(store.purge_expired().await as u64),
            PurgeTarget::Postgres(store) => store.purge_expired().await.map_err(|e| e.to_string()),
        }
    }
}

/// 만료된 폐기 항목을 주기적으로 정리하는 백그라운드 작업.
///
/// 토큰 검증에 허용 오차가 없으므로 만료 시각이 지난 항목은 이미 쓸모가 없습니다.
pub fn spawn_revocation_purge(
    target: PurgeTarget,
    every: Duration,
    shutdown_token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown_token.cancelled() => {
                    debug!("Revocation purge task stopped");
                    break;
                }
                _ = ticker.tick() => {
                    match target.purge().await {
                        Ok(0) => {}
                        Ok(removed) => info!(removed, "Purged expired revocation entries"),
                        Err(e) => warn!(error = %e, "Revocation purge failed"),
                    }
                }
            }
        }
    })
}
