//! 마켓플레이스 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 정적 라우트 테이블 기반 Axum REST API
//! - 구매자/판매자 JWT 인증 게이트 및 토큰 폐기(로그아웃)
//! - 요청 Origin을 반영하는 CORS
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: 라우트 테이블과 REST API 엔드포인트
//! - [`auth`]: JWT, 비밀번호 해싱, 인증 게이트
//! - [`services`]: 커머스 백엔드 및 재설정 토큰 전달 인터페이스
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어 (CORS, 메트릭)
//! - [`server`]: 라우터 조립과 종료 처리

pub mod auth;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;

pub use auth::{
    authorize, hash_password, verify_password, AuthContext, AuthGate, AuthPrincipal, Claims,
    GateRejection, JwtConfig, JwtError,
};
pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use metrics::setup_metrics_recorder;
pub use middleware::{cors_layer, metrics_layer};
pub use routes::{create_api_router, Endpoint, RouteDescriptor, RouteMethod, RouteTable};
pub use server::{create_router, shutdown_signal, spawn_revocation_purge, PurgeTarget};
pub use services::{
    CommerceBackend, CommerceCall, CommerceError, CommerceReply, LogResetNotifier, NotifyError,
    ResetNotifier, UnavailableCommerce,
};
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::{create_test_state, TEST_JWT_SECRET};
