//! API 서버용 HTTP middleware.
//!
//! 요청 처리 파이프라인에 적용되는 middleware 모듈.
//! 인증 게이트는 등급별 하위 라우터에만 적용되므로 `crate::auth`에 있습니다.

mod cors;
mod metrics;

pub use cors::cors_layer;
pub use metrics::metrics_layer;
