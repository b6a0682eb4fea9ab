//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 인증 게이트 판정 메트릭을 수집하고
//! `/metrics` 엔드포인트로 노출합니다.

use axum::http::Method;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use shoparena_core::AccessTier;

use crate::routes::RouteTable;

/// 라우트 테이블에 없는 경로의 라벨. 임의 경로로 인한 카디널리티 폭증 방지.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Prometheus 메트릭 레코더를 설정하고 핸들을 반환합니다.
///
/// 레코더가 이미 설치되어 있으면 에러를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭 헬퍼 함수
// ============================================================================

/// HTTP 요청 카운터 증가.
pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string())
        .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, path: &str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, path: &str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

// ============================================================================
// 인증 메트릭
// ============================================================================

/// 게이트 판정 카운터. `outcome`은 "admit" 또는 거부 코드.
pub fn record_gate_decision(tier: AccessTier, outcome: &str) {
    counter!(
        "auth_gate_decisions_total",
        "tier" => tier.as_str(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// 로그인 시도 카운터.
pub fn record_login(role: &str, success: bool) {
    counter!(
        "auth_logins_total",
        "role" => role.to_string(),
        "result" => if success { "success" } else { "failure" }
    )
    .increment(1);
}

/// 토큰 폐기(로그아웃) 카운터.
pub fn record_revocation(role: &str) {
    counter!("auth_tokens_revoked_total", "role" => role.to_string()).increment(1);
}

// ============================================================================
// 경로 라벨
// ============================================================================

/// 요청을 라우트 템플릿 라벨로 변환합니다.
///
/// 예: `DELETE /api/v1/deleteproduct/42` → `/api/v1/deleteproduct/{id}`
pub fn route_label(method: &Method, path: &str) -> &'static str {
    let table = RouteTable::global();
    table
        .resolve(method, path)
        .map(|route| route.path)
        .or_else(|| table.template_for(path))
        .unwrap_or(UNMATCHED_ROUTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_label_uses_template() {
        assert_eq!(
            route_label(&Method::GET, "/api/v1/product/123e4567-e89b-12d3-a456-426614174000"),
            "/api/v1/product/{id}"
        );
        assert_eq!(route_label(&Method::GET, "/api/v1/products"), "/api/v1/products");
    }

    #[test]
    fn test_route_label_method_mismatch_keeps_template() {
        assert_eq!(
            route_label(&Method::PATCH, "/api/v1/update/product/9"),
            "/api/v1/update/product/{id}"
        );
    }

    #[test]
    fn test_route_label_unmatched() {
        assert_eq!(route_label(&Method::GET, "/wp-login.php"), UNMATCHED_ROUTE);
        assert_eq!(route_label(&Method::GET, "/api/v1/product/a/b"), UNMATCHED_ROUTE);
    }

    #[test]
    fn test_helpers_without_recorder() {
        // 레코더가 없으면 no-op
        record_http_request("GET", "/api/v1/ping");
        record_http_response("GET", "/api/v1/ping", 200);
        record_http_duration("GET", "/api/v1/ping", 0.001);
        record_gate_decision(AccessTier::Buyer, "TOKEN_REVOKED");
        record_login("buyer", false);
        record_revocation("seller");
    }
}
