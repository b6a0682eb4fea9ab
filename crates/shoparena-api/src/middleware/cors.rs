//! CORS 정책.
//!
//! 모든 origin을 허용하면서 자격 증명도 허용해야 하므로 와일드카드 대신
//! 요청의 `Origin`과 `Access-Control-Request-Headers`를 그대로 반사합니다.
//! 라우터 가장 바깥에 적용되어 401, 404 응답에도 헤더가 붙습니다.

use std::time::Duration;

use axum::http::{header::CONTENT_LENGTH, Method};
use shoparena_core::CorsConfig;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

/// 설정으로 CORS 레이어 생성.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::POST,
            Method::GET,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .expose_headers([CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(config.max_age_secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/ok", get(|| async { "OK" }))
            .layer(cors_layer(&CorsConfig::default()))
    }

    #[tokio::test]
    async fn test_mirrors_origin_with_credentials() {
        let request = Request::builder()
            .uri("/ok")
            .header(header::ORIGIN, "https://shop.example.com")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        let headers = response.headers();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://shop.example.com"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_EXPOSE_HEADERS], "content-length");
    }

    #[tokio::test]
    async fn test_preflight() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/ok")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-custom, authorization")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        let headers = response.headers();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "43200");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "x-custom, authorization"
        );
        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
        for method in ["POST", "GET", "PUT", "PATCH", "DELETE"] {
            assert!(methods.contains(method), "{}", methods);
        }
    }
}
