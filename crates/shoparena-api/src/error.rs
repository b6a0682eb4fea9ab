//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::{Method, StatusCode, Uri};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shoparena_core::StoreError;
use tracing::error;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "TOKEN_REVOKED",
///   "message": "토큰이 무효화되었습니다",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "MISSING_TOKEN", "NOT_FOUND", "VALIDATION_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// HTTP 메서드
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// 요청 경로
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
            method: None,
            path: None,
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }

    /// 요청 정보(메서드, 경로)를 추가합니다.
    #[must_use]
    pub fn with_request_info(mut self, method: &Method, uri: &Uri) -> Self {
        self.method = Some(method.to_string());
        self.path = Some(uri.path().to_string());
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// 핸들러 에러 (상태 코드 + 본문).
pub type ApiError = (StatusCode, Json<ApiErrorResponse>);

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

/// 상태 코드와 에러 코드로 핸들러 에러 생성.
pub fn api_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
    (status, Json(ApiErrorResponse::new(code, message)))
}

/// 저장소 협력자 오류를 HTTP 에러로 변환합니다.
///
/// 서버 측 오류는 상세 내용을 로그에만 남기고 응답에는 노출하지 않습니다.
pub fn store_failure(err: StoreError) -> ApiError {
    match err {
        StoreError::Duplicate(_) => api_error(
            StatusCode::CONFLICT,
            "DUPLICATE_ACCOUNT",
            "이미 등록된 이메일입니다",
        ),
        StoreError::NotFound(what) => api_error(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("리소스를 찾을 수 없습니다: {}", what),
        ),
        StoreError::Unavailable(msg) => {
            error!(error = %msg, "Account store unavailable");
            api_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                "저장소를 일시적으로 사용할 수 없습니다",
            )
        }
        other => {
            error!(error = %other, "Account store failure");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "요청을 처리하지 못했습니다",
            )
        }
    }
}

/// `validator` 검증 실패를 422 응답으로 변환합니다.
pub fn validation_failure(errors: validator::ValidationErrors) -> ApiError {
    let details = serde_json::to_value(&errors).unwrap_or(Value::Null);
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiErrorResponse::with_details(
            "VALIDATION_ERROR",
            "입력값이 올바르지 않습니다",
            details,
        )),
    )
}

/// 라우트 테이블에 없는 요청에 대한 404 응답.
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(
            ApiErrorResponse::new("NOT_FOUND", "요청한 경로를 찾을 수 없습니다")
                .with_request_info(&method, &uri),
        ),
    )
}

/// JSON 본문 추출기.
///
/// `Json`과 같지만 거부 응답을 [`ApiErrorResponse`] 형식으로 돌려줍니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

/// JSON 추출 실패를 에러 응답으로 변환합니다.
pub fn json_rejection(rejection: JsonRejection) -> ApiError {
    let (status, code, message) = match &rejection {
        JsonRejection::JsonSyntaxError(_) => (
            StatusCode::BAD_REQUEST,
            "MALFORMED_JSON",
            "JSON 본문을 해석할 수 없습니다",
        ),
        JsonRejection::JsonDataError(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "INVALID_BODY",
            "요청 본문 형식이 올바르지 않습니다",
        ),
        JsonRejection::MissingJsonContentType(_) => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "UNSUPPORTED_MEDIA_TYPE",
            "Content-Type: application/json 이 필요합니다",
        ),
        _ => (
            rejection.status(),
            "INVALID_BODY",
            "요청 본문을 읽을 수 없습니다",
        ),
    };

    (
        status,
        Json(ApiErrorResponse::with_details(
            code,
            message,
            serde_json::json!({ "reason": rejection.body_text() }),
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_response_new() {
        let error = ApiErrorResponse::new("TEST_ERROR", "Test message");
        assert_eq!(error.code, "TEST_ERROR");
        assert_eq!(error.message, "Test message");
        assert!(error.timestamp.is_some());
        assert!(error.details.is_none());
        assert!(error.method.is_none());
    }

    #[test]
    fn test_with_details_keeps_timestamp() {
        let details = serde_json::json!({"field": "email"});
        let error = ApiErrorResponse::with_details("VALIDATION_ERROR", "bad", details);
        assert!(error.details.is_some());
        assert!(error.timestamp.is_some());
    }

    #[test]
    fn test_json_omits_empty_fields() {
        let error = ApiErrorResponse::new("NOT_FOUND", "Resource not found");
        let json = serde_json::to_string(&error).unwrap();

        assert!(!json.contains("details"));
        assert!(!json.contains("method"));
        assert!(json.contains(r#""code":"NOT_FOUND""#));
    }

    #[test]
    fn test_store_failure_status() {
        let (status, body) = store_failure(StoreError::Duplicate("buyer a@b.c".into()));
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code(), "DUPLICATE_ACCOUNT");

        let (status, _) = store_failure(StoreError::Unavailable("down".into()));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, body) = store_failure(StoreError::Query("syntax".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        // 내부 오류 메시지는 노출되지 않음
        assert!(!body.message().contains("syntax"));
    }

    #[derive(Debug, Deserialize)]
    struct Login {
        email: String,
    }

    fn json_request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = axum::http::Request::builder().method(Method::POST).uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(axum::http::header::CONTENT_TYPE, content_type);
        }
        builder.body(axum::body::Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_api_json_accepts_valid_body() {
        let request = json_request(Some("application/json"), r#"{"email":"ada@example.com"}"#);
        let ApiJson(login) = ApiJson::<Login>::from_request(request, &()).await.unwrap();
        assert_eq!(login.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_api_json_rejections_use_error_body() {
        let cases = [
            (Some("application/json"), "{\"email\":", StatusCode::BAD_REQUEST, "MALFORMED_JSON"),
            (Some("application/json"), "{\"email\":7}", StatusCode::UNPROCESSABLE_ENTITY, "INVALID_BODY"),
            (None, "{}", StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_MEDIA_TYPE"),
        ];

        for (content_type, body, status, code) in cases {
            let (actual, body) = ApiJson::<Login>::from_request(json_request(content_type, body), &())
                .await
                .unwrap_err();
            assert_eq!(actual, status, "{}", code);
            assert_eq!(body.code(), code);
            assert!(body.details.is_some());
        }
    }

    #[tokio::test]
    async fn test_not_found_includes_request_info() {
        let uri: Uri = "/api/v1/nope".parse().unwrap();
        let (status, body) = not_found(Method::GET, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.path.as_deref(), Some("/api/v1/nope"));
        assert_eq!(body.method.as_deref(), Some("GET"));
    }
}
