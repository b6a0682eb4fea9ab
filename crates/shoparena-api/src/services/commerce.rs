//! 커머스 백엔드 연동.
//!
//! 상품, 장바구니, 주문, 결제, 이미지 업로드 엔드포인트는 라우터가 직접
//! 처리하지 않고 `CommerceBackend` 하나로 위임합니다. 라우터는 경로 파라미터,
//! 쿼리, 본문, 게이트가 확인한 주체를 `CommerceCall`로 묶어 전달합니다.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shoparena_core::Principal;
use tracing::warn;

use crate::error::ApiErrorResponse;
use crate::routes::Endpoint;

/// 커머스 요청.
#[derive(Debug, Clone)]
pub struct CommerceCall {
    pub endpoint: Endpoint,
    /// 보호된 라우트에서는 게이트가 확인한 주체, 공개 라우트에서는 `None`
    pub principal: Option<Principal>,
    /// 경로 파라미터 (`{id}` 등)
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub content_type: Option<String>,
    /// 원본 본문 (JSON 또는 multipart)
    pub body: Bytes,
}

impl CommerceCall {
    /// 경로 파라미터 조회.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// 본문을 JSON으로 해석합니다. 빈 본문은 `null`로 취급합니다.
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T, CommerceError> {
        let body: &[u8] = if self.body.is_empty() {
            b"null"
        } else {
            &self.body
        };
        serde_json::from_slice(body).map_err(|e| CommerceError::InvalidInput(e.to_string()))
    }
}

/// 커머스 응답.
#[derive(Debug, Clone)]
pub struct CommerceReply {
    pub status: StatusCode,
    pub body: Value,
}

impl CommerceReply {
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }
}

impl IntoResponse for CommerceReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// 커머스 백엔드 에러.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CommerceError {
    #[error("{0} 엔드포인트를 처리할 커머스 백엔드가 설정되지 않았습니다")]
    NotImplemented(Endpoint),
    #[error("리소스를 찾을 수 없습니다: {0}")]
    NotFound(String),
    #[error("잘못된 요청: {0}")]
    InvalidInput(String),
    #[error("권한이 없습니다: {0}")]
    Forbidden(String),
    #[error("커머스 백엔드를 사용할 수 없습니다: {0}")]
    Unavailable(String),
}

impl CommerceError {
    pub fn status(&self) -> StatusCode {
        match self {
            CommerceError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            CommerceError::NotFound(_) => StatusCode::NOT_FOUND,
            CommerceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CommerceError::Forbidden(_) => StatusCode::FORBIDDEN,
            CommerceError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CommerceError::NotImplemented(_) => "NOT_IMPLEMENTED",
            CommerceError::NotFound(_) => "NOT_FOUND",
            CommerceError::InvalidInput(_) => "INVALID_INPUT",
            CommerceError::Forbidden(_) => "FORBIDDEN",
            CommerceError::Unavailable(_) => "COMMERCE_UNAVAILABLE",
        }
    }
}

impl IntoResponse for CommerceError {
    fn into_response(self) -> Response {
        if let CommerceError::Unavailable(reason) = &self {
            warn!(reason = %reason, "Commerce backend unavailable");
        }
        let body = ApiErrorResponse::new(self.code(), self.to_string());
        (self.status(), Json(body)).into_response()
    }
}

/// 커머스 백엔드 trait.
#[async_trait]
pub trait CommerceBackend: Send + Sync {
    async fn handle(&self, call: CommerceCall) -> Result<CommerceReply, CommerceError>;
}

/// 백엔드가 설정되지 않았을 때의 기본 구현. 항상 501.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableCommerce;

#[async_trait]
impl CommerceBackend for UnavailableCommerce {
    async fn handle(&self, call: CommerceCall) -> Result<CommerceReply, CommerceError> {
        Err(CommerceError::NotImplemented(call.endpoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn call(endpoint: Endpoint, body: &'static [u8]) -> CommerceCall {
        CommerceCall {
            endpoint,
            principal: None,
            params: HashMap::from([("id".to_string(), "42".to_string())]),
            query: HashMap::new(),
            content_type: Some("application/json".to_string()),
            body: Bytes::from_static(body),
        }
    }

    #[derive(Debug, Deserialize)]
    struct CartItem {
        product_id: String,
        quantity: u32,
    }

    #[test]
    fn test_json_body() {
        let item: CartItem = call(
            Endpoint::AddToCart,
            br#"{"product_id":"p-1","quantity":2}"#,
        )
        .json_body()
        .unwrap();
        assert_eq!(item.product_id, "p-1");
        assert_eq!(item.quantity, 2);

        let empty: Option<CartItem> = call(Endpoint::AddToCart, b"").json_body().unwrap();
        assert!(empty.is_none());

        let broken = call(Endpoint::AddToCart, b"{").json_body::<CartItem>();
        assert!(matches!(broken, Err(CommerceError::InvalidInput(_))));
    }

    #[test]
    fn test_param() {
        let call = call(Endpoint::GetProduct, b"");
        assert_eq!(call.param("id"), Some("42"));
        assert_eq!(call.param("slug"), None);
    }

    #[tokio::test]
    async fn test_unavailable_commerce_answers_501() {
        let err = UnavailableCommerce
            .handle(call(Endpoint::ListProducts, b""))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(err.code(), "NOT_IMPLEMENTED");
        assert!(err.to_string().contains("list_products"));
    }
}
