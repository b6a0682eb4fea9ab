//! 커머스 endpoint 위임.
//!
//! 상품, 장바구니, 주문, 결제, 업로드 라우트는 모두 이 핸들러 하나로
//! `CommerceBackend`에 전달됩니다.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::auth::OptionalPrincipal;
use crate::routes::Endpoint;
use crate::services::CommerceCall;
use crate::state::AppState;

/// 요청을 `CommerceCall`로 묶어 백엔드에 위임합니다.
pub async fn dispatch(
    endpoint: Endpoint,
    State(state): State<Arc<AppState>>,
    OptionalPrincipal(principal): OptionalPrincipal,
    params: Option<Path<HashMap<String, String>>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let call = CommerceCall {
        endpoint,
        principal,
        params: params.map(|Path(params)| params).unwrap_or_default(),
        query,
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        body,
    };

    debug!(
        endpoint = %endpoint,
        principal = call.principal.as_ref().map(|p| p.email()).unwrap_or("-"),
        "Dispatching to commerce backend"
    );

    match state.commerce.handle(call).await {
        Ok(reply) => reply.into_response(),
        Err(err) => err.into_response(),
    }
}
