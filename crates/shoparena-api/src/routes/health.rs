//! 헬스 체크 endpoint.

use axum::Json;
use serde::{Deserialize, Serialize};

/// `GET /api/v1/ping` 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
}

/// 서버가 응답 가능한 상태인지만 확인합니다 (liveness 체크용).
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "pong".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ping() {
        let Json(body) = ping().await;
        assert_eq!(body.message, "pong");
    }
}
