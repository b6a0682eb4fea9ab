//! 인증 게이트.
//!
//! 보호된 라우트 그룹 앞에서 요청을 허용하거나 거부합니다. 구매자 게이트와
//! 판매자 게이트는 같은 타입이며 주입된 `PrincipalLookup`만 다릅니다.
//!
//! 판정 순서:
//!
//! 1. `Authorization: Bearer <token>` 추출
//! 2. 서명 및 만료 검증
//! 3. 폐기 목록 조회 (매 요청마다, 캐시 없음)
//! 4. 게이트 역할의 계정 조회
//! 5. `AuthContext`를 요청 extensions에 첨부

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use shoparena_core::{AccessTier, AccountRole, Principal, PrincipalLookup, RevocationStore};
use tracing::{debug, error, warn};

use super::jwt::{JwtConfig, JwtError};
use crate::error::ApiErrorResponse;
use crate::metrics::record_gate_decision;

/// 게이트 거부 사유. 모두 401로 응답합니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateRejection {
    #[error("인증 토큰이 필요합니다")]
    MissingToken,
    #[error("잘못된 Authorization 헤더 형식")]
    InvalidAuthHeader,
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("유효하지 않은 토큰")]
    InvalidToken,
    #[error("토큰이 무효화되었습니다")]
    TokenRevoked,
    #[error("등록되지 않은 {0} 계정입니다")]
    UnknownPrincipal(AccountRole),
    #[error("인증 서비스를 일시적으로 사용할 수 없습니다")]
    Unavailable,
}

impl GateRejection {
    /// 응답 본문의 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            GateRejection::MissingToken => "MISSING_TOKEN",
            GateRejection::InvalidAuthHeader => "INVALID_AUTH_HEADER",
            GateRejection::TokenExpired => "TOKEN_EXPIRED",
            GateRejection::InvalidToken => "INVALID_TOKEN",
            GateRejection::TokenRevoked => "TOKEN_REVOKED",
            GateRejection::UnknownPrincipal(_) => "UNKNOWN_PRINCIPAL",
            GateRejection::Unavailable => "AUTH_UNAVAILABLE",
        }
    }
}

impl From<JwtError> for GateRejection {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenExpired => GateRejection::TokenExpired,
            _ => GateRejection::InvalidToken,
        }
    }
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        let body = ApiErrorResponse::new(self.code(), self.to_string());
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// 게이트를 통과한 요청의 인증 정보.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub principal: Principal,
    /// 제시된 토큰 원문 (로그아웃 시 폐기 대상)
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// `Authorization` 헤더에서 Bearer 토큰 추출.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, GateRejection> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(GateRejection::MissingToken)?
        .to_str()
        .map_err(|_| GateRejection::InvalidAuthHeader)?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(GateRejection::InvalidAuthHeader)?;

    if token.is_empty() {
        return Err(GateRejection::InvalidAuthHeader);
    }
    Ok(token)
}

/// 역할별 인증 게이트.
#[derive(Clone)]
pub struct AuthGate {
    tier: AccessTier,
    jwt: Arc<JwtConfig>,
    revocations: Arc<dyn RevocationStore>,
    lookup: Arc<dyn PrincipalLookup>,
}

impl AuthGate {
    pub fn new(
        jwt: Arc<JwtConfig>,
        revocations: Arc<dyn RevocationStore>,
        lookup: Arc<dyn PrincipalLookup>,
    ) -> Self {
        Self {
            tier: AccessTier::from(lookup.role()),
            jwt,
            revocations,
            lookup,
        }
    }

    pub fn tier(&self) -> AccessTier {
        self.tier
    }

    /// 요청 헤더로 허용 여부를 판정합니다.
    pub async fn admit(&self, headers: &HeaderMap) -> Result<AuthContext, GateRejection> {
        let token = bearer_token(headers)?;
        let claims = self.jwt.verify(token)?;

        match self.revocations.is_revoked(token).await {
            Ok(false) => {}
            Ok(true) => return Err(GateRejection::TokenRevoked),
            Err(e) => {
                error!(tier = %self.tier, error = %e, "Revocation store lookup failed");
                return Err(GateRejection::Unavailable);
            }
        }

        let principal = match self.lookup.find_principal(&claims.sub).await {
            Ok(Some(principal)) => principal,
            Ok(None) => return Err(GateRejection::UnknownPrincipal(self.lookup.role())),
            Err(e) => {
                warn!(tier = %self.tier, error = %e, "Principal lookup failed");
                return Err(GateRejection::Unavailable);
            }
        };

        Ok(AuthContext {
            expires_at: claims.expires_at(),
            principal,
            token: token.to_string(),
        })
    }
}

/// 게이트 미들웨어.
///
/// `from_fn_with_state`로 등급별 하위 라우터에 `route_layer`로 적용합니다.
pub async fn authorize(State(gate): State<AuthGate>, mut request: Request, next: Next) -> Response {
    let decision = gate.admit(request.headers()).await;

    match decision {
        Ok(context) => {
            record_gate_decision(gate.tier(), "admit");
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(rejection) => {
            debug!(
                tier = %gate.tier(),
                path = %request.uri().path(),
                code = rejection.code(),
                "Request rejected by auth gate"
            );
            record_gate_decision(gate.tier(), rejection.code());
            rejection.into_response()
        }
    }
}
