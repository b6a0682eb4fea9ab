//! 게이트 통과 정보 추출기.
//!
//! 인증 게이트가 요청 extensions에 첨부한 `AuthContext`를 핸들러에서 꺼냅니다.
//!
//! ```rust,ignore
//! async fn get_profile(AuthPrincipal(principal): AuthPrincipal) -> impl IntoResponse {
//!     Json(principal.account.profile())
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};
use shoparena_core::Principal;

use super::gate::{AuthContext, GateRejection};

/// 인증된 주체 추출기.
///
/// 게이트가 적용되지 않은 라우트에서 사용하면 `MISSING_TOKEN`으로 거부됩니다.
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub Principal);

impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .map(|context| AuthPrincipal(context.principal.clone()))
            .ok_or(GateRejection::MissingToken)
    }
}

/// 토큰 원문과 만료 시각을 포함한 전체 인증 정보 추출기 (로그아웃용).
#[derive(Debug, Clone)]
pub struct AuthSession(pub AuthContext);

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(AuthSession)
            .ok_or(GateRejection::MissingToken)
    }
}

/// 선택적 인증 추출기.
///
/// 공개 라우트에서는 `None`, 보호된 라우트에서는 게이트가 확인한 주체.
#[derive(Debug, Clone)]
pub struct OptionalPrincipal(pub Option<Principal>);

impl<S> FromRequestParts<S> for OptionalPrincipal
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AuthPrincipal::from_request_parts(parts, state).await {
            Ok(AuthPrincipal(principal)) => Ok(OptionalPrincipal(Some(principal))),
            Err(_) => Ok(OptionalPrincipal(None)),
        }
    }
}
