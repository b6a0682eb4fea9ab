//! API 라우트.
//!
//! 정적 라우트 테이블([`RouteTable`])을 접근 등급별 하위 라우터로 나누고,
//! 구매자/판매자 하위 라우터에는 해당 게이트를 `route_layer`로 적용합니다.
//!
//! # 라우트 구조
//!
//! - 공개: 상품 조회, 가입/로그인, 비밀번호 찾기/재설정, 판매자 목록, 결제 콜백
//! - 구매자: 프로필, 장바구니, 결제, 주문 내역, 로그아웃
//! - 판매자: 프로필, 상품 관리, 주문/판매 통계, 로그아웃
//!
//! 테이블에 없는 요청은 404 JSON 에러로 응답합니다.

pub mod accounts;
pub mod commerce;
pub mod health;
mod table;

pub use table::{Endpoint, RouteDescriptor, RouteMethod, RouteTable, API_PREFIX};

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::HeaderMap,
    middleware,
    routing::{on, MethodFilter, MethodRouter},
    Router,
};
use shoparena_core::{AccessTier, AccountRole};

use crate::auth::{authorize, AuthGate, OptionalPrincipal};
use crate::error::{not_found, ApiJson};
use crate::state::AppState;
use accounts::{
    ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, ResetTokenQuery, SignupRequest,
};

/// 전체 API 라우터 생성.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    let table = RouteTable::global();

    [AccessTier::Public, AccessTier::Buyer, AccessTier::Seller]
        .into_iter()
        .fold(Router::new(), |router, tier| {
            router.merge(tier_router(table, tier, state.gate(tier)))
        })
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .with_state(state)
}

/// 한 접근 등급의 하위 라우터. 게이트가 있으면 `route_layer`로 앞에 둡니다.
fn tier_router(
    table: &RouteTable,
    tier: AccessTier,
    gate: Option<&AuthGate>,
) -> Router<Arc<AppState>> {
    let router = table
        .by_tier(tier)
        .fold(Router::new(), |router, route| {
            router.route(route.path, endpoint_router(route))
        });

    match gate {
        Some(gate) => {
            router.route_layer(middleware::from_fn_with_state(gate.clone(), authorize))
        }
        None => router,
    }
}

fn endpoint_router(route: &RouteDescriptor) -> MethodRouter<Arc<AppState>> {
    let filter = route.method.filter();

    match route.endpoint {
        Endpoint::Ping => on(filter, health::ping),
        Endpoint::ListSellers => on(filter, accounts::list_sellers),

        Endpoint::BuyerSignup => signup(AccountRole::Buyer, filter),
        Endpoint::SellerSignup => signup(AccountRole::Seller, filter),
        Endpoint::BuyerLogin => login(AccountRole::Buyer, filter),
        Endpoint::SellerLogin => login(AccountRole::Seller, filter),
        Endpoint::BuyerForgotPassword => forgot_password(AccountRole::Buyer, filter),
        Endpoint::SellerForgotPassword => forgot_password(AccountRole::Seller, filter),
        Endpoint::BuyerResetPassword => reset_password(AccountRole::Buyer, filter),
        Endpoint::SellerResetPassword => reset_password(AccountRole::Seller, filter),

        // 게이트가 역할을 확정하므로 주체 기반 핸들러는 역할을 구분하지 않음
        Endpoint::GetBuyerProfile | Endpoint::GetSellerProfile => {
            on(filter, accounts::get_profile)
        }
        Endpoint::UpdateBuyerProfile | Endpoint::UpdateSellerProfile => {
            on(filter, accounts::update_profile)
        }
        Endpoint::BuyerUpdatePassword | Endpoint::SellerUpdatePassword => {
            on(filter, accounts::update_password)
        }
        Endpoint::BuyerLogout | Endpoint::SellerLogout => on(filter, accounts::logout),

        endpoint => {
            debug_assert!(endpoint.is_commerce(), "{} has no handler", endpoint);
            delegate(endpoint, filter)
        }
    }
}

fn signup(role: AccountRole, filter: MethodFilter) -> MethodRouter<Arc<AppState>> {
    on(
        filter,
        move |state: State<Arc<AppState>>, body: ApiJson<SignupRequest>| {
            accounts::signup(role, state, body)
        },
    )
}

fn login(role: AccountRole, filter: MethodFilter) -> MethodRouter<Arc<AppState>> {
    on(
        filter,
        move |state: State<Arc<AppState>>, body: ApiJson<LoginRequest>| {
            accounts::login(role, state, body)
        },
    )
}

fn forgot_password(role: AccountRole, filter: MethodFilter) -> MethodRouter<Arc<AppState>> {
    on(
        filter,
        move |state: State<Arc<AppState>>, body: ApiJson<ForgotPasswordRequest>| {
            accounts::forgot_password(role, state, body)
        },
    )
}

fn reset_password(role: AccountRole, filter: MethodFilter) -> MethodRouter<Arc<AppState>> {
    on(
        filter,
        move |state: State<Arc<AppState>>,
              query: Query<ResetTokenQuery>,
              body: ApiJson<ResetPasswordRequest>| {
            accounts::reset_password(role, state, query, body)
        },
    )
}

fn delegate(endpoint: Endpoint, filter: MethodFilter) -> MethodRouter<Arc<AppState>> {
    on(
        filter,
        move |state: State<Arc<AppState>>,
              principal: OptionalPrincipal,
              params: Option<Path<HashMap<String, String>>>,
              query: Query<HashMap<String, String>>,
              headers: HeaderMap,
              body: Bytes| {
            commerce::dispatch(endpoint, state, principal, params, query, headers, body)
        },
    )
}
