//! 정적 라우트 테이블.
//!
//! 모든 엔드포인트는 `(메서드, 경로, 접근 등급, 엔드포인트)` 한 줄로 선언됩니다.
//! 라우터 구성, 메트릭 라벨링, 라우트 조회가 모두 이 테이블을 공유합니다.

use axum::http::Method;
use axum::routing::MethodFilter;
use shoparena_core::AccessTier;

/// API 경로 접두사.
pub const API_PREFIX: &str = "/api/v1";

/// 라우트 메서드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RouteMethod {
    pub fn filter(&self) -> MethodFilter {
        match self {
            RouteMethod::Get => MethodFilter::GET,
            RouteMethod::Post => MethodFilter::POST,
            RouteMethod::Put => MethodFilter::PUT,
            RouteMethod::Delete => MethodFilter::DELETE,
        }
    }

    pub fn as_method(&self) -> Method {
        match self {
            RouteMethod::Get => Method::GET,
            RouteMethod::Post => Method::POST,
            RouteMethod::Put => Method::PUT,
            RouteMethod::Delete => Method::DELETE,
        }
    }

    pub fn matches(&self, method: &Method) -> bool {
        self.as_method() == *method
    }
}

/// 엔드포인트 식별자.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    // 공개
    Ping,
    SearchProducts,
    ListProducts,
    ListSellers,
    GetProduct,
    BuyerLogin,
    SellerLogin,
    BuyerSignup,
    SellerSignup,
    PaymentCallback,
    SellerTotalOrdersById,
    BuyerForgotPassword,
    SellerForgotPassword,
    SellerResetPassword,
    BuyerResetPassword,

    // 구매자
    UpdateBuyerProfile,
    GetBuyerProfile,
    AddToCart,
    ViewCart,
    Pay,
    BuyerUpdatePassword,
    UploadBuyerPicture,
    BuyerOrders,
    BuyerLogout,

    // 판매자
    UpdateSellerProfile,
    SellerOrders,
    SellerTotalOrders,
    GetSellerProfile,
    SellerProductsSold,
    DeleteProduct,
    CreateProduct,
    SellerUpdatePassword,
    SellerShop,
    SellerProductCount,
    SellerProduct,
    UpdateProduct,
    SellerAllProducts,
    SellerRemainingProductCount,
    UploadSellerPicture,
    SellerLogout,
}

impl Endpoint {
    /// 로그와 커머스 백엔드에서 사용하는 이름.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Ping => "ping",
            Endpoint::SearchProducts => "search_products",
            Endpoint::ListProducts => "list_products",
            Endpoint::ListSellers => "list_sellers",
            Endpoint::GetProduct => "get_product",
            Endpoint::BuyerLogin => "buyer_login",
            Endpoint::SellerLogin => "seller_login",
            Endpoint::BuyerSignup => "buyer_signup",
            Endpoint::SellerSignup => "seller_signup",
            Endpoint::PaymentCallback => "payment_callback",
            Endpoint::SellerTotalOrdersById => "seller_total_orders_by_id",
            Endpoint::BuyerForgotPassword => "buyer_forgot_password",
            Endpoint::SellerForgotPassword => "seller_forgot_password",
            Endpoint::SellerResetPassword => "seller_reset_password",
            Endpoint::BuyerResetPassword => "buyer_reset_password",
            Endpoint::UpdateBuyerProfile => "update_buyer_profile",
            Endpoint::GetBuyerProfile => "get_buyer_profile",
            Endpoint::AddToCart => "add_to_cart",
            Endpoint::ViewCart => "view_cart",
            Endpoint::Pay => "pay",
            Endpoint::BuyerUpdatePassword => "buyer_update_password",
            Endpoint::UploadBuyerPicture => "upload_buyer_picture",
            Endpoint::BuyerOrders => "buyer_orders",
            Endpoint::BuyerLogout => "buyer_logout",
            Endpoint::UpdateSellerProfile => "update_seller_profile",
            Endpoint::SellerOrders => "seller_orders",
            Endpoint::SellerTotalOrders => "seller_total_orders",
            Endpoint::GetSellerProfile => "get_seller_profile",
            Endpoint::SellerProductsSold => "seller_products_sold",
            Endpoint::DeleteProduct => "delete_product",
            Endpoint::CreateProduct => "create_product",
            Endpoint::SellerUpdatePassword => "seller_update_password",
            Endpoint::SellerShop => "seller_shop",
            Endpoint::SellerProductCount => "seller_product_count",
            Endpoint::SellerProduct => "seller_product",
            Endpoint::UpdateProduct => "update_product",
            Endpoint::SellerAllProducts => "seller_all_products",
            Endpoint::SellerRemainingProductCount => "seller_remaining_product_count",
            Endpoint::UploadSellerPicture => "upload_seller_picture",
            Endpoint::SellerLogout => "seller_logout",
        }
    }

    /// 커머스 백엔드로 위임되는 엔드포인트인지 여부.
    pub fn is_commerce(&self) -> bool {
        matches!(
            self,
            Endpoint::SearchProducts
                | Endpoint::ListProducts
                | Endpoint::GetProduct
                | Endpoint::PaymentCallback
                | Endpoint::SellerTotalOrdersById
                | Endpoint::AddToCart
                | Endpoint::ViewCart
                | Endpoint::Pay
                | Endpoint::UploadBuyerPicture
                | Endpoint::BuyerOrders
                | Endpoint::SellerOrders
                | Endpoint::SellerTotalOrders
                | Endpoint::SellerProductsSold
                | Endpoint::DeleteProduct
                | Endpoint::CreateProduct
                | Endpoint::SellerShop
                | Endpoint::SellerProductCount
                | Endpoint::SellerProduct
                | Endpoint::UpdateProduct
                | Endpoint::SellerAllProducts
                | Endpoint::SellerRemainingProductCount
                | Endpoint::UploadSellerPicture
        )
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 라우트 한 줄.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub method: RouteMethod,
    /// 전체 경로 템플릿 (`{id}` 단일 세그먼트 캡처)
    pub path: &'static str,
    pub tier: AccessTier,
    pub endpoint: Endpoint,
}

const fn route(
    method: RouteMethod,
    path: &'static str,
    tier: AccessTier,
    endpoint: Endpoint,
) -> RouteDescriptor {
    RouteDescriptor {
        method,
        path,
        tier,
        endpoint,
    }
}

use AccessTier::{Buyer, Public, Seller};
use RouteMethod::{Delete, Get, Post, Put};

const ROUTES: &[RouteDescriptor] = &[
    // 공개
    route(Get, "/api/v1/ping", Public, Endpoint::Ping),
    route(Get, "/api/v1/searchproducts", Public, Endpoint::SearchProducts),
    route(Get, "/api/v1/products", Public, Endpoint::ListProducts),
    route(Get, "/api/v1/sellers", Public, Endpoint::ListSellers),
    route(Get, "/api/v1/product/{id}", Public, Endpoint::GetProduct),
    route(Post, "/api/v1/loginbuyer", Public, Endpoint::BuyerLogin),
    route(Post, "/api/v1/loginseller", Public, Endpoint::SellerLogin),
    route(Post, "/api/v1/buyersignup", Public, Endpoint::BuyerSignup),
    route(Post, "/api/v1/sellersignup", Public, Endpoint::SellerSignup),
    route(Get, "/api/v1/callback", Public, Endpoint::PaymentCallback),
    route(Get, "/api/v1/seller/totalorder/{id}", Public, Endpoint::SellerTotalOrdersById),
    route(Post, "/api/v1/buyer/forgotpassword", Public, Endpoint::BuyerForgotPassword),
    route(Post, "/api/v1/seller/forgotpassword", Public, Endpoint::SellerForgotPassword),
    route(Put, "/api/v1/sellerresetpassword/", Public, Endpoint::SellerResetPassword),
    route(Put, "/api/v1/buyerresetpassword/", Public, Endpoint::BuyerResetPassword),
    // 구매자
    route(Put, "/api/v1/updatebuyerprofile", Buyer, Endpoint::UpdateBuyerProfile),
    route(Get, "/api/v1/getbuyerprofile", Buyer, Endpoint::GetBuyerProfile),
    route(Post, "/api/v1/addtocart", Buyer, Endpoint::AddToCart),
    route(Get, "/api/v1/viewcart", Buyer, Endpoint::ViewCart),
    route(Post, "/api/v1/pay", Buyer, Endpoint::Pay),
    route(Put, "/api/v1/buyer/updatepassword", Buyer, Endpoint::BuyerUpdatePassword),
    route(Put, "/api/v1/uploadbuyerpic", Buyer, Endpoint::UploadBuyerPicture),
    route(Get, "/api/v1/buyerorders/", Buyer, Endpoint::BuyerOrders),
    route(Post, "/api/v1/buyer/logout", Buyer, Endpoint::BuyerLogout),
    // 판매자
    route(Put, "/api/v1/updatesellerprofile", Seller, Endpoint::UpdateSellerProfile),
    route(Get, "/api/v1/sellerorders/", Seller, Endpoint::SellerOrders),
    route(Get, "/api/v1/seller/totalorder/", Seller, Endpoint::SellerTotalOrders),
    route(Get, "/api/v1/getsellerprofile", Seller, Endpoint::GetSellerProfile),
    route(Get, "/api/v1/seller/total/product/sold", Seller, Endpoint::SellerProductsSold),
    route(Delete, "/api/v1/deleteproduct/{id}", Seller, Endpoint::DeleteProduct),
    route(Post, "/api/v1/createproduct/{id}", Seller, Endpoint::CreateProduct),
    route(Put, "/api/v1/seller/updatepassword", Seller, Endpoint::SellerUpdatePassword),
    route(Get, "/api/v1/seller/shop", Seller, Endpoint::SellerShop),
    route(Get, "/api/v1/seller/total/product/count", Seller, Endpoint::SellerProductCount),
    route(Get, "/api/v1/seller/product", Seller, Endpoint::SellerProduct),
    route(Put, "/api/v1/update/product/{id}", Seller, Endpoint::UpdateProduct),
    route(Get, "/api/v1/seller/allproducts", Seller, Endpoint::SellerAllProducts),
    route(
        Get,
        "/api/v1/seller/remaining/product/count",
        Seller,
        Endpoint::SellerRemainingProductCount,
    ),
    route(Put, "/api/v1/uploadsellerpic", Seller, Endpoint::UploadSellerPicture),
    route(Post, "/api/v1/seller/logout", Seller, Endpoint::SellerLogout),
];

static ROUTE_TABLE: RouteTable = RouteTable { routes: ROUTES };

/// 불변 라우트 테이블.
#[derive(Debug)]
pub struct RouteTable {
    routes: &'static [RouteDescriptor],
}

impl RouteTable {
    /// 애플리케이션 전역 테이블.
    pub fn global() -> &'static RouteTable {
        &ROUTE_TABLE
    }

    pub fn routes(&self) -> &'static [RouteDescriptor] {
        self.routes
    }

    /// 특정 접근 등급의 라우트.
    pub fn by_tier(&self, tier: AccessTier) -> impl Iterator<Item = &'static RouteDescriptor> {
        self.routes.iter().filter(move |route| route.tier == tier)
    }

    /// `(메서드, 경로)`에 해당하는 라우트를 찾습니다.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<&'static RouteDescriptor> {
        self.routes
            .iter()
            .find(|route| route.method.matches(method) && match_template(route.path, path))
    }

    /// 메서드와 무관하게 경로 템플릿만 찾습니다 (메트릭 라벨용).
    pub fn template_for(&self, path: &str) -> Option<&'static str> {
        self.routes
            .iter()
            .find(|route| match_template(route.path, path))
            .map(|route| route.path)
    }
}

/// 세그먼트 단위 템플릿 매칭. `{name}`은 비어 있지 않은 세그먼트 하나에 대응합니다.
/// 세그먼트 단위 비교. `{name}` 세그먼트는 비어 있지 않은 값과 일치합니다.
fn match_template(template: &str, path: &str) -> bool {
    let mut expected = template.split('/');
    let mut actual = path.split('/');

    loop {
        match (expected.next(), actual.next()) {
            (None, None) => return true,
            (Some(pattern), Some(segment)) => {
                let is_capture = pattern.starts_with('{') && pattern.ends_with('}');
                if is_capture && segment.is_empty() || !is_capture && pattern != segment {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_paths_under_prefix() {
        for route in RouteTable::global().routes() {
            assert!(route.path.starts_with(API_PREFIX), "{}", route.path);
        }
    }

    #[test]
    fn test_no_duplicate_routes() {
        let mut seen = HashSet::new();
        for route in RouteTable::global().routes() {
            assert!(
                seen.insert((route.method, route.path)),
                "duplicate route {:?} {}",
                route.method,
                route.path
            );
        }
    }

    #[test]
    fn test_every_route_resolves_to_itself() {
        let table = RouteTable::global();
        for route in table.routes() {
            let concrete = route.path.replace("{id}", "42");
            let found = table
                .resolve(&route.method.as_method(), &concrete)
                .unwrap_or_else(|| panic!("no match for {}", concrete));
            assert_eq!(found, route);
        }
    }

    #[test]
    fn test_resolve_with_id_segment() {
        let found = RouteTable::global()
            .resolve(&Method::DELETE, "/api/v1/deleteproduct/7f3a")
            .unwrap();
        assert_eq!(found.endpoint, Endpoint::DeleteProduct);
        assert_eq!(found.tier, AccessTier::Seller);
    }

    #[test]
    fn test_resolve_no_match() {
        let table = RouteTable::global();
        assert!(table.resolve(&Method::GET, "/api/v1/nothing").is_none());
        // 메서드 불일치
        assert!(table.resolve(&Method::POST, "/api/v1/products").is_none());
        // 캡처 세그먼트는 비어 있을 수 없음
        assert!(table.resolve(&Method::GET, "/api/v1/product/").is_none());
        // 후행 슬래시는 구분됨
        assert!(table.resolve(&Method::GET, "/api/v1/buyerorders").is_none());
    }

    #[test]
    fn test_total_order_public_and_seller_variants() {
        let table = RouteTable::global();
        let by_id = table
            .resolve(&Method::GET, "/api/v1/seller/totalorder/12")
            .unwrap();
        assert_eq!(by_id.tier, AccessTier::Public);

        let own = table
            .resolve(&Method::GET, "/api/v1/seller/totalorder/")
            .unwrap();
        assert_eq!(own.tier, AccessTier::Seller);
    }

    #[test]
    fn test_tier_assignments() {
        let table = RouteTable::global();
        let tier_of = |method: Method, path: &str| table.resolve(&method, path).unwrap().tier;

        assert_eq!(tier_of(Method::GET, "/api/v1/products"), AccessTier::Public);
        assert_eq!(tier_of(Method::GET, "/api/v1/buyerorders/"), AccessTier::Buyer);
        assert_eq!(tier_of(Method::PUT, "/api/v1/uploadsellerpic"), AccessTier::Seller);
        assert_eq!(tier_of(Method::PUT, "/api/v1/uploadbuyerpic"), AccessTier::Buyer);

        assert_eq!(table.by_tier(AccessTier::Public).count(), 15);
        assert_eq!(table.by_tier(AccessTier::Buyer).count(), 9);
        assert_eq!(table.by_tier(AccessTier::Seller).count(), 16);
    }

    #[test]
    fn test_template_for() {
        let table = RouteTable::global();
        assert_eq!(
            table.template_for("/api/v1/update/product/99"),
            Some("/api/v1/update/product/{id}")
        );
        assert_eq!(table.template_for("/favicon.ico"), None);
    }

    #[test]
    fn test_commerce_endpoints_cover_delegated_routes() {
        let builtin: Vec<_> = RouteTable::global()
            .routes()
            .iter()
            .filter(|route| !route.endpoint.is_commerce())
            .map(|route| route.endpoint)
            .collect();
        assert!(builtin.contains(&Endpoint::Ping));
        assert!(builtin.contains(&Endpoint::SellerLogout));
        assert_eq!(builtin.len(), 18);
    }
}
