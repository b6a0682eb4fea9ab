//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! Arc로 래핑되어 여러 요청 간에 공유됩니다. 모든 협력자는 trait 객체로
//! 주입되므로 메모리, PostgreSQL, Redis 구현을 자유롭게 조합할 수 있습니다.

use std::sync::Arc;
use std::time::Duration;

use shoparena_core::{
    AccessTier, AccountStore, CorsConfig, RevocationStore, RoleDirectory,
};

use crate::auth::{AuthGate, JwtConfig};
use crate::services::{CommerceBackend, LogResetNotifier, ResetNotifier, UnavailableCommerce};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 토큰 서명 키와 수명
    pub jwt: Arc<JwtConfig>,

    /// 구매자/판매자 계정 저장소
    pub accounts: Arc<dyn AccountStore>,

    /// 토큰 폐기 목록 (로그아웃)
    pub revocations: Arc<dyn RevocationStore>,

    /// 상품/장바구니/주문/결제 처리 백엔드
    pub commerce: Arc<dyn CommerceBackend>,

    /// 비밀번호 재설정 토큰 전달자
    pub notifier: Arc<dyn ResetNotifier>,

    /// 구매자 라우트 그룹 게이트
    pub buyer_gate: AuthGate,

    /// 판매자 라우트 그룹 게이트
    pub seller_gate: AuthGate,

    pub cors: CorsConfig,

    /// 전역 요청 타임아웃
    pub request_timeout: Duration,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    ///
    /// 두 게이트는 같은 JWT 설정과 폐기 목록을 공유하고, 계정 조회만
    /// 역할별 `RoleDirectory`로 나뉩니다.
    pub fn new(
        jwt: JwtConfig,
        accounts: Arc<dyn AccountStore>,
        revocations: Arc<dyn RevocationStore>,
    ) -> Self {
        let jwt = Arc::new(jwt);
        let buyer_gate = AuthGate::new(
            jwt.clone(),
            revocations.clone(),
            Arc::new(RoleDirectory::buyers(accounts.clone())),
        );
        let seller_gate = AuthGate::new(
            jwt.clone(),
            revocations.clone(),
            Arc::new(RoleDirectory::sellers(accounts.clone())),
        );

        Self {
            jwt,
            accounts,
            revocations,
            commerce: Arc::new(UnavailableCommerce),
            notifier: Arc::new(LogResetNotifier),
            buyer_gate,
            seller_gate,
            cors: CorsConfig::default(),
            request_timeout: Duration::from_secs(30),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 커머스 백엔드 설정.
    pub fn with_commerce(mut self, commerce: Arc<dyn CommerceBackend>) -> Self {
        self.commerce = commerce;
        self
    }

    /// 재설정 토큰 전달자 설정.
    pub fn with_notifier(mut self, notifier: Arc<dyn ResetNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_cors(mut self, cors: CorsConfig) -> Self {
        self.cors = cors;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// 접근 등급에 해당하는 게이트. 공개 등급은 `None`.
    pub fn gate(&self, tier: AccessTier) -> Option<&AuthGate> {
        match tier {
            AccessTier::Public => None,
            AccessTier::Buyer => Some(&self.buyer_gate),
            AccessTier::Seller => Some(&self.seller_gate),
        }
    }
}

/// 테스트 서명 키.
#[cfg(any(test, feature = "test-utils"))]
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

/// 테스트용 AppState 생성 헬퍼.
///
/// 메모리 저장소와 고정 서명 키를 사용합니다. 커머스 백엔드는 기본값(501).
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use shoparena_data::{MemoryAccountStore, MemoryRevocationStore};

    let jwt = JwtConfig::new(secrecy::SecretString::new(TEST_JWT_SECRET.into()), 60, 15);
    AppState::new(
        jwt,
        Arc::new(MemoryAccountStore::new()),
        Arc::new(MemoryRevocationStore::new()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gates_by_tier() {
        let state = create_test_state();
        assert!(state.gate(AccessTier::Public).is_none());
        assert_eq!(
            state.gate(AccessTier::Buyer).map(AuthGate::tier),
            Some(AccessTier::Buyer)
        );
        assert_eq!(
            state.gate(AccessTier::Seller).map(AuthGate::tier),
            Some(AccessTier::Seller)
        );
    }

    #[test]
    fn test_defaults() {
        let state = create_test_state();
        assert_eq!(state.request_timeout, Duration::from_secs(30));
        assert_eq!(state.cors.max_age_secs, 43200);
    }
}
