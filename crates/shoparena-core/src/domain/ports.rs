//! 협력자 인터페이스.
//!
//! 인증 게이트와 계정 핸들러가 의존하는 저장소 추상화를 정의합니다.
//! 구현체는 `shoparena-data` 크레이트에 있습니다 (메모리, PostgreSQL, Redis).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Account, AccountRole, NewAccount, Principal, ProfileUpdate};
use crate::error::StoreResult;

// =============================================================================
// AccountStore
// =============================================================================

/// 계정 저장소 trait.
///
/// 이메일은 역할 내에서 유일합니다. 같은 이메일이 구매자와 판매자로 각각
/// 존재할 수 있습니다.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// 계정 생성.
    ///
    /// # Errors
    ///
    /// - `StoreError::Duplicate`: 같은 역할에 이미 존재하는 이메일
    async fn create(&self, account: NewAccount) -> StoreResult<Account>;

    /// 역할과 이메일로 계정 조회.
    async fn find_by_email(&self, role: AccountRole, email: &str) -> StoreResult<Option<Account>>;

    /// 역할별 전체 계정 목록 (생성 순).
    async fn list(&self, role: AccountRole) -> StoreResult<Vec<Account>>;

    /// 프로필 업데이트 후 변경된 레코드 반환.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound`: 계정 없음
    async fn update_profile(
        &self,
        role: AccountRole,
        email: &str,
        update: &ProfileUpdate,
    ) -> StoreResult<Account>;

    /// 비밀번호 해시 교체.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound`: 계정 없음
    async fn update_password_hash(
        &self,
        role: AccountRole,
        email: &str,
        password_hash: &str,
    ) -> StoreResult<()>;
}

// =============================================================================
// RevocationStore
// =============================================================================

/// 토큰 폐기 목록 trait.
///
/// 한 번 기록된 토큰은 만료 전이라도 다시는 인증을 통과해서는 안 됩니다.
/// 구현체는 `expires_at`이 지난 항목만 정리할 수 있습니다.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// 토큰 원문이 폐기 목록에 있는지 확인.
    async fn is_revoked(&self, token: &str) -> StoreResult<bool>;

    /// 토큰을 폐기 목록에 추가.
    ///
    /// 이번 호출로 새로 추가되었으면 `true`, 이미 있었으면 `false`.
    /// 확인과 추가는 원자적이므로 일회용 토큰 소비에 사용할 수 있습니다.
    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> StoreResult<bool>;
}

// =============================================================================
// PrincipalLookup
// =============================================================================

/// 주체 조회 trait.
///
/// 인증 게이트의 유일한 다형성 지점입니다. 구매자 게이트와 판매자 게이트는
/// 서로 다른 구현을 주입받을 뿐 제어 흐름은 동일합니다.
#[async_trait]
pub trait PrincipalLookup: Send + Sync {
    /// 조회 대상 역할.
    fn role(&self) -> AccountRole;

    /// 식별자(이메일)로 주체 조회. 없으면 `Ok(None)`.
    async fn find_principal(&self, email: &str) -> StoreResult<Option<Principal>>;
}

/// 특정 역할로 범위가 고정된 계정 디렉터리.
///
/// `AccountStore`를 역할별 `PrincipalLookup`으로 노출합니다.
#[derive(Clone)]
pub struct RoleDirectory {
    role: AccountRole,
    store: Arc<dyn AccountStore>,
}

impl RoleDirectory {
    pub fn new(role: AccountRole, store: Arc<dyn AccountStore>) -> Self {
        Self { role, store }
    }

    /// 구매자 디렉터리.
    pub fn buyers(store: Arc<dyn AccountStore>) -> Self {
        Self::new(AccountRole::Buyer, store)
    }

    /// 판매자 디렉터리.
    pub fn sellers(store: Arc<dyn AccountStore>) -> Self {
        Self::new(AccountRole::Seller, store)
    }
}

#[async_trait]
impl PrincipalLookup for RoleDirectory {
    fn role(&self) -> AccountRole {
        self.role
    }

    async fn find_principal(&self, email: &str) -> StoreResult<Option<Principal>> {
        let account = self.store.find_by_email(self.role, email).await?;
        Ok(account.map(Principal::new))
    }
}
