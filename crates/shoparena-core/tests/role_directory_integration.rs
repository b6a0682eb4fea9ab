//! RoleDirectory 통합 테스트
//!
//! 같은 AccountStore를 공유하는 구매자/판매자 디렉터리가 서로의 계정을
//! 조회하지 못하는지 확인합니다.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shoparena_core::{
    Account, AccountRole, AccountStore, NewAccount, PrincipalLookup, ProfileUpdate,
    RoleDirectory, StoreError, StoreResult,
};

/// 테스트용 단순 저장소
#[derive(Default)]
struct VecStore {
    accounts: Mutex<Vec<Account>>,
}

#[async_trait]
impl AccountStore for VecStore {
    async fn create(&self, account: NewAccount) -> StoreResult<Account> {
        let record = Account::from_new(account);
        self.accounts.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, role: AccountRole, email: &str) -> StoreResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.role == role && a.email == email)
            .cloned())
    }

    async fn list(&self, role: AccountRole) -> StoreResult<Vec<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.role == role)
            .cloned()
            .collect())
    }

    async fn update_profile(
        &self,
        _role: AccountRole,
        email: &str,
        _update: &ProfileUpdate,
    ) -> StoreResult<Account> {
        Err(StoreError::NotFound(email.to_string()))
    }

    async fn update_password_hash(
        &self,
        _role: AccountRole,
        email: &str,
        _password_hash: &str,
    ) -> StoreResult<()> {
        Err(StoreError::NotFound(email.to_string()))
    }
}

fn new_account(role: AccountRole, email: &str) -> NewAccount {
    NewAccount {
        role,
        email: email.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        phone_number: None,
        address: None,
        password_hash: "hash".to_string(),
    }
}

#[tokio::test]
async fn test_directories_are_role_scoped() {
    let store = Arc::new(VecStore::default());
    store
        .create(new_account(AccountRole::Buyer, "buyer@example.com"))
        .await
        .unwrap();
    store
        .create(new_account(AccountRole::Seller, "seller@example.com"))
        .await
        .unwrap();

    let buyers = RoleDirectory::buyers(store.clone());
    let sellers = RoleDirectory::sellers(store.clone());

    assert_eq!(buyers.role(), AccountRole::Buyer);
    assert_eq!(sellers.role(), AccountRole::Seller);

    let buyer = buyers.find_principal("buyer@example.com").await.unwrap();
    assert_eq!(buyer.unwrap().role, AccountRole::Buyer);

    // 구매자 이메일은 판매자 디렉터리에서 조회되지 않음
    assert!(sellers
        .find_principal("buyer@example.com")
        .await
        .unwrap()
        .is_none());
    assert!(buyers
        .find_principal("seller@example.com")
        .await
        .unwrap()
        .is_none());
}
