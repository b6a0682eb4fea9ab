//! 메모리 저장소 구현.
//!
//! 프로세스 수명 동안만 유지됩니다. 개발 환경과 테스트에서 사용합니다.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shoparena_core::{
    normalize_email, Account, AccountRole, AccountStore, NewAccount, ProfileUpdate,
    RevocationStore, StoreError, StoreResult,
};
use tokio::sync::RwLock;
use tracing::debug;

type AccountKey = (AccountRole, String);

// =============================================================================
// MemoryAccountStore
// =============================================================================

/// 메모리 계정 저장소.
///
/// `(역할, 이메일)` 쌍을 키로 사용합니다.
#[derive(Clone, Default)]
pub struct MemoryAccountStore {
    accounts: Arc<RwLock<HashMap<AccountKey, Account>>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 계정 수.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create(&self, account: NewAccount) -> StoreResult<Account> {
        let record = Account::from_new(account);
        let key = (record.role, record.email.clone());

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&key) {
            return Err(StoreError::Duplicate(format!(
                "{} {}",
                record.role, record.email
            )));
        }

        debug!(role = %record.role, email = %record.email, "Account created");
        accounts.insert(key, record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, role: AccountRole, email: &str) -> StoreResult<Option<Account>> {
        let key = (role, normalize_email(email));
        Ok(self.accounts.read().await.get(&key).cloned())
    }

    async fn list(&self, role: AccountRole) -> StoreResult<Vec<Account>> {
        let accounts = self.accounts.read().await;
        let mut records: Vec<Account> = accounts
            .values()
            .filter(|a| a.role == role)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.email.cmp(&b.email))
        });
        Ok(records)
    }

    async fn update_profile(
        &self,
        role: AccountRole,
        email: &str,
        update: &ProfileUpdate,
    ) -> StoreResult<Account> {
        let key = (role, normalize_email(email));
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(format!("{} {}", role, key.1)))?;

        account.apply(update);
        Ok(account.clone())
    }

    async fn update_password_hash(
        &self,
        role: AccountRole,
        email: &str,
        password_hash: &str,
    ) -> StoreResult<()> {
        let key = (role, normalize_email(email));
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(format!("{} {}", role, key.1)))?;

        account.password_hash = password_hash.to_string();
        account.updated_at = Utc::now();
        Ok(())
    }
}

// =============================================================================
// MemoryRevocationStore
// =============================================================================

/// 메모리 토큰 폐기 목록.
///
/// 토큰 원문 → 토큰 만료 시각.
#[derive(Clone, Default)]
pub struct MemoryRevocationStore {
    entries: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 만료 시각이 지난 항목을 정리하고 제거된 수를 반환합니다.
    ///
    /// 만료된 토큰은 디코딩 단계에서 이미 거부되므로 정리해도 안전합니다.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at > now);
        before - entries.len()
    }

    /// 현재 폐기 목록 크기.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn is_revoked(&self, token: &str) -> StoreResult<bool> {
        Ok(self.entries.read().await.contains_key(token))
    }

    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> StoreResult<bool> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(token) {
            return Ok(false);
        }
        entries.insert(token.to_string(), expires_at);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_account(role: AccountRole, email: &str) -> NewAccount {
        NewAccount {
            role,
            email: email.to_string(),
            first_name: "Chidi".to_string(),
            last_name: "Eze".to_string(),
            phone_number: None,
            address: None,
            password_hash: "hash-v1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryAccountStore::new();
        let created = store
            .create(new_account(AccountRole::Buyer, "Chidi@Example.com"))
            .await
            .unwrap();
        assert_eq!(created.email, "chidi@example.com");

        // 대소문자 무관 조회
        let found = store
            .find_by_email(AccountRole::Buyer, "CHIDI@example.com")
            .await
            .unwrap();
        assert_eq!(found.map(|a| a.id), Some(created.id));

        // 다른 역할로는 조회되지 않음
        let other = store
            .find_by_email(AccountRole::Seller, "chidi@example.com")
            .await
            .unwrap();
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_per_role() {
        let store = MemoryAccountStore::new();
        store
            .create(new_account(AccountRole::Seller, "shop@example.com"))
            .await
            .unwrap();

        let dup = store
            .create(new_account(AccountRole::Seller, "shop@example.com"))
            .await;
        assert!(matches!(dup, Err(StoreError::Duplicate(_))));

        // 같은 이메일이라도 역할이 다르면 허용
        assert!(store
            .create(new_account(AccountRole::Buyer, "shop@example.com"))
            .await
            .is_ok());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_update_profile_and_password() {
        let store = MemoryAccountStore::new();
        store
            .create(new_account(AccountRole::Buyer, "b@example.com"))
            .await
            .unwrap();

        let update = ProfileUpdate {
            address: Some("Abuja".to_string()),
            ..Default::default()
        };
        let updated = store
            .update_profile(AccountRole::Buyer, "b@example.com", &update)
            .await
            .unwrap();
        assert_eq!(updated.address.as_deref(), Some("Abuja"));

        store
            .update_password_hash(AccountRole::Buyer, "b@example.com", "hash-v2")
            .await
            .unwrap();
        let found = store
            .find_by_email(AccountRole::Buyer, "b@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.password_hash, "hash-v2");

        let missing = store
            .update_password_hash(AccountRole::Seller, "b@example.com", "x")
            .await;
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_by_role() {
        let store = MemoryAccountStore::new();
        store
            .create(new_account(AccountRole::Seller, "s1@example.com"))
            .await
            .unwrap();
        store
            .create(new_account(AccountRole::Seller, "s2@example.com"))
            .await
            .unwrap();
        store
            .create(new_account(AccountRole::Buyer, "b1@example.com"))
            .await
            .unwrap();

        let sellers = store.list(AccountRole::Seller).await.unwrap();
        assert_eq!(sellers.len(), 2);
        assert!(sellers.iter().all(|a| a.role == AccountRole::Seller));
    }

    #[tokio::test]
    async fn test_revocation_roundtrip() {
        let store = MemoryRevocationStore::new();
        let token = "header.payload.signature";

        assert!(!store.is_revoked(token).await.unwrap());

        assert!(store
            .revoke(token, Utc::now() + Duration::hours(1))
            .await
            .unwrap());
        assert!(store.is_revoked(token).await.unwrap());

        // 두 번째 폐기는 새 항목이 아님
        assert!(!store
            .revoke(token, Utc::now() + Duration::hours(2))
            .await
            .unwrap());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_revoke_has_single_winner() {
        let store = MemoryRevocationStore::new();
        let expires_at = Utc::now() + Duration::minutes(15);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.revoke("reset-token", expires_at).await.unwrap() })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_purge_keeps_unexpired_entries() {
        let store = MemoryRevocationStore::new();
        store
            .revoke("expired", Utc::now() - Duration::minutes(5))
            .await
            .unwrap();
        store
            .revoke("live", Utc::now() + Duration::minutes(5))
            .await
            .unwrap();

        assert_eq!(store.purge_expired().await, 1);
        assert!(!store.is_revoked("expired").await.unwrap());
        assert!(store.is_revoked("live").await.unwrap());
    }
}
