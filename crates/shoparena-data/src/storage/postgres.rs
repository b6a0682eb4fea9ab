//! PostgreSQL 저장소 구현.
//!
//! 계정 테이블과 토큰 블랙리스트 테이블을 사용합니다.
//! 스키마는 저장소 루트의 `migrations/`에 있습니다.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shoparena_core::{
    normalize_email, Account, AccountRole, AccountStore, DatabaseConfig, NewAccount,
    ProfileUpdate, RevocationStore, StoreError, StoreResult,
};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DataError, Result};

/// 데이터베이스 연결 풀 래퍼.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// 새로운 데이터베이스 연결 풀을 생성합니다.
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .connect(url)
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        info!("Database connection established");

        Ok(Self { pool })
    }

    /// 데이터베이스 마이그레이션을 실행합니다.
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations...");

        sqlx::migrate!("../../migrations").run(&self.pool).await?;

        info!("Migrations completed successfully");
        Ok(())
    }

    /// 데이터베이스 상태를 확인합니다.
    pub async fn health_check(&self) -> Result<bool> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(true)
    }

    /// 이 풀을 공유하는 계정 저장소.
    pub fn accounts(&self) -> PgAccountStore {
        PgAccountStore::new(self.pool.clone())
    }

    /// 이 풀을 공유하는 토큰 폐기 목록.
    pub fn revocations(&self) -> PgRevocationStore {
        PgRevocationStore::new(self.pool.clone())
    }
}

// =============================================================================
// Account Repository
// =============================================================================

/// 계정 데이터베이스 레코드.
#[derive(Debug, Clone, FromRow)]
struct AccountRow {
    id: Uuid,
    role: String,
    email: String,
    first_name: String,
    last_name: String,
    phone_number: Option<String>,
    address: Option<String>,
    image_url: Option<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = DataError;

    fn try_from(row: AccountRow) -> Result<Self> {
        let role = AccountRole::parse(&row.role)
            .ok_or_else(|| DataError::InvalidData(format!("unknown role: {}", row.role)))?;

        Ok(Account {
            id: row.id,
            role,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            phone_number: row.phone_number,
            address: row.address,
            image_url: row.image_url,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL 계정 저장소.
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, input: NewAccount) -> Result<Account> {
        let record = Account::from_new(input);

        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (
                id, role, email, first_name, last_name, phone_number, address,
                image_url, password_hash, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(record.role.as_str())
        .bind(&record.email)
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(&record.phone_number)
        .bind(&record.address)
        .bind(&record.image_url)
        .bind(&record.password_hash)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn select_by_email(&self, role: AccountRole, email: &str) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT * FROM accounts WHERE role = $1 AND email = $2",
        )
        .bind(role.as_str())
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn select_by_role(&self, role: AccountRole) -> Result<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT * FROM accounts WHERE role = $1 ORDER BY created_at, email",
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Account::try_from).collect()
    }

    async fn patch_profile(
        &self,
        role: AccountRole,
        email: &str,
        update: &ProfileUpdate,
    ) -> Result<Account> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            UPDATE accounts SET
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                phone_number = COALESCE($5, phone_number),
                address = COALESCE($6, address),
                updated_at = NOW()
            WHERE role = $1 AND email = $2
            RETURNING *
            "#,
        )
        .bind(role.as_str())
        .bind(normalize_email(email))
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.phone_number)
        .bind(&update.address)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DataError::NotFound(format!("{} {}", role, email)))?;

        row.try_into()
    }

    async fn set_password_hash(
        &self,
        role: AccountRole,
        email: &str,
        password_hash: &str,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE accounts SET password_hash = $3, updated_at = NOW()
            WHERE role = $1 AND email = $2
            "#,
        )
        .bind(role.as_str())
        .bind(normalize_email(email))
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DataError::NotFound(format!("{} {}", role, email)));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create(&self, account: NewAccount) -> StoreResult<Account> {
        let account = self.insert(account).await?;
        debug!(role = %account.role, email = %account.email, "Account created");
        Ok(account)
    }

    async fn find_by_email(&self, role: AccountRole, email: &str) -> StoreResult<Option<Account>> {
        Ok(self.select_by_email(role, email).await?)
    }

    async fn list(&self, role: AccountRole) -> StoreResult<Vec<Account>> {
        Ok(self.select_by_role(role).await?)
    }

    async fn update_profile(
        &self,
        role: AccountRole,
        email: &str,
        update: &ProfileUpdate,
    ) -> StoreResult<Account> {
        Ok(self.patch_profile(role, email, update).await?)
    }

    async fn update_password_hash(
        &self,
        role: AccountRole,
        email: &str,
        password_hash: &str,
    ) -> StoreResult<()> {
        Ok(self.set_password_hash(role, email, password_hash).await?)
    }
}

// =============================================================================
// Token Blacklist Repository
// =============================================================================

/// PostgreSQL 토큰 폐기 목록.
#[derive(Clone)]
pub struct PgRevocationStore {
    pool: PgPool,
}

impl PgRevocationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 만료 시각이 지난 항목 삭제.
    pub async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM token_blacklist WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl RevocationStore for PgRevocationStore {
    async fn is_revoked(&self, token: &str) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM token_blacklist WHERE token = $1)")
                .bind(token)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| StoreError::from(DataError::from(e)))?;

        Ok(exists)
    }

    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO token_blacklist (token, expires_at)
            VALUES ($1, $2)
            ON CONFLICT (token) DO NOTHING
            "#,
        )
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from(DataError::from(e)))?;

        Ok(result.rows_affected() == 1)
    }
}
