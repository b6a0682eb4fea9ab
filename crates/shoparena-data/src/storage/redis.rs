//! Redis 토큰 폐기 목록.
//!
//! 폐기된 토큰마다 키 하나를 두고, TTL은 토큰의 남은 수명으로 설정합니다.
//! 만료된 토큰은 디코딩에서 거부되므로 키가 사라져도 무방합니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use shoparena_core::{RevocationStore, StoreError, StoreResult};
use tracing::info;

use crate::error::{DataError, Result};

/// Redis 토큰 폐기 목록.
#[derive(Clone)]
pub struct RedisRevocationStore {
    connection: ConnectionManager,
    key_prefix: String,
}

impl RedisRevocationStore {
    /// 새로운 Redis 연결을 생성합니다.
    pub async fn connect(url: &str, key_prefix: impl Into<String>) -> Result<Self> {
        info!("Connecting to Redis...");

        let client = Client::open(url).map_err(|e| DataError::CacheError(e.to_string()))?;
        let connection = ConnectionManager::new(client).await?;

        info!("Redis connection established");

        Ok(Self {
            connection,
            key_prefix: key_prefix.into(),
        })
    }

    /// Redis 상태를 확인합니다.
    pub async fn health_check(&self) -> Result<bool> {
        let mut conn = self.connection.clone();
        let result: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(result == "PONG")
    }

    fn key(&self, token: &str) -> String {
        format!("{}{}", self.key_prefix, token)
    }
}

/// 남은 수명(초). Redis는 0 이하 TTL을 허용하지 않으므로 최소 1초.
fn ttl_secs(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (expires_at - now).num_seconds().max(1) as u64
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn is_revoked(&self, token: &str) -> StoreResult<bool> {
        let mut conn = self.connection.clone();
        let exists: bool = conn
            .exists(self.key(token))
            .await
            .map_err(|e| StoreError::from(DataError::from(e)))?;

        Ok(exists)
    }

    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> StoreResult<bool> {
        let mut conn = self.connection.clone();
        let ttl = ttl_secs(expires_at, Utc::now());
        // SET NX EX: 키가 없을 때만 설정, 설정되면 "OK", 아니면 nil
        let reply: Option<String> = redis::cmd("SET")
            .arg(self.key(token))
            .arg(1u8)
            .arg("NX")
            .arg("EX")
            .arg(ttl)
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::from(DataError::from(e)))?;

        Ok(reply.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_ttl_secs() {
        let now = Utc::now();
        assert_eq!(ttl_secs(now + Duration::seconds(90), now), 90);
        // 이미 지난 만료 시각도 최소 1초
        assert_eq!(ttl_secs(now - Duration::seconds(10), now), 1);
    }
}
