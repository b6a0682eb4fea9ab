//! 데이터 모듈 오류 타입.

use shoparena_core::StoreError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 데이터베이스 연결 오류
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// 쿼리 실행 오류
    #[error("Query error: {0}")]
    QueryError(String),

    /// 레코드를 찾을 수 없음
    #[error("Record not found: {0}")]
    NotFound(String),

    /// 중복 레코드
    #[error("Duplicate record: {0}")]
    DuplicateError(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 캐시 오류
    #[error("Cache error: {0}")]
    CacheError(String),

    /// 잘못된 데이터 형식
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 마이그레이션 오류
    #[error("Migration error: {0}")]
    MigrationError(String),

    /// 연결 풀 소진
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DataError::NotFound("Row not found".to_string()),
            sqlx::Error::PoolTimedOut => DataError::PoolExhausted,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                DataError::ConnectionError(err.to_string())
            }
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().unwrap_or_default();
                if code == "23505" {
                    // PostgreSQL 고유 제약 조건 위반
                    DataError::DuplicateError(db_err.message().to_string())
                } else {
                    DataError::QueryError(db_err.message().to_string())
                }
            }
            _ => DataError::QueryError(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DataError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DataError::MigrationError(err.to_string())
    }
}

impl From<redis::RedisError> for DataError {
    fn from(err: redis::RedisError) -> Self {
        DataError::CacheError(err.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

impl From<DataError> for StoreError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::ConnectionError(msg) | DataError::CacheError(msg) => {
                StoreError::Unavailable(msg)
            }
            DataError::PoolExhausted => {
                StoreError::Unavailable("Connection pool exhausted".to_string())
            }
            DataError::NotFound(msg) => StoreError::NotFound(msg),
            DataError::DuplicateError(msg) => StoreError::Duplicate(msg),
            DataError::SerializationError(msg) => StoreError::Serialization(msg),
            DataError::QueryError(msg)
            | DataError::InvalidData(msg)
            | DataError::MigrationError(msg) => StoreError::Query(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        let err: StoreError = DataError::PoolExhausted.into();
        assert!(matches!(err, StoreError::Unavailable(_)));

        let err: StoreError = DataError::CacheError("connection reset".to_string()).into();
        assert!(matches!(err, StoreError::Unavailable(_)));

        let err: StoreError = DataError::DuplicateError("accounts_role_email_key".to_string()).into();
        assert!(matches!(err, StoreError::Duplicate(_)));

        let err: StoreError = DataError::InvalidData("role".to_string()).into();
        assert!(matches!(err, StoreError::Query(_)));
    }

    #[test]
    fn test_sqlx_row_not_found() {
        let err: DataError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DataError::NotFound(_)));

        let err: DataError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DataError::PoolExhausted));
    }
}
