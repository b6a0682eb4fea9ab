//! 계정 및 토큰 폐기 목록 저장소.
//!
//! 이 crate는 `shoparena-core`의 협력자 trait 구현을 제공합니다:
//! - 메모리 저장소 (개발/테스트, `DATABASE_URL` 미설정 시 기본값)
//! - PostgreSQL 저장소 (계정 + 토큰 블랙리스트, 내장 마이그레이션)
//! - Redis 토큰 폐기 목록 (토큰 잔여 수명만큼 TTL)

pub mod error;
pub mod storage;

pub use error::{DataError, Result};

pub use storage::memory::{MemoryAccountStore, MemoryRevocationStore};
pub use storage::postgres::{Database, PgAccountStore, PgRevocationStore};
pub use storage::redis::RedisRevocationStore;
