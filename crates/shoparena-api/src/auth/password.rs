//! 비밀번호 해싱 유틸리티.
//!
//! Argon2id 해싱, 검증, 신규 비밀번호 규칙.
//!
//! Argon2는 CPU-intensive 작업이므로 핸들러는 `spawn_*` 함수로
//! blocking thread pool에서 실행해야 합니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use tracing::error;

/// 존재하지 않는 계정의 로그인에도 같은 비용을 치르기 위한 해시.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("shoparena-dummy-password-0").ok());

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("비밀번호가 일치하지 않습니다")]
    Mismatch,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
    #[error("{0}")]
    TooWeak(&'static str),
    #[error("비밀번호 작업 실행 실패")]
    TaskFailed,
}

/// 비밀번호 해싱. PHC 형식 문자열(솔트 포함)을 반환합니다.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::HashingFailed)
}

/// 저장된 해시와 평문 비밀번호 비교.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::Mismatch)
}

/// 신규 비밀번호 강도 검증.
///
/// 최소 8자, 숫자 1개 이상, 영문자 1개 이상.
pub fn validate_password_strength(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < 8 {
        return Err(PasswordError::TooWeak(
            "비밀번호는 최소 8자 이상이어야 합니다",
        ));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordError::TooWeak(
            "비밀번호에 최소 1개의 숫자가 포함되어야 합니다",
        ));
    }

    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(PasswordError::TooWeak(
            "비밀번호에 최소 1개의 영문자가 포함되어야 합니다",
        ));
    }

    Ok(())
}

/// 강도 검증 후 해싱.
pub fn hash_new_password(password: &str) -> Result<String, PasswordError> {
    validate_password_strength(password)?;
    hash_password(password)
}

/// 저장된 해시가 없으면(계정 없음) 더미 해시로 검증한 뒤 `Mismatch`를 반환합니다.
pub fn verify_credentials(password: &str, hash: Option<&str>) -> Result<(), PasswordError> {
    match hash {
        Some(hash) => verify_password(password, hash),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            Err(PasswordError::Mismatch)
        }
    }
}

/// blocking thread pool에서 강도 검증 후 해싱.
pub async fn spawn_hash_new_password(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_new_password(&password))
        .await
        .map_err(|e| {
            error!(error = %e, "Password hashing task failed");
            PasswordError::TaskFailed
        })?
}

/// blocking thread pool에서 자격 증명 검증.
pub async fn spawn_verify_credentials(
    password: String,
    hash: Option<String>,
) -> Result<(), PasswordError> {
    tokio::task::spawn_blocking(move || verify_credentials(&password, hash.as_deref()))
        .await
        .map_err(|e| {
            error!(error = %e, "Password verification task failed");
            PasswordError::TaskFailed
        })?
}
