//! 협력자(저장소) 에러 타입.
//!
//! 계정 저장소와 토큰 폐기 목록 구현이 공통으로 반환하는 에러를 정의합니다.
//! 인증 게이트는 이 에러를 모두 인증 실패로 취급합니다.

use thiserror::Error;

/// 저장소 협력자 에러.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 백엔드에 연결할 수 없음 (DB/Redis 다운, 풀 소진 등)
    #[error("저장소 사용 불가: {0}")]
    Unavailable(String),

    /// 고유 제약 조건 위반 (이메일 중복 등)
    #[error("중복 레코드: {0}")]
    Duplicate(String),

    /// 레코드를 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 쿼리 실행 실패
    #[error("쿼리 에러: {0}")]
    Query(String),

    /// 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 저장소 작업을 위한 Result 타입.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::NotFound("seller@example.com".to_string());
        assert_eq!(err.to_string(), "찾을 수 없음: seller@example.com");
    }
}
