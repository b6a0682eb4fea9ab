//! 비밀번호 재설정 토큰 전달.
//!
//! 실제 이메일 발송은 외부 협력자의 몫입니다. 기본 구현은 발급 사실만 로그로 남깁니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shoparena_core::AccountRole;
use tracing::{debug, info};

/// 전달 실패.
#[derive(Debug, Clone, thiserror::Error)]
#[error("재설정 토큰 전달 실패: {0}")]
pub struct NotifyError(pub String);

/// 재설정 토큰 전달 trait.
#[async_trait]
pub trait ResetNotifier: Send + Sync {
    async fn send_reset_token(
        &self,
        role: AccountRole,
        email: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), NotifyError>;
}

/// 로그 전용 전달자.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogResetNotifier;

#[async_trait]
impl ResetNotifier for LogResetNotifier {
    async fn send_reset_token(
        &self,
        role: AccountRole,
        email: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), NotifyError> {
        info!(
            role = %role,
            email = %email,
            expires_at = %expires_at,
            "Password reset token issued (no delivery channel configured)"
        );
        debug!(token = %token, "Password reset token");
        Ok(())
    }
}
