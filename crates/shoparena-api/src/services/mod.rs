//! 외부 협력자 연동.
//!
//! 라우터가 직접 구현하지 않는 비즈니스 처리와 알림 전달을 추상화합니다.

pub mod commerce;
pub mod notifier;

pub use commerce::{
    CommerceBackend, CommerceCall, CommerceError, CommerceReply, UnavailableCommerce,
};
pub use notifier::{LogResetNotifier, NotifyError, ResetNotifier};
