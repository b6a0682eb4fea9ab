//! 라우트 접근 등급.

use serde::{Deserialize, Serialize};

use super::AccountRole;

/// 라우트 접근 등급.
///
/// 어떤 인증 게이트가 적용되는지를 결정합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessTier {
    /// 게이트 없음
    Public,
    /// 구매자 게이트
    Buyer,
    /// 판매자 게이트
    Seller,
}

impl AccessTier {
    /// 이 등급이 요구하는 계정 역할. `Public`은 `None`.
    pub fn required_role(&self) -> Option<AccountRole> {
        match self {
            AccessTier::Public => None,
            AccessTier::Buyer => Some(AccountRole::Buyer),
            AccessTier::Seller => Some(AccountRole::Seller),
        }
    }

    pub fn is_gated(&self) -> bool {
        self.required_role().is_some()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessTier::Public => "public",
            AccessTier::Buyer => "buyer",
            AccessTier::Seller => "seller",
        }
    }
}

impl From<AccountRole> for AccessTier {
    fn from(role: AccountRole) -> Self {
        match role {
            AccountRole::Buyer => AccessTier::Buyer,
            AccountRole::Seller => AccessTier::Seller,
        }
    }
}

impl std::fmt::Display for AccessTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
