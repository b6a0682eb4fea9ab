//! 마켓플레이스 도메인 모델.

pub mod access;
pub mod account;
pub mod ports;

pub use access::AccessTier;
pub use account::{
    normalize_email, Account, AccountProfile, AccountRole, NewAccount, Principal, ProfileUpdate,
};
pub use ports::{AccountStore, PrincipalLookup, RevocationStore, RoleDirectory};
