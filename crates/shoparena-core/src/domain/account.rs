//! 구매자/판매자 계정 모델.
//!
//! 계정 레코드는 저장소 협력자가 소유하며, 인증 게이트는 이를 읽기만 합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 계정 역할.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// 구매자
    Buyer,
    /// 판매자
    Seller,
}

impl AccountRole {
    /// 소문자 식별자.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Buyer => "buyer",
            AccountRole::Seller => "seller",
        }
    }

    /// 문자열에서 역할 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "buyer" => Some(AccountRole::Buyer),
            "seller" => Some(AccountRole::Seller),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 계정 레코드.
///
/// `password_hash`는 직렬화되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub role: AccountRole,
    /// 고유 식별자 (역할 내에서 유일)
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// 신규 계정 입력에서 레코드를 생성합니다.
    pub fn from_new(input: NewAccount) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            role: input.role,
            email: normalize_email(&input.email),
            first_name: input.first_name,
            last_name: input.last_name,
            phone_number: input.phone_number,
            address: input.address,
            image_url: None,
            password_hash: input.password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// 프로필 변경 사항을 적용합니다. `None` 필드는 유지됩니다.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(first_name) = &update.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &update.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(phone_number) = &update.phone_number {
            self.phone_number = Some(phone_number.clone());
        }
        if let Some(address) = &update.address {
            self.address = Some(address.clone());
        }
        self.updated_at = Utc::now();
    }

    /// 외부 공개용 프로필.
    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            id: self.id,
            role: self.role,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone_number: self.phone_number.clone(),
            address: self.address.clone(),
            image_url: self.image_url.clone(),
            created_at: self.created_at,
        }
    }
}

/// API 응답용 계정 프로필.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub id: Uuid,
    pub role: AccountRole,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 신규 계정 입력.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub role: AccountRole,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    /// PHC 형식 비밀번호 해시
    pub password_hash: String,
}

/// 프로필 업데이트 입력.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl ProfileUpdate {
    /// 변경할 필드가 하나도 없는지 확인.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone_number.is_none()
            && self.address.is_none()
    }
}

/// 인증된 주체.
///
/// 게이트를 통과한 요청에 첨부되어 하위 핸들러로 전달됩니다.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub role: AccountRole,
    pub account: Account,
}

impl Principal {
    pub fn new(account: Account) -> Self {
        Self {
            role: account.role,
            account,
        }
    }

    /// 주체 식별자 (이메일).
    pub fn email(&self) -> &str {
        &self.account.email
    }
}

/// 이메일 정규화 (앞뒤 공백 제거, 소문자).
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
