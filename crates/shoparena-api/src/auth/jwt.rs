//! JWT 토큰 처리.
//!
//! Access Token 및 비밀번호 재설정 토큰 생성/검증 로직.
//! 두 토큰은 `token_type` 클레임으로 구분되며 서로 대체할 수 없습니다.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, TokenData,
    Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use shoparena_core::{AccountRole, AuthConfig};

const ACCESS_TOKEN_TYPE: &str = "access";
const RESET_TOKEN_TYPE: &str = "reset";

/// JWT_SECRET 미설정 시 사용되는 개발용 키.
pub const DEVELOPMENT_SECRET: &str = "shoparena-development-secret-change-in-production";

/// JWT Access Token 페이로드.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 계정 이메일
    pub sub: String,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// JWT ID - 같은 초에 발급된 토큰도 서로 다른 문자열이 되도록 함
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    pub token_type: String,
}

impl Claims {
    /// 새로운 Claims 생성.
    ///
    /// * `email` - 계정 이메일
    /// * `expires_in_minutes` - 만료 시간 (분)
    pub fn new(email: impl Into<String>, expires_in_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: email.into(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(expires_in_minutes)).timestamp(),
            jti: Some(uuid::Uuid::new_v4().to_string()),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        }
    }

    /// 만료 시각.
    pub fn expires_at(&self) -> DateTime<Utc> {
        timestamp_to_datetime(self.exp)
    }
}

/// 비밀번호 재설정 토큰 페이로드.
///
/// 발급 대상 역할이 포함되어 있어 구매자 토큰으로 판매자 비밀번호를
/// 재설정할 수 없습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetClaims {
    /// Subject - 계정 이메일
    pub sub: String,
    pub role: AccountRole,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

impl ResetClaims {
    pub fn new(email: impl Into<String>, role: AccountRole, expires_in_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: email.into(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(expires_in_minutes)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: RESET_TOKEN_TYPE.to_string(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        timestamp_to_datetime(self.exp)
    }
}

/// 로그인 응답용 Access Token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    /// 토큰 타입 (항상 "Bearer")
    pub token_type: String,
    /// 만료까지 남은 시간 (초)
    pub expires_in: i64,
}

/// JWT 토큰 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("토큰 인코딩 실패: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("토큰 디코딩 실패")]
    DecodingError,
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("잘못된 토큰 형식")]
    InvalidToken,
    #[error("용도가 다른 토큰입니다")]
    WrongTokenType,
}

fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(ts, 0).single().unwrap_or_else(Utc::now)
}

/// 검증 규칙: HS256, 만료 검사, 허용 오차 없음.
///
/// 허용 오차가 0이어야 만료 시각이 지난 폐기 항목을 정리할 수 있습니다.
fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}

/// 토큰 서명.
pub fn create_token<T: Serialize>(claims: &T, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(JwtError::from)
}

fn decode_claims<T: DeserializeOwned>(token: &str, secret: &str) -> Result<TokenData<T>, JwtError> {
    decode::<T>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        ErrorKind::InvalidToken | ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
            JwtError::InvalidToken
        }
        _ => JwtError::DecodingError,
    })
}

/// Access Token 디코딩 및 검증.
pub fn decode_token(token: &str, secret: &str) -> Result<TokenData<Claims>, JwtError> {
    let data = decode_claims::<Claims>(token, secret)?;
    if data.claims.token_type != ACCESS_TOKEN_TYPE {
        return Err(JwtError::WrongTokenType);
    }
    Ok(data)
}

/// 재설정 토큰 디코딩 및 검증.
pub fn decode_reset_token(token: &str, secret: &str) -> Result<TokenData<ResetClaims>, JwtError> {
    let data = decode_claims::<ResetClaims>(token, secret)?;
    if data.claims.token_type != RESET_TOKEN_TYPE {
        return Err(JwtError::WrongTokenType);
    }
    Ok(data)
}

/// 서명 키와 토큰 수명 설정.
pub struct JwtConfig {
    secret: SecretString,
    access_ttl_minutes: i64,
    reset_ttl_minutes: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("reset_ttl_minutes", &self.reset_ttl_minutes)
            .finish()
    }
}

impl JwtConfig {
    pub fn new(secret: SecretString, access_ttl_minutes: i64, reset_ttl_minutes: i64) -> Self {
        Self {
            secret,
            access_ttl_minutes,
            reset_ttl_minutes,
        }
    }

    /// 인증 설정에서 생성합니다.
    ///
    /// 비밀 키가 없으면 개발용 키를 사용하고 `false`를 함께 반환합니다.
    pub fn from_settings(auth: &AuthConfig) -> (Self, bool) {
        let (secret, configured) = match auth.jwt_secret.as_deref() {
            Some(secret) if !secret.is_empty() => (secret.to_string(), true),
            _ => (DEVELOPMENT_SECRET.to_string(), false),
        };
        let config = Self::new(
            SecretString::new(secret.into()),
            auth.access_token_ttl_minutes,
            auth.reset_token_ttl_minutes,
        );
        (config, configured)
    }

    /// 로그인 성공 시 Access Token 발급.
    pub fn issue_access_token(&self, email: &str) -> Result<(AccessToken, Claims), JwtError> {
        let claims = Claims::new(email, self.access_ttl_minutes);
        let access_token = create_token(&claims, self.secret.expose_secret())?;

        Ok((
            AccessToken {
                access_token,
                token_type: "Bearer".to_string(),
                expires_in: self.access_ttl_minutes * 60,
            },
            claims,
        ))
    }

    /// Access Token 검증.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode_token(token, self.secret.expose_secret()).map(|data| data.claims)
    }

    /// 비밀번호 재설정 토큰 발급.
    pub fn issue_reset_token(
        &self,
        email: &str,
        role: AccountRole,
    ) -> Result<(String, ResetClaims), JwtError> {
        let claims = ResetClaims::new(email, role, self.reset_ttl_minutes);
        let token = create_token(&claims, self.secret.expose_secret())?;
        Ok((token, claims))
    }

    /// 재설정 토큰 검증. 역할이 다르면 `WrongTokenType`.
    pub fn verify_reset_token(
        &self,
        token: &str,
        role: AccountRole,
    ) -> Result<ResetClaims, JwtError> {
        let claims = decode_reset_token(token, self.secret.expose_secret())?.claims;
        if claims.role != role {
            return Err(JwtError::WrongTokenType);
        }
        Ok(claims)
    }

    /// 현재 설정으로 임의 Claims 서명 (테스트 픽스처용).
    #[cfg(any(test, feature = "test-utils"))]
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        create_token(claims, self.secret.expose_secret())
    }
}
