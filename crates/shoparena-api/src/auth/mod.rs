//! 인증 및 권한 부여.
//!
//! # 구성 요소
//!
//! - [`JwtConfig`]: Access Token / 재설정 토큰 발급 및 검증
//! - [`AuthGate`]: 구매자/판매자 라우트 그룹 앞의 인증 게이트
//! - [`AuthPrincipal`], [`AuthSession`]: 게이트 통과 정보 추출기
//! - Argon2 비밀번호 해싱

mod extract;
mod gate;
mod jwt;
mod password;

pub use extract::{AuthPrincipal, AuthSession, OptionalPrincipal};
pub use gate::{authorize, bearer_token, AuthContext, AuthGate, GateRejection};
pub use jwt::{
    create_token, decode_reset_token, decode_token, AccessToken, Claims, JwtConfig, JwtError,
    ResetClaims, DEVELOPMENT_SECRET,
};
pub use password::{
    hash_password, spawn_hash_new_password, spawn_verify_credentials, validate_password_strength,
    verify_password, PasswordError,
};
