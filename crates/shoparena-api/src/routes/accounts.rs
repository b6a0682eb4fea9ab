//! 계정 endpoint.
//!
//! 가입, 로그인, 프로필, 비밀번호 변경/재설정, 로그아웃, 판매자 목록.
//! 구매자와 판매자는 같은 핸들러를 쓰고 역할만 라우트에서 주입됩니다.
//!
//! # 엔드포인트 (역할별 경로는 라우트 테이블 참조)
//!
//! - 가입: 201 + 프로필, 같은 역할에 이메일 중복 시 409
//! - 로그인: Access Token + 프로필, 실패 시 401 `INVALID_CREDENTIALS`
//! - 비밀번호 찾기: 계정 존재 여부와 무관하게 200
//! - 로그아웃: 제시된 토큰을 만료 시각까지 폐기

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use shoparena_core::{AccountProfile, AccountRole, NewAccount, ProfileUpdate, StoreError};
use tracing::{error, info, warn};
use validator::Validate;

use crate::auth::{
    spawn_hash_new_password, spawn_verify_credentials, validate_password_strength, AccessToken,
    AuthPrincipal, AuthSession, JwtError, PasswordError,
};
use crate::error::{
    api_error, store_failure, validation_failure, ApiError, ApiJson, ApiResult,
};
use crate::metrics::{record_login, record_revocation};
use crate::state::AppState;

// =============================================================================
// 요청/응답 타입
// =============================================================================

/// 가입 요청.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 7, max = 20))]
    pub phone_number: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    pub password: String,
}

/// 로그인 요청.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// 로그인 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub token: AccessToken,
    pub profile: AccountProfile,
}

/// 프로필 수정 요청. 지정한 필드만 변경됩니다.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(min = 7, max = 20))]
    pub phone_number: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfileUpdate {
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            address: req.address,
        }
    }
}

/// 비밀번호 변경 요청.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    #[validate(must_match(other = "new_password"))]
    pub confirm_password: String,
}

/// 비밀번호 찾기 요청.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

/// 비밀번호 재설정 요청. 토큰은 본문 또는 `?reset_token=` 쿼리로 전달합니다.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: Option<String>,
    pub new_password: String,
    #[validate(must_match(other = "new_password"))]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetTokenQuery {
    pub reset_token: Option<String>,
}

/// 단순 메시지 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

// =============================================================================
// 에러 헬퍼
// =============================================================================

fn invalid_credentials() -> ApiError {
    api_error(
        StatusCode::UNAUTHORIZED,
        "INVALID_CREDENTIALS",
        "이메일 또는 비밀번호가 올바르지 않습니다",
    )
}

fn invalid_reset_token() -> ApiError {
    api_error(
        StatusCode::BAD_REQUEST,
        "INVALID_RESET_TOKEN",
        "유효하지 않은 재설정 토큰입니다",
    )
}

fn new_password_failure(err: PasswordError) -> ApiError {
    match err {
        PasswordError::TooWeak(reason) => {
            api_error(StatusCode::UNPROCESSABLE_ENTITY, "WEAK_PASSWORD", reason)
        }
        other => {
            error!(error = %other, "Password hashing failed");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "요청을 처리하지 못했습니다",
            )
        }
    }
}

fn password_task_failure() -> ApiError {
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "요청을 처리하지 못했습니다",
    )
}

fn token_failure(err: JwtError) -> ApiError {
    error!(error = %err, "Token issuance failed");
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "토큰을 발급하지 못했습니다",
    )
}

// =============================================================================
// 핸들러
// =============================================================================

/// 계정 가입.
pub async fn signup(
    role: AccountRole,
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AccountProfile>)> {
    req.validate().map_err(validation_failure)?;
    let password_hash = spawn_hash_new_password(req.password)
        .await
        .map_err(new_password_failure)?;

    let account = state
        .accounts
        .create(NewAccount {
            role,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            address: req.address,
            password_hash,
        })
        .await
        .map_err(store_failure)?;

    info!(role = %role, email = %account.email, "Account registered");
    Ok((StatusCode::CREATED, Json(account.profile())))
}

/// 로그인.
pub async fn login(
    role: AccountRole,
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate().map_err(|_| invalid_credentials())?;

    let account = state
        .accounts
        .find_by_email(role, &req.email)
        .await
        .map_err(store_failure)?;

    // 계정이 없어도 더미 해시로 같은 비용의 검증을 수행
    let stored_hash = account.as_ref().map(|a| a.password_hash.clone());
    let verified = spawn_verify_credentials(req.password, stored_hash).await;

    let account = match (verified, account) {
        (Ok(()), Some(account)) => account,
        (Err(PasswordError::TaskFailed), _) => return Err(password_task_failure()),
        _ => {
            record_login(role.as_str(), false);
            return Err(invalid_credentials());
        }
    };

    let (token, _) = state
        .jwt
        .issue_access_token(&account.email)
        .map_err(token_failure)?;

    record_login(role.as_str(), true);
    info!(role = %role, email = %account.email, "Login succeeded");

    Ok(Json(LoginResponse {
        token,
        profile: account.profile(),
    }))
}

/// 현재 주체의 프로필.
pub async fn get_profile(AuthPrincipal(principal): AuthPrincipal) -> Json<AccountProfile> {
    Json(principal.account.profile())
}

/// 현재 주체의 프로필 수정.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<AccountProfile>> {
    req.validate().map_err(validation_failure)?;

    let update = ProfileUpdate::from(req);
    if update.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "EMPTY_UPDATE",
            "변경할 항목이 없습니다",
        ));
    }

    let account = state
        .accounts
        .update_profile(principal.role, principal.email(), &update)
        .await
        .map_err(store_failure)?;

    Ok(Json(account.profile()))
}

/// 현재 주체의 비밀번호 변경.
pub async fn update_password(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    ApiJson(req): ApiJson<UpdatePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate().map_err(validation_failure)?;

    match spawn_verify_credentials(
        req.current_password,
        Some(principal.account.password_hash.clone()),
    )
    .await
    {
        Ok(()) => {}
        Err(PasswordError::TaskFailed) => return Err(password_task_failure()),
        Err(_) => {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "WRONG_PASSWORD",
                "현재 비밀번호가 올바르지 않습니다",
            ))
        }
    }

    let password_hash = spawn_hash_new_password(req.new_password)
        .await
        .map_err(new_password_failure)?;
    state
        .accounts
        .update_password_hash(principal.role, principal.email(), &password_hash)
        .await
        .map_err(store_failure)?;

    info!(role = %principal.role, email = %principal.email(), "Password updated");
    Ok(MessageResponse::new("비밀번호가 변경되었습니다"))
}

/// 비밀번호 찾기. 재설정 토큰을 발급해 전달자에게 넘깁니다.
pub async fn forgot_password(
    role: AccountRole,
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ForgotPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate().map_err(validation_failure)?;

    let account = state
        .accounts
        .find_by_email(role, &req.email)
        .await
        .map_err(store_failure)?;

    if let Some(account) = account {
        match state.jwt.issue_reset_token(&account.email, role) {
            Ok((token, claims)) => {
                if let Err(e) = state
                    .notifier
                    .send_reset_token(role, &account.email, &token, claims.expires_at())
                    .await
                {
                    warn!(role = %role, error = %e, "Reset token delivery failed");
                }
            }
            Err(e) => error!(role = %role, error = %e, "Reset token issuance failed"),
        }
    }

    Ok(MessageResponse::new(
        "등록된 이메일이면 비밀번호 재설정 안내가 전송됩니다",
    ))
}

/// 재설정 토큰으로 비밀번호 재설정.
///
/// 토큰은 비밀번호를 바꾸기 전에 폐기 목록에 원자적으로 등록되어
/// 동시에 같은 토큰을 제시해도 한 요청만 성공합니다.
pub async fn reset_password(
    role: AccountRole,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResetTokenQuery>,
    ApiJson(req): ApiJson<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate().map_err(validation_failure)?;

    let token = req
        .token
        .or(query.reset_token)
        .filter(|token| !token.is_empty())
        .ok_or_else(invalid_reset_token)?;

    let claims = state
        .jwt
        .verify_reset_token(&token, role)
        .map_err(|e| match e {
            JwtError::TokenExpired => api_error(
                StatusCode::BAD_REQUEST,
                "RESET_TOKEN_EXPIRED",
                "재설정 토큰이 만료되었습니다",
            ),
            _ => invalid_reset_token(),
        })?;

    // 약한 비밀번호로 토큰을 소모하지 않도록 폐기 전에 검사
    validate_password_strength(&req.new_password).map_err(new_password_failure)?;

    let first_use = state
        .revocations
        .revoke(&token, claims.expires_at())
        .await
        .map_err(store_failure)?;
    if !first_use {
        return Err(invalid_reset_token());
    }

    let password_hash = spawn_hash_new_password(req.new_password)
        .await
        .map_err(new_password_failure)?;
    state
        .accounts
        .update_password_hash(role, &claims.sub, &password_hash)
        .await
        .map_err(|e| match e {
            StoreError::NotFound(_) => invalid_reset_token(),
            other => store_failure(other),
        })?;

    info!(role = %role, email = %claims.sub, "Password reset");
    Ok(MessageResponse::new("비밀번호가 재설정되었습니다"))
}

/// 로그아웃. 제시된 토큰을 폐기 목록에 추가합니다.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    AuthSession(session): AuthSession,
) -> ApiResult<Json<MessageResponse>> {
    state
        .revocations
        .revoke(&session.token, session.expires_at)
        .await
        .map_err(store_failure)?;

    let role = session.principal.role;
    record_revocation(role.as_str());
    info!(role = %role, email = %session.principal.email(), "Logged out");

    Ok(MessageResponse::new("로그아웃되었습니다"))
}

/// 판매자 공개 프로필 목록.
pub async fn list_sellers(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AccountProfile>>> {
    let sellers = state
        .accounts
        .list(AccountRole::Seller)
        .await
        .map_err(store_failure)?;

    Ok(Json(sellers.iter().map(|account| account.profile()).collect()))
}
