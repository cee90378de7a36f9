//! Registration, login and token refresh
//!
//! Password hashing and verification run on the blocking pool.

use crate::auth::{JwtService, PasswordService, TokenKind};
use crate::error::ApiError;
use crate::repositories::UserRepository;
use fittrack_shared::types::{AuthTokens, LoginRequest, RegisterRequest, UserResponse};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub struct UserService;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn issue_tokens(jwt: &JwtService, user_id: Uuid) -> Result<AuthTokens, ApiError> {
    Ok(AuthTokens {
        access_token: jwt.generate_access_token(user_id).map_err(ApiError::Internal)?,
        refresh_token: jwt.generate_refresh_token(user_id).map_err(ApiError::Internal)?,
        token_type: "Bearer".to_string(),
        expires_in: jwt.access_token_expiry_secs(),
    })
}

impl UserService {
    /// Create the account with its profile and sign it in
    pub async fn register(pool: &PgPool, jwt: &JwtService, req: RegisterRequest) -> Result<AuthTokens, ApiError> {
        req.validate()?;
        let profile = req.profile();
        profile.validate()?;

        let email = normalize_email(&req.email);
        if UserRepository::email_exists(pool, &email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = PasswordService::hash_async(req.password)
            .await
            .map_err(ApiError::Internal)?;

        let user = UserRepository::create(pool, &email, &password_hash, req.name.trim(), &profile)
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %user.id, "User registered");
        issue_tokens(jwt, user.id)
    }

    pub async fn login(pool: &PgPool, jwt: &JwtService, req: LoginRequest) -> Result<AuthTokens, ApiError> {
        req.validate()?;

        let user = UserRepository::find_by_email(pool, &normalize_email(&req.email))
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

        let valid = PasswordService::verify_async(req.password, user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;
        if !valid {
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }

        info!(user_id = %user.id, "User logged in");
        issue_tokens(jwt, user.id)
    }

    /// Trade a refresh token for a fresh pair; the account must still exist
    pub async fn refresh(pool: &PgPool, jwt: &JwtService, refresh_token: &str) -> Result<AuthTokens, ApiError> {
        let user_id = jwt
            .validate(refresh_token, TokenKind::Refresh)
            .and_then(|claims| claims.user_id())
            .map_err(|e| ApiError::Unauthorized(format!("Invalid refresh token: {}", e)))?;

        UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        issue_tokens(jwt, user_id)
    }

    pub async fn me(pool: &PgPool, user_id: Uuid) -> Result<UserResponse, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(UserResponse {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        })
    }
}
