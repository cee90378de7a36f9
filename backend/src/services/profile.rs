//! Profile read and partial update

use super::load_profile;
use crate::error::ApiError;
use crate::repositories::UserRepository;
use fittrack_shared::types::{ProfileResponse, UpdateProfileRequest};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub struct ProfileService;

impl ProfileService {
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<ProfileResponse, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        let profile = user.profile().map_err(ApiError::Internal)?;

        Ok(ProfileResponse::new(user.id, user.email, user.name, profile))
    }

    /// Fields left out of the request keep their stored value
    pub async fn update(pool: &PgPool, user_id: Uuid, req: UpdateProfileRequest) -> Result<ProfileResponse, ApiError> {
        req.validate()?;
        let current = load_profile(pool, user_id).await?;
        let profile = req.apply_to(&current);
        profile.validate()?;

        let name = req.name.as_deref().map(str::trim);
        let user = UserRepository::update_profile(pool, user_id, name, &profile)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        info!(user_id = %user_id, "Profile updated");
        Ok(ProfileResponse::new(user.id, user.email, user.name, profile))
    }
}
