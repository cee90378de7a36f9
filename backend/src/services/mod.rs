//! Business logic services
//!
//! Services validate requests, build `*Entry` values (which compute derived
//! fields), call the repositories and map storage failures into [`ApiError`].

pub mod dashboard;
pub mod meal;
pub mod profile;
pub mod progress;
pub mod sleep;
pub mod user;
pub mod workout;

pub use dashboard::{DashboardService, DashboardSource, PgDashboardSource};
pub use meal::MealService;
pub use profile::ProfileService;
pub use progress::ProgressService;
pub use sleep::SleepService;
pub use user::UserService;
pub use workout::WorkoutService;

use crate::error::ApiError;
use crate::repositories::{ListFilter, UserRepository};
use chrono::{DateTime, Utc};
use fittrack_shared::validation::{check_date_bounds, page};
use fittrack_shared::UserProfile;
use sqlx::PgPool;
use uuid::Uuid;

/// The caller's stored profile
pub(crate) async fn load_profile(pool: &PgPool, user_id: Uuid) -> Result<UserProfile, ApiError> {
    UserRepository::find_by_id(pool, user_id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?
        .profile()
        .map_err(ApiError::Internal)
}

pub(crate) fn list_filter(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    limit: Option<i64>,
    offset: Option<i64>,
    category: Option<String>,
) -> Result<ListFilter, ApiError> {
    check_date_bounds(start, end)?;
    Ok(ListFilter {
        start,
        end,
        category,
        page: page(limit, offset)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_list_filter_validates_bounds_and_page() {
        let now = Utc::now();
        let filter = list_filter(Some(now - Duration::days(1)), Some(now), Some(500), None, None).unwrap();
        assert_eq!(filter.page.limit, 100);
        assert_eq!(filter.page.offset, 0);

        assert!(matches!(
            list_filter(Some(now), Some(now - Duration::days(1)), None, None, None),
            Err(ApiError::Validation(_))
        ));
        assert!(list_filter(None, None, Some(0), None, None).is_err());
    }
}
