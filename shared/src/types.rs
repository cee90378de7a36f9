//! API request and response types

use crate::aggregation::{Period, WindowSummary};
use crate::errors::MetricsResult;
use crate::exercise::ExerciseType;
use crate::health_metrics::{classify_bmi, ActivityLevel, FitnessGoal, Gender, UserProfile};
use crate::models::{
    MealChanges, MealRecord, Measurements, ProgressChanges, ProgressRecord, SleepChanges, SleepRecord,
    WorkoutChanges,
};
use crate::nutrition::{FoodItem, MealType};
use crate::sleep::SleepQuality;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Shared query and response wrappers
// ============================================================================

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// `?period=` for stats and analytics; defaults to a week
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

impl PeriodQuery {
    pub fn period(&self) -> MetricsResult<Period> {
        match self.period.as_deref() {
            Some(p) => p.parse(),
            None => Ok(Period::default()),
        }
    }
}

/// `?date=&tz_offset_minutes=` for day and week views
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayQuery {
    pub date: Option<NaiveDate>,
    pub tz_offset_minutes: Option<i32>,
}

// ============================================================================
// Authentication
// ============================================================================

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Registration request; the profile is required up front
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 20.0, max = 300.0))]
    pub weight_kg: f64,
    #[validate(range(min = 100.0, max = 250.0))]
    pub height_cm: f64,
    #[validate(range(min = 13, max = 120))]
    pub age: i32,
    pub gender: Gender,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub goal: FitnessGoal,
    #[validate(range(min = 20.0, max = 300.0))]
    pub target_weight_kg: f64,
}

impl RegisterRequest {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            age: self.age,
            gender: self.gender,
            activity_level: self.activity_level,
            goal: self.goal,
            target_weight_kg: self.target_weight_kg,
        }
    }
}

/// Account summary returned by `/auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Profile
// ============================================================================

/// Partial profile update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 20.0, max = 300.0))]
    pub weight_kg: Option<f64>,
    #[validate(range(min = 100.0, max = 250.0))]
    pub height_cm: Option<f64>,
    #[validate(range(min = 13, max = 120))]
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<FitnessGoal>,
    #[validate(range(min = 20.0, max = 300.0))]
    pub target_weight_kg: Option<f64>,
}

impl UpdateProfileRequest {
    /// Profile with this update applied over `current`
    pub fn apply_to(&self, current: &UserProfile) -> UserProfile {
        UserProfile {
            weight_kg: self.weight_kg.unwrap_or(current.weight_kg),
            height_cm: self.height_cm.unwrap_or(current.height_cm),
            age: self.age.unwrap_or(current.age),
            gender: self.gender.unwrap_or(current.gender),
            activity_level: self.activity_level.unwrap_or(current.activity_level),
            goal: self.goal.unwrap_or(current.goal),
            target_weight_kg: self.target_weight_kg.unwrap_or(current.target_weight_kg),
        }
    }
}

/// Profile with derived metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(flatten)]
    pub profile: UserProfile,
    pub bmi: f64,
    pub bmi_category: String,
    pub bmr: i32,
    pub daily_calorie_need: i32,
}

impl ProfileResponse {
    pub fn new(id: Uuid, email: String, name: String, profile: UserProfile) -> Self {
        let bmi = profile.bmi().unwrap_or(0.0);
        Self {
            id,
            email,
            name,
            bmi,
            bmi_category: classify_bmi(bmi).label().to_string(),
            bmr: profile.bmr(),
            daily_calorie_need: profile.daily_calorie_need(),
            profile,
        }
    }
}

// ============================================================================
// Workouts
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateWorkoutRequest {
    pub exercise_type: ExerciseType,
    #[validate(length(min = 1, max = 50))]
    pub intensity: String,
    #[validate(range(min = 1, max = 480))]
    pub duration_minutes: i32,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateWorkoutRequest {
    pub exercise_type: Option<ExerciseType>,
    #[validate(length(min = 1, max = 50))]
    pub intensity: Option<String>,
    #[validate(range(min = 1, max = 480))]
    pub duration_minutes: Option<i32>,
    pub date: Option<DateTime<Utc>>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl From<UpdateWorkoutRequest> for WorkoutChanges {
    fn from(req: UpdateWorkoutRequest) -> Self {
        Self {
            exercise_type: req.exercise_type,
            intensity: req.intensity,
            duration_minutes: req.duration_minutes,
            date: req.date,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutListQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub exercise_type: Option<ExerciseType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EstimateCaloriesRequest {
    pub exercise_type: ExerciseType,
    #[validate(length(min = 1, max = 50))]
    pub intensity: String,
    #[validate(range(min = 1, max = 480))]
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalorieEstimate {
    pub exercise_type: ExerciseType,
    pub intensity: String,
    pub duration_minutes: i32,
    pub weight_kg: f64,
    pub met: f64,
    pub calories_burned: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntensityMet {
    pub intensity: String,
    pub met: f64,
}

/// One exercise type with its intensities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseCatalogEntry {
    pub exercise_type: ExerciseType,
    pub intensities: Vec<IntensityMet>,
}

/// The full MET table, in declaration order
pub fn exercise_catalogue() -> Vec<ExerciseCatalogEntry> {
    ExerciseType::ALL
        .iter()
        .map(|exercise_type| ExerciseCatalogEntry {
            exercise_type: *exercise_type,
            intensities: exercise_type
                .intensities()
                .iter()
                .map(|(intensity, met)| IntensityMet {
                    intensity: intensity.to_string(),
                    met: *met,
                })
                .collect(),
        })
        .collect()
}

// ============================================================================
// Meals
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMealRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub meal_type: MealType,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[validate(length(min = 1, max = 100))]
    pub foods: Vec<FoodItem>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateMealRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub meal_type: Option<MealType>,
    pub date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, max = 100))]
    pub foods: Option<Vec<FoodItem>>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl From<UpdateMealRequest> for MealChanges {
    fn from(req: UpdateMealRequest) -> Self {
        Self {
            name: req.name,
            meal_type: req.meal_type,
            date: req.date,
            foods: req.foods,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealListQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub meal_type: Option<MealType>,
}

/// Meals of one calendar day with their summary
#[derive(Debug, Clone, Serialize)]
pub struct DailyMealsResponse {
    pub date: NaiveDate,
    pub meals: Vec<MealRecord>,
    pub summary: WindowSummary,
}

// ============================================================================
// Sleep
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSleepRequest {
    pub sleep_start: DateTime<Utc>,
    pub sleep_end: DateTime<Utc>,
    pub date: Option<DateTime<Utc>>,
    pub quality: SleepQuality,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateSleepRequest {
    pub sleep_start: Option<DateTime<Utc>>,
    pub sleep_end: Option<DateTime<Utc>>,
    pub date: Option<DateTime<Utc>>,
    pub quality: Option<SleepQuality>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl From<UpdateSleepRequest> for SleepChanges {
    fn from(req: UpdateSleepRequest) -> Self {
        Self {
            sleep_start: req.sleep_start,
            sleep_end: req.sleep_end,
            date: req.date,
            quality: req.quality,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SleepListQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub quality: Option<SleepQuality>,
}

/// Sleep log with its quality score
#[derive(Debug, Clone, Serialize)]
pub struct SleepResponse {
    #[serde(flatten)]
    pub record: SleepRecord,
    pub quality_score: i32,
}

impl From<SleepRecord> for SleepResponse {
    fn from(record: SleepRecord) -> Self {
        Self {
            quality_score: record.quality_score(),
            record,
        }
    }
}

// ============================================================================
// Body Progress
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProgressRequest {
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[validate(range(min = 20.0, max = 300.0))]
    pub weight_kg: f64,
    #[validate(range(min = 1.0, max = 50.0))]
    pub body_fat_percent: Option<f64>,
    #[validate(range(min = 10.0, max = 100.0))]
    pub muscle_mass_kg: Option<f64>,
    #[serde(default)]
    pub measurements: Measurements,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProgressRequest {
    pub date: Option<DateTime<Utc>>,
    #[validate(range(min = 20.0, max = 300.0))]
    pub weight_kg: Option<f64>,
    #[validate(range(min = 1.0, max = 50.0))]
    pub body_fat_percent: Option<f64>,
    #[validate(range(min = 10.0, max = 100.0))]
    pub muscle_mass_kg: Option<f64>,
    pub measurements: Option<Measurements>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl From<UpdateProgressRequest> for ProgressChanges {
    fn from(req: UpdateProgressRequest) -> Self {
        Self {
            date: req.date,
            weight_kg: req.weight_kg,
            body_fat_percent: req.body_fat_percent,
            muscle_mass_kg: req.muscle_mass_kg,
            measurements: req.measurements,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressListQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Progress entry with BMI computed from the owner's height
#[derive(Debug, Clone, Serialize)]
pub struct ProgressResponse {
    #[serde(flatten)]
    pub record: ProgressRecord,
    pub bmi: f64,
    pub bmi_category: String,
}

impl ProgressResponse {
    /// BMI degrades to 0 when the height cannot produce one
    pub fn new(record: ProgressRecord, height_cm: f64) -> Self {
        let bmi = record.bmi(height_cm).unwrap_or(0.0);
        Self {
            record,
            bmi,
            bmi_category: classify_bmi(bmi).label().to_string(),
        }
    }
}

/// Stats for one record kind over a period
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub period: Period,
    #[serde(flatten)]
    pub summary: WindowSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register() -> RegisterRequest {
        RegisterRequest {
            email: "runner@example.com".to_string(),
            password: "correct horse".to_string(),
            name: "Runner".to_string(),
            weight_kg: 70.0,
            height_cm: 175.0,
            age: 30,
            gender: Gender::Female,
            activity_level: ActivityLevel::default(),
            goal: FitnessGoal::default(),
            target_weight_kg: 65.0,
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register().validate().is_ok());

        let mut bad_email = register();
        bad_email.email = "not-an-email".to_string();
        assert!(bad_email.validate().is_err());

        let mut short_password = register();
        short_password.password = "short".to_string();
        assert!(short_password.validate().is_err());

        let mut light = register();
        light.weight_kg = 19.9;
        assert!(light.validate().is_err());

        let mut young = register();
        young.age = 12;
        assert!(young.validate().is_err());
    }

    #[test]
    fn test_register_defaults_from_json() {
        let json = r#"{
            "email": "a@example.com",
            "password": "password123",
            "name": "A",
            "weight_kg": 70,
            "height_cm": 175,
            "age": 30,
            "gender": "other",
            "target_weight_kg": 70
        }"#;
        let req: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.activity_level, ActivityLevel::LightlyActive);
        assert_eq!(req.goal, FitnessGoal::MaintainWeight);
        assert_eq!(req.profile().gender, Gender::Other);
    }

    #[test]
    fn test_profile_update_applies_over_current() {
        let current = register().profile();
        let update = UpdateProfileRequest {
            weight_kg: Some(72.5),
            ..Default::default()
        };
        let next = update.apply_to(&current);
        assert_eq!(next.weight_kg, 72.5);
        assert_eq!(next.height_cm, current.height_cm);
    }

    #[test]
    fn test_profile_update_ranges() {
        let update = UpdateProfileRequest {
            height_cm: Some(260.0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
        assert!(UpdateProfileRequest::default().validate().is_ok());
    }

    #[test]
    fn test_profile_response_derived_metrics() {
        let response = ProfileResponse::new(
            Uuid::new_v4(),
            "a@example.com".to_string(),
            "A".to_string(),
            register().profile(),
        );
        assert_eq!(response.bmi, 22.9);
        assert_eq!(response.bmi_category, "Normal weight");
        assert!(response.daily_calorie_need > response.bmr);
    }

    #[test]
    fn test_period_query_default_and_parse() {
        assert_eq!(PeriodQuery::default().period().unwrap(), Period::Week);
        let q = PeriodQuery {
            period: Some("90d".to_string()),
        };
        assert_eq!(q.period().unwrap(), Period::Days(90));
    }

    #[test]
    fn test_exercise_catalogue_covers_table() {
        let catalogue = exercise_catalogue();
        assert_eq!(catalogue.len(), 11);
        let running = &catalogue[0];
        assert_eq!(running.exercise_type, ExerciseType::Running);
        assert_eq!(running.intensities[1].intensity, "6 mph");
        assert_eq!(running.intensities[1].met, 9.8);
    }

    #[test]
    fn test_meal_request_requires_foods() {
        let req = CreateMealRequest {
            name: "Lunch".to_string(),
            meal_type: MealType::Lunch,
            date: Utc::now(),
            foods: vec![],
            notes: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_progress_request_ranges() {
        let req = CreateProgressRequest {
            date: Utc::now(),
            weight_kg: 80.0,
            body_fat_percent: Some(55.0),
            muscle_mass_kg: None,
            measurements: Measurements::default(),
            notes: None,
        };
        assert!(req.validate().is_err());
    }
}
