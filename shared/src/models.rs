//! Record models for the four tracked kinds
//!
//! Each kind has two shapes:
//! - an *entry* (`WorkoutEntry`, `MealEntry`, ...) holding the user-supplied
//!   fields plus the derived fields computed from them. Entries can only be
//!   built through `new` or `apply`, both of which recompute derived fields,
//!   and they are the only thing the storage layer accepts for writes.
//! - a *record* (`WorkoutRecord`, ...) which is the stored, read-only view
//!   returned to callers.

use crate::errors::{MetricsError, MetricsResult};
use crate::exercise::{calculate_calories_burned, ExerciseType};
use crate::health_metrics::{calculate_bmi, WEIGHT_RANGE_KG};
use crate::nutrition::{compute_meal_totals, FoodItem, MealTotals, MealType};
use crate::sleep::{sleep_duration_minutes, SleepQuality};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest sleep accepted, in minutes
pub const MAX_SLEEP_MINUTES: i64 = 24 * 60;
/// Body fat bounds in percent (inclusive)
pub const BODY_FAT_RANGE: (f64, f64) = (1.0, 50.0);
/// Muscle mass bounds in kilograms (inclusive)
pub const MUSCLE_MASS_RANGE_KG: (f64, f64) = (10.0, 100.0);

fn optional_text(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Notes after a partial update: absent keeps `current`, blank clears
fn merge_notes(change: Option<String>, current: Option<String>) -> Option<String> {
    match change {
        Some(text) => optional_text(Some(text)),
        None => current,
    }
}

// ============================================================================
// Workouts
// ============================================================================

/// Workout ready to be stored, with calories burned computed
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutEntry {
    exercise_type: ExerciseType,
    intensity: String,
    duration_minutes: i32,
    date: DateTime<Utc>,
    notes: Option<String>,
    calories_burned: i32,
}

/// Partial update to a workout
#[derive(Debug, Clone, Default)]
pub struct WorkoutChanges {
    pub exercise_type: Option<ExerciseType>,
    pub intensity: Option<String>,
    pub duration_minutes: Option<i32>,
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl WorkoutChanges {
    fn touches_calories(&self) -> bool {
        self.exercise_type.is_some() || self.intensity.is_some() || self.duration_minutes.is_some()
    }
}

impl WorkoutEntry {
    /// Build a workout, computing calories from the user's weight
    pub fn new(
        exercise_type: ExerciseType,
        intensity: impl Into<String>,
        duration_minutes: i32,
        date: DateTime<Utc>,
        notes: Option<String>,
        weight_kg: f64,
    ) -> MetricsResult<Self> {
        let intensity = intensity.into().trim().to_string();
        let calories_burned =
            calculate_calories_burned(exercise_type, &intensity, duration_minutes, weight_kg)?;
        Ok(Self {
            exercise_type,
            intensity,
            duration_minutes,
            date,
            notes: optional_text(notes),
            calories_burned,
        })
    }

    /// Rebuild the entry a stored record was written from
    pub fn from_record(record: &WorkoutRecord) -> Self {
        Self {
            exercise_type: record.exercise_type,
            intensity: record.intensity.clone(),
            duration_minutes: record.duration_minutes,
            date: record.date,
            notes: record.notes.clone(),
            calories_burned: record.calories_burned,
        }
    }

    /// Apply a partial update
    ///
    /// Calories are recomputed with `weight_kg` whenever the exercise type,
    /// intensity or duration changes.
    pub fn apply(self, changes: WorkoutChanges, weight_kg: f64) -> MetricsResult<Self> {
        let recompute = changes.touches_calories();
        let mut next = Self {
            exercise_type: changes.exercise_type.unwrap_or(self.exercise_type),
            intensity: changes
                .intensity
                .map(|i| i.trim().to_string())
                .unwrap_or(self.intensity),
            duration_minutes: changes.duration_minutes.unwrap_or(self.duration_minutes),
            date: changes.date.unwrap_or(self.date),
            notes: merge_notes(changes.notes, self.notes),
            calories_burned: self.calories_burned,
        };
        if recompute {
            next.calories_burned = calculate_calories_burned(
                next.exercise_type,
                &next.intensity,
                next.duration_minutes,
                weight_kg,
            )?;
        }
        Ok(next)
    }

    pub fn exercise_type(&self) -> ExerciseType {
        self.exercise_type
    }

    pub fn intensity(&self) -> &str {
        &self.intensity
    }

    pub fn duration_minutes(&self) -> i32 {
        self.duration_minutes
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn calories_burned(&self) -> i32 {
        self.calories_burned
    }
}

/// Stored workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_type: ExerciseType,
    pub intensity: String,
    pub duration_minutes: i32,
    pub date: DateTime<Utc>,
    pub calories_burned: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Meals
// ============================================================================

/// Meal ready to be stored, with nutrition totals computed
#[derive(Debug, Clone, PartialEq)]
pub struct MealEntry {
    name: String,
    meal_type: MealType,
    date: DateTime<Utc>,
    foods: Vec<FoodItem>,
    notes: Option<String>,
    totals: MealTotals,
}

/// Partial update to a meal
#[derive(Debug, Clone, Default)]
pub struct MealChanges {
    pub name: Option<String>,
    pub meal_type: Option<MealType>,
    pub date: Option<DateTime<Utc>>,
    pub foods: Option<Vec<FoodItem>>,
    pub notes: Option<String>,
}

impl MealEntry {
    /// Build a meal; requires at least one valid food
    pub fn new(
        name: impl Into<String>,
        meal_type: MealType,
        date: DateTime<Utc>,
        foods: Vec<FoodItem>,
        notes: Option<String>,
    ) -> MetricsResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(MetricsError::invalid("meal name cannot be empty"));
        }
        if foods.is_empty() {
            return Err(MetricsError::invalid("a meal needs at least one food"));
        }
        for food in &foods {
            food.validate()?;
        }
        let totals = compute_meal_totals(&foods);
        Ok(Self {
            name,
            meal_type,
            date,
            foods,
            notes: optional_text(notes),
            totals,
        })
    }

    pub fn from_record(record: &MealRecord) -> Self {
        Self {
            name: record.name.clone(),
            meal_type: record.meal_type,
            date: record.date,
            foods: record.foods.clone(),
            notes: record.notes.clone(),
            totals: record.totals,
        }
    }

    /// Apply a partial update; totals are recomputed from the resulting foods
    pub fn apply(self, changes: MealChanges) -> MetricsResult<Self> {
        Self::new(
            changes.name.unwrap_or(self.name),
            changes.meal_type.unwrap_or(self.meal_type),
            changes.date.unwrap_or(self.date),
            changes.foods.unwrap_or(self.foods),
            merge_notes(changes.notes, self.notes),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meal_type(&self) -> MealType {
        self.meal_type
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn foods(&self) -> &[FoodItem] {
        &self.foods
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn totals(&self) -> &MealTotals {
        &self.totals
    }
}

/// Stored meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub meal_type: MealType,
    pub date: DateTime<Utc>,
    pub foods: Vec<FoodItem>,
    #[serde(flatten)]
    pub totals: MealTotals,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Sleep
// ============================================================================

/// Sleep log ready to be stored, with duration computed
#[derive(Debug, Clone, PartialEq)]
pub struct SleepEntry {
    sleep_start: DateTime<Utc>,
    sleep_end: DateTime<Utc>,
    date: DateTime<Utc>,
    quality: SleepQuality,
    notes: Option<String>,
    duration_minutes: i32,
}

/// Partial update to a sleep log
#[derive(Debug, Clone, Default)]
pub struct SleepChanges {
    pub sleep_start: Option<DateTime<Utc>>,
    pub sleep_end: Option<DateTime<Utc>>,
    pub date: Option<DateTime<Utc>>,
    pub quality: Option<SleepQuality>,
    pub notes: Option<String>,
}

impl SleepEntry {
    /// Build a sleep log; `date` defaults to the wake time
    pub fn new(
        sleep_start: DateTime<Utc>,
        sleep_end: DateTime<Utc>,
        date: Option<DateTime<Utc>>,
        quality: SleepQuality,
        notes: Option<String>,
    ) -> MetricsResult<Self> {
        let minutes = sleep_duration_minutes(sleep_start, sleep_end);
        if minutes == 0 {
            return Err(MetricsError::invalid("sleep end must differ from sleep start"));
        }
        if minutes > MAX_SLEEP_MINUTES {
            return Err(MetricsError::invalid("sleep duration cannot exceed 24 hours"));
        }
        Ok(Self {
            sleep_start,
            sleep_end,
            date: date.unwrap_or(sleep_end),
            quality,
            notes: optional_text(notes),
            duration_minutes: minutes as i32,
        })
    }

    pub fn from_record(record: &SleepRecord) -> Self {
        Self {
            sleep_start: record.sleep_start,
            sleep_end: record.sleep_end,
            date: record.date,
            quality: record.quality,
            notes: record.notes.clone(),
            duration_minutes: record.duration_minutes,
        }
    }

    /// Apply a partial update; duration is recomputed
    pub fn apply(self, changes: SleepChanges) -> MetricsResult<Self> {
        Self::new(
            changes.sleep_start.unwrap_or(self.sleep_start),
            changes.sleep_end.unwrap_or(self.sleep_end),
            Some(changes.date.unwrap_or(self.date)),
            changes.quality.unwrap_or(self.quality),
            merge_notes(changes.notes, self.notes),
        )
    }

    pub fn sleep_start(&self) -> DateTime<Utc> {
        self.sleep_start
    }

    pub fn sleep_end(&self) -> DateTime<Utc> {
        self.sleep_end
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn quality(&self) -> SleepQuality {
        self.quality
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn duration_minutes(&self) -> i32 {
        self.duration_minutes
    }
}

/// Stored sleep log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub sleep_start: DateTime<Utc>,
    pub sleep_end: DateTime<Utc>,
    pub date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub quality: SleepQuality,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SleepRecord {
    pub fn quality_score(&self) -> i32 {
        self.quality.score()
    }
}

// ============================================================================
// Body Progress
// ============================================================================

/// Optional body measurements in centimeters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hips: Option<f64>,
    pub arms: Option<f64>,
    pub thighs: Option<f64>,
}

impl Measurements {
    pub fn validate(&self) -> MetricsResult<()> {
        let fields = [
            ("chest", self.chest),
            ("waist", self.waist),
            ("hips", self.hips),
            ("arms", self.arms),
            ("thighs", self.thighs),
        ];
        for (field, value) in fields {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(MetricsError::invalid(format!("{} measurement cannot be negative", field)));
                }
            }
        }
        Ok(())
    }
}

/// Progress entry ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEntry {
    date: DateTime<Utc>,
    weight_kg: f64,
    body_fat_percent: Option<f64>,
    muscle_mass_kg: Option<f64>,
    measurements: Measurements,
    notes: Option<String>,
}

/// Partial update to a progress entry
#[derive(Debug, Clone, Default)]
pub struct ProgressChanges {
    pub date: Option<DateTime<Utc>>,
    pub weight_kg: Option<f64>,
    pub body_fat_percent: Option<f64>,
    pub muscle_mass_kg: Option<f64>,
    pub measurements: Option<Measurements>,
    pub notes: Option<String>,
}

fn check_optional_range(field: &str, value: Option<f64>, (min, max): (f64, f64)) -> MetricsResult<()> {
    match value {
        Some(v) if !v.is_finite() || v < min || v > max => Err(MetricsError::invalid(format!(
            "{} must be between {} and {}",
            field, min, max
        ))),
        _ => Ok(()),
    }
}

impl ProgressEntry {
    pub fn new(
        date: DateTime<Utc>,
        weight_kg: f64,
        body_fat_percent: Option<f64>,
        muscle_mass_kg: Option<f64>,
        measurements: Measurements,
        notes: Option<String>,
    ) -> MetricsResult<Self> {
        check_optional_range("weight_kg", Some(weight_kg), WEIGHT_RANGE_KG)?;
        check_optional_range("body_fat_percent", body_fat_percent, BODY_FAT_RANGE)?;
        check_optional_range("muscle_mass_kg", muscle_mass_kg, MUSCLE_MASS_RANGE_KG)?;
        measurements.validate()?;
        Ok(Self {
            date,
            weight_kg,
            body_fat_percent,
            muscle_mass_kg,
            measurements,
            notes: optional_text(notes),
        })
    }

    pub fn from_record(record: &ProgressRecord) -> Self {
        Self {
            date: record.date,
            weight_kg: record.weight_kg,
            body_fat_percent: record.body_fat_percent,
            muscle_mass_kg: record.muscle_mass_kg,
            measurements: record.measurements,
            notes: record.notes.clone(),
        }
    }

    pub fn apply(self, changes: ProgressChanges) -> MetricsResult<Self> {
        Self::new(
            changes.date.unwrap_or(self.date),
            changes.weight_kg.unwrap_or(self.weight_kg),
            changes.body_fat_percent.or(self.body_fat_percent),
            changes.muscle_mass_kg.or(self.muscle_mass_kg),
            changes.measurements.unwrap_or(self.measurements),
            merge_notes(changes.notes, self.notes),
        )
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn body_fat_percent(&self) -> Option<f64> {
        self.body_fat_percent
    }

    pub fn muscle_mass_kg(&self) -> Option<f64> {
        self.muscle_mass_kg
    }

    pub fn measurements(&self) -> &Measurements {
        &self.measurements
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Stored progress entry
///
/// BMI is not stored; use [`ProgressRecord::bmi`] with the owner's height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub weight_kg: f64,
    pub body_fat_percent: Option<f64>,
    pub muscle_mass_kg: Option<f64>,
    pub measurements: Measurements,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProgressRecord {
    pub fn bmi(&self, height_cm: f64) -> MetricsResult<f64> {
        calculate_bmi(self.weight_kg, height_cm)
    }
}
