//! Exercise types and MET-based calorie burn
//!
//! The MET table is fixed data: every exercise type maps to the intensities
//! it supports and the metabolic equivalent for each.

use crate::errors::{MetricsError, MetricsResult};
use serde::{Deserialize, Serialize};

/// Longest workout accepted, in minutes
pub const MAX_WORKOUT_MINUTES: i32 = 480;

/// Exercise type a workout is logged under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    Running,
    Cycling,
    Swimming,
    Yoga,
    Weightlifting,
    Walking,
    Dancing,
    Basketball,
    Soccer,
    Tennis,
    Hiking,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 11] = [
        ExerciseType::Running,
        ExerciseType::Cycling,
        ExerciseType::Swimming,
        ExerciseType::Yoga,
        ExerciseType::Weightlifting,
        ExerciseType::Walking,
        ExerciseType::Dancing,
        ExerciseType::Basketball,
        ExerciseType::Soccer,
        ExerciseType::Tennis,
        ExerciseType::Hiking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseType::Running => "running",
            ExerciseType::Cycling => "cycling",
            ExerciseType::Swimming => "swimming",
            ExerciseType::Yoga => "yoga",
            ExerciseType::Weightlifting => "weightlifting",
            ExerciseType::Walking => "walking",
            ExerciseType::Dancing => "dancing",
            ExerciseType::Basketball => "basketball",
            ExerciseType::Soccer => "soccer",
            ExerciseType::Tennis => "tennis",
            ExerciseType::Hiking => "hiking",
        }
    }

    /// Intensities and their MET values, in table order
    pub fn intensities(&self) -> &'static [(&'static str, f64)] {
        match self {
            ExerciseType::Running => &[
                ("5 mph", 8.3),
                ("6 mph", 9.8),
                ("7 mph", 11.0),
                ("8 mph", 11.8),
                ("9 mph", 12.8),
                ("10 mph", 14.5),
            ],
            ExerciseType::Cycling => &[
                ("leisurely", 3.5),
                ("moderate", 6.8),
                ("vigorous", 10.0),
                ("racing", 15.8),
            ],
            ExerciseType::Swimming => &[("leisurely", 5.8), ("moderate", 7.0), ("vigorous", 9.8)],
            ExerciseType::Yoga => &[("hatha", 2.5), ("power", 4.0), ("vinyasa", 3.0)],
            ExerciseType::Weightlifting => &[("light", 3.0), ("moderate", 5.0), ("vigorous", 6.0)],
            ExerciseType::Walking => &[
                ("slow", 2.0),
                ("moderate", 3.5),
                ("brisk", 4.3),
                ("very_brisk", 5.0),
            ],
            ExerciseType::Dancing => &[("slow", 3.0), ("moderate", 4.8), ("fast", 5.5)],
            ExerciseType::Basketball => &[("casual", 6.0), ("competitive", 8.0)],
            ExerciseType::Soccer => &[("casual", 7.0), ("competitive", 10.0)],
            ExerciseType::Tennis => &[("singles", 8.0), ("doubles", 5.0)],
            ExerciseType::Hiking => &[("easy", 4.0), ("moderate", 6.0), ("strenuous", 8.0)],
        }
    }

    /// MET value for an intensity of this exercise type
    pub fn met(&self, intensity: &str) -> MetricsResult<f64> {
        self.intensities()
            .iter()
            .find(|(key, _)| *key == intensity)
            .map(|(_, met)| *met)
            .ok_or_else(|| MetricsError::InvalidExerciseCombo {
                exercise_type: self.as_str().to_string(),
                intensity: intensity.to_string(),
            })
    }
}

impl_str_conversions! {
    ExerciseType => "exercise type",
}

/// Calories burned for a workout
///
/// `MET × weight(kg) × hours`, rounded to the nearest integer.
pub fn calculate_calories_burned(
    exercise_type: ExerciseType,
    intensity: &str,
    duration_minutes: i32,
    weight_kg: f64,
) -> MetricsResult<i32> {
    let met = exercise_type.met(intensity)?;
    if duration_minutes < 1 || duration_minutes > MAX_WORKOUT_MINUTES {
        return Err(MetricsError::invalid(format!(
            "duration must be between 1 and {} minutes",
            MAX_WORKOUT_MINUTES
        )));
    }
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(MetricsError::invalid("weight must be greater than 0"));
    }
    let calories = met * weight_kg * (duration_minutes as f64 / 60.0);
    Ok(calories.round() as i32)
}
