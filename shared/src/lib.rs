//! FitTrack Shared Library
//!
//! This crate contains the metrics core used by the backend and the WASM
//! bindings: profile formulas, the MET table, record models with their
//! derived fields, meal totals, the windowed aggregator and the dashboard
//! composer, plus the API request/response types.

/// Implements `Display` and `FromStr` for string-backed enums that expose
/// `ALL` and `as_str()`.
macro_rules! impl_str_conversions {
    ($($ty:ident => $label:literal),* $(,)?) => {
        $(
            impl ::std::fmt::Display for $ty {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl ::std::str::FromStr for $ty {
                type Err = $crate::errors::MetricsError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    let needle = s.trim().to_lowercase();
                    $ty::ALL
                        .iter()
                        .copied()
                        .find(|v| v.as_str() == needle)
                        .ok_or_else(|| {
                            $crate::errors::MetricsError::invalid(format!("Unknown {}: {}", $label, s))
                        })
                }
            }
        )*
    };
}

pub mod aggregation;
pub mod dashboard;
pub mod errors;
pub mod exercise;
pub mod health_metrics;
pub mod models;
pub mod nutrition;
pub mod sleep;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use aggregation::{
    aggregate, Aggregatable, CategorySummary, FieldSummary, Period, TimeWindow, WindowSummary, MAX_PERIOD_DAYS,
};
pub use dashboard::{
    compose_analytics, compose_dashboard, compose_week, AnalyticsInput, AnalyticsReport, DashboardInput,
    DashboardSnapshot, WeekSection, DEFAULT_LOOKBACK_DAYS,
};
pub use errors::*;
pub use exercise::{calculate_calories_burned, ExerciseType};
pub use health_metrics::*;
pub use models::{
    MealChanges, MealEntry, MealRecord, Measurements, ProgressChanges, ProgressEntry, ProgressRecord,
    SleepChanges, SleepEntry, SleepRecord, WorkoutChanges, WorkoutEntry, WorkoutRecord,
};
pub use nutrition::{compute_meal_totals, FoodItem, FoodUnit, MealTotals, MealType};
pub use sleep::{sleep_duration_minutes, sleep_quality_score, SleepQuality};
