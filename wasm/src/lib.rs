//! FitTrack WASM Module
//!
//! Browser bindings for the profile and workout formulas. Everything
//! delegates to `fittrack-shared` so previews in the client round exactly
//! like the server does.

use chrono::{TimeZone, Utc};
use fittrack_shared::{ActivityLevel, ExerciseType, Gender};
use wasm_bindgen::prelude::*;

/// BMI from weight (kg) and height (cm), one decimal
#[wasm_bindgen]
pub fn bmi(weight_kg: f64, height_cm: f64) -> Result<f64, JsError> {
    Ok(fittrack_shared::calculate_bmi(weight_kg, height_cm)?)
}

/// Category label for a BMI value, e.g. "Normal weight"
#[wasm_bindgen]
pub fn bmi_category(bmi: f64) -> String {
    fittrack_shared::classify_bmi(bmi).label().to_string()
}

/// Basal metabolic rate; `gender` is "male", "female" or "other"
#[wasm_bindgen]
pub fn bmr(gender: &str, weight_kg: f64, height_cm: f64, age: i32) -> Result<i32, JsError> {
    let gender: Gender = gender.parse()?;
    Ok(fittrack_shared::calculate_bmr(gender, weight_kg, height_cm, age))
}

#[wasm_bindgen]
pub fn daily_calorie_need(bmr: i32, activity_level: &str) -> Result<i32, JsError> {
    let level: ActivityLevel = activity_level.parse()?;
    Ok(fittrack_shared::daily_calorie_need(bmr, level))
}

/// Calories burned for a workout, using the MET table
#[wasm_bindgen]
pub fn calories_burned(
    exercise_type: &str,
    intensity: &str,
    duration_minutes: i32,
    weight_kg: f64,
) -> Result<i32, JsError> {
    let exercise_type: ExerciseType = exercise_type.parse()?;
    Ok(fittrack_shared::calculate_calories_burned(
        exercise_type,
        intensity,
        duration_minutes,
        weight_kg,
    )?)
}

/// Sleep duration in minutes between two epoch-millisecond timestamps
#[wasm_bindgen]
pub fn sleep_duration_minutes(start_ms: f64, end_ms: f64) -> Result<f64, JsError> {
    let start = Utc
        .timestamp_millis_opt(start_ms as i64)
        .single()
        .ok_or_else(|| JsError::new("invalid sleep start"))?;
    let end = Utc
        .timestamp_millis_opt(end_ms as i64)
        .single()
        .ok_or_else(|| JsError::new("invalid sleep end"))?;
    Ok(fittrack_shared::sleep_duration_minutes(start, end) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi() {
        assert_eq!(bmi(70.0, 175.0).unwrap(), 22.9);
        assert_eq!(bmi_category(22.9), "Normal weight");
        assert_eq!(bmi_category(30.0), "Obese");
    }

    #[test]
    fn test_bmr_and_need() {
        let value = bmr("male", 80.0, 180.0, 30).unwrap();
        assert_eq!(value, 1854);
        assert_eq!(daily_calorie_need(value, "sedentary").unwrap(), 2225);
    }

    #[test]
    fn test_calories_burned() {
        assert_eq!(calories_burned("running", "6 mph", 30, 80.0).unwrap(), 392);
    }

    #[test]
    fn test_sleep_duration_crosses_midnight() {
        let start = 1_714_777_200_000.0; // 2024-05-03 23:00 UTC
        let end = start + 7.0 * 3_600_000.0;
        assert_eq!(sleep_duration_minutes(start, end).unwrap(), 420.0);
    }
}
