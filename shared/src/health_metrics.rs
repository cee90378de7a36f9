//! Health metrics calculations module
//!
//! Provides the profile-level formulas: BMI and its category, basal metabolic
//! rate, daily calorie need and goal progress. Every function here is pure
//! and applies its rounding rule before returning, so the server, the WASM
//! bindings and the dashboard all report the same numbers.

use crate::errors::{MetricsError, MetricsResult};
use serde::{Deserialize, Serialize};

/// Profile weight bounds in kilograms (inclusive)
pub const WEIGHT_RANGE_KG: (f64, f64) = (20.0, 300.0);
/// Profile height bounds in centimeters (inclusive)
pub const HEIGHT_RANGE_CM: (f64, f64) = (100.0, 250.0);
/// Profile age bounds in years (inclusive)
pub const AGE_RANGE_YEARS: (i32, i32) = (13, 120);

/// Round half away from zero to the given number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ============================================================================
// User Profile Types
// ============================================================================

/// Gender as recorded on the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

/// Activity level used to scale BMR into a daily calorie need
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    #[default]
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise or a physical job
    ExtremelyActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtremelyActive,
    ];

    /// Multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtremelyActive => 1.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtremelyActive => "extremely_active",
        }
    }
}

/// Weight goal the user is working toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    LoseWeight,
    #[default]
    MaintainWeight,
    GainWeight,
}

impl FitnessGoal {
    pub const ALL: [FitnessGoal; 3] = [
        FitnessGoal::LoseWeight,
        FitnessGoal::MaintainWeight,
        FitnessGoal::GainWeight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessGoal::LoseWeight => "lose_weight",
            FitnessGoal::MaintainWeight => "maintain_weight",
            FitnessGoal::GainWeight => "gain_weight",
        }
    }
}

impl_str_conversions! {
    Gender => "gender",
    ActivityLevel => "activity level",
    FitnessGoal => "goal",
}

/// Profile data the formulas read
///
/// Owned by the profile service; the formulas only ever borrow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: i32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: FitnessGoal,
    pub target_weight_kg: f64,
}

impl UserProfile {
    /// Check the profile ranges
    pub fn validate(&self) -> MetricsResult<()> {
        check_range("weight_kg", self.weight_kg, WEIGHT_RANGE_KG)?;
        check_range("height_cm", self.height_cm, HEIGHT_RANGE_CM)?;
        check_range("target_weight_kg", self.target_weight_kg, WEIGHT_RANGE_KG)?;
        if self.age < AGE_RANGE_YEARS.0 || self.age > AGE_RANGE_YEARS.1 {
            return Err(MetricsError::invalid(format!(
                "age must be between {} and {}",
                AGE_RANGE_YEARS.0, AGE_RANGE_YEARS.1
            )));
        }
        Ok(())
    }

    /// BMI at the profile weight
    pub fn bmi(&self) -> MetricsResult<f64> {
        calculate_bmi(self.weight_kg, self.height_cm)
    }

    pub fn bmr(&self) -> i32 {
        calculate_bmr(self.gender, self.weight_kg, self.height_cm, self.age)
    }

    pub fn daily_calorie_need(&self) -> i32 {
        daily_calorie_need(self.bmr(), self.activity_level)
    }
}

fn check_range(field: &str, value: f64, (min, max): (f64, f64)) -> MetricsResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(MetricsError::invalid(format!(
            "{} must be between {} and {}",
            field, min, max
        )));
    }
    Ok(())
}

// ============================================================================
// BMI Calculations
// ============================================================================

/// BMI category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)², rounded to one decimal.
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> MetricsResult<f64> {
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(MetricsError::invalid("height must be greater than 0"));
    }
    if !weight_kg.is_finite() || weight_kg < 0.0 {
        return Err(MetricsError::invalid("weight must be a non-negative number"));
    }
    let height_m = height_cm / 100.0;
    Ok(round_to(weight_kg / (height_m * height_m), 1))
}

/// Classify BMI into category
///
/// Boundaries belong to the upper category.
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

// ============================================================================
// BMR and Calorie Need
// ============================================================================

/// Basal metabolic rate, revised Harris-Benedict
///
/// Men: 88.362 + 13.397 × weight(kg) + 4.799 × height(cm) - 5.677 × age(y)
/// Women: 447.593 + 9.247 × weight(kg) + 3.098 × height(cm) - 4.330 × age(y)
///
/// `Gender::Other` uses the female equation.
pub fn calculate_bmr(gender: Gender, weight_kg: f64, height_cm: f64, age: i32) -> i32 {
    let age = age as f64;
    let bmr = match gender {
        Gender::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age,
        Gender::Female | Gender::Other => {
            447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age
        }
    };
    bmr.round() as i32
}

/// Daily calorie need: BMR × activity multiplier, rounded
pub fn daily_calorie_need(bmr: i32, activity_level: ActivityLevel) -> i32 {
    (bmr as f64 * activity_level.multiplier()).round() as i32
}

// ============================================================================
// Goal Progress
// ============================================================================

/// Goal progress percentage
///
/// `|(target - current) / (starting - target)| × 100`, rounded to one
/// decimal. Fails with `DivisionByZero` when the starting weight equals the
/// target.
pub fn goal_progress(starting_kg: f64, current_kg: f64, target_kg: f64) -> MetricsResult<f64> {
    let span = starting_kg - target_kg;
    if span == 0.0 {
        return Err(MetricsError::DivisionByZero("starting weight equals target weight"));
    }
    Ok(round_to(((target_kg - current_kg) / span).abs() * 100.0, 1))
}
