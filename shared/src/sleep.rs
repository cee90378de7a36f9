//! Sleep quality scores and duration

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Score reported for a quality label that is not recognised
pub const DEFAULT_QUALITY_SCORE: i32 = 75;

/// Self-reported sleep quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SleepQuality {
    pub const ALL: [SleepQuality; 4] = [
        SleepQuality::Poor,
        SleepQuality::Fair,
        SleepQuality::Good,
        SleepQuality::Excellent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SleepQuality::Poor => "poor",
            SleepQuality::Fair => "fair",
            SleepQuality::Good => "good",
            SleepQuality::Excellent => "excellent",
        }
    }

    /// Numeric score used when averaging quality
    pub fn score(&self) -> i32 {
        match self {
            SleepQuality::Poor => 25,
            SleepQuality::Fair => 50,
            SleepQuality::Good => 75,
            SleepQuality::Excellent => 100,
        }
    }
}

impl_str_conversions! {
    SleepQuality => "sleep quality",
}

/// Score for a stored quality label; unknown labels score as "good"
pub fn sleep_quality_score(label: &str) -> i32 {
    label
        .parse::<SleepQuality>()
        .map(|q| q.score())
        .unwrap_or(DEFAULT_QUALITY_SCORE)
}

/// Minutes between falling asleep and waking, rounded to the nearest minute
///
/// When `end` is before `start` the wake time belongs to a later day, so it
/// is pushed forward one day at a time until it no longer precedes `start`.
/// The usual crosses-midnight entry moves by exactly 24 hours.
pub fn sleep_duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let mut end = end;
    if end < start {
        let days_behind = (start - end).num_days();
        end += Duration::days(days_behind);
        if end < start {
            end += Duration::days(1);
        }
    }
    let seconds = (end - start).num_seconds();
    (seconds as f64 / 60.0).round() as i64
}
