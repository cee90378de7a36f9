//! Database repositories
//!
//! Unit structs with async associated functions over a `PgPool`. Every query
//! is scoped by `user_id`; writes accept only the shared `*Entry` types so
//! derived fields are always computed before they reach storage.

pub mod meal;
pub mod progress;
pub mod sleep;
pub mod user;
pub mod workout;

pub use meal::MealRepository;
pub use progress::ProgressRepository;
pub use sleep::SleepRepository;
pub use user::{UserRepository, UserRow};
pub use workout::WorkoutRepository;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use fittrack_shared::validation::Page;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Date range, category filter and page for list queries
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Stored text of the kind's category enum
    pub category: Option<String>,
    pub page: Page,
}

/// NUMERIC columns hold two decimals, midpoints rounded away from zero
pub(crate) fn to_decimal(value: f64) -> Result<Decimal> {
    Decimal::try_from(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .map_err(|e| anyhow!("cannot store {} as NUMERIC: {}", value, e))
}

pub(crate) fn to_decimal_opt(value: Option<f64>) -> Result<Option<Decimal>> {
    value.map(to_decimal).transpose()
}

pub(crate) fn decimal_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}
