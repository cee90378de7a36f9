//! Input validation helpers
//!
//! Request DTOs use the `validator` derive for field ranges; the helpers here
//! cover what the derive cannot express: timezone offsets, list paging and
//! date bounds, plus display labels for field-level error messages.

use crate::errors::{MetricsError, MetricsResult};
use chrono::{DateTime, FixedOffset, Utc};

/// Westernmost UTC offset accepted, in minutes (UTC-12:00)
pub const MIN_TZ_OFFSET_MINUTES: i32 = -12 * 60;
/// Easternmost UTC offset accepted, in minutes (UTC+14:00)
pub const MAX_TZ_OFFSET_MINUTES: i32 = 14 * 60;

pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Reference offset for day boundaries, from minutes east of UTC
pub fn fixed_offset(minutes: i32) -> MetricsResult<FixedOffset> {
    if !(MIN_TZ_OFFSET_MINUTES..=MAX_TZ_OFFSET_MINUTES).contains(&minutes) {
        return Err(MetricsError::invalid(format!(
            "tz_offset_minutes must be between {} and {}",
            MIN_TZ_OFFSET_MINUTES, MAX_TZ_OFFSET_MINUTES
        )));
    }
    FixedOffset::east_opt(minutes * 60)
        .ok_or_else(|| MetricsError::invalid("tz_offset_minutes is out of range"))
}

/// Paging window for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

/// Build a page; limit defaults to 50 and is capped at 100
pub fn page(limit: Option<i64>, offset: Option<i64>) -> MetricsResult<Page> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    if limit < 1 {
        return Err(MetricsError::invalid("limit must be at least 1"));
    }
    let offset = offset.unwrap_or(0);
    if offset < 0 {
        return Err(MetricsError::invalid("offset cannot be negative"));
    }
    Ok(Page {
        limit: limit.min(MAX_PAGE_LIMIT),
        offset,
    })
}

/// Reject a range whose start is after its end
pub fn check_date_bounds(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> MetricsResult<()> {
    match (start, end) {
        (Some(s), Some(e)) if s > e => Err(MetricsError::invalid("start must not be after end")),
        _ => Ok(()),
    }
}

/// Display label for a request field
pub fn field_label(field: &str) -> &str {
    match field {
        "email" => "Email",
        "password" => "Password",
        "name" => "Name",
        "weight_kg" => "Weight",
        "height_cm" => "Height",
        "age" => "Age",
        "target_weight_kg" => "Target Weight",
        "intensity" => "Intensity",
        "duration_minutes" => "Duration",
        "foods" => "Foods",
        "body_fat_percent" => "Body Fat",
        "muscle_mass_kg" => "Muscle Mass",
        "notes" => "Notes",
        _ => field,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn test_fixed_offset_bounds() {
        assert_eq!(fixed_offset(0).unwrap().local_minus_utc(), 0);
        assert_eq!(fixed_offset(-300).unwrap().local_minus_utc(), -18_000);
        assert!(fixed_offset(840).is_ok());
        assert!(fixed_offset(-720).is_ok());
        assert!(fixed_offset(841).is_err());
        assert!(fixed_offset(-721).is_err());
    }

    #[test]
    fn test_page_defaults_and_cap() {
        assert_eq!(page(None, None).unwrap(), Page::default());
        assert_eq!(page(Some(500), Some(10)).unwrap(), Page { limit: 100, offset: 10 });
        assert!(page(Some(0), None).is_err());
        assert!(page(None, Some(-1)).is_err());
    }

    #[test]
    fn test_date_bounds() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert!(check_date_bounds(Some(early), Some(late)).is_ok());
        assert!(check_date_bounds(Some(early), Some(early)).is_ok());
        assert!(check_date_bounds(None, Some(early)).is_ok());
        assert!(check_date_bounds(Some(late), Some(early)).is_err());
    }

    #[test]
    fn test_field_labels() {
        assert_eq!(field_label("weight_kg"), "Weight");
        assert_eq!(field_label("body_fat_percent"), "Body Fat");
        assert_eq!(field_label("unknown_field"), "unknown_field");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_page_limit_within_bounds(limit in 1i64..10_000, offset in 0i64..10_000) {
            let p = page(Some(limit), Some(offset)).unwrap();
            prop_assert!(p.limit >= 1 && p.limit <= MAX_PAGE_LIMIT);
            prop_assert_eq!(p.offset, offset);
        }
    }
}
