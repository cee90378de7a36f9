//! Windowed aggregation over dated records
//!
//! [`aggregate`] reduces any record kind implementing [`Aggregatable`] to a
//! [`WindowSummary`]: the number of records owned by a user that fall inside a
//! [`TimeWindow`], the sum and average of every numeric field the kind
//! declares, and a per-category breakdown ordered by count.

use crate::errors::{MetricsError, MetricsResult};
use crate::models::{MealRecord, ProgressRecord, SleepRecord, WorkoutRecord};
use chrono::{DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Periods and windows
// ============================================================================

/// Longest `Nd` period accepted (about a century)
pub const MAX_PERIOD_DAYS: u32 = 36_500;

/// Reporting period for stats and analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Week,
    Month,
    Year,
    Days(u32),
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Week => f.write_str("week"),
            Period::Month => f.write_str("month"),
            Period::Year => f.write_str("year"),
            Period::Days(n) => write!(f, "{}d", n),
        }
    }
}

impl FromStr for Period {
    type Err = MetricsError;

    /// Accepts `week`, `month`, `year`, `30d`, `30days` and `30`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        match token.as_str() {
            "week" => return Ok(Period::Week),
            "month" => return Ok(Period::Month),
            "year" => return Ok(Period::Year),
            _ => {}
        }
        let digits = token
            .strip_suffix("days")
            .or_else(|| token.strip_suffix('d'))
            .unwrap_or(&token);
        match digits.parse::<u32>() {
            Ok(n) if n > MAX_PERIOD_DAYS => Err(MetricsError::invalid(format!(
                "period cannot exceed {} days",
                MAX_PERIOD_DAYS
            ))),
            Ok(n) if n > 0 => Ok(Period::Days(n)),
            _ => Err(MetricsError::invalid(format!("Unknown period: {}", s))),
        }
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Inclusive time range `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Calendar date of `now` as seen from `offset`
pub fn local_date(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

fn out_of_range() -> MetricsError {
    MetricsError::invalid("date is outside the supported range")
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> MetricsResult<DateTime<Utc>> {
    date.and_time(NaiveTime::MIN)
        .checked_sub_signed(Duration::seconds(offset.local_minus_utc() as i64))
        .map(|utc| Utc.from_utc_datetime(&utc))
        .ok_or_else(out_of_range)
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> MetricsResult<Self> {
        if end < start {
            return Err(MetricsError::invalid("window end cannot be before its start"));
        }
        Ok(Self { start, end })
    }

    /// Window ending at `now` and reaching back over `period`
    pub fn for_period(period: Period, now: DateTime<Utc>) -> MetricsResult<Self> {
        let start = match period {
            Period::Week => now.checked_sub_signed(Duration::days(7)),
            Period::Month => now.checked_sub_months(Months::new(1)),
            Period::Year => now.checked_sub_months(Months::new(12)),
            Period::Days(n) => now.checked_sub_signed(Duration::days(n as i64)),
        };
        Ok(Self {
            start: start.ok_or_else(out_of_range)?,
            end: now,
        })
    }

    /// The last `days` days up to `now`
    pub fn last_days(now: DateTime<Utc>, days: u32) -> MetricsResult<Self> {
        Self::for_period(Period::Days(days), now)
    }

    /// 00:00:00.000 through 23:59:59.999 of `date` in `offset`
    pub fn day(date: NaiveDate, offset: FixedOffset) -> MetricsResult<Self> {
        Self::spanning(local_midnight(date, offset)?, 1)
    }

    /// Sunday-start week containing `date`
    pub fn week_of(date: NaiveDate, offset: FixedOffset) -> MetricsResult<Self> {
        let sunday = date
            .checked_sub_signed(Duration::days(date.weekday().num_days_from_sunday() as i64))
            .ok_or_else(out_of_range)?;
        Self::spanning(local_midnight(sunday, offset)?, 7)
    }

    /// First day of the current month (in `offset`) through `now`
    pub fn month_to_date(now: DateTime<Utc>, offset: FixedOffset) -> MetricsResult<Self> {
        let first = local_date(now, offset).with_day(1).ok_or_else(out_of_range)?;
        Ok(Self {
            start: local_midnight(first, offset)?,
            end: now,
        })
    }

    /// `days` whole days from `start`, ending one millisecond short
    fn spanning(start: DateTime<Utc>, days: i64) -> MetricsResult<Self> {
        let end = start
            .checked_add_signed(Duration::days(days) - Duration::milliseconds(1))
            .ok_or_else(out_of_range)?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }

    /// Length in whole days, never less than 1
    pub fn whole_days(&self) -> i64 {
        (self.end - self.start).num_days().max(1)
    }
}

// ============================================================================
// Aggregation
// ============================================================================

/// Named numeric field of a record kind
pub struct Metric<R> {
    pub name: &'static str,
    pub extract: fn(&R) -> f64,
}

/// A record kind the aggregator can summarise
pub trait Aggregatable: Sized + 'static {
    /// Numeric fields summed and averaged, in output order
    const METRICS: &'static [Metric<Self>];

    fn user_id(&self) -> Uuid;

    fn recorded_at(&self) -> DateTime<Utc>;

    /// Category used for the breakdown; kinds without one return `None`
    fn category(&self) -> Option<&'static str> {
        None
    }

    /// Value summed per category in the breakdown
    fn breakdown_value(&self) -> f64 {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSummary {
    pub field: &'static str,
    pub sum: f64,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: &'static str,
    pub count: usize,
    pub sum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSummary {
    pub window: TimeWindow,
    pub count: usize,
    pub fields: Vec<FieldSummary>,
    pub breakdown: Vec<CategorySummary>,
}

impl WindowSummary {
    /// Summary for `name`, zeros when the field is not declared
    pub fn field(&self, name: &str) -> FieldSummary {
        self.fields
            .iter()
            .find(|f| f.field == name)
            .cloned()
            .unwrap_or(FieldSummary {
                field: "",
                sum: 0.0,
                average: 0.0,
            })
    }

    pub fn sum(&self, name: &str) -> f64 {
        self.field(name).sum
    }
}

/// Records owned by `user_id` whose timestamp falls inside `window`
pub fn in_window<'a, R: Aggregatable>(
    user_id: Uuid,
    records: &'a [R],
    window: &'a TimeWindow,
) -> impl Iterator<Item = &'a R> + 'a {
    records
        .iter()
        .filter(move |r| r.user_id() == user_id && window.contains(r.recorded_at()))
}

/// Summarise `records` for `user_id` over `window`
pub fn aggregate<R: Aggregatable>(user_id: Uuid, records: &[R], window: &TimeWindow) -> WindowSummary {
    let mut count = 0usize;
    let mut sums = vec![0.0f64; R::METRICS.len()];
    let mut breakdown: Vec<CategorySummary> = Vec::new();

    for record in in_window(user_id, records, window) {
        count += 1;
        for (sum, metric) in sums.iter_mut().zip(R::METRICS) {
            *sum += (metric.extract)(record);
        }
        if let Some(category) = record.category() {
            let value = record.breakdown_value();
            match breakdown.iter_mut().find(|c| c.category == category) {
                Some(entry) => {
                    entry.count += 1;
                    entry.sum += value;
                }
                None => breakdown.push(CategorySummary {
                    category,
                    count: 1,
                    sum: value,
                }),
            }
        }
    }

    // stable: ties stay in first-seen order
    breakdown.sort_by(|a, b| b.count.cmp(&a.count));

    let fields = R::METRICS
        .iter()
        .zip(sums)
        .map(|(metric, sum)| FieldSummary {
            field: metric.name,
            sum,
            average: if count == 0 { 0.0 } else { sum / count as f64 },
        })
        .collect();

    WindowSummary {
        window: *window,
        count,
        fields,
        breakdown,
    }
}

// ============================================================================
// Record kinds
// ============================================================================

impl Aggregatable for WorkoutRecord {
    const METRICS: &'static [Metric<Self>] = &[
        Metric {
            name: "duration_minutes",
            extract: |w| w.duration_minutes as f64,
        },
        Metric {
            name: "calories_burned",
            extract: |w| w.calories_burned as f64,
        },
    ];

    fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn recorded_at(&self) -> DateTime<Utc> {
        self.date
    }

    fn category(&self) -> Option<&'static str> {
        Some(self.exercise_type.as_str())
    }

    fn breakdown_value(&self) -> f64 {
        self.calories_burned as f64
    }
}

impl Aggregatable for MealRecord {
    const METRICS: &'static [Metric<Self>] = &[
        Metric {
            name: "total_calories",
            extract: |m| m.totals.total_calories,
        },
        Metric {
            name: "total_protein",
            extract: |m| m.totals.total_protein,
        },
        Metric {
            name: "total_carbs",
            extract: |m| m.totals.total_carbs,
        },
        Metric {
            name: "total_fat",
            extract: |m| m.totals.total_fat,
        },
        Metric {
            name: "total_fiber",
            extract: |m| m.totals.total_fiber,
        },
        Metric {
            name: "total_sugar",
            extract: |m| m.totals.total_sugar,
        },
    ];

    fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn recorded_at(&self) -> DateTime<Utc> {
        self.date
    }

    fn category(&self) -> Option<&'static str> {
        Some(self.meal_type.as_str())
    }

    fn breakdown_value(&self) -> f64 {
        self.totals.total_calories
    }
}

impl Aggregatable for SleepRecord {
    const METRICS: &'static [Metric<Self>] = &[
        Metric {
            name: "duration_minutes",
            extract: |s| s.duration_minutes as f64,
        },
        Metric {
            name: "quality_score",
            extract: |s| s.quality_score() as f64,
        },
    ];

    fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn recorded_at(&self) -> DateTime<Utc> {
        self.date
    }

    fn category(&self) -> Option<&'static str> {
        Some(self.quality.as_str())
    }

    fn breakdown_value(&self) -> f64 {
        self.duration_minutes as f64
    }
}

impl Aggregatable for ProgressRecord {
    const METRICS: &'static [Metric<Self>] = &[
        Metric {
            name: "weight_kg",
            extract: |p| p.weight_kg,
        },
        Metric {
            name: "body_fat_percent",
            extract: |p| p.body_fat_percent.unwrap_or(0.0),
        },
        Metric {
            name: "muscle_mass_kg",
            extract: |p| p.muscle_mass_kg.unwrap_or(0.0),
        },
    ];

    fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn recorded_at(&self) -> DateTime<Utc> {
        self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::ExerciseType;
    use crate::sleep::SleepQuality;
    use proptest::prelude::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    fn workout(user_id: Uuid, exercise_type: ExerciseType, date: DateTime<Utc>, calories: i32) -> WorkoutRecord {
        WorkoutRecord {
            id: Uuid::new_v4(),
            user_id,
            exercise_type,
            intensity: "moderate".to_string(),
            duration_minutes: 30,
            date,
            calories_burned: calories,
            notes: None,
            created_at: date,
            updated_at: date,
        }
    }

    fn sleep(user_id: Uuid, quality: SleepQuality, date: DateTime<Utc>) -> SleepRecord {
        SleepRecord {
            id: Uuid::new_v4(),
            user_id,
            sleep_start: date - Duration::hours(8),
            sleep_end: date,
            date,
            duration_minutes: 480,
            quality,
            notes: None,
            created_at: date,
            updated_at: date,
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_empty_window_declares_all_fields_as_zero() {
        let window = TimeWindow::day(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(), utc()).unwrap();
        let summary = aggregate::<MealRecord>(Uuid::new_v4(), &[], &window);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.fields.len(), 6);
        assert!(summary.fields.iter().all(|f| f.sum == 0.0 && f.average == 0.0));
        assert!(summary.breakdown.is_empty());
    }

    #[test]
    fn test_filters_by_owner_and_window() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let records = vec![
            workout(me, ExerciseType::Running, at(6, 8), 300),
            workout(other, ExerciseType::Running, at(6, 9), 999),
            workout(me, ExerciseType::Yoga, at(8, 9), 100),
        ];
        let window = TimeWindow::day(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(), utc()).unwrap();
        let summary = aggregate(me, &records, &window);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.sum("calories_burned"), 300.0);
        assert_eq!(summary.field("duration_minutes").average, 30.0);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let me = Uuid::new_v4();
        let window = TimeWindow::new(at(6, 0), at(7, 0)).unwrap();
        let records = vec![
            workout(me, ExerciseType::Hiking, at(6, 0), 10),
            workout(me, ExerciseType::Hiking, at(7, 0), 20),
            workout(me, ExerciseType::Hiking, at(7, 0) + Duration::milliseconds(1), 40),
        ];
        assert_eq!(aggregate(me, &records, &window).sum("calories_burned"), 30.0);
    }

    #[test]
    fn test_breakdown_sorted_by_count_with_stable_ties() {
        let me = Uuid::new_v4();
        let records = vec![
            sleep(me, SleepQuality::Fair, at(1, 7)),
            sleep(me, SleepQuality::Excellent, at(2, 7)),
            sleep(me, SleepQuality::Good, at(3, 7)),
            sleep(me, SleepQuality::Good, at(4, 7)),
        ];
        let window = TimeWindow::new(at(1, 0), at(5, 0)).unwrap();
        let summary = aggregate(me, &records, &window);
        let order: Vec<&str> = summary.breakdown.iter().map(|c| c.category).collect();
        assert_eq!(order, vec!["good", "fair", "excellent"]);
        assert_eq!(summary.breakdown[0].sum, 960.0);
        assert_eq!(summary.field("quality_score").average, 75.0);
    }

    #[test]
    fn test_progress_has_no_breakdown() {
        let me = Uuid::new_v4();
        let record = ProgressRecord {
            id: Uuid::new_v4(),
            user_id: me,
            date: at(6, 7),
            weight_kg: 80.0,
            body_fat_percent: None,
            muscle_mass_kg: Some(35.0),
            measurements: Default::default(),
            notes: None,
            created_at: at(6, 7),
            updated_at: at(6, 7),
        };
        let summary = aggregate(me, &[record], &TimeWindow::new(at(1, 0), at(9, 0)).unwrap());
        assert!(summary.breakdown.is_empty());
        assert_eq!(summary.sum("body_fat_percent"), 0.0);
        assert_eq!(summary.sum("muscle_mass_kg"), 35.0);
    }

    #[test]
    fn test_day_window_respects_offset() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let window = TimeWindow::day(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(), offset).unwrap();
        assert_eq!(window.start, at(6, 5));
        assert_eq!(window.end, at(7, 5) - Duration::milliseconds(1));
    }

    #[test]
    fn test_week_starts_on_sunday() {
        // 2024-05-08 is a Wednesday
        let window = TimeWindow::week_of(NaiveDate::from_ymd_opt(2024, 5, 8).unwrap(), utc()).unwrap();
        assert_eq!(window.start, at(5, 0));
        assert_eq!(window.end, at(12, 0) - Duration::milliseconds(1));

        let sunday = TimeWindow::week_of(NaiveDate::from_ymd_opt(2024, 5, 5).unwrap(), utc()).unwrap();
        assert_eq!(sunday, window);
    }

    #[test]
    fn test_month_to_date() {
        let now = at(17, 15);
        let window = TimeWindow::month_to_date(now, utc()).unwrap();
        assert_eq!(window.start, at(1, 0));
        assert_eq!(window.end, now);
    }

    #[test]
    fn test_month_period_uses_calendar_months() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let window = TimeWindow::for_period(Period::Month, now).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap());
        let year = TimeWindow::for_period(Period::Year, now).unwrap();
        assert_eq!(year.start, Utc.with_ymd_and_hms(2023, 3, 31, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_period_tokens() {
        assert_eq!("week".parse::<Period>().unwrap(), Period::Week);
        assert_eq!("Month".parse::<Period>().unwrap(), Period::Month);
        assert_eq!("year".parse::<Period>().unwrap(), Period::Year);
        assert_eq!("30d".parse::<Period>().unwrap(), Period::Days(30));
        assert_eq!("30days".parse::<Period>().unwrap(), Period::Days(30));
        assert_eq!("30".parse::<Period>().unwrap(), Period::Days(30));
        assert!("0d".parse::<Period>().is_err());
        assert_eq!("36500d".parse::<Period>().unwrap(), Period::Days(MAX_PERIOD_DAYS));
        assert!("36501d".parse::<Period>().is_err());
        assert!("100000000d".parse::<Period>().is_err());
        assert!("fortnight".parse::<Period>().is_err());
        assert_eq!(Period::Days(14).to_string(), "14d");
    }

    #[test]
    fn test_windows_outside_date_range_are_errors() {
        assert!(TimeWindow::week_of(NaiveDate::MAX, utc()).is_err());
        assert!(TimeWindow::day(NaiveDate::MIN, FixedOffset::east_opt(3600).unwrap()).is_err());

        let early = Utc.from_utc_datetime(&NaiveDate::MIN.and_time(NaiveTime::MIN));
        assert!(TimeWindow::for_period(Period::Days(MAX_PERIOD_DAYS), early).is_err());
        assert!(TimeWindow::for_period(Period::Year, early).is_err());

        let longest = TimeWindow::for_period(Period::Days(MAX_PERIOD_DAYS), at(6, 12)).unwrap();
        assert_eq!(longest.whole_days(), MAX_PERIOD_DAYS as i64);
    }

    #[test]
    fn test_whole_days_minimum_one() {
        let now = at(6, 12);
        assert_eq!(TimeWindow::for_period(Period::Week, now).unwrap().whole_days(), 7);
        assert_eq!(TimeWindow::new(now, now).unwrap().whole_days(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: breakdown counts add up to the matched count
        #[test]
        fn prop_breakdown_counts_sum_to_count(
            entries in prop::collection::vec((0usize..11, 1u32..28, 0i32..900), 0..40)
        ) {
            let me = Uuid::new_v4();
            let records: Vec<WorkoutRecord> = entries
                .iter()
                .map(|(idx, day, calories)| workout(me, ExerciseType::ALL[*idx], at(*day, 12), *calories))
                .collect();
            let window = TimeWindow::new(at(5, 0), at(20, 0)).unwrap();
            let summary = aggregate(me, &records, &window);
            let total: usize = summary.breakdown.iter().map(|c| c.count).sum();
            prop_assert_eq!(total, summary.count);
            prop_assert!(summary.count <= records.len());
            for pair in summary.breakdown.windows(2) {
                prop_assert!(pair[0].count >= pair[1].count);
            }
        }
    }
}
