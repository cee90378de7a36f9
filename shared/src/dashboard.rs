//! Dashboard and analytics composition
//!
//! Combines the formulas and the windowed aggregator across the four record
//! kinds. Composition is pure: callers fetch records covering the windows
//! they need and pass a frozen `now`, so the same input always yields the
//! same snapshot.
//!
//! Recoverable formula failures never fail a snapshot: an undefined BMI or
//! goal progress is reported as 0. Only a date whose windows fall outside the
//! representable range is an error.

use crate::aggregation::{aggregate, in_window, Period, TimeWindow, WindowSummary};
use crate::errors::MetricsResult;
use crate::health_metrics::{calculate_bmi, classify_bmi, goal_progress, round_to, FitnessGoal, UserProfile};
use crate::models::{MealRecord, ProgressRecord, SleepRecord, WorkoutRecord};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// Days of progress history the dashboard looks back over by default
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;

/// Everything needed to compose a dashboard
///
/// `workouts`, `meals` and `sleep` must cover at least the Sunday-start week
/// containing `date`; `recent_progress` the lookback window; and
/// `monthly_progress` the month to date. Extra records are ignored.
#[derive(Debug, Clone)]
pub struct DashboardInput<'a> {
    pub user_id: Uuid,
    pub profile: &'a UserProfile,
    pub date: NaiveDate,
    pub now: DateTime<Utc>,
    pub offset: FixedOffset,
    pub lookback_days: u32,
    pub workouts: &'a [WorkoutRecord],
    pub meals: &'a [MealRecord],
    pub sleep: &'a [SleepRecord],
    pub recent_progress: &'a [ProgressRecord],
    pub monthly_progress: &'a [ProgressRecord],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSection {
    pub bmr: i32,
    pub daily_calorie_need: i32,
    pub current_bmi: f64,
    pub bmi_category: String,
    pub current_weight_kg: f64,
    pub target_weight_kg: f64,
    pub goal: FitnessGoal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodaySection {
    pub window: TimeWindow,
    pub workouts: WindowSummary,
    pub meals: WindowSummary,
    pub sleep: WindowSummary,
    pub calories_consumed: f64,
    pub calories_burned: f64,
    /// consumed - burned
    pub calorie_balance: f64,
    /// daily need - consumed
    pub calorie_deficit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCalories {
    pub date: NaiveDate,
    pub intake: f64,
    pub burned: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekSection {
    pub window: TimeWindow,
    pub workouts: WindowSummary,
    pub meals: WindowSummary,
    pub sleep: WindowSummary,
    pub daily_calories: Vec<DailyCalories>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightPoint {
    pub date: DateTime<Utc>,
    pub weight_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSection {
    pub recent: WindowSummary,
    pub month_to_date: WindowSummary,
    pub weight_change: f64,
    pub goal_progress: f64,
    pub weight_trend: Vec<WeightPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub profile: ProfileSection,
    pub today: TodaySection,
    pub week: WeekSection,
    pub progress: ProgressSection,
}

const CALORIES_BURNED: &str = "calories_burned";
const TOTAL_CALORIES: &str = "total_calories";

/// Weight trend inside `window`, oldest first
pub fn weight_trend(user_id: Uuid, progress: &[ProgressRecord], window: &TimeWindow) -> Vec<WeightPoint> {
    let mut points: Vec<WeightPoint> = in_window(user_id, progress, window)
        .map(|p| WeightPoint {
            date: p.date,
            weight_kg: p.weight_kg,
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// Weekly section for the Sunday-start week containing `date`
///
/// Per-day calories are taken from the week's records, so one fetch of the
/// week is enough.
pub fn compose_week(
    user_id: Uuid,
    date: NaiveDate,
    offset: FixedOffset,
    workouts: &[WorkoutRecord],
    meals: &[MealRecord],
    sleep: &[SleepRecord],
) -> MetricsResult<WeekSection> {
    let window = TimeWindow::week_of(date, offset)?;
    let sunday = window.start.with_timezone(&offset).date_naive();

    let daily_calories = (0..7)
        .map(|i| {
            let day = sunday + Duration::days(i);
            let bounds = TimeWindow::day(day, offset)?;
            let intake: f64 = in_window(user_id, meals, &bounds)
                .map(|m| m.totals.total_calories)
                .sum();
            let burned: f64 = in_window(user_id, workouts, &bounds)
                .map(|w| w.calories_burned as f64)
                .sum();
            Ok(DailyCalories {
                date: day,
                intake: round_to(intake, 2),
                burned,
            })
        })
        .collect::<MetricsResult<Vec<_>>>()?;

    Ok(WeekSection {
        window,
        workouts: aggregate(user_id, workouts, &window),
        meals: aggregate(user_id, meals, &window),
        sleep: aggregate(user_id, sleep, &window),
        daily_calories,
    })
}

fn compose_today(input: &DashboardInput<'_>, daily_calorie_need: i32) -> MetricsResult<TodaySection> {
    let window = TimeWindow::day(input.date, input.offset)?;
    let workouts = aggregate(input.user_id, input.workouts, &window);
    let meals = aggregate(input.user_id, input.meals, &window);
    let sleep = aggregate(input.user_id, input.sleep, &window);

    let calories_consumed = round_to(meals.sum(TOTAL_CALORIES), 2);
    let calories_burned = workouts.sum(CALORIES_BURNED);

    Ok(TodaySection {
        window,
        calorie_balance: round_to(calories_consumed - calories_burned, 2),
        calorie_deficit: round_to(daily_calorie_need as f64 - calories_consumed, 2),
        calories_consumed,
        calories_burned,
        workouts,
        meals,
        sleep,
    })
}

/// Compose the full dashboard snapshot
pub fn compose_dashboard(input: &DashboardInput<'_>) -> MetricsResult<DashboardSnapshot> {
    debug!(
        user_id = %input.user_id,
        date = %input.date,
        workouts = input.workouts.len(),
        meals = input.meals.len(),
        sleep = input.sleep.len(),
        progress = input.recent_progress.len(),
        "Composing dashboard"
    );

    let profile = input.profile;
    let bmr = profile.bmr();
    let daily_calorie_need = profile.daily_calorie_need();

    let lookback = TimeWindow::last_days(input.now, input.lookback_days)?;
    let month = TimeWindow::month_to_date(input.now, input.offset)?;
    let trend = weight_trend(input.user_id, input.recent_progress, &lookback);

    let earliest = trend.first().map(|p| p.weight_kg);
    let latest = trend.last().map(|p| p.weight_kg);
    let current_weight_kg = latest.unwrap_or(profile.weight_kg);

    let weight_change = match (earliest, latest) {
        (Some(first), Some(last)) if trend.len() >= 2 => round_to(last - first, 2),
        _ => 0.0,
    };
    let goal = goal_progress(
        earliest.unwrap_or(profile.weight_kg),
        current_weight_kg,
        profile.target_weight_kg,
    )
    .unwrap_or(0.0);

    let current_bmi = calculate_bmi(current_weight_kg, profile.height_cm).unwrap_or(0.0);

    Ok(DashboardSnapshot {
        date: input.date,
        generated_at: input.now,
        profile: ProfileSection {
            bmr,
            daily_calorie_need,
            current_bmi,
            bmi_category: classify_bmi(current_bmi).label().to_string(),
            current_weight_kg,
            target_weight_kg: profile.target_weight_kg,
            goal: profile.goal,
        },
        today: compose_today(input, daily_calorie_need)?,
        week: compose_week(
            input.user_id,
            input.date,
            input.offset,
            input.workouts,
            input.meals,
            input.sleep,
        )?,
        progress: ProgressSection {
            recent: aggregate(input.user_id, input.recent_progress, &lookback),
            month_to_date: aggregate(input.user_id, input.monthly_progress, &month),
            weight_change,
            goal_progress: goal,
            weight_trend: trend,
        },
    })
}

// ============================================================================
// Analytics
// ============================================================================

/// Records covering `TimeWindow::for_period(period, now)`
#[derive(Debug, Clone)]
pub struct AnalyticsInput<'a> {
    pub user_id: Uuid,
    pub period: Period,
    pub now: DateTime<Utc>,
    pub workouts: &'a [WorkoutRecord],
    pub meals: &'a [MealRecord],
    pub sleep: &'a [SleepRecord],
    pub progress: &'a [ProgressRecord],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub period: Period,
    pub window: TimeWindow,
    pub workouts: WindowSummary,
    pub meals: WindowSummary,
    pub sleep: WindowSummary,
    pub progress: WindowSummary,
    pub weight_trend: Vec<WeightPoint>,
    pub average_daily_intake: f64,
    pub average_daily_burned: f64,
}

/// Period report; daily averages divide by the window's whole days
pub fn compose_analytics(input: &AnalyticsInput<'_>) -> MetricsResult<AnalyticsReport> {
    let window = TimeWindow::for_period(input.period, input.now)?;
    let days = window.whole_days() as f64;

    let workouts = aggregate(input.user_id, input.workouts, &window);
    let meals = aggregate(input.user_id, input.meals, &window);

    Ok(AnalyticsReport {
        period: input.period,
        window,
        average_daily_intake: round_to(meals.sum(TOTAL_CALORIES) / days, 2),
        average_daily_burned: round_to(workouts.sum(CALORIES_BURNED) / days, 2),
        sleep: aggregate(input.user_id, input.sleep, &window),
        progress: aggregate(input.user_id, input.progress, &window),
        weight_trend: weight_trend(input.user_id, input.progress, &window),
        workouts,
        meals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::ExerciseType;
    use crate::health_metrics::{ActivityLevel, Gender};
    use crate::models::Measurements;
    use crate::nutrition::{MealTotals, MealType};
    use crate::sleep::SleepQuality;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn profile() -> UserProfile {
        UserProfile {
            weight_kg: 80.0,
            height_cm: 180.0,
            age: 30,
            gender: Gender::Male,
            activity_level: ActivityLevel::Sedentary,
            goal: FitnessGoal::LoseWeight,
            target_weight_kg: 70.0,
        }
    }

    fn workout(user_id: Uuid, date: DateTime<Utc>, calories: i32) -> WorkoutRecord {
        WorkoutRecord {
            id: Uuid::new_v4(),
            user_id,
            exercise_type: ExerciseType::Running,
            intensity: "6 mph".to_string(),
            duration_minutes: 30,
            date,
            calories_burned: calories,
            notes: None,
            created_at: date,
            updated_at: date,
        }
    }

    fn meal(user_id: Uuid, date: DateTime<Utc>, calories: f64) -> MealRecord {
        MealRecord {
            id: Uuid::new_v4(),
            user_id,
            name: "meal".to_string(),
            meal_type: MealType::Lunch,
            date,
            foods: vec![],
            totals: MealTotals {
                total_calories: calories,
                ..Default::default()
            },
            notes: None,
            created_at: date,
            updated_at: date,
        }
    }

    fn night(user_id: Uuid, date: DateTime<Utc>) -> SleepRecord {
        SleepRecord {
            id: Uuid::new_v4(),
            user_id,
            sleep_start: date - Duration::hours(7),
            sleep_end: date,
            date,
            duration_minutes: 420,
            quality: SleepQuality::Good,
            notes: None,
            created_at: date,
            updated_at: date,
        }
    }

    fn weigh_in(user_id: Uuid, date: DateTime<Utc>, weight_kg: f64) -> ProgressRecord {
        ProgressRecord {
            id: Uuid::new_v4(),
            user_id,
            date,
            weight_kg,
            body_fat_percent: None,
            muscle_mass_kg: None,
            measurements: Measurements::default(),
            notes: None,
            created_at: date,
            updated_at: date,
        }
    }

    struct Fixture {
        user_id: Uuid,
        profile: UserProfile,
        workouts: Vec<WorkoutRecord>,
        meals: Vec<MealRecord>,
        sleep: Vec<SleepRecord>,
        progress: Vec<ProgressRecord>,
    }

    impl Fixture {
        fn new() -> Self {
            let user_id = Uuid::new_v4();
            Self {
                user_id,
                profile: profile(),
                // 2024-05-08 is a Wednesday; its week runs 05-05 .. 05-11
                workouts: vec![
                    workout(user_id, at(8, 7), 400),
                    workout(user_id, at(6, 7), 250),
                    workout(Uuid::new_v4(), at(8, 7), 9999),
                ],
                meals: vec![
                    meal(user_id, at(8, 8), 500.0),
                    meal(user_id, at(8, 13), 700.25),
                    meal(user_id, at(5, 13), 900.0),
                ],
                sleep: vec![night(user_id, at(8, 6))],
                progress: vec![
                    weigh_in(user_id, at(2, 7), 78.0),
                    weigh_in(user_id, at(20, 7), 90.0),
                    weigh_in(user_id, at(1, 7), 79.0),
                    weigh_in(user_id, at(7, 7), 76.5),
                ],
            }
        }

        fn input(&self) -> DashboardInput<'_> {
            DashboardInput {
                user_id: self.user_id,
                profile: &self.profile,
                date: NaiveDate::from_ymd_opt(2024, 5, 8).unwrap(),
                now: at(8, 20),
                offset: utc(),
                lookback_days: DEFAULT_LOOKBACK_DAYS,
                workouts: &self.workouts,
                meals: &self.meals,
                sleep: &self.sleep,
                recent_progress: &self.progress,
                monthly_progress: &self.progress,
            }
        }
    }

    #[test]
    fn test_today_calorie_balance() {
        let fixture = Fixture::new();
        let snapshot = compose_dashboard(&fixture.input()).unwrap();
        let today = &snapshot.today;
        assert_eq!(today.calories_consumed, 1200.25);
        assert_eq!(today.calories_burned, 400.0);
        assert_eq!(today.calorie_balance, 800.25);
        // sedentary 80kg/180cm/30y male: bmr 1854, need 2225
        assert_eq!(snapshot.profile.bmr, 1854);
        assert_eq!(snapshot.profile.daily_calorie_need, 2225);
        assert_eq!(today.calorie_deficit, 1024.75);
        assert_eq!(today.sleep.count, 1);
    }

    #[test]
    fn test_week_daily_calories() {
        let fixture = Fixture::new();
        let week = compose_dashboard(&fixture.input()).unwrap().week;
        assert_eq!(week.daily_calories.len(), 7);
        assert_eq!(week.daily_calories[0].date, NaiveDate::from_ymd_opt(2024, 5, 5).unwrap());
        assert_eq!(week.daily_calories[0].intake, 900.0);
        assert_eq!(week.daily_calories[1].burned, 250.0);
        assert_eq!(week.daily_calories[3].intake, 1200.25);
        assert_eq!(week.daily_calories[3].burned, 400.0);
        assert_eq!(week.workouts.count, 2);
        assert_eq!(week.meals.sum("total_calories"), 2100.25);
    }

    #[test]
    fn test_progress_uses_lookback_order() {
        let fixture = Fixture::new();
        let progress = compose_dashboard(&fixture.input()).unwrap().progress;
        // the 05-20 entry is after `now`
        let weights: Vec<f64> = progress.weight_trend.iter().map(|p| p.weight_kg).collect();
        assert_eq!(weights, vec![79.0, 78.0, 76.5]);
        assert_eq!(progress.weight_change, -2.5);
        // |(70 - 76.5) / (79 - 70)| * 100
        assert_eq!(progress.goal_progress, 72.2);
        assert_eq!(progress.recent.count, 3);
        assert_eq!(progress.month_to_date.count, 3);
    }

    #[test]
    fn test_current_bmi_uses_latest_weigh_in() {
        let fixture = Fixture::new();
        let snapshot = compose_dashboard(&fixture.input()).unwrap();
        assert_eq!(snapshot.profile.current_weight_kg, 76.5);
        assert_eq!(snapshot.profile.current_bmi, 23.6);
        assert_eq!(snapshot.profile.bmi_category, "Normal weight");
    }

    #[test]
    fn test_no_progress_falls_back_to_profile() {
        let mut fixture = Fixture::new();
        fixture.progress.clear();
        let snapshot = compose_dashboard(&fixture.input()).unwrap();
        assert_eq!(snapshot.progress.weight_change, 0.0);
        assert_eq!(snapshot.profile.current_weight_kg, 80.0);
        // |(70 - 80) / (80 - 70)| * 100
        assert_eq!(snapshot.progress.goal_progress, 100.0);
        assert!(snapshot.progress.weight_trend.is_empty());
    }

    #[test]
    fn test_goal_progress_zero_when_start_equals_target() {
        let mut fixture = Fixture::new();
        fixture.progress.clear();
        fixture.profile.target_weight_kg = fixture.profile.weight_kg;
        let snapshot = compose_dashboard(&fixture.input()).unwrap();
        assert_eq!(snapshot.progress.goal_progress, 0.0);
    }

    #[test]
    fn test_single_weigh_in_has_no_weight_change() {
        let mut fixture = Fixture::new();
        fixture.progress = vec![weigh_in(fixture.user_id, at(7, 7), 77.0)];
        let snapshot = compose_dashboard(&fixture.input()).unwrap();
        assert_eq!(snapshot.progress.weight_change, 0.0);
    }

    #[test]
    fn test_dashboard_is_deterministic() {
        let fixture = Fixture::new();
        let first = serde_json::to_string(&compose_dashboard(&fixture.input()).unwrap()).unwrap();
        let second = serde_json::to_string(&compose_dashboard(&fixture.input()).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_dashboard() {
        let user_id = Uuid::new_v4();
        let profile = profile();
        let input = DashboardInput {
            user_id,
            profile: &profile,
            date: NaiveDate::from_ymd_opt(2024, 5, 8).unwrap(),
            now: at(8, 20),
            offset: utc(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            workouts: &[],
            meals: &[],
            sleep: &[],
            recent_progress: &[],
            monthly_progress: &[],
        };
        let snapshot = compose_dashboard(&input).unwrap();
        assert_eq!(snapshot.today.calories_consumed, 0.0);
        assert_eq!(snapshot.today.calorie_deficit, 2225.0);
        assert!(snapshot.week.daily_calories.iter().all(|d| d.intake == 0.0 && d.burned == 0.0));
    }

    #[test]
    fn test_analytics_daily_averages() {
        let fixture = Fixture::new();
        let report = compose_analytics(&AnalyticsInput {
            user_id: fixture.user_id,
            period: Period::Week,
            now: at(8, 20),
            workouts: &fixture.workouts,
            meals: &fixture.meals,
            sleep: &fixture.sleep,
            progress: &fixture.progress,
        })
        .unwrap();
        assert_eq!(report.window.start, at(1, 20));
        assert_eq!(report.workouts.count, 2);
        assert_eq!(report.average_daily_burned, round_to(650.0 / 7.0, 2));
        assert_eq!(report.average_daily_intake, round_to(2100.25 / 7.0, 2));
        assert_eq!(report.weight_trend.len(), 2);
    }

    #[test]
    fn test_unrepresentable_week_is_an_error() {
        let fixture = Fixture::new();
        let input = DashboardInput {
            date: NaiveDate::MAX,
            ..fixture.input()
        };
        assert!(compose_dashboard(&input).is_err());
        assert!(compose_week(fixture.user_id, NaiveDate::MAX, utc(), &[], &[], &[]).is_err());
    }
}
