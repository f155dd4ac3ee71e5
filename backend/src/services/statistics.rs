//! Statistics service
//!
//! Range aggregation over the water, meal and activity logs. Every total is
//! a store-side sum over an inclusive date range; per-day averages use
//! integer division and truncate.

use crate::error::ApiError;
use crate::repositories::{ProfileStore, SummableLogStore};
use chrono::NaiveDate;
use health_monitor_shared::{
    percent_of_goal, ActivityLog, CalorieProgress, DailyStats, DateRange, MealLog, MonthQuery,
    MonthlyStats, Summable, SummaryStats, TodayDashboard, WaterLog, WaterProgress, WeekOverview,
    WeeklyStats, DEFAULT_DAILY_GOAL,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Divisor for the weekly averages, independent of the window length
const DAYS_PER_WEEK: i64 = 7;

/// Longest range `daily` accepts; each day costs three store queries
pub const MAX_DAILY_RANGE_DAYS: i64 = 366;

/// Sums for one range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Totals {
    water_ml: i64,
    calories_in: i64,
    calories_out: i64,
}

impl Totals {
    fn net(&self) -> i64 {
        self.calories_in - self.calories_out
    }
}

#[derive(Clone)]
pub struct StatisticsService {
    water: Arc<dyn SummableLogStore<WaterLog>>,
    meals: Arc<dyn SummableLogStore<MealLog>>,
    activities: Arc<dyn SummableLogStore<ActivityLog>>,
    profiles: Arc<dyn ProfileStore>,
}

async fn sum_range<T>(
    store: &dyn SummableLogStore<T>,
    user_id: Uuid,
    range: &DateRange,
) -> Result<i64, ApiError>
where
    T: Summable + Clone + Send + Sync + 'static,
{
    store
        .sum_by_user_and_range(user_id, range.start_instant(), range.end_instant())
        .await
        .map_err(ApiError::Internal)
}

impl StatisticsService {
    pub fn new(
        water: Arc<dyn SummableLogStore<WaterLog>>,
        meals: Arc<dyn SummableLogStore<MealLog>>,
        activities: Arc<dyn SummableLogStore<ActivityLog>>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            water,
            meals,
            activities,
            profiles,
        }
    }

    async fn totals(&self, user_id: Uuid, range: &DateRange) -> Result<Totals, ApiError> {
        Ok(Totals {
            water_ml: sum_range(self.water.as_ref(), user_id, range).await?,
            calories_in: sum_range(self.meals.as_ref(), user_id, range).await?,
            calories_out: sum_range(self.activities.as_ref(), user_id, range).await?,
        })
    }

    /// Totals and averages over `range`
    pub async fn summary(&self, user_id: Uuid, range: DateRange) -> Result<SummaryStats, ApiError> {
        debug!(%user_id, from = %range.start, to = %range.end, "Computing summary statistics");

        let totals = self.totals(user_id, &range).await?;
        let days_count = range.days();

        Ok(SummaryStats {
            from: range.start,
            to: range.end,
            total_water_ml: totals.water_ml,
            total_calories_in: totals.calories_in,
            total_calories_out: totals.calories_out,
            net_calories: totals.net(),
            avg_water_per_day: totals.water_ml / days_count,
            avg_calories_in_per_day: totals.calories_in / days_count,
            avg_calories_out_per_day: totals.calories_out / days_count,
            days_count,
        })
    }

    /// One record per day, each summed independently
    pub async fn daily(&self, user_id: Uuid, range: DateRange) -> Result<Vec<DailyStats>, ApiError> {
        debug!(%user_id, from = %range.start, to = %range.end, "Computing daily statistics");
        if range.days() > MAX_DAILY_RANGE_DAYS {
            return Err(ApiError::validation(format!(
                "Daily statistics cover at most {MAX_DAILY_RANGE_DAYS} days, got {}",
                range.days()
            )));
        }

        let mut days = Vec::with_capacity(range.days() as usize);
        for date in range.iter_days() {
            let totals = self.totals(user_id, &DateRange::single_day(date)).await?;
            days.push(DailyStats {
                date,
                water_ml: totals.water_ml,
                calories_in: totals.calories_in,
                calories_out: totals.calories_out,
                net_calories: totals.net(),
            });
        }

        Ok(days)
    }

    /// The seven days ending on `today`
    pub async fn weekly(&self, user_id: Uuid, today: NaiveDate) -> Result<WeeklyStats, ApiError> {
        let range = DateRange::last_seven_days(today);
        debug!(%user_id, from = %range.start, to = %range.end, "Computing weekly statistics");

        let totals = self.totals(user_id, &range).await?;
        let daily_breakdown = self.daily(user_id, range).await?;

        Ok(WeeklyStats {
            week_start: range.start,
            week_end: range.end,
            total_water_ml: totals.water_ml,
            total_calories_in: totals.calories_in,
            total_calories_out: totals.calories_out,
            net_calories: totals.net(),
            avg_water_per_day: totals.water_ml / DAYS_PER_WEEK,
            avg_calories_in_per_day: totals.calories_in / DAYS_PER_WEEK,
            avg_calories_out_per_day: totals.calories_out / DAYS_PER_WEEK,
            daily_breakdown,
        })
    }

    /// A calendar month; missing parts default to the month of `today`
    pub async fn monthly(
        &self,
        user_id: Uuid,
        year: Option<i32>,
        month: Option<u32>,
        today: NaiveDate,
    ) -> Result<MonthlyStats, ApiError> {
        let (year, month) = MonthQuery { year, month }.resolve(today);
        let range = DateRange::month(year, month)?;
        debug!(%user_id, year, month, "Computing monthly statistics");

        let totals = self.totals(user_id, &range).await?;
        let days_in_month = range.days();

        Ok(MonthlyStats {
            year,
            month,
            month_start: range.start,
            month_end: range.end,
            days_in_month,
            total_water_ml: totals.water_ml,
            total_calories_in: totals.calories_in,
            total_calories_out: totals.calories_out,
            net_calories: totals.net(),
            avg_water_per_day: totals.water_ml / days_in_month,
            avg_calories_in_per_day: totals.calories_in / days_in_month,
            avg_calories_out_per_day: totals.calories_out / days_in_month,
        })
    }

    /// Today's water and calorie progress against the profile goals
    pub async fn today(&self, user_id: Uuid, today: NaiveDate) -> Result<TodayDashboard, ApiError> {
        let totals = self.totals(user_id, &DateRange::single_day(today)).await?;
        let profile = self
            .profiles
            .find_by_user(user_id)
            .await
            .map_err(ApiError::Internal)?;

        let (water_goal, calorie_goal) = profile
            .as_ref()
            .map(|p| (p.daily_water_goal_ml, p.daily_calorie_goal))
            .unwrap_or((DEFAULT_DAILY_GOAL, DEFAULT_DAILY_GOAL));

        let water = WaterProgress {
            current: totals.water_ml,
            goal: water_goal,
            percentage: percent_of_goal(totals.water_ml as f64, water_goal as f64)?,
            remaining: (i64::from(water_goal) - totals.water_ml).max(0),
        };
        let calories = CalorieProgress {
            intake: totals.calories_in,
            burned: totals.calories_out,
            net: totals.net(),
            goal: calorie_goal,
            remaining: i64::from(calorie_goal) - totals.calories_in,
            percentage: percent_of_goal(totals.calories_in as f64, calorie_goal as f64)?,
        };

        Ok(TodayDashboard {
            date: today,
            water,
            calories,
            has_profile: profile.is_some(),
        })
    }

    /// Totals for the seven days ending on `today`, without the breakdown
    pub async fn week_overview(&self, user_id: Uuid, today: NaiveDate) -> Result<WeekOverview, ApiError> {
        let range = DateRange::last_seven_days(today);
        debug!(%user_id, from = %range.start, to = %range.end, "Computing week overview");

        let totals = self.totals(user_id, &range).await?;

        Ok(WeekOverview {
            start: range.start,
            end: range.end,
            total_water_ml: totals.water_ml,
            total_calories_in: totals.calories_in,
            total_calories_out: totals.calories_out,
            avg_water_per_day: totals.water_ml / DAYS_PER_WEEK,
            avg_calories_in_per_day: totals.calories_in / DAYS_PER_WEEK,
            avg_calories_out_per_day: totals.calories_out / DAYS_PER_WEEK,
        })
    }
}
