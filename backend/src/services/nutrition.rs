//! Nutrition service - meal logging against the food catalog

use super::log_entries::{delete_owned, record_created};
use crate::error::ApiError;
use crate::repositories::{FoodCatalog, SortOrder, SummableLogStore};
use chrono::{DateTime, NaiveDate, Utc};
use health_monitor_shared::validation::validate_positive;
use health_monitor_shared::{meal_kcal, DateRange, Food, FoodRef, MealLog, TodayKcal};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const KIND: &str = "meal";

/// Nutrition service for meal and food operations
#[derive(Clone)]
pub struct NutritionService {
    meals: Arc<dyn SummableLogStore<MealLog>>,
    foods: Arc<dyn FoodCatalog>,
}

impl NutritionService {
    pub fn new(meals: Arc<dyn SummableLogStore<MealLog>>, foods: Arc<dyn FoodCatalog>) -> Self {
        Self { meals, foods }
    }

    async fn resolve_food(&self, food: &FoodRef) -> Result<Food, ApiError> {
        let found = match food {
            FoodRef::Id(id) => self.foods.find_by_id(*id).await,
            FoodRef::Name(name) => self.foods.find_by_name_ignore_case(name.trim()).await,
        }
        .map_err(ApiError::Internal)?;

        found.ok_or_else(|| match food {
            FoodRef::Id(id) => ApiError::NotFound(format!("Food {id} not found")),
            FoodRef::Name(name) => ApiError::NotFound(format!("Food '{name}' not found")),
        })
    }

    /// Log a meal; kcal are fixed at log time from the catalog entry
    pub async fn log_meal(
        &self,
        user_id: Uuid,
        food: FoodRef,
        servings: f64,
        now: DateTime<Utc>,
    ) -> Result<MealLog, ApiError> {
        validate_positive("servings", servings)?;
        let food = self.resolve_food(&food).await?;

        let entry = self
            .meals
            .insert(MealLog {
                id: Uuid::new_v4(),
                user_id,
                food_id: food.id,
                total_kcal: meal_kcal(food.kcal_per_serving, servings),
                food_name: food.name,
                servings,
                logged_at: now,
            })
            .await
            .map_err(ApiError::Internal)?;

        record_created(KIND);
        info!(%user_id, food = %entry.food_name, total_kcal = entry.total_kcal, "Meal logged");

        Ok(entry)
    }

    pub async fn today_total(&self, user_id: Uuid, today: NaiveDate) -> Result<TodayKcal, ApiError> {
        let range = DateRange::single_day(today);
        let total_kcal = self
            .meals
            .sum_by_user_and_range(user_id, range.start_instant(), range.end_instant())
            .await
            .map_err(ApiError::Internal)?;

        Ok(TodayKcal { date: today, total_kcal })
    }

    /// Meals in range, newest first
    pub async fn history(&self, user_id: Uuid, range: DateRange) -> Result<Vec<MealLog>, ApiError> {
        self.meals
            .find_by_user_and_range(
                user_id,
                range.start_instant(),
                range.end_instant(),
                SortOrder::Descending,
            )
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn delete(&self, user_id: Uuid, log_id: Uuid) -> Result<(), ApiError> {
        delete_owned(self.meals.as_ref(), KIND, user_id, log_id).await?;
        Ok(())
    }

    /// Case-insensitive substring search; a blank query lists every food
    pub async fn search_foods(&self, query: Option<&str>) -> Result<Vec<Food>, ApiError> {
        let query = query.map(str::trim).unwrap_or_default();
        self.foods.search(query).await.map_err(ApiError::Internal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{InMemoryFoodCatalog, InMemoryLogStore};
    use chrono::TimeZone;
    use rstest::rstest;

    fn oatmeal() -> Food {
        Food {
            id: Uuid::new_v4(),
            name: "Oatmeal".into(),
            serving: "1 cup cooked".into(),
            kcal_per_serving: 158,
        }
    }

    fn catalog() -> Vec<Food> {
        vec![
            oatmeal(),
            Food {
                id: Uuid::new_v4(),
                name: "Boiled Egg".into(),
                serving: "1 large".into(),
                kcal_per_serving: 78,
            },
            Food {
                id: Uuid::new_v4(),
                name: "Apple".into(),
                serving: "1 medium".into(),
                kcal_per_serving: 95,
            },
        ]
    }

    fn service_with(foods: Vec<Food>) -> NutritionService {
        NutritionService::new(
            Arc::new(InMemoryLogStore::new()),
            Arc::new(InMemoryFoodCatalog::with_foods(foods)),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 2, 12, 15, 0).unwrap()
    }

    #[tokio::test]
    async fn test_log_meal_by_name_ignores_case() {
        let service = service_with(catalog());
        let user = Uuid::new_v4();

        let meal = service
            .log_meal(user, FoodRef::Name("  oAtMeAl ".into()), 1.5, now())
            .await
            .unwrap();

        assert_eq!(meal.food_name, "Oatmeal");
        assert_eq!(meal.total_kcal, 237);
    }

    #[tokio::test]
    async fn test_log_meal_by_id() {
        let foods = catalog();
        let egg = foods[1].clone();
        let service = service_with(foods);

        let meal = service
            .log_meal(Uuid::new_v4(), FoodRef::Id(egg.id), 2.0, now())
            .await
            .unwrap();

        assert_eq!(meal.food_id, egg.id);
        assert_eq!(meal.total_kcal, 156);
    }

    #[tokio::test]
    async fn test_unknown_food_is_not_found() {
        let service = service_with(catalog());
        let by_name = service
            .log_meal(Uuid::new_v4(), FoodRef::Name("Durian".into()), 1.0, now())
            .await;
        let by_id = service
            .log_meal(Uuid::new_v4(), FoodRef::Id(Uuid::new_v4()), 1.0, now())
            .await;

        assert!(matches!(by_name, Err(ApiError::NotFound(_))));
        assert!(matches!(by_id, Err(ApiError::NotFound(_))));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[tokio::test]
    async fn test_non_positive_servings_rejected(#[case] servings: f64) {
        let service = service_with(catalog());
        let user = Uuid::new_v4();

        let result = service
            .log_meal(user, FoodRef::Name("Apple".into()), servings, now())
            .await;

        assert!(matches!(result, Err(ApiError::Validation { .. })));
        let total = service.today_total(user, now().date_naive()).await.unwrap();
        assert_eq!(total.total_kcal, 0);
    }

    #[tokio::test]
    async fn test_today_total_sums_meals() {
        let service = service_with(catalog());
        let user = Uuid::new_v4();
        service.log_meal(user, FoodRef::Name("Apple".into()), 1.0, now()).await.unwrap();
        service.log_meal(user, FoodRef::Name("Boiled Egg".into()), 2.0, now()).await.unwrap();

        let total = service.today_total(user, now().date_naive()).await.unwrap();
        assert_eq!(total.total_kcal, 95 + 156);
    }

    #[rstest]
    #[case(Some("EGG"), vec!["Boiled Egg"])]
    #[case(Some("a"), vec!["Apple", "Oatmeal"])]
    #[case(Some("   "), vec!["Apple", "Boiled Egg", "Oatmeal"])]
    #[case(None, vec!["Apple", "Boiled Egg", "Oatmeal"])]
    #[case(Some("pizza"), vec![])]
    #[tokio::test]
    async fn test_search_foods(#[case] query: Option<&str>, #[case] expected: Vec<&str>) {
        let service = service_with(catalog());
        let names: Vec<String> = service
            .search_foods(query)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();

        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn test_delete_meal() {
        let service = service_with(catalog());
        let user = Uuid::new_v4();
        let meal = service
            .log_meal(user, FoodRef::Name("Apple".into()), 1.0, now())
            .await
            .unwrap();

        let forbidden = service.delete(Uuid::new_v4(), meal.id).await;
        assert!(matches!(forbidden, Err(ApiError::Forbidden(_))));

        service.delete(user, meal.id).await.unwrap();
        let history = service
            .history(user, DateRange::single_day(now().date_naive()))
            .await
            .unwrap();
        assert!(history.is_empty());
    }
}
