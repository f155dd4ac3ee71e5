//! Business logic services
//!
//! Services encapsulate business logic and coordinate between the store
//! traits in [`crate::repositories`]. They take the clock as an explicit
//! `now`/`today` argument and never read it themselves.

pub mod exercise;
pub mod hydration;
mod log_entries;
pub mod nutrition;
pub mod profile;
pub mod statistics;
pub mod user;
pub mod weight;

pub use exercise::ExerciseService;
pub use hydration::HydrationService;
pub use log_entries::delete_owned;
pub use nutrition::NutritionService;
pub use profile::ProfileService;
pub use statistics::StatisticsService;
pub use user::UserService;
pub use weight::WeightService;

use crate::repositories::Stores;

/// All services, wired to one set of stores
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub profiles: ProfileService,
    pub weight: WeightService,
    pub hydration: HydrationService,
    pub nutrition: NutritionService,
    pub exercise: ExerciseService,
    pub statistics: StatisticsService,
}

impl Services {
    pub fn new(stores: Stores) -> Self {
        let profiles = ProfileService::new(stores.profiles.clone());

        Self {
            users: UserService::new(stores.users.clone()),
            weight: WeightService::new(stores.weights.clone(), profiles.clone()),
            hydration: HydrationService::new(stores.water.clone(), stores.profiles.clone()),
            nutrition: NutritionService::new(stores.meals.clone(), stores.foods.clone()),
            exercise: ExerciseService::new(stores.activities.clone(), stores.profiles.clone()),
            statistics: StatisticsService::new(
                stores.water,
                stores.meals,
                stores.activities,
                stores.profiles,
            ),
            profiles,
        }
    }
}
