//! Data access layer
//!
//! Services depend on the store traits defined here, never on a concrete
//! backend. Each trait has a PostgreSQL implementation (sqlx) and an
//! in-memory one used by tests and by the `memory` storage backend.

pub mod exercise;
pub mod hydration;
pub mod memory;
pub mod nutrition;
pub mod profile;
pub mod user;
pub mod weight;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use health_monitor_shared::{
    ActivityLog, Food, LogEntry, MealLog, Profile, Summable, User, WaterLog, WeightLogEntry,
};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

pub use exercise::PgActivityLogStore;
pub use hydration::PgWaterLogStore;
pub use memory::{
    starter_foods, InMemoryFoodCatalog, InMemoryLogStore, InMemoryProfileStore, InMemoryUserStore,
};
pub use nutrition::{PgFoodCatalog, PgMealLogStore};
pub use profile::PgProfileStore;
pub use user::PgUserStore;
pub use weight::PgWeightLogStore;

/// Ordering of log listings by `logged_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// Registered accounts, keyed by id and by normalized email
#[async_trait]
pub trait UserStore: Send + Sync {
    /// `None` when the email is already taken
    async fn insert(&self, user: User) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
}

/// One profile per user
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>>;

    /// Insert or replace the user's profile in a single write
    async fn save(&self, profile: Profile) -> Result<Profile>;

    async fn exists(&self, user_id: Uuid) -> Result<bool>;
}

/// Append/delete-only event log
#[async_trait]
pub trait LogStore<T>: Send + Sync
where
    T: LogEntry + Clone + Send + Sync + 'static,
{
    async fn insert(&self, entry: T) -> Result<T>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>>;

    /// Returns whether a row was removed
    async fn delete_by_id(&self, id: Uuid) -> Result<bool>;

    /// Entries with `start <= logged_at <= end`
    async fn find_by_user_and_range(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        order: SortOrder,
    ) -> Result<Vec<T>>;

    async fn find_by_user(&self, user_id: Uuid, order: SortOrder) -> Result<Vec<T>>;

    /// Newest entry by `logged_at`
    async fn find_latest_by_user(&self, user_id: Uuid) -> Result<Option<T>>;
}

/// Log whose entries carry a quantity that can be summed over a range
#[async_trait]
pub trait SummableLogStore<T>: LogStore<T>
where
    T: Summable + Clone + Send + Sync + 'static,
{
    /// Sum of quantities with `start <= logged_at <= end`; 0 when empty
    async fn sum_by_user_and_range(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64>;
}

/// Read-mostly food reference data
#[async_trait]
pub trait FoodCatalog: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Food>>;

    async fn find_by_name_ignore_case(&self, name: &str) -> Result<Option<Food>>;

    /// Case-insensitive substring match on the name, ordered by name
    async fn search(&self, query: &str) -> Result<Vec<Food>>;

    async fn insert(&self, food: Food) -> Result<Food>;
}

/// Every store the services need, behind trait objects
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub weights: Arc<dyn LogStore<WeightLogEntry>>,
    pub water: Arc<dyn SummableLogStore<WaterLog>>,
    pub meals: Arc<dyn SummableLogStore<MealLog>>,
    pub activities: Arc<dyn SummableLogStore<ActivityLog>>,
    pub foods: Arc<dyn FoodCatalog>,
}

impl Stores {
    /// PostgreSQL-backed stores sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            profiles: Arc::new(PgProfileStore::new(pool.clone())),
            weights: Arc::new(PgWeightLogStore::new(pool.clone())),
            water: Arc::new(PgWaterLogStore::new(pool.clone())),
            meals: Arc::new(PgMealLogStore::new(pool.clone())),
            activities: Arc::new(PgActivityLogStore::new(pool.clone())),
            foods: Arc::new(PgFoodCatalog::new(pool)),
        }
    }

    /// Empty process-local stores with the given food catalog
    pub fn in_memory(foods: Vec<Food>) -> Self {
        Self {
            users: Arc::new(InMemoryUserStore::new()),
            profiles: Arc::new(InMemoryProfileStore::new()),
            weights: Arc::new(InMemoryLogStore::<WeightLogEntry>::new()),
            water: Arc::new(InMemoryLogStore::<WaterLog>::new()),
            meals: Arc::new(InMemoryLogStore::<MealLog>::new()),
            activities: Arc::new(InMemoryLogStore::<ActivityLog>::new()),
            foods: Arc::new(InMemoryFoodCatalog::with_foods(foods)),
        }
    }
}
