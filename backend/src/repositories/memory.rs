//! In-memory store implementations
//!
//! Backed by `tokio::sync::RwLock`. Every write replaces whole records under
//! the write lock, so readers never observe a half-updated profile.

use super::{FoodCatalog, LogStore, ProfileStore, SortOrder, SummableLogStore, UserStore};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use health_monitor_shared::{Food, LogEntry, Profile, Summable, User};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

// ============================================================================
// Users
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: User) -> Result<Option<User>> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Ok(None);
        }
        users.insert(user.id, user.clone());
        Ok(Some(user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

// ============================================================================
// Profiles
// ============================================================================

#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<Uuid, Profile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn save(&self, profile: Profile) -> Result<Profile> {
        self.profiles
            .write()
            .await
            .insert(profile.user_id, profile.clone());
        Ok(profile)
    }

    async fn exists(&self, user_id: Uuid) -> Result<bool> {
        Ok(self.profiles.read().await.contains_key(&user_id))
    }
}

// ============================================================================
// Logs
// ============================================================================

/// Generic log store; entries are kept in insertion order
pub struct InMemoryLogStore<T> {
    entries: RwLock<Vec<T>>,
}

impl<T> Default for InMemoryLogStore<T> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl<T> InMemoryLogStore<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted<T: LogEntry>(mut entries: Vec<T>, order: SortOrder) -> Vec<T> {
    // Stable sort; among equal timestamps the later insert counts as newer
    entries.sort_by_key(|e| e.logged_at());
    if order == SortOrder::Descending {
        entries.reverse();
    }
    entries
}

#[async_trait]
impl<T> LogStore<T> for InMemoryLogStore<T>
where
    T: LogEntry + Clone + Send + Sync + 'static,
{
    async fn insert(&self, entry: T) -> Result<T> {
        let mut entries = self.entries.write().await;
        if entries.iter().any(|e| e.id() == entry.id()) {
            bail!("duplicate log id {}", entry.id());
        }
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .find(|e| e.id() == id)
            .cloned())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| e.id() != id);
        Ok(entries.len() < before)
    }

    async fn find_by_user_and_range(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        order: SortOrder,
    ) -> Result<Vec<T>> {
        let matching = self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.user_id() == user_id && e.logged_at() >= start && e.logged_at() <= end)
            .cloned()
            .collect();
        Ok(sorted(matching, order))
    }

    async fn find_by_user(&self, user_id: Uuid, order: SortOrder) -> Result<Vec<T>> {
        let matching = self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.user_id() == user_id)
            .cloned()
            .collect();
        Ok(sorted(matching, order))
    }

    async fn find_latest_by_user(&self, user_id: Uuid) -> Result<Option<T>> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.user_id() == user_id)
            .max_by_key(|e| e.logged_at())
            .cloned())
    }
}

#[async_trait]
impl<T> SummableLogStore<T> for InMemoryLogStore<T>
where
    T: Summable + Clone + Send + Sync + 'static,
{
    async fn sum_by_user_and_range(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.user_id() == user_id && e.logged_at() >= start && e.logged_at() <= end)
            .map(|e| e.quantity())
            .sum())
    }
}

// ============================================================================
// Food catalog
// ============================================================================

#[derive(Default)]
pub struct InMemoryFoodCatalog {
    foods: RwLock<Vec<Food>>,
}

impl InMemoryFoodCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_foods(foods: Vec<Food>) -> Self {
        Self {
            foods: RwLock::new(foods),
        }
    }
}

#[async_trait]
impl FoodCatalog for InMemoryFoodCatalog {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Food>> {
        Ok(self.foods.read().await.iter().find(|f| f.id == id).cloned())
    }

    async fn find_by_name_ignore_case(&self, name: &str) -> Result<Option<Food>> {
        let wanted = name.to_lowercase();
        Ok(self
            .foods
            .read()
            .await
            .iter()
            .find(|f| f.name.to_lowercase() == wanted)
            .cloned())
    }

    async fn search(&self, query: &str) -> Result<Vec<Food>> {
        let needle = query.to_lowercase();
        let mut found: Vec<Food> = self
            .foods
            .read()
            .await
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn insert(&self, food: Food) -> Result<Food> {
        let mut foods = self.foods.write().await;
        let lowered = food.name.to_lowercase();
        if foods.iter().any(|f| f.name.to_lowercase() == lowered) {
            bail!("food named {} already exists", food.name);
        }
        foods.push(food.clone());
        Ok(food)
    }
}

/// Same catalog the seed migration inserts, for the memory backend
pub fn starter_foods() -> Vec<Food> {
    const SEED: [(u128, &str, &str, i32); 10] = [
        (0x6f1c2a8e_0001_4c1a_9a55_000000000001, "Apple", "1 medium (182 g)", 95),
        (0x6f1c2a8e_0001_4c1a_9a55_000000000002, "Banana", "1 medium (118 g)", 105),
        (0x6f1c2a8e_0001_4c1a_9a55_000000000003, "Boiled Egg", "1 large (50 g)", 78),
        (0x6f1c2a8e_0001_4c1a_9a55_000000000004, "Chicken Breast", "100 g, grilled", 165),
        (0x6f1c2a8e_0001_4c1a_9a55_000000000005, "Cooked White Rice", "1 cup (158 g)", 205),
        (0x6f1c2a8e_0001_4c1a_9a55_000000000006, "Greek Yogurt", "170 g, plain non-fat", 100),
        (0x6f1c2a8e_0001_4c1a_9a55_000000000007, "Oatmeal", "1 cup cooked (234 g)", 158),
        (0x6f1c2a8e_0001_4c1a_9a55_000000000008, "Whole Milk", "1 cup (244 g)", 149),
        (0x6f1c2a8e_0001_4c1a_9a55_000000000009, "Whole Wheat Bread", "1 slice (32 g)", 81),
        (0x6f1c2a8e_0001_4c1a_9a55_00000000000a, "Salmon Fillet", "100 g, baked", 206),
    ];

    SEED.iter()
        .map(|(id, name, serving, kcal)| Food {
            id: Uuid::from_u128(*id),
            name: (*name).to_string(),
            serving: (*serving).to_string(),
            kcal_per_serving: *kcal,
        })
        .collect()
}
