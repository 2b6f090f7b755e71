// Store port: what the controller forwards to, without implementing it.
//
// Purpose
// - Describe the three record collections (categories, activities, facts) as traits.
//
// Boundaries
// - No concrete input or output here. Backends implement these traits and are
//   selected through the registry in the shell.

use crate::modules::time_tracking::core::{activity::Activity, category::Category, fact::Fact};
use crate::shared::core::primitives::Millis;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("end time must be after start time")]
    InvalidInterval,

    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait CategoryManager: Send + Sync {
    /// Insert a category without pk, update it otherwise.
    async fn save(&self, category: Category) -> Result<Category, StoreError>;
    async fn get(&self, pk: i64) -> Result<Category, StoreError>;
    async fn get_by_name(&self, name: &str) -> Result<Category, StoreError>;
    async fn get_or_create(&self, name: &str) -> Result<Category, StoreError>;
    async fn get_all(&self) -> Result<Vec<Category>, StoreError>;
    async fn remove(&self, category: &Category) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ActivityManager: Send + Sync {
    async fn save(&self, activity: Activity) -> Result<Activity, StoreError>;
    async fn get(&self, pk: i64) -> Result<Activity, StoreError>;
    async fn get_by_composite(
        &self,
        name: &str,
        category: Option<&Category>,
    ) -> Result<Activity, StoreError>;
    /// Non-deleted activities, optionally narrowed to a category and a name substring.
    async fn get_all(
        &self,
        category: Option<&Category>,
        search_term: Option<&str>,
    ) -> Result<Vec<Activity>, StoreError>;
    async fn remove(&self, activity: &Activity) -> Result<(), StoreError>;
}

#[async_trait]
pub trait FactManager: Send + Sync {
    async fn save(&self, fact: Fact) -> Result<Fact, StoreError>;
    async fn get(&self, pk: i64) -> Result<Fact, StoreError>;
    /// Facts overlapping [start, end], ordered by start time.
    async fn get_all(
        &self,
        start: Option<Millis>,
        end: Option<Millis>,
        search_term: Option<&str>,
    ) -> Result<Vec<Fact>, StoreError>;
    async fn remove(&self, fact: &Fact) -> Result<(), StoreError>;
}

/// A backend handing out its three collections. Implementations return the
/// same manager instances on every call.
pub trait Store: Send + Sync {
    fn categories(&self) -> Arc<dyn CategoryManager>;
    fn activities(&self) -> Arc<dyn ActivityManager>;
    fn facts(&self) -> Arc<dyn FactManager>;
}
