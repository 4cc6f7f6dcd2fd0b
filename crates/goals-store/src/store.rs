// store.rs: The persistence contract consumed by the API.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::goal::Goal;

/// Persistence backend for goals.
///
/// Implementations must be safe to share across concurrently running
/// requests. No uniqueness, indexing, or transactional guarantees are
/// required beyond what the backend provides on its own.
#[async_trait]
pub trait GoalStore: Send + Sync {
    /// Short name of the backend, used in logs.
    fn backend_tag(&self) -> &'static str;

    /// All goals, oldest first.
    async fn list_all(&self) -> Result<Vec<Goal>, StoreError>;

    /// Persist a new goal with the given text and return it with its assigned id.
    async fn create(&self, text: &str) -> Result<Goal, StoreError>;

    /// Remove the goal with the given id.
    ///
    /// Returns `Ok(false)` when no such goal exists, including ids that are
    /// not even well-formed for this backend.
    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError>;
}
