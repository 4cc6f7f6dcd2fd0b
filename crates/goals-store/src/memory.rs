// memory.rs: In-process goal store for tests and ephemeral runs.
//
// Goals live in a Vec in insertion order. A switch makes every call fail
// with `StoreError::Unavailable`, which is how the API's 500 paths are
// exercised without a broken disk or database.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::goal::Goal;
use crate::store::GoalStore;

#[derive(Debug, Default)]
pub struct MemoryGoalStore {
    goals: RwLock<Vec<Goal>>,
    unavailable: AtomicBool,
    calls: AtomicU64,
}

impl MemoryGoalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of store calls made so far, successful or not.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl GoalStore for MemoryGoalStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn list_all(&self) -> Result<Vec<Goal>, StoreError> {
        self.enter()?;
        Ok(self.goals.read().await.clone())
    }

    async fn create(&self, text: &str) -> Result<Goal, StoreError> {
        self.enter()?;
        let goal = Goal::new(text);
        self.goals.write().await.push(goal.clone());
        Ok(goal)
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        self.enter()?;
        let mut goals = self.goals.write().await;
        let before = goals.len();
        goals.retain(|g| g.id.as_str() != id);
        Ok(goals.len() != before)
    }
}
