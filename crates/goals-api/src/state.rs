// state.rs: Shared state handed to every request handler.

use std::sync::Arc;

use goals_store::GoalStore;

use crate::metrics::GoalMetrics;

/// Cloned into each request. Both members are safe for concurrent use, so
/// handlers never need a lock of their own.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GoalStore>,
    pub metrics: Arc<GoalMetrics>,
}

impl AppState {
    pub fn new(store: Arc<dyn GoalStore>, metrics: Arc<GoalMetrics>) -> Self {
        Self { store, metrics }
    }
}
