//! # goals-store
//!
//! Goal records and the persistence seam the goals API is built on.
//!
//! ## Key components
//!
//! - [`Goal`]: a short text item with a store-assigned [`GoalId`]
//! - [`GoalStore`]: the narrow list/create/delete contract the API consumes
//! - [`JsonFileGoalStore`]: document store, one JSON file per goal
//! - [`MemoryGoalStore`]: in-memory store with failure injection for tests

pub mod error;
pub mod file;
pub mod goal;
pub mod memory;
pub mod store;

pub use error::StoreError;
pub use file::JsonFileGoalStore;
pub use goal::{Goal, GoalId};
pub use memory::MemoryGoalStore;
pub use store::GoalStore;
