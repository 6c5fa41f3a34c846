//! Domain models for Agenda
//!
//! Contains the task model and the in-memory store without any I/O concerns.

mod store;
mod task;

pub use store::{Snapshot, StoreError, TaskStore};
pub use task::{Schedule, Task, TaskError};
