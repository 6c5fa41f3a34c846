//! Agenda - a personal task planner for the terminal
//!
//! Two date-sorted task lists — pending and finished — with add, remove,
//! edit, and move operations, persisted across sessions through pluggable
//! serialization backends (native binary, JSON, YAML).

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{Schedule, Snapshot, StoreError, Task, TaskError, TaskStore};
pub use storage::{Config, Format, Session, SnapshotBackend};
