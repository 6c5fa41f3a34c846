//! # Storage Layer
//!
//! Persistence for the task planner.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | native (bincode) / JSON / YAML | `tasks.bin` / `tasks.json` / `tasks.yaml` |
//! | Config | TOML | `config.toml` |
//!
//! Everything lives in one state directory: the platform data dir by
//! default, or `$AGENDA_HOME` when set. The snapshot — both task lists —
//! is written and read as a whole; there is no incremental persistence.
//!
//! Key types:
//! - [`Session`] - entry point; owns the store, config and state directory
//! - [`SnapshotBackend`] - pluggable whole-snapshot encoder/decoder
//! - [`Format`] - registry of available backends
//! - [`Config`] - persisted user configuration

mod backend;
mod config;
mod session;

pub use backend::{Format, JsonBackend, NativeBackend, SnapshotBackend, UnknownFormat, YamlBackend};
pub use config::{Config, ConfigError, ControllerMode};
pub use session::Session;
