//! Pluggable snapshot serialization backends
//!
//! A backend writes and reads the whole `(pending, finished)` snapshot.
//! Three formats are registered: a native binary dump (bincode), JSON and
//! YAML. The engine only ever talks to the [`SnapshotBackend`] trait; the
//! [`Format`] enum is the registry mapping configured names to backends.
//!
//! Loading is total by contract: a missing, unreadable or unparseable file
//! decodes to the empty snapshot, so a first run behaves like an empty
//! task list.
//!
//! JSON and YAML have no native date or task type, so tasks are written as
//! mappings carrying a `__task__` marker, the description, and the date as
//! a `[year, month, day]` triple. On decode, only entries carrying the
//! marker are reconstructed; foreign or malformed entries are dropped.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Snapshot, Task};

/// Raised when a configured format name matches no registered backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown save format \"{0}\" (expected one of: native, json, yaml)")]
pub struct UnknownFormat(pub String);

/// Registered serialization formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Native binary dump
    #[default]
    Native,
    Json,
    Yaml,
}

impl Format {
    /// Every registered format, in menu order
    pub const ALL: [Format; 3] = [Format::Native, Format::Json, Format::Yaml];

    /// Configuration name of the format
    pub fn name(&self) -> &'static str {
        match self {
            Format::Native => "native",
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    /// File extension for the save file
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Native => "bin",
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    /// Human-readable description, shown in the configuration menu
    pub fn describe(&self) -> &'static str {
        match self {
            Format::Native => "compact binary dump, not human-readable",
            Format::Json => "JSON text, readable by other tools",
            Format::Yaml => "YAML text, easiest to edit by hand",
        }
    }

    /// Resolves the backend implementing this format
    pub fn backend(&self) -> &'static dyn SnapshotBackend {
        match self {
            Format::Native => &NativeBackend,
            Format::Json => &JsonBackend,
            Format::Yaml => &YamlBackend,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(Format::Native),
            "json" => Ok(Format::Json),
            "yaml" => Ok(Format::Yaml),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

/// Whole-snapshot encoder/decoder
pub trait SnapshotBackend {
    /// Writes the snapshot to `path`, creating or overwriting the file
    fn save(&self, path: &Path, snapshot: &Snapshot) -> Result<()>;

    /// Reads and decodes `path`. Total: any failure yields the empty snapshot.
    fn load(&self, path: &Path) -> Snapshot;
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write save file: {}", path.display()))
}

/// Native binary backend (bincode)
///
/// Encodes the snapshot directly, keeping full type fidelity.
pub struct NativeBackend;

impl SnapshotBackend for NativeBackend {
    fn save(&self, path: &Path, snapshot: &Snapshot) -> Result<()> {
        let bytes = bincode::serde::encode_to_vec(snapshot, bincode::config::standard())
            .context("Failed to encode snapshot")?;
        write_file(path, &bytes)
    }

    fn load(&self, path: &Path) -> Snapshot {
        let Ok(bytes) = fs::read(path) else {
            return Snapshot::default();
        };
        bincode::serde::decode_from_slice(&bytes, bincode::config::standard())
            .map(|(snapshot, _)| snapshot)
            .unwrap_or_default()
    }
}

/// Task as written to the text formats
#[derive(Serialize)]
struct TaggedTask<'a> {
    #[serde(rename = "__task__")]
    marker: bool,
    content: &'a str,
    date: (i32, u32, u32),
}

impl<'a> TaggedTask<'a> {
    fn from_task(task: &'a Task) -> Self {
        Self {
            marker: true,
            content: &task.content,
            date: task.date_parts(),
        }
    }
}

fn tag_snapshot(snapshot: &Snapshot) -> (Vec<TaggedTask<'_>>, Vec<TaggedTask<'_>>) {
    (
        snapshot.pending.iter().map(TaggedTask::from_task).collect(),
        snapshot.finished.iter().map(TaggedTask::from_task).collect(),
    )
}

/// JSON text backend
pub struct JsonBackend;

impl SnapshotBackend for JsonBackend {
    fn save(&self, path: &Path, snapshot: &Snapshot) -> Result<()> {
        let text =
            serde_json::to_string(&tag_snapshot(snapshot)).context("Failed to encode snapshot")?;
        write_file(path, text.as_bytes())
    }

    fn load(&self, path: &Path) -> Snapshot {
        let Ok(text) = fs::read_to_string(path) else {
            return Snapshot::default();
        };
        let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) else {
            return Snapshot::default();
        };

        match value.as_array().map(Vec::as_slice) {
            Some([pending, finished]) => Snapshot {
                pending: decode_json_list(pending),
                finished: decode_json_list(finished),
            },
            _ => Snapshot::default(),
        }
    }
}

fn decode_json_list(value: &serde_json::Value) -> Vec<Task> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };
    entries.iter().filter_map(decode_json_task).collect()
}

fn decode_json_task(value: &serde_json::Value) -> Option<Task> {
    if !value.get("__task__")?.as_bool().unwrap_or(false) {
        return None;
    }
    let content = value.get("content")?.as_str()?;
    let date = value.get("date")?.as_array()?;
    let [year, month, day] = date.as_slice() else {
        return None;
    };
    Task::new(
        content,
        i32::try_from(year.as_i64()?).ok()?,
        u32::try_from(month.as_i64()?).ok()?,
        u32::try_from(day.as_i64()?).ok()?,
    )
    .ok()
}

/// YAML text backend
pub struct YamlBackend;

impl SnapshotBackend for YamlBackend {
    fn save(&self, path: &Path, snapshot: &Snapshot) -> Result<()> {
        let text =
            serde_yaml::to_string(&tag_snapshot(snapshot)).context("Failed to encode snapshot")?;
        write_file(path, text.as_bytes())
    }

    fn load(&self, path: &Path) -> Snapshot {
        let Ok(text) = fs::read_to_string(path) else {
            return Snapshot::default();
        };
        let Ok(value) = serde_yaml::from_str::<serde_yaml::Value>(&text) else {
            return Snapshot::default();
        };

        match value.as_sequence().map(Vec::as_slice) {
            Some([pending, finished]) => Snapshot {
                pending: decode_yaml_list(pending),
                finished: decode_yaml_list(finished),
            },
            _ => Snapshot::default(),
        }
    }
}

fn decode_yaml_list(value: &serde_yaml::Value) -> Vec<Task> {
    let Some(entries) = value.as_sequence() else {
        return Vec::new();
    };
    entries.iter().filter_map(decode_yaml_task).collect()
}

fn decode_yaml_task(value: &serde_yaml::Value) -> Option<Task> {
    if !value.get("__task__")?.as_bool().unwrap_or(false) {
        return None;
    }
    let content = value.get("content")?.as_str()?;
    let date = value.get("date")?.as_sequence()?;
    let [year, month, day] = date.as_slice() else {
        return None;
    };
    Task::new(
        content,
        i32::try_from(year.as_i64()?).ok()?,
        u32::try_from(month.as_i64()?).ok()?,
        u32::try_from(day.as_i64()?).ok()?,
    )
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            pending: vec![
                Task::new("A", 1, 1, 1).unwrap(),
                Task::new("B", 2020, 6, 15).unwrap(),
            ],
            finished: vec![Task::new("C", 1000, 2, 3).unwrap()],
        }
    }

    fn roundtrip(format: Format) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(format!("tasks.{}", format.extension()));
        let backend = format.backend();
        let snapshot = sample_snapshot();

        backend.save(&path, &snapshot).unwrap();
        let loaded = backend.load(&path);

        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn native_roundtrip() {
        roundtrip(Format::Native);
    }

    #[test]
    fn json_roundtrip() {
        roundtrip(Format::Json);
    }

    #[test]
    fn yaml_roundtrip() {
        roundtrip(Format::Yaml);
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("does-not-exist");

        for format in Format::ALL {
            assert_eq!(format.backend().load(&path), Snapshot::default());
        }
    }

    #[test]
    fn load_garbage_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks");
        fs::write(&path, b"{ not a snapshot ]").unwrap();

        for format in Format::ALL {
            assert_eq!(format.backend().load(&path), Snapshot::default());
        }
    }

    #[test]
    fn json_preserves_content_and_date() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        let snapshot = Snapshot {
            pending: vec![Task::new("A", 1, 1, 1).unwrap()],
            finished: vec![],
        };

        JsonBackend.save(&path, &snapshot).unwrap();
        let loaded = JsonBackend.load(&path);

        assert_eq!(loaded.pending[0].content, "A");
        assert_eq!(loaded.pending[0].date_parts(), (1, 1, 1));
        assert!(loaded.finished.is_empty());
    }

    #[test]
    fn json_wire_shape_is_tagged_tuple() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");

        JsonBackend.save(&path, &sample_snapshot()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let first = &value[0][0];
        assert_eq!(first["__task__"], serde_json::json!(true));
        assert_eq!(first["content"], serde_json::json!("A"));
        assert_eq!(first["date"], serde_json::json!([1, 1, 1]));
    }

    #[test]
    fn json_drops_untagged_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(
            &path,
            r#"[[{"__task__": true, "content": "A", "date": [2020, 1, 1]},
                {"content": "not tagged", "date": [2020, 1, 2]},
                "foreign",
                {"__task__": true, "content": "bad date", "date": [2020, 2, 31]}],
               []]"#,
        )
        .unwrap();

        let loaded = JsonBackend.load(&path);

        assert_eq!(loaded.pending.len(), 1);
        assert_eq!(loaded.pending[0].content, "A");
    }

    #[test]
    fn yaml_drops_untagged_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.yaml");
        fs::write(
            &path,
            concat!(
                "- - __task__: true\n",
                "    content: A\n",
                "    date: [2020, 1, 1]\n",
                "  - stray: entry\n",
                "- []\n",
            ),
        )
        .unwrap();

        let loaded = YamlBackend.load(&path);

        assert_eq!(loaded.pending.len(), 1);
        assert_eq!(loaded.pending[0].content, "A");
        assert!(loaded.finished.is_empty());
    }

    #[test]
    fn json_wrong_shape_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, r#"{"pending": [], "finished": []}"#).unwrap();

        assert_eq!(JsonBackend.load(&path), Snapshot::default());
    }

    #[test]
    fn format_registry() {
        assert_eq!("native".parse::<Format>().unwrap(), Format::Native);
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("yaml".parse::<Format>().unwrap(), Format::Yaml);
        assert_eq!(
            "pickle".parse::<Format>(),
            Err(UnknownFormat("pickle".to_string()))
        );

        for format in Format::ALL {
            assert_eq!(format.name().parse::<Format>().unwrap(), format);
        }
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("tasks.json");

        JsonBackend.save(&path, &Snapshot::default()).unwrap();

        assert!(path.exists());
    }
}
