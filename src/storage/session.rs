//! Session: the entry point tying store, config, and backend together
//!
//! A session owns the in-memory [`TaskStore`], the configuration, and the
//! state directory holding both the config file and the save file. The
//! save file is named `tasks` plus the active format's extension, so each
//! format persists to its own file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::domain::TaskStore;
use crate::storage::backend::Format;
use crate::storage::config::Config;

/// Base name of the save file, extended per format
const SAVE_BASE: &str = "tasks";

/// An open task-planner session
pub struct Session {
    dir: PathBuf,
    config: Config,
    pub store: TaskStore,
}

impl Session {
    /// Opens the session in the default state directory.
    ///
    /// `AGENDA_HOME` overrides the platform data directory, which is what
    /// the tests use.
    pub fn open() -> Result<Self> {
        let dir = match std::env::var_os("AGENDA_HOME") {
            Some(home) => PathBuf::from(home),
            None => ProjectDirs::from("dev", "agenda", "agenda-cli")
                .context("Could not determine a data directory for the task list")?
                .data_dir()
                .to_path_buf(),
        };
        Self::open_at(dir)
    }

    /// Opens the session in a specific state directory, loading the
    /// persisted snapshot through the configured backend
    pub fn open_at(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let config = Config::load(&dir)?;

        let store = {
            let format = config.save_method;
            let snapshot = format.backend().load(&save_path(&dir, format));
            TaskStore::from_snapshot(snapshot)
        };

        Ok(Self { dir, config, store })
    }

    /// Returns the state directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the loaded configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the active save format
    pub fn active_format(&self) -> Format {
        self.config.save_method
    }

    /// Returns the path the active backend saves to
    pub fn save_path(&self) -> PathBuf {
        save_path(&self.dir, self.config.save_method)
    }

    /// Serializes the current snapshot to disk, overwriting the save file
    pub fn save(&self) -> Result<()> {
        let format = self.config.save_method;
        format.backend().save(&self.save_path(), &self.store.snapshot())
    }

    /// Returns true iff the in-memory state differs from the persisted
    /// snapshot. A missing or unreadable save file counts as empty.
    pub fn changes_detected(&self) -> bool {
        let format = self.config.save_method;
        let on_disk = format.backend().load(&self.save_path());
        on_disk != self.store.snapshot()
    }

    /// Switches the active save format and persists the choice.
    ///
    /// Unknown format names are rejected earlier, when parsing the name
    /// into a [`Format`] at the presentation boundary.
    pub fn set_format(&mut self, format: Format) -> Result<()> {
        self.config.save_method = format;
        self.config.save(&self.dir)
    }
}

fn save_path(dir: &Path, format: Format) -> PathBuf {
    dir.join(format!("{}.{}", SAVE_BASE, format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> Session {
        Session::open_at(dir.path()).unwrap()
    }

    #[test]
    fn fresh_session_is_empty() {
        let dir = TempDir::new().unwrap();
        let session = open(&dir);

        assert!(session.store.pending().is_empty());
        assert!(session.store.finished().is_empty());
        assert_eq!(session.active_format(), Format::Native);
    }

    #[test]
    fn save_and_reopen() {
        let dir = TempDir::new().unwrap();

        let mut session = open(&dir);
        session.store.new_task("A", 2020, 1, 2).unwrap();
        session.store.new_task("B", 2020, 1, 1).unwrap();
        session.store.finish(0).unwrap();
        session.save().unwrap();

        let reopened = open(&dir);
        assert_eq!(reopened.store.pending().len(), 1);
        assert_eq!(reopened.store.pending()[0].content, "A");
        assert_eq!(reopened.store.finished()[0].content, "B");
    }

    #[test]
    fn changes_detected_against_disk() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir);

        // Nothing in memory, nothing on disk
        assert!(!session.changes_detected());

        session.store.new_task("A", 2020, 1, 1).unwrap();
        assert!(session.changes_detected());

        session.save().unwrap();
        assert!(!session.changes_detected());

        session.store.remove_pending(0).unwrap();
        assert!(session.changes_detected());
    }

    #[test]
    fn set_format_persists_and_switches_target() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir);
        session.store.new_task("A", 2020, 1, 1).unwrap();

        session.set_format(Format::Json).unwrap();
        session.save().unwrap();

        assert!(dir.path().join("tasks.json").exists());

        // The choice survives a reopen
        let reopened = open(&dir);
        assert_eq!(reopened.active_format(), Format::Json);
        assert_eq!(reopened.store.pending()[0].content, "A");
    }

    #[test]
    fn each_format_has_its_own_save_file() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir);
        session.store.new_task("native copy", 2020, 1, 1).unwrap();
        session.save().unwrap();

        session.set_format(Format::Yaml).unwrap();
        // The yaml file does not exist yet, so the store diverges from it
        assert!(session.changes_detected());
        session.save().unwrap();

        assert!(dir.path().join("tasks.bin").exists());
        assert!(dir.path().join("tasks.yaml").exists());
        assert!(!session.changes_detected());
    }

    #[test]
    fn snapshot_roundtrips_through_every_format() {
        for format in Format::ALL {
            let dir = TempDir::new().unwrap();
            let mut session = open(&dir);
            session.set_format(format).unwrap();
            session.store.new_task("A", 1, 1, 1).unwrap();
            session.store.new_task("B", 1000, 2, 3).unwrap();
            session.store.finish(1).unwrap();
            session.save().unwrap();

            let reopened = open(&dir);
            assert_eq!(
                reopened.store.snapshot(),
                session.store.snapshot(),
                "roundtrip mismatch for {format}"
            );
        }
    }
}
