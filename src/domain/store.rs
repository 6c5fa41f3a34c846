//! In-memory task store
//!
//! Owns the two task lists — pending and finished — and keeps both sorted
//! ascending by date at all times. New tasks and moved tasks are stably
//! inserted at their sorted position, so tasks sharing a date keep their
//! insertion order and positional indices stay meaningful between views.
//!
//! Tasks are addressed by positional index into the current sorted list.
//! Any mutation invalidates previously fetched indices; callers must
//! re-fetch the view before reusing one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::task::{Task, TaskError};

/// Failures raised by store mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The positional index does not name an existing task
    #[error("no task at position {index} (list has {len} tasks)")]
    OutOfRange { index: usize, len: usize },

    /// Task validation failed
    #[error(transparent)]
    Task(#[from] TaskError),
}

/// The unit of persistence: both task lists, saved and loaded together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub pending: Vec<Task>,
    pub finished: Vec<Task>,
}

impl Snapshot {
    /// Returns true if both lists are empty
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.finished.is_empty()
    }
}

/// The task engine: two date-sorted lists plus the mutations over them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStore {
    pending: Vec<Task>,
    finished: Vec<Task>,
}

/// Stable insert at the sorted position: after every existing task with an
/// earlier or equal date, like `bisect.insort`.
fn insort(list: &mut Vec<Task>, task: Task) {
    let at = list.partition_point(|t| t.date <= task.date);
    list.insert(at, task);
}

fn take_at(list: &mut Vec<Task>, index: usize) -> Result<Task, StoreError> {
    if index >= list.len() {
        return Err(StoreError::OutOfRange {
            index,
            len: list.len(),
        });
    }
    Ok(list.remove(index))
}

impl TaskStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a loaded snapshot.
    ///
    /// The on-disk order is not trusted: both lists are re-sorted (stably)
    /// so the sort invariant holds regardless of what the backend decoded.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let Snapshot {
            mut pending,
            mut finished,
        } = snapshot;
        pending.sort_by_key(|t| t.date);
        finished.sort_by_key(|t| t.date);
        Self { pending, finished }
    }

    /// Clones the current state into a snapshot
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pending: self.pending.clone(),
            finished: self.finished.clone(),
        }
    }

    /// Read-only view of pending tasks, sorted ascending by date
    pub fn pending(&self) -> &[Task] {
        &self.pending
    }

    /// Read-only view of finished tasks, sorted ascending by date
    pub fn finished(&self) -> &[Task] {
        &self.finished
    }

    /// Adds a new pending task at its sorted position
    pub fn new_task(
        &mut self,
        content: impl Into<String>,
        year: i32,
        month: u32,
        day: u32,
    ) -> Result<(), TaskError> {
        let task = Task::new(content, year, month, day)?;
        insort(&mut self.pending, task);
        Ok(())
    }

    /// Removes the pending task at `index`
    pub fn remove_pending(&mut self, index: usize) -> Result<Task, StoreError> {
        take_at(&mut self.pending, index)
    }

    /// Removes the finished task at `index`
    pub fn remove_finished(&mut self, index: usize) -> Result<Task, StoreError> {
        take_at(&mut self.finished, index)
    }

    /// Edits the pending task at `index`.
    ///
    /// `None` leaves a field unchanged. A date change can break the sort
    /// order, so the list is re-sorted afterwards.
    pub fn edit_pending(
        &mut self,
        index: usize,
        content: Option<String>,
        date: Option<(i32, u32, u32)>,
    ) -> Result<(), StoreError> {
        Self::edit(&mut self.pending, index, content, date)
    }

    /// Edits the finished task at `index`; same contract as [`edit_pending`](Self::edit_pending)
    pub fn edit_finished(
        &mut self,
        index: usize,
        content: Option<String>,
        date: Option<(i32, u32, u32)>,
    ) -> Result<(), StoreError> {
        Self::edit(&mut self.finished, index, content, date)
    }

    fn edit(
        list: &mut Vec<Task>,
        index: usize,
        content: Option<String>,
        date: Option<(i32, u32, u32)>,
    ) -> Result<(), StoreError> {
        if index >= list.len() {
            return Err(StoreError::OutOfRange {
                index,
                len: list.len(),
            });
        }

        // Validate the replacement before touching the task, so a bad
        // date leaves the store unmodified.
        let new_date = match date {
            Some((year, month, day)) => {
                Some(chrono::NaiveDate::from_ymd_opt(year, month, day).ok_or(
                    TaskError::InvalidDate { year, month, day },
                )?)
            }
            None => None,
        };

        let task = &mut list[index];
        if let Some(content) = content {
            task.content = content;
        }
        if let Some(date) = new_date {
            task.date = date;
            list.sort_by_key(|t| t.date);
        }
        Ok(())
    }

    /// Moves the pending task at `index` into the finished list
    pub fn finish(&mut self, index: usize) -> Result<(), StoreError> {
        let task = take_at(&mut self.pending, index)?;
        insort(&mut self.finished, task);
        Ok(())
    }

    /// Moves the finished task at `index` back into the pending list
    pub fn unfinish(&mut self, index: usize) -> Result<(), StoreError> {
        let task = take_at(&mut self.finished, index)?;
        insort(&mut self.pending, task);
        Ok(())
    }

    /// Empties the finished list
    pub fn clear_finished(&mut self) {
        self.finished.clear();
    }
}
