//! Task domain model
//!
//! A task is a plain value: a description plus the calendar date it is due.
//! Dates drive ordering and the overdue/today display classification;
//! the description never participates in ordering.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation failures when constructing or editing a task
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The description was the empty string, which is reserved as the
    /// "leave unchanged" sentinel in edit dialogs.
    #[error("task description must not be empty")]
    EmptyContent,

    /// The (year, month, day) triple does not name a calendar date
    #[error("{year:04}-{month:02}-{day:02} is not a valid calendar date")]
    InvalidDate { year: i32, month: u32, day: u32 },
}

/// Display classification of a pending task relative to a reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Due date is in the past
    Overdue,
    /// Due today
    Today,
    /// Due date is in the future
    Upcoming,
}

/// One to-do item
///
/// Two tasks are equal iff both description and date are equal. Tasks
/// deliberately do not implement `Ord`: they sort by date alone, which
/// would disagree with field-wise equality. The store sorts by the date
/// key instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Text description
    pub content: String,

    /// Due date, the sole ordering key
    pub date: NaiveDate,
}

impl Task {
    /// Creates a task, validating the description and the date triple
    pub fn new(content: impl Into<String>, year: i32, month: u32, day: u32) -> Result<Self, TaskError> {
        let content = content.into();
        if content.is_empty() {
            return Err(TaskError::EmptyContent);
        }

        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(TaskError::InvalidDate { year, month, day })?;

        Ok(Self { content, date })
    }

    /// Classifies the task against a reference date (usually today)
    pub fn schedule(&self, today: NaiveDate) -> Schedule {
        if self.date < today {
            Schedule::Overdue
        } else if self.date == today {
            Schedule::Today
        } else {
            Schedule::Upcoming
        }
    }

    /// Returns the date as a (year, month, day) triple for wire encoding
    pub fn date_parts(&self) -> (i32, u32, u32) {
        use chrono::Datelike;
        (self.date.year(), self.date.month(), self.date.day())
    }
}
