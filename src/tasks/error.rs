use thiserror::Error;

use crate::database::DatabaseError;
use crate::models::PeriodError;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("Title must not be empty")]
    EmptyTitle,
    #[error("Invalid period: {0}")]
    InvalidPeriod(#[from] PeriodError),
    #[error("No entry at position {index} (there are {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("{0} has not been saved yet")]
    Unsaved(&'static str),
    #[error("Due date out of range after adding {days} days")]
    DueDateOverflow { days: u32 },
}
