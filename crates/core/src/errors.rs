use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Field schedule already exists")]
    ScheduleAlreadyExists,

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] eyre::Report),
}

impl ScheduleError {
    pub fn field_not_found(token: impl std::fmt::Display) -> Self {
        ScheduleError::NotFound(format!("Field with ID {} not found", token))
    }

    pub fn time_not_found(token: impl std::fmt::Display) -> Self {
        ScheduleError::NotFound(format!("Time with ID {} not found", token))
    }

    pub fn schedule_not_found(token: impl std::fmt::Display) -> Self {
        ScheduleError::NotFound(format!("Field schedule with ID {} not found", token))
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
