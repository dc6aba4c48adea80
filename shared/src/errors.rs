//! Shared error types for the entity resolution workflow

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid entity resolution mode: {mode}")]
    InvalidMode { mode: String },

    #[error("Unknown workflow stage: {stage}")]
    UnknownStage { stage: String },

    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
