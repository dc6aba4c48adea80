//! Workflow-specific error types

use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Invalid entity resolution mode: {mode}")]
    InvalidMode { mode: String },

    #[error("Ground truth is required for {operation}")]
    MissingGroundTruth { operation: String },

    #[error("Method '{method}' does not support {mode} configuration search")]
    UnsupportedConfiguration { method: String, mode: String },

    #[error("Configuration index {index} out of range for '{method}' ({count} configurations)")]
    ConfigurationOutOfRange {
        method: String,
        index: usize,
        count: usize,
    },

    #[error("Clean-clean resolution requires a target profile collection")]
    MissingTargetProfiles,

    #[error("Unknown method: {name}")]
    UnknownMethod { name: String },

    #[error("Report channel closed")]
    ReportChannelClosed,

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Optimization trial worker failed: {message}")]
    TrialPanicked { message: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl WorkflowError {
    pub fn missing_ground_truth(operation: impl Into<String>) -> Self {
        WorkflowError::MissingGroundTruth {
            operation: operation.into(),
        }
    }

    pub fn unsupported(method: impl Into<String>, mode: impl Into<String>) -> Self {
        WorkflowError::UnsupportedConfiguration {
            method: method.into(),
            mode: mode.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        WorkflowError::InvalidInput {
            message: message.into(),
        }
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
