//! Error types for the editor

use thiserror::Error;

use crate::persistence::StorageError;
use crate::pipeline::ImportError;
use crate::services::ServiceError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("No project is open")]
    NoProject,

    #[error("Slide not found: {0}")]
    SlideNotFound(String),

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Model error: {0}")]
    Model(#[from] arnika_model::ModelError),

    #[error("Refined slide came back as '{returned}', expected '{expected}'")]
    SlideIdChanged { expected: String, returned: String },
}

pub type EditorResult<T> = Result<T, EditorError>;
