use std::io;

use thiserror::Error;

/// Errors that can occur while exporting a project
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Project has no slides to export")]
    NoSlides,

    #[error("Unknown export format '{0}' (expected pptx or json)")]
    UnknownFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Packaging error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;
