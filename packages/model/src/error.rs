use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid project JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Project has no slides")]
    NoSlides,

    #[error("Duplicate slide id: {0}")]
    DuplicateSlideId(String),

    #[error("Duplicate element id {element_id} on slide {slide_id}")]
    DuplicateElementId { slide_id: String, element_id: String },

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Unknown element type: {0}")]
    UnknownElementType(String),
}
