//! # Arnika Export
//!
//! Turns a project into a downloadable presentation.
//!
//! ```text
//! Project ──► Deck (inches, stripped colours) ──► .pptx package
//!                                            └──► deck JSON
//! ```

mod deck;
mod error;
mod exporter;
mod media;
mod pptx;

pub use deck::{Deck, DeckShape, DeckSlide, Frame, FALLBACK_HYPERLINK, SLIDE_HEIGHT, SLIDE_WIDTH};
pub use error::{ExportError, ExportResult};
pub use exporter::{
    file_name, ExportFormat, ExportedFile, JsonDeckExporter, PptxExporter, PresentationExporter,
};
pub use pptx::{hex_color, write_pptx};
