//! # Arnika Editor
//!
//! Direct-manipulation editing engine for Arnika slide decks.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ pointer / touch / wheel / context menu      │
//! │  interaction: selection, drag, pinch, zoom  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: one commit per user action         │
//! │  - Mutation → store (pure, structural)      │
//! │  - History push (capacity 30)               │
//! │  - Current slide + selection repair         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ autosave: debounced write to key/value      │
//! │ storage (project + history)                 │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Projects are values**: every edit yields a new project, unchanged
//!    slides are shared with the previous one
//! 2. **One action, one entry**: a drag or an alignment is a single history
//!    step no matter how many elements it touches
//! 3. **Restore is not undo**: jumping back keeps later entries until the
//!    next edit
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arnika_editor::{EditSession, PointerInput, Point};
//! use arnika_model::Template;
//!
//! let mut session = EditSession::new();
//! session.new_from_template(Template::Pitch);
//!
//! session.pointer_down(Some("e1"), PointerInput::at(0.0, 0.0));
//! session.pointer_move(Point::new(100.0, 0.0));
//! session.pointer_up();
//!
//! session.undo();
//! ```

mod autosave;
mod errors;
mod geometry;
mod history;
mod interaction;
mod links;
mod mutations;
mod persistence;
mod pipeline;
mod services;
mod session;

pub mod store;

pub use autosave::{Autosave, DEFAULT_DEBOUNCE};
pub use errors::{EditorError, EditorResult};
pub use geometry::{
    align, drag_delta, fit_scale, Alignment, ElementRect, Point, UnknownAlignment, Zoom,
    FIT_MARGIN, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP,
};
pub use history::{History, HistoryEntry, MAX_HISTORY};
pub use interaction::{
    ContextAction, ContextMenu, Interaction, InteractionState, PointerInput, PointerOutcome,
    UnknownAction,
};
pub use links::{ElementLink, LinkMap, NavLinkStatus, SlideLinks};
pub use mutations::Mutation;
pub use persistence::{
    FileStore, KeyValueStore, MemoryStore, Restored, SaveStatus, StorageError,
    HISTORY_INDEX_KEY, HISTORY_KEY, PROJECT_KEY, TOUR_KEY,
};
pub use pipeline::{ImportError, ImportPipeline, ImportResult};
pub use services::{
    parse_project_response, parse_slide_response, AspectRatio, ImageGenerator,
    PlainTextExtractor, ServiceError, SlideRefiner, SourceFile, StructureGenerator,
    TextExtractor,
};
pub use session::{EditSession, NEW_SLIDE_TITLE, PASTE_OFFSET};

/// Load, save and reset persisted state
pub mod storage {
    pub use crate::persistence::{
        clear, mark_tour_completed, restore, save, save_history, tour_completed,
    };
}
