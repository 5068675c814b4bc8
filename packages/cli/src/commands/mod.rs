pub mod edit;
pub mod export;
pub mod history;
pub mod init;
pub mod show;
pub mod slides;
pub mod theme;

pub use edit::{
    action, add_element, align, delete_element, drag, hide, link, style, text, ActionArgs,
    AddElementArgs, AlignArgs, DeleteElementArgs, DragArgs, HideArgs, LinkArgs, StyleArgs,
    TextArgs,
};
pub use export::{export, ExportArgs};
pub use history::{history, redo, restore, undo, RestoreArgs, StepArgs};
pub use init::{import, init, reset, ImportArgs, InitArgs, ResetArgs};
pub use show::{links, show, LinksArgs, ShowArgs};
pub use slides::{
    add_slide, delete_slide, move_slide, rename_slide, AddSlideArgs, DeleteSlideArgs,
    MoveSlideArgs, RenameSlideArgs,
};
pub use theme::{theme, ThemeArgs};

use anyhow::{bail, Result};
use arnika_editor::EditSession;
use colored::Colorize;
use std::path::Path;

use crate::workspace::Workspace;

/// Open the stored session and make `slide` current when given
pub(crate) fn open_session(cwd: &Path, slide: Option<&str>) -> Result<(Workspace, EditSession)> {
    let workspace = Workspace::open(cwd)?;
    let mut session = workspace.session_with_project()?;
    if let Some(slide) = slide {
        if !session.select_slide(slide) {
            bail!("Slide not found: {}", slide);
        }
    }
    Ok((workspace, session))
}

/// Persist after an edit and tell the user what happened
pub(crate) async fn finish(
    workspace: &Workspace,
    session: &EditSession,
    changed: bool,
    done: &str,
) -> Result<()> {
    if !changed {
        println!("{} Nothing changed", "·".dimmed());
        return Ok(());
    }
    workspace.persist(session).await?;
    println!("  {} {}", "✓".green(), done);
    Ok(())
}
