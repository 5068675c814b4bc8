use super::{finish, open_session};
use anyhow::Result;
use clap::Args;
use std::path::Path;

#[derive(Debug, Args)]
pub struct AddSlideArgs {
    /// Title for the new slide
    #[arg(short, long)]
    pub title: Option<String>,
}

pub async fn add_slide(args: AddSlideArgs, cwd: &Path) -> Result<()> {
    let (workspace, mut session) = open_session(cwd, None)?;

    let Some(id) = session.add_slide() else {
        return finish(&workspace, &session, false, "").await;
    };
    if let Some(title) = &args.title {
        session.rename_slide(&id, title);
    }

    finish(&workspace, &session, true, &format!("Added slide {}", id)).await
}

#[derive(Debug, Args)]
pub struct DeleteSlideArgs {
    /// Slide id
    pub slide: String,
}

pub async fn delete_slide(args: DeleteSlideArgs, cwd: &Path) -> Result<()> {
    let (workspace, mut session) = open_session(cwd, None)?;
    let changed = session.delete_slide(&args.slide);

    if changed && session.project().is_none() {
        workspace.persist(&session).await?;
        println!("Deleted the last slide, the project is closed. `arnika undo` brings it back");
        return Ok(());
    }
    finish(
        &workspace,
        &session,
        changed,
        &format!("Deleted slide {}", args.slide),
    )
    .await
}

#[derive(Debug, Args)]
pub struct RenameSlideArgs {
    /// Slide id
    pub slide: String,

    /// New title
    pub title: String,
}

pub async fn rename_slide(args: RenameSlideArgs, cwd: &Path) -> Result<()> {
    let (workspace, mut session) = open_session(cwd, None)?;
    let changed = session.rename_slide(&args.slide, &args.title);
    finish(&workspace, &session, changed, "Renamed slide").await
}

#[derive(Debug, Args)]
pub struct MoveSlideArgs {
    /// Slide id
    pub slide: String,

    /// New position, starting at 1
    pub position: usize,
}

pub async fn move_slide(args: MoveSlideArgs, cwd: &Path) -> Result<()> {
    let (workspace, mut session) = open_session(cwd, None)?;
    let index = args.position.saturating_sub(1);
    let changed = session.move_slide(&args.slide, index);
    finish(
        &workspace,
        &session,
        changed,
        &format!("Moved slide {} to position {}", args.slide, args.position),
    )
    .await
}
