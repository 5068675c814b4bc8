mod commands;
mod config;
mod outline;
mod workspace;

use std::path::Path;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::*;

use crate::config::Config;

/// Arnika CLI - edit, arrange and export slide decks from the terminal
#[derive(Parser, Debug)]
#[command(name = "arnika")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a new project from a template
    Init(InitArgs),

    /// Import a project JSON or document outline
    Import(ImportArgs),

    /// Print the open project
    Show(ShowArgs),

    /// Append a blank slide
    AddSlide(AddSlideArgs),

    /// Delete a slide
    DeleteSlide(DeleteSlideArgs),

    /// Rename a slide
    RenameSlide(RenameSlideArgs),

    /// Move a slide to a new position
    MoveSlide(MoveSlideArgs),

    /// Add an element to a slide
    AddElement(AddElementArgs),

    /// Delete an element
    DeleteElement(DeleteElementArgs),

    /// Change element styles
    Style(StyleArgs),

    /// Replace element text
    Text(TextArgs),

    /// Point an element at a slide or URL
    Link(LinkArgs),

    /// Toggle element visibility
    Hide(HideArgs),

    /// Run a context-menu action (duplicate, front, back, group, ...)
    Action(ActionArgs),

    /// Drag elements by a pixel offset
    Drag(DragArgs),

    /// Align selected elements
    Align(AlignArgs),

    /// Change the theme
    Theme(ThemeArgs),

    /// Undo the last change
    Undo(StepArgs),

    /// Redo an undone change
    Redo(StepArgs),

    /// List the history timeline
    History,

    /// Jump to a history entry
    Restore(RestoreArgs),

    /// Show slide links and broken targets
    Links(LinksArgs),

    /// Export the project as a presentation
    Export(ExportArgs),

    /// Clear the stored project and history
    Reset(ResetArgs),
}

async fn run(command: Command, cwd: &Path) -> anyhow::Result<()> {
    match command {
        Command::Init(args) => init(args, cwd).await,
        Command::Import(args) => import(args, cwd).await,
        Command::Show(args) => show(args, cwd),
        Command::AddSlide(args) => add_slide(args, cwd).await,
        Command::DeleteSlide(args) => delete_slide(args, cwd).await,
        Command::RenameSlide(args) => rename_slide(args, cwd).await,
        Command::MoveSlide(args) => move_slide(args, cwd).await,
        Command::AddElement(args) => add_element(args, cwd).await,
        Command::DeleteElement(args) => delete_element(args, cwd).await,
        Command::Style(args) => style(args, cwd).await,
        Command::Text(args) => text(args, cwd).await,
        Command::Link(args) => link(args, cwd).await,
        Command::Hide(args) => hide(args, cwd).await,
        Command::Action(args) => action(args, cwd).await,
        Command::Drag(args) => drag(args, cwd).await,
        Command::Align(args) => align(args, cwd).await,
        Command::Theme(args) => theme(args, cwd).await,
        Command::Undo(args) => undo(args, cwd).await,
        Command::Redo(args) => redo(args, cwd).await,
        Command::History => history(cwd),
        Command::Restore(args) => restore(args, cwd).await,
        Command::Links(args) => links(args, cwd),
        Command::Export(args) => export(args, cwd),
        Command::Reset(args) => reset(args, cwd),
    }
}

fn init_logging(cwd: &Path) {
    let level = Config::load(cwd)
        .map(|config| config.log_level)
        .unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };
    init_logging(&cwd);

    if let Err(err) = run(cli.command, &cwd).await {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!(
            "{} if the stored project is damaged, `arnika reset` clears it",
            "hint:".yellow()
        );
        eprintln!();
        std::process::exit(1);
    }
}
