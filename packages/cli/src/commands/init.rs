use crate::config::{Config, DEFAULT_CONFIG_NAME};
use crate::outline::OutlineGenerator;
use crate::workspace::Workspace;
use anyhow::{anyhow, Result};
use arnika_editor::{storage, KeyValueStore, PlainTextExtractor, SourceFile, TOUR_KEY};
use arnika_model::Template;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Template to start from (pitch, portfolio). Defaults to the config value
    pub template: Option<String>,

    /// Replace a project that is already open
    #[arg(short, long)]
    pub force: bool,
}

pub async fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);
    if !config_path.exists() {
        let config_json = serde_json::to_string_pretty(&Config::default())?;
        fs::write(&config_path, config_json)?;
        println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    }

    let workspace = Workspace::open(cwd)?;
    let kind: Template = match &args.template {
        Some(name) => name.parse()?,
        None => workspace.config.template()?,
    };

    let mut session = workspace.session();
    if let Some(project) = session.project() {
        if !args.force {
            println!(
                "{} {} is already open",
                "⚠️".yellow(),
                project.name.bright_white()
            );
            println!("Use --force to start over");
            return Ok(());
        }
    }

    println!("{}", "📝 Starting a new deck...".bright_blue().bold());
    session.new_from_template(kind);
    workspace.persist(&session).await?;

    if let Some(project) = session.project() {
        println!(
            "  {} {} ({} slides)",
            "✓".green(),
            project.name.bright_white(),
            project.slides.len()
        );
    }
    println!();
    println!("Next steps:");
    println!("  1. Run: arnika show");
    println!("  2. Run: arnika add-element text \"Hello\"");
    println!("  3. Run: arnika export");

    Ok(())
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Document to import (.json project, .md/.txt outline)
    pub file: PathBuf,
}

pub async fn import(args: ImportArgs, cwd: &Path) -> Result<()> {
    let path = cwd.join(&args.file);
    let file = SourceFile::read(&path)
        .map_err(|e| anyhow!("Cannot read {}: {}", path.display(), e))?;

    let workspace = Workspace::open(cwd)?;
    let mut session = workspace.session();

    println!(
        "{} {}",
        "📥 Importing".bright_blue().bold(),
        file.name.bright_white()
    );
    session
        .import(&PlainTextExtractor, &OutlineGenerator, &file)
        .await?;
    workspace.persist(&session).await?;

    if let Some(project) = session.project() {
        println!(
            "  {} {} ({} slides)",
            "✓".green(),
            project.name.bright_white(),
            project.slides.len()
        );
    }
    Ok(())
}

#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Also forget that the onboarding tour was completed
    #[arg(long)]
    pub tour: bool,
}

pub fn reset(args: ResetArgs, cwd: &Path) -> Result<()> {
    let workspace = Workspace::open(cwd)?;
    storage::clear(workspace.store())?;
    if args.tour {
        workspace.store().remove(TOUR_KEY)?;
    }

    println!(
        "  {} Cleared {}",
        "✓".green(),
        workspace.store_dir().display()
    );
    Ok(())
}
