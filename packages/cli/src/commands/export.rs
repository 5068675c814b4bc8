use super::open_session;
use anyhow::{anyhow, Result};
use arnika_export::ExportFormat;
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output format (pptx, json)
    #[arg(short, long, default_value = "pptx")]
    pub format: ExportFormat,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,
}

pub fn export(args: ExportArgs, cwd: &Path) -> Result<()> {
    let (_, session) = open_session(cwd, None)?;
    let project = session
        .project()
        .ok_or_else(|| anyhow!("No project open"))?;

    println!(
        "{}",
        format!("📦 Exporting {}...", args.format).bright_blue().bold()
    );
    let file = args.format.export(project)?;
    let path = file.write_to(&cwd.join(&args.out_dir))?;

    println!(
        "  {} {} ({} slides, {} bytes)",
        "✓".green(),
        path.display(),
        project.slides.len(),
        file.bytes.len()
    );
    Ok(())
}
