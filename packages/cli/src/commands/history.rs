use super::{finish, open_session};
use crate::workspace::Workspace;
use anyhow::{bail, Result};
use chrono::{Local, TimeZone};
use clap::Args;
use colored::Colorize;
use std::path::Path;

#[derive(Debug, Args)]
pub struct StepArgs {
    /// How many steps to take
    #[arg(default_value_t = 1)]
    pub steps: usize,
}

pub async fn undo(args: StepArgs, cwd: &Path) -> Result<()> {
    let workspace = Workspace::open(cwd)?;
    let mut session = workspace.session();
    if session.history().is_empty() {
        bail!("Nothing to undo");
    }

    let taken = (0..args.steps).take_while(|_| session.undo()).count();
    finish(&workspace, &session, taken > 0, &format!("Undid {} step(s)", taken)).await
}

pub async fn redo(args: StepArgs, cwd: &Path) -> Result<()> {
    let (workspace, mut session) = open_session(cwd, None)?;
    let taken = (0..args.steps).take_while(|_| session.redo()).count();
    finish(&workspace, &session, taken > 0, &format!("Redid {} step(s)", taken)).await
}

pub fn history(cwd: &Path) -> Result<()> {
    let workspace = Workspace::open(cwd)?;
    let session = workspace.session();
    let history = session.history();

    if history.is_empty() {
        println!("{}", "No history yet".dimmed());
        return Ok(());
    }

    for (index, entry) in history.entries().iter().enumerate() {
        let time = Local
            .timestamp_millis_opt(entry.timestamp)
            .single()
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string());
        let line = format!("{:>3}  {}  {}", index, time, entry.action);

        if history.cursor() == Some(index) && session.project().is_some() {
            println!("{} {}", "→".green(), line.bright_white());
        } else {
            println!("  {}", line);
        }
    }
    Ok(())
}

#[derive(Debug, Args)]
pub struct RestoreArgs {
    /// Entry index as listed by `arnika history`
    pub index: usize,
}

pub async fn restore(args: RestoreArgs, cwd: &Path) -> Result<()> {
    let workspace = Workspace::open(cwd)?;
    let mut session = workspace.session();
    if !session.restore(args.index) {
        bail!(
            "No history entry {} (history has {} entries)",
            args.index,
            session.history().len()
        );
    }
    finish(
        &workspace,
        &session,
        true,
        &format!("Restored entry {}", args.index),
    )
    .await
}
