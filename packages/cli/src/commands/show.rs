use super::open_session;
use anyhow::{anyhow, Result};
use arnika_editor::storage;
use arnika_model::{Element, Slide};
use clap::Args;
use colored::Colorize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Print the project JSON instead of the outline
    #[arg(long)]
    pub json: bool,

    /// Only show this slide
    #[arg(short, long)]
    pub slide: Option<String>,
}

pub fn show(args: ShowArgs, cwd: &Path) -> Result<()> {
    let (workspace, session) = open_session(cwd, args.slide.as_deref())?;
    let project = session
        .project()
        .ok_or_else(|| anyhow!("No project open"))?;

    if args.json {
        match &args.slide {
            Some(_) => {
                let slide = session
                    .current_slide()
                    .ok_or_else(|| anyhow!("No slide selected"))?;
                println!("{}", serde_json::to_string_pretty(slide)?);
            }
            None => println!("{}", serde_json::to_string_pretty(project)?),
        }
        return Ok(());
    }

    println!("{}", project.name.bright_white().bold());
    println!(
        "  theme {} / {}  font {}",
        project.theme.primary_color, project.theme.secondary_color, project.theme.font_family
    );
    println!();

    for (index, slide) in project.slides.iter().enumerate() {
        if args.slide.as_deref().is_some_and(|id| id != slide.id) {
            continue;
        }
        print_slide(index, slide);
    }

    if !storage::tour_completed(workspace.store()) {
        println!();
        println!("{}", "Tips".bright_blue().bold());
        println!("  arnika drag <ids..> --dx 100   move elements by screen pixels");
        println!("  arnika align center <ids..>    line up two or more elements");
        println!("  arnika undo / arnika history   step through the last 30 edits");
        if let Err(e) = storage::mark_tour_completed(workspace.store()) {
            debug!(error = %e, "could not record tour completion");
        }
    }

    Ok(())
}

fn print_slide(index: usize, slide: &Slide) {
    println!(
        "{} {} {} {}",
        format!("{:>2}.", index + 1).dimmed(),
        slide.title.bright_white(),
        format!("[{}]", slide.id).dimmed(),
        format!("{:?}", slide.layout).to_uppercase().dimmed()
    );
    for element in &slide.elements {
        print_element(element);
    }
}

fn print_element(element: &Element) {
    let position = format!(
        "@{},{}",
        element.left().unwrap_or("-"),
        element.top().unwrap_or("-")
    );
    let z = element
        .z_index()
        .map(|z| format!(" z{}", z))
        .unwrap_or_default();
    let group = element
        .group_id
        .as_deref()
        .map(|g| format!(" ({})", g))
        .unwrap_or_default();
    let link = element
        .metadata
        .target_slide_id()
        .or(element.metadata.href())
        .map(|href| format!(" → {}", href))
        .unwrap_or_default();

    let line = format!(
        "      {:<7} {} {}{}{}{} {}",
        element.kind.as_str(),
        element.id,
        position,
        z,
        group,
        link,
        preview(&element.content)
    );
    if element.is_hidden() {
        println!("{}", line.dimmed());
    } else {
        println!("{}", line);
    }
}

fn preview(content: &str) -> String {
    const MAX: usize = 40;
    let first = content.lines().next().unwrap_or_default();
    if first.chars().count() > MAX {
        format!("\"{}…\"", first.chars().take(MAX).collect::<String>())
    } else {
        format!("\"{}\"", first)
    }
}

#[derive(Debug, Args)]
pub struct LinksArgs {
    /// Print the link map as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn links(args: LinksArgs, cwd: &Path) -> Result<()> {
    let (_, session) = open_session(cwd, None)?;
    let map = session
        .link_map()
        .ok_or_else(|| anyhow!("No project open"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    for slide in map.slides.iter().filter(|s| !s.links.is_empty()) {
        println!("{} {}", slide.title.bright_white(), format!("[{}]", slide.slide_id).dimmed());
        for link in &slide.links {
            match &link.target_title {
                Some(title) => println!("  {} {} → {}", "✓".green(), link.element_id, title),
                None => println!(
                    "  {} {} → {} (missing)",
                    "✗".red(),
                    link.element_id,
                    link.target_slide_id
                ),
            }
        }
    }
    for nav in &map.nav_links {
        let mark = if nav.broken { "✗".red() } else { "✓".green() };
        println!("  {} navbar {} → {}", mark, nav.label, nav.target_slide_id);
    }

    println!();
    println!(
        "{} links, {} broken",
        map.link_count(),
        map.broken_count()
    );
    Ok(())
}
