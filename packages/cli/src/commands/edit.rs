//! Element editing commands. Every command works on the current slide,
//! which `--slide` overrides (default: the first slide).

use super::{finish, open_session};
use anyhow::{bail, Result};
use arnika_editor::{Alignment, ContextAction, Point, PointerInput, PointerOutcome};
use arnika_model::{ElementStyles, ElementType, NavigationMetadata, TextAlign};
use clap::Args;
use colored::Colorize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Args)]
pub struct AddElementArgs {
    /// Element type (text, image, video, gif, button, link, table, shape)
    pub kind: ElementType,

    /// Text, URL or markup of the element
    #[arg(default_value = "")]
    pub content: String,

    #[arg(short, long)]
    pub slide: Option<String>,
}

pub async fn add_element(args: AddElementArgs, cwd: &Path) -> Result<()> {
    let (workspace, mut session) = open_session(cwd, args.slide.as_deref())?;
    let added = session.add_element(args.kind, &args.content);
    let done = match &added {
        Some(id) => format!("Added {} {}", args.kind, id),
        None => String::new(),
    };
    finish(&workspace, &session, added.is_some(), &done).await
}

#[derive(Debug, Args)]
pub struct DeleteElementArgs {
    /// Element id
    pub element: String,

    #[arg(short, long)]
    pub slide: Option<String>,
}

pub async fn delete_element(args: DeleteElementArgs, cwd: &Path) -> Result<()> {
    let (workspace, mut session) = open_session(cwd, args.slide.as_deref())?;
    let changed = session.delete_element(&args.element);
    finish(
        &workspace,
        &session,
        changed,
        &format!("Deleted {}", args.element),
    )
    .await
}

#[derive(Debug, Args)]
pub struct StyleArgs {
    /// Element id
    pub element: String,

    #[arg(short, long)]
    pub slide: Option<String>,

    #[arg(long)]
    pub left: Option<String>,

    #[arg(long)]
    pub top: Option<String>,

    #[arg(long)]
    pub width: Option<String>,

    #[arg(long)]
    pub height: Option<String>,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub background: Option<String>,

    #[arg(long)]
    pub font_size: Option<String>,

    #[arg(long)]
    pub font_family: Option<String>,

    #[arg(long)]
    pub font_weight: Option<String>,

    /// left, center or right
    #[arg(long, value_parser = parse_text_align)]
    pub align: Option<TextAlign>,

    #[arg(long, allow_negative_numbers = true)]
    pub z_index: Option<i32>,

    #[arg(long)]
    pub opacity: Option<String>,

    #[arg(long)]
    pub border_radius: Option<String>,
}

fn parse_text_align(value: &str) -> Result<TextAlign, String> {
    match value.to_ascii_lowercase().as_str() {
        "left" => Ok(TextAlign::Left),
        "center" | "centre" => Ok(TextAlign::Center),
        "right" => Ok(TextAlign::Right),
        other => Err(format!("unknown text alignment '{}'", other)),
    }
}

impl StyleArgs {
    fn styles(&self) -> ElementStyles {
        ElementStyles {
            left: self.left.clone(),
            top: self.top.clone(),
            width: self.width.clone(),
            height: self.height.clone(),
            color: self.color.clone(),
            background_color: self.background.clone(),
            font_size: self.font_size.clone(),
            font_family: self.font_family.clone(),
            font_weight: self.font_weight.clone(),
            text_align: self.align,
            z_index: self.z_index,
            opacity: self.opacity.clone(),
            border_radius: self.border_radius.clone(),
            ..Default::default()
        }
    }
}

pub async fn style(args: StyleArgs, cwd: &Path) -> Result<()> {
    let styles = args.styles();
    if styles == ElementStyles::default() {
        bail!("No style given. See `arnika style --help`");
    }

    let (workspace, mut session) = open_session(cwd, args.slide.as_deref())?;
    let changed = session.update_element_styles(&args.element, styles);
    finish(
        &workspace,
        &session,
        changed,
        &format!("Styled {}", args.element),
    )
    .await
}

#[derive(Debug, Args)]
pub struct TextArgs {
    /// Element id
    pub element: String,

    /// New content
    pub content: String,

    #[arg(short, long)]
    pub slide: Option<String>,
}

pub async fn text(args: TextArgs, cwd: &Path) -> Result<()> {
    let (workspace, mut session) = open_session(cwd, args.slide.as_deref())?;
    let changed = session.update_element_content(&args.element, &args.content);
    finish(
        &workspace,
        &session,
        changed,
        &format!("Updated {}", args.element),
    )
    .await
}

#[derive(Debug, Args)]
pub struct LinkArgs {
    /// Element id
    pub element: String,

    #[arg(short, long)]
    pub slide: Option<String>,

    /// Jump to this slide when clicked
    #[arg(long, conflicts_with_all = ["url", "clear"])]
    pub to_slide: Option<String>,

    /// Open this URL when clicked
    #[arg(long, conflicts_with = "clear")]
    pub url: Option<String>,

    /// Remove the link
    #[arg(long)]
    pub clear: bool,
}

impl LinkArgs {
    fn metadata(&self) -> Option<NavigationMetadata> {
        match (&self.to_slide, &self.url, self.clear) {
            (Some(slide), _, _) => Some(NavigationMetadata::internal(slide.clone())),
            (None, Some(url), _) => Some(NavigationMetadata::external(url.clone())),
            (None, None, true) => Some(NavigationMetadata::None),
            (None, None, false) => None,
        }
    }
}

pub async fn link(args: LinkArgs, cwd: &Path) -> Result<()> {
    let Some(metadata) = args.metadata() else {
        bail!("Give --to-slide, --url or --clear");
    };

    let (workspace, mut session) = open_session(cwd, args.slide.as_deref())?;
    if let Some(target) = metadata.target_slide_id() {
        let exists = session.project().is_some_and(|p| p.slide(target).is_some());
        if !exists {
            println!(
                "{} slide {} does not exist, the link will show as broken",
                "⚠️".yellow(),
                target
            );
        }
    }

    let changed = session.update_element_metadata(&args.element, metadata);
    finish(
        &workspace,
        &session,
        changed,
        &format!("Linked {}", args.element),
    )
    .await
}

#[derive(Debug, Args)]
pub struct HideArgs {
    /// Element id
    pub element: String,

    #[arg(short, long)]
    pub slide: Option<String>,
}

pub async fn hide(args: HideArgs, cwd: &Path) -> Result<()> {
    let (workspace, mut session) = open_session(cwd, args.slide.as_deref())?;
    let changed = session.toggle_visibility(&args.element);

    let hidden = session
        .current_slide()
        .and_then(|s| s.element(&args.element))
        .is_some_and(|e| e.is_hidden());
    let done = if hidden {
        format!("{} is hidden", args.element)
    } else {
        format!("{} is visible", args.element)
    };
    finish(&workspace, &session, changed, &done).await
}

#[derive(Debug, Args)]
pub struct ActionArgs {
    /// One or more context actions run in order, comma separated
    /// (e.g. `copy,paste` or `duplicate,front`)
    pub actions: String,

    /// Elements to act on. Empty means the canvas (paste only)
    pub elements: Vec<String>,

    #[arg(short, long)]
    pub slide: Option<String>,
}

pub async fn action(args: ActionArgs, cwd: &Path) -> Result<()> {
    let actions = parse_actions(&args.actions)?;

    let (workspace, mut session) = open_session(cwd, args.slide.as_deref())?;
    session
        .interaction_mut()
        .select_many(args.elements.iter().cloned());

    let mut changed = false;
    for action in &actions {
        // The menu targets whatever is selected now, so chained actions
        // act on the copies a paste or duplicate produced
        let target = session.interaction().selection().first().cloned();
        let offered = session.open_context_menu(Point::default(), target.as_deref());
        if !offered.contains(action) {
            bail!("{} is not available here", action);
        }
        let acted = session.context_action(*action);
        debug!(%action, acted, "ran context action");
        changed |= acted;
    }

    let names: Vec<&str> = actions.iter().map(ContextAction::label).collect();
    finish(&workspace, &session, changed, &names.join(", ")).await
}

fn parse_actions(list: &str) -> Result<Vec<ContextAction>> {
    let actions = list
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::parse)
        .collect::<Result<Vec<ContextAction>, _>>()?;
    if actions.is_empty() {
        bail!("No context action given");
    }
    Ok(actions)
}

#[derive(Debug, Args)]
pub struct DragArgs {
    /// Elements to move together
    #[arg(required = true)]
    pub elements: Vec<String>,

    /// Horizontal movement in screen pixels
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub dx: f64,

    /// Vertical movement in screen pixels
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub dy: f64,

    /// Canvas zoom the pixels were measured at
    #[arg(long, default_value_t = 1.0)]
    pub zoom: f64,

    #[arg(short, long)]
    pub slide: Option<String>,
}

pub async fn drag(args: DragArgs, cwd: &Path) -> Result<()> {
    let (workspace, mut session) = open_session(cwd, args.slide.as_deref())?;
    session.interaction_mut().zoom_mut().adjust(args.zoom - 1.0);
    session
        .interaction_mut()
        .select_many(args.elements.iter().cloned());

    let outcome = session.pointer_down(Some(args.elements[0].as_str()), PointerInput::at(0.0, 0.0));
    if outcome != PointerOutcome::DragStarted {
        bail!("Cannot drag {} ({:?})", args.elements[0], outcome);
    }
    session.pointer_move(Point::new(args.dx, args.dy));
    let changed = session.pointer_up();

    finish(
        &workspace,
        &session,
        changed,
        &format!("Moved {} element(s)", args.elements.len()),
    )
    .await
}

#[derive(Debug, Args)]
pub struct AlignArgs {
    /// left, center, right or distribute
    pub alignment: Alignment,

    /// Elements to align
    #[arg(required = true)]
    pub elements: Vec<String>,

    #[arg(short, long)]
    pub slide: Option<String>,
}

pub async fn align(args: AlignArgs, cwd: &Path) -> Result<()> {
    if args.elements.len() < args.alignment.min_elements() {
        bail!(
            "{} needs at least {} elements",
            args.alignment,
            args.alignment.min_elements()
        );
    }

    let (workspace, mut session) = open_session(cwd, args.slide.as_deref())?;
    session
        .interaction_mut()
        .select_many(args.elements.iter().cloned());
    let changed = session.align(args.alignment);
    finish(
        &workspace,
        &session,
        changed,
        &format!("Aligned {} element(s)", args.elements.len()),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_align() {
        assert_eq!(parse_text_align("Centre"), Ok(TextAlign::Center));
        assert!(parse_text_align("justify").is_err());
    }

    #[test]
    fn test_parse_action_chain() {
        let actions = parse_actions("duplicate, front").unwrap();
        assert_eq!(
            actions,
            [ContextAction::Duplicate, ContextAction::BringToFront]
        );
        assert!(parse_actions("copy,explode").is_err());
        assert!(parse_actions(" , ").is_err());
    }

    #[test]
    fn test_link_metadata() {
        let args = LinkArgs {
            element: "e1".into(),
            slide: None,
            to_slide: Some("s2".into()),
            url: None,
            clear: false,
        };
        assert_eq!(args.metadata(), Some(NavigationMetadata::internal("s2")));

        let args = LinkArgs {
            to_slide: None,
            clear: true,
            ..args
        };
        assert_eq!(args.metadata(), Some(NavigationMetadata::None));

        let args = LinkArgs { clear: false, ..args };
        assert_eq!(args.metadata(), None);
    }
}
