use super::{finish, open_session};
use anyhow::{anyhow, Result};
use arnika_model::{ThemePatch, ThemePreset};
use clap::Args;
use colored::Colorize;
use std::path::Path;

#[derive(Debug, Args)]
pub struct ThemeArgs {
    /// Apply a named preset (see --list)
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Primary colour, e.g. #4f46e5
    #[arg(long)]
    pub primary: Option<String>,

    /// Secondary colour
    #[arg(long)]
    pub secondary: Option<String>,

    /// Font family
    #[arg(long)]
    pub font: Option<String>,

    /// Show or hide the navigation bar
    #[arg(long)]
    pub navbar: Option<bool>,

    /// List the presets
    #[arg(long)]
    pub list: bool,
}

impl ThemeArgs {
    fn patch(&self) -> Option<ThemePatch> {
        let patch = ThemePatch {
            primary_color: self.primary.clone(),
            secondary_color: self.secondary.clone(),
            font_family: self.font.clone(),
            navbar_enabled: self.navbar,
            ..Default::default()
        };
        (patch != ThemePatch::default()).then_some(patch)
    }
}

pub async fn theme(args: ThemeArgs, cwd: &Path) -> Result<()> {
    if args.list {
        for preset in ThemePreset::ALL {
            println!(
                "  {:<20} {} / {}  {}",
                preset.name.bright_white(),
                preset.primary,
                preset.secondary,
                preset.font.dimmed()
            );
        }
        return Ok(());
    }

    let (workspace, mut session) = open_session(cwd, None)?;
    let mut changed = false;

    if let Some(name) = &args.preset {
        let preset =
            ThemePreset::find(name).ok_or_else(|| anyhow!("Unknown theme preset: {}", name))?;
        changed |= session.apply_theme_preset(&preset);
    }
    if let Some(patch) = args.patch() {
        changed |= session.apply_theme(patch);
    }

    finish(&workspace, &session, changed, "Theme updated").await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ThemeArgs {
        ThemeArgs {
            preset: None,
            primary: None,
            secondary: None,
            font: None,
            navbar: None,
            list: false,
        }
    }

    #[test]
    fn test_empty_args_give_no_patch() {
        assert!(args().patch().is_none());
    }

    #[test]
    fn test_patch_carries_given_fields() {
        let patch = ThemeArgs {
            primary: Some("#000000".into()),
            navbar: Some(false),
            ..args()
        }
        .patch()
        .unwrap();

        assert_eq!(patch.primary_color.as_deref(), Some("#000000"));
        assert_eq!(patch.navbar_enabled, Some(false));
        assert!(patch.font_family.is_none());
    }
}
