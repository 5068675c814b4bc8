//! Built-in starting points for a new project.

use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::project::{
    Element, ElementStyles, ElementType, LayoutType, Project, Slide, Theme, ThemePatch,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Pitch,
    Portfolio,
}

impl Template {
    pub const ALL: [Template; 2] = [Template::Pitch, Template::Portfolio];

    pub fn name(&self) -> &'static str {
        match self {
            Template::Pitch => "pitch",
            Template::Portfolio => "portfolio",
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Template {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pitch" => Ok(Template::Pitch),
            "portfolio" | "works" => Ok(Template::Portfolio),
            other => Err(ModelError::UnknownTemplate(other.to_string())),
        }
    }
}

/// Instantiate a template as a fresh project value
pub fn template(kind: Template) -> Project {
    match kind {
        Template::Pitch => Project::new(
            "New Pitch Deck",
            theme("#4f46e5", "#818cf8"),
            vec![
                Slide::new("s1", "The Big Idea", LayoutType::Hero).with_elements(vec![
                    Element::new("e1", ElementType::Text, "Revolutionizing the Industry")
                        .with_styles(ElementStyles {
                            top: Some("40%".into()),
                            left: Some("10%".into()),
                            font_size: Some("48px".into()),
                            font_weight: Some("800".into()),
                            ..Default::default()
                        }),
                ]),
                Slide::new("s2", "The Problem", LayoutType::ContentImage),
                Slide::new("s3", "Our Solution", LayoutType::Grid),
            ],
        ),
        Template::Portfolio => Project::new(
            "Creative Portfolio",
            theme("#ec4899", "#f472b6"),
            vec![
                Slide::new("s1", "Hello, I am [Name]", LayoutType::Hero),
                Slide::new("s2", "Recent Works", LayoutType::Grid),
            ],
        ),
    }
}

/// One-click theme presets offered by the style panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreset {
    pub name: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub font: &'static str,
}

impl ThemePreset {
    pub const ALL: [ThemePreset; 4] = [
        ThemePreset {
            name: "Arnika Indigo",
            primary: "#4f46e5",
            secondary: "#818cf8",
            font: "Plus Jakarta Sans",
        },
        ThemePreset {
            name: "SaaS Emerald",
            primary: "#059669",
            secondary: "#34d399",
            font: "Inter",
        },
        ThemePreset {
            name: "Cyber Neon",
            primary: "#ec4899",
            secondary: "#f472b6",
            font: "Orbitron",
        },
        ThemePreset {
            name: "Professional Slate",
            primary: "#1e293b",
            secondary: "#64748b",
            font: "Plus Jakarta Sans",
        },
    ];

    /// Case-insensitive lookup by preset name
    pub fn find(name: &str) -> Option<ThemePreset> {
        Self::ALL
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn patch(&self) -> ThemePatch {
        ThemePatch {
            primary_color: Some(self.primary.to_string()),
            secondary_color: Some(self.secondary.to_string()),
            font_family: Some(self.font.to_string()),
            ..Default::default()
        }
    }
}

fn theme(primary: &str, secondary: &str) -> Theme {
    Theme {
        primary_color: primary.to_string(),
        secondary_color: secondary.to_string(),
        font_family: "Plus Jakarta Sans".to_string(),
        navbar_enabled: true,
        nav_links: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_are_valid() {
        for kind in Template::ALL {
            let project = template(kind);
            assert!(project.validate().is_ok(), "{} should be valid", kind);
        }
    }

    #[test]
    fn test_parse_template_name() {
        assert_eq!("Pitch".parse::<Template>().unwrap(), Template::Pitch);
        assert_eq!("works".parse::<Template>().unwrap(), Template::Portfolio);
        assert!("nope".parse::<Template>().is_err());
    }

    #[test]
    fn test_theme_preset_lookup() {
        let preset = ThemePreset::find("cyber neon").unwrap();
        let patch = preset.patch();
        assert_eq!(patch.primary_color.as_deref(), Some("#ec4899"));
        assert_eq!(patch.font_family.as_deref(), Some("Orbitron"));
        assert!(patch.nav_links.is_none());
        assert!(ThemePreset::find("Unknown").is_none());
    }

    #[test]
    fn test_pitch_contents() {
        let project = template(Template::Pitch);
        assert_eq!(project.name, "New Pitch Deck");
        assert_eq!(project.slides.len(), 3);
        assert_eq!(project.slides[0].elements[0].left(), Some("10%"));
    }
}
