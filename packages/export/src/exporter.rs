use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use arnika_model::Project;
use tracing::info;

use crate::deck::Deck;
use crate::error::{ExportError, ExportResult};
use crate::pptx::write_pptx;

/// Rendered presentation, ready to hand to the user
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    /// Write into `dir`, returning the full path
    pub fn write_to(&self, dir: &Path) -> ExportResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Project → downloadable presentation
pub trait PresentationExporter {
    /// File extension without the dot
    fn extension(&self) -> &'static str;

    fn render(&self, project: &Project, deck: &Deck) -> ExportResult<Vec<u8>>;

    fn export(&self, project: &Project) -> ExportResult<ExportedFile> {
        if project.slides.is_empty() {
            return Err(ExportError::NoSlides);
        }

        let deck = Deck::from_project(project);
        let bytes = self.render(project, &deck)?;
        let file_name = file_name(project, self.extension());

        info!(
            file = %file_name,
            slides = deck.slides.len(),
            shapes = deck.shape_count(),
            bytes = bytes.len(),
            "exported presentation"
        );
        Ok(ExportedFile { file_name, bytes })
    }
}

/// `<lowercased project name>.<ext>`, falling back to `presentation`.
/// Path separators are replaced so the name stays a single file.
pub fn file_name(project: &Project, extension: &str) -> String {
    let stem = if project.name.trim().is_empty() {
        "presentation".to_string()
    } else {
        project
            .name
            .to_lowercase()
            .replace(['/', '\\'], "-")
    };
    format!("{}.{}", stem, extension)
}

/// PowerPoint package
#[derive(Debug, Clone, Copy, Default)]
pub struct PptxExporter;

impl PresentationExporter for PptxExporter {
    fn extension(&self) -> &'static str {
        "pptx"
    }

    fn render(&self, project: &Project, deck: &Deck) -> ExportResult<Vec<u8>> {
        write_pptx(
            deck,
            &project.theme.primary_color,
            &project.theme.secondary_color,
        )
    }
}

/// The deck projection as pretty JSON, for inspection and other tooling
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDeckExporter;

impl PresentationExporter for JsonDeckExporter {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, _project: &Project, deck: &Deck) -> ExportResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(deck)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Pptx,
    Json,
}

impl ExportFormat {
    pub fn export(&self, project: &Project) -> ExportResult<ExportedFile> {
        match self {
            ExportFormat::Pptx => PptxExporter.export(project),
            ExportFormat::Json => JsonDeckExporter.export(project),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Pptx => f.write_str("pptx"),
            ExportFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pptx" | "powerpoint" => Ok(ExportFormat::Pptx),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arnika_model::{template, Template};

    #[test]
    fn test_file_name() {
        let mut project = template(Template::Pitch);
        assert_eq!(file_name(&project, "pptx"), "new pitch deck.pptx");

        project.name = "Q3/Q4 Plan".into();
        assert_eq!(file_name(&project, "json"), "q3-q4 plan.json");

        project.name = "  ".into();
        assert_eq!(file_name(&project, "pptx"), "presentation.pptx");
    }

    #[test]
    fn test_no_slides() {
        let mut project = template(Template::Portfolio);
        project.slides.clear();
        assert!(matches!(
            PptxExporter.export(&project),
            Err(ExportError::NoSlides)
        ));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("PPTX".parse::<ExportFormat>().unwrap(), ExportFormat::Pptx);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
