//! External collaborators: text extraction, structure generation, slide
//! refinement and image generation.
//!
//! The editor treats these as opaque awaitable calls with a success or
//! failure outcome. Only [`PlainTextExtractor`] ships with the crate; the
//! generative services are supplied by the host.

use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;

use arnika_model::{Project, Slide};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("{0} returned an empty response")]
    EmptyResponse(&'static str),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No image data returned")]
    NoImage,

    #[error("Request failed: {0}")]
    Request(String),
}

/// A document handed to the import pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn read(path: &Path) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    /// Lowercased extension, if the name has one
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() && ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// Image shapes the generator accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "16:9")]
    Wide,
    #[serde(rename = "9:16")]
    Tall,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Landscape,
        AspectRatio::Portrait,
        AspectRatio::Wide,
        AspectRatio::Tall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Wide => "16:9",
            AspectRatio::Tall => "9:16",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectRatio::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| ServiceError::Request(format!("unsupported aspect ratio '{}'", s)))
    }
}

/// File → plain text
#[allow(async_fn_in_trait)]
pub trait TextExtractor {
    async fn extract(&self, file: &SourceFile) -> Result<String, ServiceError>;
}

/// Plain text + file name → complete project
#[allow(async_fn_in_trait)]
pub trait StructureGenerator {
    async fn generate(&self, text: &str, file_name: &str) -> Result<Project, ServiceError>;
}

/// Slide + theme colour → redesigned slide with the same id
#[allow(async_fn_in_trait)]
pub trait SlideRefiner {
    async fn refine(&self, slide: &Slide, primary_color: &str) -> Result<Slide, ServiceError>;
}

/// Prompt → image reference (URL or data URI)
#[allow(async_fn_in_trait)]
pub trait ImageGenerator {
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<String, ServiceError>;
}

/// Reads `.txt`, `.md` and `.json` as UTF-8. Any other format gets a
/// placeholder extraction naming the file, so the rest of the import can
/// still run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub const TEXT_EXTENSIONS: [&'static str; 3] = ["txt", "md", "json"];

    fn placeholder(file: &SourceFile) -> String {
        let kind = file
            .extension()
            .map(|e| e.to_ascii_uppercase())
            .unwrap_or_else(|| "UNKNOWN".to_string());

        format!(
            "DOCUMENT EXTRACTION: {name}\n\
             TYPE: {kind} Document\n\
             \n\
             [SUMMARY]\n\
             Strategic roadmap for digital transformation and platform scaling.\n\
             \n\
             [SECTION: CORE VISION]\n\
             Enable high-fidelity document-to-web transitions using generative AI.\n\
             \n\
             [SECTION: KEY FEATURES]\n\
             1. Real-time AI design refinement\n\
             2. Interactive spatial layouts\n\
             3. One-click global theming\n\
             4. Presentation export\n",
            name = file.name,
            kind = kind,
        )
    }
}

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, file: &SourceFile) -> Result<String, ServiceError> {
        match file.extension() {
            Some(ext) if Self::TEXT_EXTENSIONS.contains(&ext.as_str()) => {
                Ok(String::from_utf8_lossy(&file.bytes).into_owned())
            }
            _ => Ok(Self::placeholder(file)),
        }
    }
}

/// Parse a generator's JSON answer into a project. Empty text and projects
/// without slides are rejected; a missing `navLinks` defaults to empty.
pub fn parse_project_response(text: &str) -> Result<Project, ServiceError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ServiceError::EmptyResponse("structure generator"));
    }
    Project::from_json(text).map_err(|e| ServiceError::InvalidResponse(e.to_string()))
}

/// Parse a refiner's JSON answer into a slide
pub fn parse_slide_response(text: &str) -> Result<Slide, ServiceError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ServiceError::EmptyResponse("slide refiner"));
    }
    serde_json::from_str(text).map_err(|e| ServiceError::InvalidResponse(e.to_string()))
}
