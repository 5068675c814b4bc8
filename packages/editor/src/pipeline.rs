//! # Import Pipeline
//!
//! Coordinates document import: Extract → Generate → Validate
//!
//! The pipeline:
//! - Extracts plain text from the uploaded file
//! - Asks the structure generator for a full project
//! - Rejects empty results and gives duplicate ids fresh ones

use arnika_model::{IdGenerator, Project};
use thiserror::Error;
use tracing::{debug, info};

use crate::services::{ServiceError, SourceFile, StructureGenerator, TextExtractor};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("Could not read {file}: {source}")]
    Extraction {
        file: String,
        #[source]
        source: ServiceError,
    },

    #[error("AI analysis failed: {0}")]
    Generation(#[source] ServiceError),

    #[error("Generated project has no slides")]
    Empty,
}

/// Outcome of a successful import
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub project: Project,
    /// History label, `Imported <file name>`
    pub label: String,
    /// How many duplicate ids were replaced
    pub rekeyed: usize,
}

/// Borrowing pipeline over the host's extractor and generator
pub struct ImportPipeline<'a, X, G> {
    extractor: &'a X,
    generator: &'a G,
}

impl<'a, X, G> ImportPipeline<'a, X, G>
where
    X: TextExtractor,
    G: StructureGenerator,
{
    pub fn new(extractor: &'a X, generator: &'a G) -> Self {
        Self {
            extractor,
            generator,
        }
    }

    /// Run the whole import for one file
    pub async fn run(
        &self,
        file: &SourceFile,
        ids: &mut IdGenerator,
    ) -> Result<ImportResult, ImportError> {
        // 1. Extract
        let text = self
            .extractor
            .extract(file)
            .await
            .map_err(|source| ImportError::Extraction {
                file: file.name.clone(),
                source,
            })?;
        debug!(file = %file.name, chars = text.len(), "extracted text");

        // 2. Generate
        let mut project = self
            .generator
            .generate(&text, &file.name)
            .await
            .map_err(ImportError::Generation)?;

        // 3. Validate
        if project.slides.is_empty() {
            return Err(ImportError::Empty);
        }
        let rekeyed = if project.validate().is_err() {
            project.rekey_duplicates(ids)
        } else {
            0
        };

        info!(
            file = %file.name,
            slides = project.slides.len(),
            rekeyed,
            "imported document"
        );

        Ok(ImportResult {
            project,
            label: format!("Imported {}", file.name),
            rekeyed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::PlainTextExtractor;
    use arnika_model::{template, LayoutType, Slide, Template};

    struct Echo(Project);

    impl StructureGenerator for Echo {
        async fn generate(&self, text: &str, file_name: &str) -> Result<Project, ServiceError> {
            let mut project = self.0.clone();
            project.name = format!("{} ({} chars)", file_name, text.len());
            Ok(project)
        }
    }

    struct Failing;

    impl StructureGenerator for Failing {
        async fn generate(&self, _: &str, _: &str) -> Result<Project, ServiceError> {
            Err(ServiceError::Request("timeout".into()))
        }
    }

    #[tokio::test]
    async fn test_import_labels_with_file_name() {
        let generator = Echo(template(Template::Pitch));
        let pipeline = ImportPipeline::new(&PlainTextExtractor, &generator);
        let mut ids = IdGenerator::from_seed("t");

        let result = pipeline
            .run(&SourceFile::new("deck.txt", "hello"), &mut ids)
            .await
            .unwrap();

        assert_eq!(result.label, "Imported deck.txt");
        assert_eq!(result.project.name, "deck.txt (5 chars)");
        assert_eq!(result.rekeyed, 0);
    }

    #[tokio::test]
    async fn test_import_rekeys_duplicates() {
        let mut project = template(Template::Portfolio);
        project
            .slides
            .push(std::sync::Arc::new(Slide::new("s1", "Again", LayoutType::Blank)));
        let generator = Echo(project);
        let pipeline = ImportPipeline::new(&PlainTextExtractor, &generator);

        let result = pipeline
            .run(&SourceFile::new("x.md", ""), &mut IdGenerator::from_seed("t"))
            .await
            .unwrap();
        assert_eq!(result.rekeyed, 1);
        assert!(result.project.validate().is_ok());
    }

    #[tokio::test]
    async fn test_generation_failure() {
        let pipeline = ImportPipeline::new(&PlainTextExtractor, &Failing);
        let err = pipeline
            .run(&SourceFile::new("x.md", ""), &mut IdGenerator::from_seed("t"))
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Generation(_)));
    }
}
