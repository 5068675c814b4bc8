//! Offline structure generator used by `arnika import`.
//!
//! A document that already is project JSON is parsed as-is. Anything else is
//! read as an outline: every `#`/`##` heading starts a slide and the lines
//! under it become text elements stacked down the slide.

use arnika_editor::{parse_project_response, ServiceError, StructureGenerator};
use arnika_model::{
    format_percent, template, Element, ElementStyles, ElementType, IdGenerator, LayoutType,
    Project, Slide, Template,
};
use tracing::debug;

const FIRST_LINE_TOP: f64 = 30.0;
const LINE_STEP: f64 = 10.0;
const MAX_LINES: usize = 6;

#[derive(Debug, Default)]
pub struct OutlineGenerator;

impl StructureGenerator for OutlineGenerator {
    async fn generate(&self, text: &str, file_name: &str) -> Result<Project, ServiceError> {
        if text.trim_start().starts_with('{') {
            return parse_project_response(text);
        }
        outline_project(text, file_name)
    }
}

struct Section {
    title: String,
    lines: Vec<String>,
}

fn outline_project(text: &str, file_name: &str) -> Result<Project, ServiceError> {
    let mut name = None;
    let mut sections: Vec<Section> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(title) = heading(line) {
            if name.is_none() {
                name = Some(title.to_string());
            }
            sections.push(Section {
                title: title.to_string(),
                lines: Vec::new(),
            });
        } else if let Some(section) = sections.last_mut() {
            let line = line.trim_start_matches(['-', '*', ' ']);
            if section.lines.len() < MAX_LINES && !line.is_empty() {
                section.lines.push(line.to_string());
            }
        }
    }

    if sections.is_empty() {
        return Err(ServiceError::InvalidResponse(format!(
            "{} has no headings to turn into slides",
            file_name
        )));
    }

    let mut ids = IdGenerator::from_seed("outline");
    let slides: Vec<Slide> = sections
        .into_iter()
        .enumerate()
        .map(|(index, section)| {
            let layout = if index == 0 {
                LayoutType::Hero
            } else {
                LayoutType::Features
            };
            let elements = section
                .lines
                .into_iter()
                .enumerate()
                .map(|(row, line)| {
                    let top = FIRST_LINE_TOP + LINE_STEP * row as f64;
                    Element::new(ids.next_id("el"), ElementType::Text, line).with_styles(
                        ElementStyles {
                            top: Some(format_percent(top)),
                            left: Some("10%".to_string()),
                            font_size: Some("24px".to_string()),
                            ..Default::default()
                        },
                    )
                })
                .collect();
            Slide::new(ids.next_id("slide"), section.title, layout).with_elements(elements)
        })
        .collect();

    debug!(file = %file_name, slides = slides.len(), "built project from outline");

    let theme = template(Template::Pitch).theme;
    let name = name.unwrap_or_else(|| file_name.to_string());
    Ok(Project::new(name, theme, slides))
}

fn heading(line: &str) -> Option<&str> {
    let title = line.strip_prefix("## ").or_else(|| line.strip_prefix("# "))?;
    let title = title.trim();
    (!title.is_empty()).then_some(title)
}
