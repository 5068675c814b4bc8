//! Presentation projection of a project.
//!
//! Canvas percentages become inches on a 10 × 5.6 in slide. Only text, link,
//! image, gif and button elements have a counterpart; everything else is
//! left out of the deck.

use arnika_model::{
    parse_length, Element, ElementStyles, ElementType, Project, Slide, TextAlign,
};
use serde::Serialize;
use tracing::debug;

/// Slide width in inches
pub const SLIDE_WIDTH: f64 = 10.0;
/// Slide height in inches used for vertical placement
pub const SLIDE_HEIGHT: f64 = 5.6;

/// Points per unit of `fontSize` (a unitless `2` becomes 48 pt)
pub const FONT_SCALE: f64 = 24.0;

const DEFAULT_LEFT: f64 = 10.0;
const DEFAULT_TOP: f64 = 20.0;
const DEFAULT_FONT_SIZE: f64 = 1.0;
const DEFAULT_COLOR: &str = "333333";
const DEFAULT_PRIMARY: &str = "#4f46e5";
const DEFAULT_TITLE: &str = "Presentation";

/// Links without an href still get a target
pub const FALLBACK_HYPERLINK: &str = "https://google.com";

const TEXT_WIDTH: f64 = 4.0;
const IMAGE_WIDTH: f64 = 3.0;
const IMAGE_HEIGHT: f64 = 2.0;
const BUTTON_WIDTH: f64 = 2.0;
const BUTTON_HEIGHT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub title: String,
    pub slides: Vec<DeckSlide>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSlide {
    pub title: String,
    /// Background colour without the leading `#`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    pub shapes: Vec<DeckShape>,
}

/// Position and size in inches. Text boxes leave the height to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DeckShape {
    #[serde(rename_all = "camelCase")]
    Text {
        frame: Frame,
        text: String,
        font_size: f64,
        color: String,
        align: TextAlign,
        #[serde(skip_serializing_if = "Option::is_none")]
        hyperlink: Option<String>,
    },
    Image {
        frame: Frame,
        source: String,
    },
    /// Rounded rectangle filled with the theme colour, centred white text
    Button {
        frame: Frame,
        text: String,
        fill: String,
    },
}

impl DeckShape {
    pub fn frame(&self) -> &Frame {
        match self {
            DeckShape::Text { frame, .. }
            | DeckShape::Image { frame, .. }
            | DeckShape::Button { frame, .. } => frame,
        }
    }
}

impl Deck {
    pub fn from_project(project: &Project) -> Self {
        let title = if project.name.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            project.name.clone()
        };
        let fill = strip_hash(non_empty(&project.theme.primary_color).unwrap_or(DEFAULT_PRIMARY));

        let slides = project
            .slides
            .iter()
            .map(|slide| project_slide(slide, &fill))
            .collect();

        Self { title, slides }
    }

    pub fn shape_count(&self) -> usize {
        self.slides.iter().map(|s| s.shapes.len()).sum()
    }
}

fn project_slide(slide: &Slide, button_fill: &str) -> DeckSlide {
    let background = slide
        .styles
        .as_ref()
        .and_then(|s| s.background_color.as_deref())
        .and_then(non_empty)
        .map(strip_hash);

    let shapes: Vec<DeckShape> = slide
        .elements
        .iter()
        .filter_map(|el| project_element(el, button_fill))
        .collect();

    debug!(
        slide = %slide.id,
        shapes = shapes.len(),
        skipped = slide.elements.len() - shapes.len(),
        "projected slide"
    );

    DeckSlide {
        title: slide.title.clone(),
        background,
        shapes,
    }
}

fn project_element(element: &Element, button_fill: &str) -> Option<DeckShape> {
    let styles = element.styles.as_ref();

    let x = SLIDE_WIDTH * parse_length(style_value(styles, |s| &s.left), DEFAULT_LEFT) / 100.0;
    let y = SLIDE_HEIGHT * parse_length(style_value(styles, |s| &s.top), DEFAULT_TOP) / 100.0;

    match element.kind {
        ElementType::Text | ElementType::Link => {
            let hyperlink = (element.kind == ElementType::Link).then(|| {
                element
                    .metadata
                    .href()
                    .unwrap_or(FALLBACK_HYPERLINK)
                    .to_string()
            });

            Some(DeckShape::Text {
                frame: Frame {
                    x,
                    y,
                    w: TEXT_WIDTH,
                    h: None,
                },
                text: element.content.clone(),
                font_size: parse_length(style_value(styles, |s| &s.font_size), DEFAULT_FONT_SIZE)
                    * FONT_SCALE,
                color: strip_hash(style_value(styles, |s| &s.color).unwrap_or(DEFAULT_COLOR)),
                align: styles
                    .and_then(|s| s.text_align)
                    .unwrap_or(TextAlign::Center),
                hyperlink,
            })
        }
        ElementType::Image | ElementType::Gif if !element.content.is_empty() => {
            Some(DeckShape::Image {
                frame: Frame {
                    x,
                    y,
                    w: IMAGE_WIDTH,
                    h: Some(IMAGE_HEIGHT),
                },
                source: element.content.clone(),
            })
        }
        ElementType::Button => Some(DeckShape::Button {
            frame: Frame {
                x,
                y,
                w: BUTTON_WIDTH,
                h: Some(BUTTON_HEIGHT),
            },
            text: element.content.clone(),
            fill: button_fill.to_string(),
        }),
        _ => None,
    }
}

fn style_value(
    styles: Option<&ElementStyles>,
    pick: fn(&ElementStyles) -> &Option<String>,
) -> Option<&str> {
    styles.and_then(|s| pick(s).as_deref()).and_then(non_empty)
}

/// Drop the first `#`, as colour inputs carry one
fn strip_hash(color: &str) -> String {
    color.replacen('#', "", 1)
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arnika_model::{template, NavigationMetadata, SlideStyles, Template};

    fn shapes_of(elements: Vec<Element>) -> Vec<DeckShape> {
        let mut project = template(Template::Portfolio);
        let slide = std::sync::Arc::make_mut(&mut project.slides[0]);
        slide.elements = elements;
        Deck::from_project(&project).slides.remove(0).shapes
    }

    #[test]
    fn test_positions_and_defaults() {
        let shapes = shapes_of(vec![
            Element::new("a", ElementType::Text, "Hello").with_styles(ElementStyles {
                left: Some("50%".into()),
                top: Some("50%".into()),
                font_size: Some("2rem".into()),
                color: Some("#ff0000".into()),
                ..Default::default()
            }),
            Element::new("b", ElementType::Text, "Defaults"),
        ]);

        match &shapes[0] {
            DeckShape::Text {
                frame,
                font_size,
                color,
                align,
                hyperlink,
                ..
            } => {
                assert_eq!(frame.x, 5.0);
                assert!((frame.y - 2.8).abs() < 1e-9);
                assert_eq!(*font_size, 48.0);
                assert_eq!(color, "ff0000");
                assert_eq!(*align, TextAlign::Center);
                assert!(hyperlink.is_none());
            }
            other => panic!("unexpected shape {:?}", other),
        }

        let frame = shapes[1].frame();
        assert_eq!(frame.x, 1.0);
        assert!((frame.y - 1.12).abs() < 1e-9);
        match &shapes[1] {
            DeckShape::Text {
                font_size, color, ..
            } => {
                assert_eq!(*font_size, 24.0);
                assert_eq!(color, "333333");
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn test_link_hyperlink_fallback() {
        let shapes = shapes_of(vec![
            Element::new("l1", ElementType::Link, "Site")
                .with_metadata(NavigationMetadata::external("https://arnika.app")),
            Element::new("l2", ElementType::Link, "Nowhere"),
            Element::new("l3", ElementType::Link, "Slide")
                .with_metadata(NavigationMetadata::internal("s2")),
        ]);

        let links: Vec<_> = shapes
            .iter()
            .map(|s| match s {
                DeckShape::Text { hyperlink, .. } => hyperlink.clone(),
                _ => None,
            })
            .collect();
        assert_eq!(
            links,
            vec![
                Some("https://arnika.app".to_string()),
                Some(FALLBACK_HYPERLINK.to_string()),
                Some(FALLBACK_HYPERLINK.to_string()),
            ]
        );
    }

    #[test]
    fn test_images_buttons_and_skipped_types() {
        let shapes = shapes_of(vec![
            Element::new("i", ElementType::Image, "https://img/x.png"),
            Element::new("empty", ElementType::Gif, ""),
            Element::new("v", ElementType::Video, "https://video"),
            Element::new("t", ElementType::Table, ""),
            Element::new("s", ElementType::Shape, ""),
            Element::new("btn", ElementType::Button, "Go"),
        ]);

        assert_eq!(shapes.len(), 2);
        let frame = shapes[0].frame();
        assert_eq!((frame.x, frame.w, frame.h), (1.0, 3.0, Some(2.0)));
        assert!((frame.y - 1.12).abs() < 1e-9);
        match &shapes[1] {
            DeckShape::Button { fill, frame, .. } => {
                assert_eq!(fill, "ec4899");
                assert_eq!(frame.h, Some(0.5));
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn test_background_and_title() {
        let mut project = template(Template::Pitch);
        project.name = String::new();
        std::sync::Arc::make_mut(&mut project.slides[1]).styles = Some(SlideStyles {
            background_color: Some("#0f172a".into()),
            ..Default::default()
        });

        let deck = Deck::from_project(&project);
        assert_eq!(deck.title, "Presentation");
        assert_eq!(deck.slides[0].background, None);
        assert_eq!(deck.slides[1].background.as_deref(), Some("0f172a"));
        assert_eq!(deck.shape_count(), 1);
    }
}
