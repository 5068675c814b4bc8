use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::id_generator::IdGenerator;
use crate::navigation::{NavigationLink, NavigationMetadata};

/// Root of the edited document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub theme: Theme,
    /// Slides are shared between successive project values (and history
    /// snapshots); edits replace the touched slide instead of mutating it.
    pub slides: Vec<Arc<Slide>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
    #[serde(default)]
    pub navbar_enabled: bool,
    #[serde(default)]
    pub nav_links: Vec<NavigationLink>,
}

/// Partial theme, shallow-merged by `apply_theme`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navbar_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav_links: Option<Vec<NavigationLink>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutType {
    Hero,
    Features,
    ContentImage,
    Grid,
    Contact,
    Pricing,
    Blank,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionType {
    None,
    Fade,
    Slide,
    Zoom,
    Flip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationType {
    None,
    Fade,
    SlideUp,
    SlideDown,
    ZoomIn,
    Bounce,
    FlyInLeft,
    FlyInRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub layout: LayoutType,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<SlideStyles>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementType {
    Text,
    Image,
    Video,
    Gif,
    Button,
    Link,
    Table,
    Shape,
}

impl ElementType {
    pub const ALL: [ElementType; 8] = [
        ElementType::Text,
        ElementType::Image,
        ElementType::Video,
        ElementType::Gif,
        ElementType::Button,
        ElementType::Link,
        ElementType::Table,
        ElementType::Shape,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Text => "TEXT",
            ElementType::Image => "IMAGE",
            ElementType::Video => "VIDEO",
            ElementType::Gif => "GIF",
            ElementType::Button => "BUTTON",
            ElementType::Link => "LINK",
            ElementType::Table => "TABLE",
            ElementType::Shape => "SHAPE",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownElementType(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementType,
    /// Text, a URL, or serialized table rows depending on `kind`
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<ElementStyles>,
    #[serde(
        default,
        deserialize_with = "nullable_metadata",
        skip_serializing_if = "NavigationMetadata::is_none"
    )]
    pub metadata: NavigationMetadata,
}

fn nullable_metadata<'de, D>(deserializer: D) -> Result<NavigationMetadata, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NavigationMetadata>::deserialize(deserializer)?.unwrap_or_default())
}

/// Presentational properties of an element.
///
/// Every field is optional, so the same type doubles as a partial update:
/// [`ElementStyles::merge`] copies the fields that are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_delay: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_shadow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate_x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate_y: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

macro_rules! merge_fields {
    ($dst:ident, $src:ident; $($field:ident),+ $(,)?) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field.clone();
            }
        )+
    };
}

impl ElementStyles {
    /// Position-only patch, as produced by drags and alignment
    pub fn position(left: impl Into<String>, top: impl Into<String>) -> Self {
        Self {
            left: Some(left.into()),
            top: Some(top.into()),
            ..Default::default()
        }
    }

    /// Shallow merge: fields set in `patch` replace ours, the rest stay
    pub fn merge(&mut self, patch: &ElementStyles) {
        merge_fields!(self, patch;
            font_size, font_weight, font_style, text_decoration, line_height,
            letter_spacing, color, background_color, border_color, border_width,
            font_family, text_align, margin_top, width, height, left, top,
            border_radius, z_index, animation, animation_delay, box_shadow,
            opacity, padding, gradient, hidden, text_shadow, text_stroke,
            rotation, rotate_x, rotate_y, filter,
        );
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }
}

impl Element {
    pub fn new(id: impl Into<String>, kind: ElementType, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            content: content.into(),
            name: None,
            group_id: None,
            styles: None,
            metadata: NavigationMetadata::None,
        }
    }

    pub fn with_styles(mut self, styles: ElementStyles) -> Self {
        self.styles = Some(styles);
        self
    }

    pub fn with_metadata(mut self, metadata: NavigationMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn is_hidden(&self) -> bool {
        self.styles.as_ref().is_some_and(ElementStyles::is_hidden)
    }

    pub fn left(&self) -> Option<&str> {
        self.styles.as_ref().and_then(|s| s.left.as_deref())
    }

    pub fn top(&self) -> Option<&str> {
        self.styles.as_ref().and_then(|s| s.top.as_deref())
    }

    pub fn width(&self) -> Option<&str> {
        self.styles.as_ref().and_then(|s| s.width.as_deref())
    }

    pub fn z_index(&self) -> Option<i32> {
        self.styles.as_ref().and_then(|s| s.z_index)
    }

    /// Merge a partial style update into this element
    pub fn apply_styles(&mut self, patch: &ElementStyles) {
        self.styles.get_or_insert_with(ElementStyles::default).merge(patch);
    }
}

impl Slide {
    pub fn new(id: impl Into<String>, title: impl Into<String>, layout: LayoutType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            notes: None,
            layout,
            elements: Vec::new(),
            transition: None,
            section: None,
            styles: None,
        }
    }

    pub fn with_elements(mut self, elements: Vec<Element>) -> Self {
        self.elements = elements;
        self
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_index(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    pub fn contains_element(&self, id: &str) -> bool {
        self.element_index(id).is_some()
    }

    pub fn max_z_index(&self) -> Option<i32> {
        self.elements.iter().filter_map(Element::z_index).max()
    }

    pub fn min_z_index(&self) -> Option<i32> {
        self.elements.iter().filter_map(Element::z_index).min()
    }
}

impl Project {
    pub fn new(name: impl Into<String>, theme: Theme, slides: Vec<Slide>) -> Self {
        Self {
            name: name.into(),
            theme,
            slides: slides.into_iter().map(Arc::new).collect(),
        }
    }

    /// Parse a stored or generated project. Only checks that it is well formed
    /// JSON with at least one slide.
    pub fn from_json(json: &str) -> ModelResult<Self> {
        let project: Project = serde_json::from_str(json)?;
        if project.slides.is_empty() {
            return Err(ModelError::NoSlides);
        }
        Ok(project)
    }

    pub fn to_json(&self) -> ModelResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn slide(&self, id: &str) -> Option<&Slide> {
        self.slides.iter().map(Arc::as_ref).find(|s| s.id == id)
    }

    pub fn slide_index(&self, id: &str) -> Option<usize> {
        self.slides.iter().position(|s| s.id == id)
    }

    pub fn first_slide_id(&self) -> Option<&str> {
        self.slides.first().map(|s| s.id.as_str())
    }

    /// True if any slide or element uses `id`
    pub fn uses_id(&self, id: &str) -> bool {
        self.slides
            .iter()
            .any(|s| s.id == id || s.contains_element(id))
    }

    /// Check the id invariants: slide ids unique in the project, element ids
    /// unique in their slide.
    pub fn validate(&self) -> ModelResult<()> {
        if self.slides.is_empty() {
            return Err(ModelError::NoSlides);
        }

        let mut slide_ids = HashSet::new();
        for slide in &self.slides {
            if !slide_ids.insert(slide.id.as_str()) {
                return Err(ModelError::DuplicateSlideId(slide.id.clone()));
            }

            let mut element_ids = HashSet::new();
            for element in &slide.elements {
                if !element_ids.insert(element.id.as_str()) {
                    return Err(ModelError::DuplicateElementId {
                        slide_id: slide.id.clone(),
                        element_id: element.id.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Give fresh ids to any slide or element that repeats an earlier id.
    /// Returns how many ids were replaced.
    pub fn rekey_duplicates(&mut self, ids: &mut IdGenerator) -> usize {
        let mut replaced = 0;
        let mut seen_slides: HashSet<String> = HashSet::new();

        for index in 0..self.slides.len() {
            let duplicate_slide = !seen_slides.insert(self.slides[index].id.clone());
            let has_duplicate_elements = {
                let mut seen = HashSet::new();
                self.slides[index]
                    .elements
                    .iter()
                    .any(|e| !seen.insert(e.id.as_str()))
            };

            if !duplicate_slide && !has_duplicate_elements {
                continue;
            }

            if duplicate_slide {
                let fresh = ids.next_unused("slide", self);
                Arc::make_mut(&mut self.slides[index]).id = fresh.clone();
                seen_slides.insert(fresh);
                replaced += 1;
            }

            if has_duplicate_elements {
                let mut seen: HashSet<String> = HashSet::new();
                for el_index in 0..self.slides[index].elements.len() {
                    let id = self.slides[index].elements[el_index].id.clone();
                    if seen.insert(id) {
                        continue;
                    }
                    let fresh = ids.next_unused("el", self);
                    Arc::make_mut(&mut self.slides[index]).elements[el_index].id = fresh.clone();
                    seen.insert(fresh);
                    replaced += 1;
                }
            }
        }

        replaced
    }
}
