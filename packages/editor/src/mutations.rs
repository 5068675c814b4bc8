//! # Project Mutations
//!
//! High-level editing operations on an Arnika project.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: each mutation is one user action and one history entry
//! 2. **Tolerant**: a mutation aimed at a stale id is a no-op, never an error
//! 3. **Serializable**: mutations can be logged, replayed, or sent from a front end
//!
//! ## Mutation Semantics
//!
//! ### DeleteSlide
//! - Removing the only slide dissolves the project (`apply` returns `None`)
//!
//! ### UpdateElementStyles / UpdateElementsStyles / MoveElements / AlignElements
//! - Shallow merge into existing styles
//! - The batched variants touch any number of elements in one step
//!
//! ### ReplaceSlide
//! - Matched by slide id; a slide with an unknown id is dropped

use std::collections::BTreeMap;

use arnika_model::{Element, ElementStyles, NavigationMetadata, Project, Slide, ThemePatch};
use serde::{Deserialize, Serialize};

use crate::store;

/// Semantic mutations (one per user action)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    AddSlide {
        slide: Slide,
    },

    DeleteSlide {
        slide_id: String,
    },

    /// Move a slide to a new position in the deck
    MoveSlide {
        slide_id: String,
        index: usize,
    },

    UpdateSlideTitle {
        slide_id: String,
        title: String,
    },

    /// Replace a slide by id (refinement result)
    ReplaceSlide {
        slide: Slide,
    },

    AddElement {
        slide_id: String,
        element: Element,
    },

    /// Insert several elements at once (paste, duplicate)
    AddElements {
        slide_id: String,
        elements: Vec<Element>,
    },

    DeleteElements {
        slide_id: String,
        element_ids: Vec<String>,
    },

    UpdateElementStyles {
        slide_id: String,
        element_id: String,
        styles: ElementStyles,
    },

    /// Style patches for several elements of one slide
    UpdateElementsStyles {
        slide_id: String,
        styles: BTreeMap<String, ElementStyles>,
    },

    /// Position update committed at the end of a drag
    MoveElements {
        slide_id: String,
        positions: BTreeMap<String, ElementStyles>,
    },

    /// Batched update produced by an alignment command
    AlignElements {
        slide_id: String,
        updates: BTreeMap<String, ElementStyles>,
    },

    UpdateElementMetadata {
        slide_id: String,
        element_id: String,
        metadata: NavigationMetadata,
    },

    UpdateElementContent {
        slide_id: String,
        element_id: String,
        content: String,
    },

    /// Assign a group id to elements, or clear it with `None`
    SetElementsGroup {
        slide_id: String,
        element_ids: Vec<String>,
        group_id: Option<String>,
    },

    ApplyTheme {
        theme: ThemePatch,
    },
}

impl Mutation {
    /// Apply to a project value. `None` means the project was dissolved.
    pub fn apply(&self, project: &Project) -> Option<Project> {
        let next = match self {
            Mutation::AddSlide { slide } => store::add_slide(project, slide.clone()),

            Mutation::DeleteSlide { slide_id } => return store::delete_slide(project, slide_id),

            Mutation::MoveSlide { slide_id, index } => {
                store::move_slide(project, slide_id, *index)
            }

            Mutation::UpdateSlideTitle { slide_id, title } => {
                store::update_slide_title(project, slide_id, title)
            }

            Mutation::ReplaceSlide { slide } => store::replace_slide(project, slide.clone()),

            Mutation::AddElement { slide_id, element } => {
                store::add_element(project, slide_id, element.clone())
            }

            Mutation::AddElements { slide_id, elements } => {
                store::add_elements(project, slide_id, elements.clone())
            }

            Mutation::DeleteElements {
                slide_id,
                element_ids,
            } => store::delete_elements(project, slide_id, element_ids),

            Mutation::UpdateElementStyles {
                slide_id,
                element_id,
                styles,
            } => store::update_element_styles(project, slide_id, element_id, styles),

            Mutation::UpdateElementsStyles {
                slide_id,
                styles: patches,
            }
            | Mutation::MoveElements {
                slide_id,
                positions: patches,
            }
            | Mutation::AlignElements {
                slide_id,
                updates: patches,
            } => store::update_elements_styles(project, slide_id, patches),

            Mutation::UpdateElementMetadata {
                slide_id,
                element_id,
                metadata,
            } => store::update_element_metadata(project, slide_id, element_id, metadata.clone()),

            Mutation::UpdateElementContent {
                slide_id,
                element_id,
                content,
            } => store::update_element_content(project, slide_id, element_id, content),

            Mutation::SetElementsGroup {
                slide_id,
                element_ids,
                group_id,
            } => store::set_elements_group(project, slide_id, element_ids, group_id.as_deref()),

            Mutation::ApplyTheme { theme } => store::apply_theme(project, theme),
        };

        Some(next)
    }

    /// History label recorded for this mutation
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::AddSlide { .. } => "Add Slide",
            Mutation::DeleteSlide { .. } => "Delete Slide",
            Mutation::MoveSlide { .. } => "Reorder Slides",
            Mutation::UpdateSlideTitle { .. } => "Rename Slide",
            Mutation::ReplaceSlide { .. } => "Refine Slide",
            Mutation::AddElement { .. } => "Add Element",
            Mutation::AddElements { .. } => "Paste Elements",
            Mutation::DeleteElements { element_ids, .. } if element_ids.len() > 1 => {
                "Delete Elements"
            }
            Mutation::DeleteElements { .. } => "Delete Element",
            Mutation::UpdateElementStyles { .. } | Mutation::UpdateElementsStyles { .. } => {
                "Update Style"
            }
            Mutation::MoveElements { .. } => "Move Elements",
            Mutation::AlignElements { .. } => "Align Elements",
            Mutation::UpdateElementMetadata { .. } => "Update Link",
            Mutation::UpdateElementContent { .. } => "Edit Content",
            Mutation::SetElementsGroup { group_id: Some(_), .. } => "Group Elements",
            Mutation::SetElementsGroup { group_id: None, .. } => "Ungroup Elements",
            Mutation::ApplyTheme { .. } => "Update Theme",
        }
    }

    /// Slide the mutation targets, if it targets one
    pub fn slide_id(&self) -> Option<&str> {
        match self {
            Mutation::AddSlide { slide } | Mutation::ReplaceSlide { slide } => Some(&slide.id),
            Mutation::ApplyTheme { .. } => None,
            Mutation::DeleteSlide { slide_id }
            | Mutation::MoveSlide { slide_id, .. }
            | Mutation::UpdateSlideTitle { slide_id, .. }
            | Mutation::AddElement { slide_id, .. }
            | Mutation::AddElements { slide_id, .. }
            | Mutation::DeleteElements { slide_id, .. }
            | Mutation::UpdateElementStyles { slide_id, .. }
            | Mutation::UpdateElementsStyles { slide_id, .. }
            | Mutation::MoveElements { slide_id, .. }
            | Mutation::AlignElements { slide_id, .. }
            | Mutation::UpdateElementMetadata { slide_id, .. }
            | Mutation::UpdateElementContent { slide_id, .. }
            | Mutation::SetElementsGroup { slide_id, .. } => Some(slide_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arnika_model::{template, LayoutType, Template};

    #[test]
    fn test_apply_dispatch() {
        let project = template(Template::Portfolio);
        let mutation = Mutation::UpdateSlideTitle {
            slide_id: "s2".into(),
            title: "Selected Works".into(),
        };

        let next = mutation.apply(&project).unwrap();
        assert_eq!(next.slides[1].title, "Selected Works");
        assert_eq!(mutation.label(), "Rename Slide");
        assert_eq!(mutation.slide_id(), Some("s2"));
    }

    #[test]
    fn test_delete_only_slide_dissolves() {
        let project = Project::new(
            "p",
            template(Template::Pitch).theme,
            vec![Slide::new("a", "A", LayoutType::Blank)],
        );
        let mutation = Mutation::DeleteSlide {
            slide_id: "a".into(),
        };
        assert!(mutation.apply(&project).is_none());
    }

    #[test]
    fn test_mutation_serializes() {
        let mutation = Mutation::SetElementsGroup {
            slide_id: "s1".into(),
            element_ids: vec!["e1".into()],
            group_id: None,
        };
        let json = serde_json::to_string(&mutation).unwrap();
        let back: Mutation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mutation);
        assert_eq!(back.label(), "Ungroup Elements");
    }
}
