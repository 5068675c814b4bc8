//! # Project Store
//!
//! Pure transformations over a [`Project`] value. None of these functions
//! mutate their input: each returns a new project that shares every untouched
//! slide (`Arc<Slide>`) with the input.
//!
//! Unknown slide or element ids are not errors. Ids go stale across async
//! gaps, so an operation aimed at something that no longer exists returns the
//! input unchanged.

use std::collections::BTreeMap;
use std::sync::Arc;

use arnika_model::{Element, ElementStyles, NavigationMetadata, Project, Slide, ThemePatch};

/// Append a slide. A slide whose id is already taken is ignored.
pub fn add_slide(project: &Project, slide: Slide) -> Project {
    let mut next = project.clone();
    if project.slide_index(&slide.id).is_none() {
        next.slides.push(Arc::new(slide));
    }
    next
}

/// Remove a slide. Returns `None` when the removed slide was the last one,
/// which dissolves the project.
pub fn delete_slide(project: &Project, slide_id: &str) -> Option<Project> {
    let Some(index) = project.slide_index(slide_id) else {
        return Some(project.clone());
    };
    if project.slides.len() == 1 {
        return None;
    }

    let mut next = project.clone();
    next.slides.remove(index);
    Some(next)
}

pub fn add_element(project: &Project, slide_id: &str, element: Element) -> Project {
    add_elements(project, slide_id, vec![element])
}

/// Append several elements in one step. Elements whose id already exists on
/// the slide are skipped.
pub fn add_elements(project: &Project, slide_id: &str, elements: Vec<Element>) -> Project {
    edit_slide(project, slide_id, move |slide| {
        for element in elements {
            if !slide.contains_element(&element.id) {
                slide.elements.push(element);
            }
        }
    })
}

pub fn delete_element(project: &Project, slide_id: &str, element_id: &str) -> Project {
    delete_elements(project, slide_id, &[element_id.to_string()])
}

pub fn delete_elements(project: &Project, slide_id: &str, element_ids: &[String]) -> Project {
    let touches_any = project
        .slide(slide_id)
        .is_some_and(|s| element_ids.iter().any(|id| s.contains_element(id)));
    if !touches_any {
        return project.clone();
    }

    edit_slide(project, slide_id, |slide| {
        slide.elements.retain(|e| !element_ids.contains(&e.id));
    })
}

/// Shallow-merge `patch` into one element's styles
pub fn update_element_styles(
    project: &Project,
    slide_id: &str,
    element_id: &str,
    patch: &ElementStyles,
) -> Project {
    edit_element(project, slide_id, element_id, |element| element.apply_styles(patch))
}

/// Batched form of [`update_element_styles`]: one new project for any number
/// of elements. Ids missing from the slide are skipped.
pub fn update_elements_styles(
    project: &Project,
    slide_id: &str,
    patches: &BTreeMap<String, ElementStyles>,
) -> Project {
    let touches_any = project
        .slide(slide_id)
        .is_some_and(|s| patches.keys().any(|id| s.contains_element(id)));
    if !touches_any {
        return project.clone();
    }

    edit_slide(project, slide_id, |slide| {
        for element in slide.elements.iter_mut() {
            if let Some(patch) = patches.get(&element.id) {
                element.apply_styles(patch);
            }
        }
    })
}

pub fn update_slide_title(project: &Project, slide_id: &str, title: &str) -> Project {
    edit_slide(project, slide_id, |slide| slide.title = title.to_string())
}

/// Shallow-merge a partial theme
pub fn apply_theme(project: &Project, patch: &ThemePatch) -> Project {
    let mut next = project.clone();
    let theme = &mut next.theme;

    if let Some(color) = &patch.primary_color {
        theme.primary_color = color.clone();
    }
    if let Some(color) = &patch.secondary_color {
        theme.secondary_color = color.clone();
    }
    if let Some(font) = &patch.font_family {
        theme.font_family = font.clone();
    }
    if let Some(enabled) = patch.navbar_enabled {
        theme.navbar_enabled = enabled;
    }
    if let Some(links) = &patch.nav_links {
        theme.nav_links = links.clone();
    }

    next
}

pub fn update_element_metadata(
    project: &Project,
    slide_id: &str,
    element_id: &str,
    metadata: NavigationMetadata,
) -> Project {
    edit_element(project, slide_id, element_id, |element| element.metadata = metadata)
}

pub fn update_element_content(
    project: &Project,
    slide_id: &str,
    element_id: &str,
    content: &str,
) -> Project {
    edit_element(project, slide_id, element_id, |element| {
        element.content = content.to_string()
    })
}

/// Swap in a slide with the same id (e.g. a refined one)
pub fn replace_slide(project: &Project, slide: Slide) -> Project {
    let mut next = project.clone();
    if let Some(index) = project.slide_index(&slide.id) {
        next.slides[index] = Arc::new(slide);
    }
    next
}

/// Move a slide to `index`, clamped to the end of the deck
pub fn move_slide(project: &Project, slide_id: &str, index: usize) -> Project {
    let mut next = project.clone();
    if let Some(from) = project.slide_index(slide_id) {
        let slide = next.slides.remove(from);
        let to = index.min(next.slides.len());
        next.slides.insert(to, slide);
    }
    next
}

/// Set (or clear, with `None`) the group of the given elements
pub fn set_elements_group(
    project: &Project,
    slide_id: &str,
    element_ids: &[String],
    group_id: Option<&str>,
) -> Project {
    let touches_any = project
        .slide(slide_id)
        .is_some_and(|s| element_ids.iter().any(|id| s.contains_element(id)));
    if !touches_any {
        return project.clone();
    }

    edit_slide(project, slide_id, |slide| {
        for element in slide.elements.iter_mut() {
            if element_ids.contains(&element.id) {
                element.group_id = group_id.map(str::to_string);
            }
        }
    })
}

/// Copy-on-write edit of one slide. Unknown slide: returns the input.
fn edit_slide(project: &Project, slide_id: &str, edit: impl FnOnce(&mut Slide)) -> Project {
    let mut next = project.clone();
    if let Some(index) = project.slide_index(slide_id) {
        edit(Arc::make_mut(&mut next.slides[index]));
    }
    next
}

fn edit_element(
    project: &Project,
    slide_id: &str,
    element_id: &str,
    edit: impl FnOnce(&mut Element),
) -> Project {
    let Some(index) = project
        .slide(slide_id)
        .and_then(|s| s.element_index(element_id))
    else {
        return project.clone();
    };

    edit_slide(project, slide_id, |slide| edit(&mut slide.elements[index]))
}
