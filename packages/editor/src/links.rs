//! Link map: which element and navbar entry points at which slide.
//!
//! A link whose target slide was deleted is kept as-is and reported as
//! broken. Nothing repairs or blocks it; a dangling target is valid state.

use arnika_model::{NavigationLink, Project};
use serde::Serialize;

/// Element on a slide that jumps to another slide
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementLink {
    pub element_id: String,
    /// Element content, shown as the link text
    pub text: String,
    pub target_slide_id: String,
    /// `None` when the target slide no longer exists
    pub target_title: Option<String>,
}

impl ElementLink {
    pub fn is_broken(&self) -> bool {
        self.target_title.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideLinks {
    pub slide_id: String,
    pub title: String,
    pub links: Vec<ElementLink>,
}

/// Navbar entry with an internal target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavLinkStatus {
    pub link_id: String,
    pub label: String,
    pub target_slide_id: String,
    pub broken: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkMap {
    /// One entry per slide, in deck order
    pub slides: Vec<SlideLinks>,
    pub nav_links: Vec<NavLinkStatus>,
}

impl LinkMap {
    pub fn build(project: &Project) -> Self {
        let title_of = |id: &str| project.slide(id).map(|s| s.title.clone());

        let slides = project
            .slides
            .iter()
            .map(|slide| SlideLinks {
                slide_id: slide.id.clone(),
                title: slide.title.clone(),
                links: slide
                    .elements
                    .iter()
                    .filter_map(|el| {
                        let target = el.metadata.target_slide_id()?;
                        Some(ElementLink {
                            element_id: el.id.clone(),
                            text: el.content.clone(),
                            target_slide_id: target.to_string(),
                            target_title: title_of(target),
                        })
                    })
                    .collect(),
            })
            .collect();

        let nav_links = project
            .theme
            .nav_links
            .iter()
            .flat_map(NavigationLink::walk)
            .filter_map(|link| {
                let target = link.target_slide_id.as_deref()?;
                Some(NavLinkStatus {
                    link_id: link.id.clone(),
                    label: link.label.clone(),
                    target_slide_id: target.to_string(),
                    broken: project.slide(target).is_none(),
                })
            })
            .collect();

        Self { slides, nav_links }
    }

    pub fn broken_count(&self) -> usize {
        let elements = self
            .slides
            .iter()
            .flat_map(|s| &s.links)
            .filter(|l| l.is_broken())
            .count();
        elements + self.nav_links.iter().filter(|l| l.broken).count()
    }

    pub fn link_count(&self) -> usize {
        self.slides.iter().map(|s| s.links.len()).sum::<usize>() + self.nav_links.len()
    }
}
