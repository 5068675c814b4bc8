//! Navigation targets for elements and the project navbar.

use serde::{Deserialize, Serialize};

/// Where clicking an element leads.
///
/// Stored documents spell this as `{"targetSlideId": "..."}` or
/// `{"href": "..."}`. Empty strings mean "no target" (the toolbar clears one
/// side by writing `""`). If both sides are filled the URL wins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawMetadata", into = "RawMetadata")]
pub enum NavigationMetadata {
    /// Jump to another slide of the same project (may dangle)
    Internal(String),
    /// Open an external URL
    External(String),
    #[default]
    None,
}

impl NavigationMetadata {
    pub fn internal(slide_id: impl Into<String>) -> Self {
        Self::Internal(slide_id.into())
    }

    pub fn external(url: impl Into<String>) -> Self {
        Self::External(url.into())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn target_slide_id(&self) -> Option<&str> {
        match self {
            Self::Internal(id) => Some(id),
            _ => None,
        }
    }

    pub fn href(&self) -> Option<&str> {
        match self {
            Self::External(url) => Some(url),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_slide_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    href: Option<String>,
}

impl From<RawMetadata> for NavigationMetadata {
    fn from(raw: RawMetadata) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        // A URL takes the click before a slide target
        match (non_empty(raw.href), non_empty(raw.target_slide_id)) {
            (Some(url), _) => Self::External(url),
            (None, Some(id)) => Self::Internal(id),
            (None, None) => Self::None,
        }
    }
}

impl From<NavigationMetadata> for RawMetadata {
    fn from(meta: NavigationMetadata) -> Self {
        match meta {
            NavigationMetadata::Internal(id) => RawMetadata {
                target_slide_id: Some(id),
                href: None,
            },
            NavigationMetadata::External(url) => RawMetadata {
                target_slide_id: None,
                href: Some(url),
            },
            NavigationMetadata::None => RawMetadata::default(),
        }
    }
}

/// Navbar entry. References slides by id only; a link whose target slide was
/// deleted stays in place and is reported as broken by the link map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationLink {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_slide_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavigationLink>,
}

impl NavigationLink {
    /// Iterate this link and all nested children, depth first
    pub fn walk(&self) -> Box<dyn Iterator<Item = &NavigationLink> + '_> {
        Box::new(std::iter::once(self).chain(self.children.iter().flat_map(|c| c.walk())))
    }
}
