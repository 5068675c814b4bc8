//! # Arnika Model
//!
//! The document tree edited by Arnika: a [`Project`] owns an ordered list of
//! [`Slide`]s, each slide owns freely positioned [`Element`]s.
//!
//! Element positions are stored as percentage-of-canvas strings (`"40%"`) so
//! layout is resolution independent. [`percent`] is the single place those
//! strings are turned into numbers.

pub mod error;
pub mod id_generator;
pub mod navigation;
pub mod percent;
pub mod project;
pub mod templates;

pub use error::{ModelError, ModelResult};
pub use id_generator::IdGenerator;
pub use navigation::{NavigationLink, NavigationMetadata};
pub use percent::{format_percent, parse_length, CANVAS_HEIGHT, CANVAS_WIDTH};
pub use project::{
    AnimationType, Element, ElementStyles, ElementType, LayoutType, Project, Slide, SlideStyles,
    TextAlign, Theme, ThemePatch, TransitionType,
};
pub use templates::{template, Template, ThemePreset};
