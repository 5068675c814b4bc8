//! # Selection & Interaction
//!
//! Pointer and gesture state of the canvas: what is selected, whether a drag
//! or a pinch is in progress, the zoom, and the open context menu.
//!
//! ```text
//!            pointer-down (element)               release
//!   Idle ───────────────────────────▶ Dragging ──────────▶ Single/MultiSelected
//!    ▲                                   │
//!    │ pointer-down (canvas)             │ second touch
//!    │                                   ▼
//!    └──────────────────────────────  Pinching ◀── fingers lift ends it
//! ```
//!
//! Drags are purely visual until release: moves produce live offsets and only
//! the release hands a batched `{id → {left, top}}` update back to the caller.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use arnika_model::percent::DEFAULT_OFFSET;
use arnika_model::{format_percent, parse_length, ElementStyles, NavigationMetadata, Slide};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{drag_delta, Point, Zoom};

/// Observable state, derived from selection and gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InteractionState {
    Idle,
    SingleSelected,
    MultiSelected,
    Dragging,
    Pinching,
}

/// A pointer-down event (mouse or single touch)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerInput {
    pub position: Point,
    /// Ctrl, Cmd or Shift held
    pub multi_select: bool,
}

impl PointerInput {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            multi_select: false,
        }
    }

    pub fn with_modifier(mut self) -> Self {
        self.multi_select = true;
        self
    }
}

/// What a pointer-down resolved to
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    /// Nothing happened (hidden element, presentation mode, ...)
    Ignored,
    /// Follow the element's link instead of selecting it
    Navigate(NavigationMetadata),
    /// Selection changed, no drag
    Selected,
    /// Selection updated and start positions captured
    DragStarted,
    SelectionCleared,
}

#[derive(Debug, Clone)]
struct DragState {
    origin: Point,
    /// Start left/top (percent) of every element that moves
    start: BTreeMap<String, (f64, f64)>,
    offsets: BTreeMap<String, ElementStyles>,
}

#[derive(Debug, Clone)]
enum Gesture {
    None,
    Dragging(DragState),
    Pinching { last_distance: Option<f64> },
}

/// Right-click menu anchored at a screen position
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub position: Point,
    /// Element under the pointer, `None` on empty canvas
    pub target: Option<String>,
    pub multi: bool,
}

impl ContextMenu {
    /// Menu items in display order
    pub fn actions(&self) -> Vec<ContextAction> {
        if self.target.is_none() && !self.multi {
            return vec![ContextAction::Paste];
        }

        let mut actions = Vec::with_capacity(9);
        if self.multi {
            actions.push(ContextAction::Group);
        } else {
            actions.push(ContextAction::Ungroup);
        }
        actions.extend([
            ContextAction::Cut,
            ContextAction::Copy,
            ContextAction::Paste,
            ContextAction::Duplicate,
            ContextAction::BringToFront,
            ContextAction::SendToBack,
            ContextAction::Delete,
        ]);
        actions
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContextAction {
    Group,
    Ungroup,
    Cut,
    Copy,
    Paste,
    Duplicate,
    #[serde(rename = "bringFront")]
    BringToFront,
    #[serde(rename = "sendBack")]
    SendToBack,
    Delete,
}

impl ContextAction {
    pub fn label(&self) -> &'static str {
        match self {
            ContextAction::Group => "Group",
            ContextAction::Ungroup => "Ungroup",
            ContextAction::Cut => "Cut",
            ContextAction::Copy => "Copy",
            ContextAction::Paste => "Paste",
            ContextAction::Duplicate => "Duplicate",
            ContextAction::BringToFront => "Bring to Front",
            ContextAction::SendToBack => "Send to Back",
            ContextAction::Delete => "Delete",
        }
    }

    pub fn shortcut(&self) -> Option<&'static str> {
        match self {
            ContextAction::Group => Some("Ctrl+G"),
            ContextAction::Ungroup => Some("Ctrl+Shift+G"),
            ContextAction::Cut => Some("Ctrl+X"),
            ContextAction::Copy => Some("Ctrl+C"),
            ContextAction::Paste => Some("Ctrl+V"),
            ContextAction::Duplicate => Some("Ctrl+D"),
            ContextAction::Delete => Some("Del"),
            ContextAction::BringToFront | ContextAction::SendToBack => None,
        }
    }
}

impl fmt::Display for ContextAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown context action '{}'", self.0)
    }
}

impl std::error::Error for UnknownAction {}

impl FromStr for ContextAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "group" => Ok(ContextAction::Group),
            "ungroup" => Ok(ContextAction::Ungroup),
            "cut" => Ok(ContextAction::Cut),
            "copy" => Ok(ContextAction::Copy),
            "paste" => Ok(ContextAction::Paste),
            "duplicate" => Ok(ContextAction::Duplicate),
            "bringfront" | "bringtofront" | "front" => Ok(ContextAction::BringToFront),
            "sendback" | "sendtoback" | "back" => Ok(ContextAction::SendToBack),
            "delete" => Ok(ContextAction::Delete),
            _ => Err(UnknownAction(s.to_string())),
        }
    }
}

/// Selection, gesture and zoom state of one canvas
#[derive(Debug, Clone)]
pub struct Interaction {
    selection: Vec<String>,
    gesture: Gesture,
    zoom: Zoom,
    presenting: bool,
    context_menu: Option<ContextMenu>,
}

impl Interaction {
    pub fn new() -> Self {
        Self {
            selection: Vec::new(),
            gesture: Gesture::None,
            zoom: Zoom::new(),
            presenting: false,
            context_menu: None,
        }
    }

    pub fn state(&self) -> InteractionState {
        match (&self.gesture, self.selection.len()) {
            (Gesture::Dragging(_), _) => InteractionState::Dragging,
            (Gesture::Pinching { .. }, _) => InteractionState::Pinching,
            (Gesture::None, 0) => InteractionState::Idle,
            (Gesture::None, 1) => InteractionState::SingleSelected,
            (Gesture::None, _) => InteractionState::MultiSelected,
        }
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.iter().any(|s| s == id)
    }

    pub fn zoom(&self) -> &Zoom {
        &self.zoom
    }

    pub fn zoom_mut(&mut self) -> &mut Zoom {
        &mut self.zoom
    }

    pub fn is_presenting(&self) -> bool {
        self.presenting
    }

    /// Entering presentation mode drops selection, gestures and menus
    pub fn set_presenting(&mut self, presenting: bool) {
        self.presenting = presenting;
        if presenting {
            self.clear_selection();
        }
    }

    /// Resolve a pointer-down on `target` (an element id) or, with `None`,
    /// on empty canvas.
    pub fn pointer_down(
        &mut self,
        slide: &Slide,
        target: Option<&str>,
        input: PointerInput,
    ) -> PointerOutcome {
        self.context_menu = None;

        let Some(element) = target.and_then(|id| slide.element(id)) else {
            if self.presenting {
                return PointerOutcome::Ignored;
            }
            self.clear_selection();
            return PointerOutcome::SelectionCleared;
        };

        if element.is_hidden() {
            return PointerOutcome::Ignored;
        }

        if self.presenting {
            return match element.metadata {
                NavigationMetadata::None => PointerOutcome::Ignored,
                ref link => PointerOutcome::Navigate(link.clone()),
            };
        }

        let selected = self.is_selected(&element.id);

        if !selected && !input.multi_select && !element.metadata.is_none() {
            debug!(element = %element.id, "pointer-down follows link");
            return PointerOutcome::Navigate(element.metadata.clone());
        }

        if input.multi_select && !selected {
            self.selection.push(element.id.clone());
            return PointerOutcome::Selected;
        }

        if !selected {
            self.selection = vec![element.id.clone()];
        }

        self.begin_drag(slide, input.position);
        PointerOutcome::DragStarted
    }

    fn begin_drag(&mut self, slide: &Slide, origin: Point) {
        let start = self
            .selection
            .iter()
            .filter_map(|id| slide.element(id))
            .map(|el| {
                (
                    el.id.clone(),
                    (
                        parse_length(el.left(), DEFAULT_OFFSET),
                        parse_length(el.top(), DEFAULT_OFFSET),
                    ),
                )
            })
            .collect();

        self.gesture = Gesture::Dragging(DragState {
            origin,
            start,
            offsets: BTreeMap::new(),
        });
    }

    /// Pointer move. While dragging, returns the live positions of every
    /// moving element.
    pub fn pointer_move(&mut self, position: Point) -> Option<&BTreeMap<String, ElementStyles>> {
        let scale = self.zoom.effective();
        let Gesture::Dragging(drag) = &mut self.gesture else {
            return None;
        };

        let (dx, dy) = drag_delta(drag.origin, position, scale);
        drag.offsets = drag
            .start
            .iter()
            .map(|(id, (left, top))| {
                (
                    id.clone(),
                    ElementStyles::position(format_percent(left + dx), format_percent(top + dy)),
                )
            })
            .collect();

        Some(&drag.offsets)
    }

    /// Live drag offsets, empty when not dragging
    pub fn live_offsets(&self) -> Option<&BTreeMap<String, ElementStyles>> {
        match &self.gesture {
            Gesture::Dragging(drag) => Some(&drag.offsets),
            _ => None,
        }
    }

    /// Pointer release. Returns the positions to commit when the drag moved
    /// anything; the drag state is dropped either way.
    pub fn pointer_up(&mut self) -> Option<BTreeMap<String, ElementStyles>> {
        match std::mem::replace(&mut self.gesture, Gesture::None) {
            Gesture::Dragging(drag) if !drag.offsets.is_empty() => Some(drag.offsets),
            Gesture::Pinching { .. } | Gesture::Dragging(_) | Gesture::None => None,
        }
    }

    /// Touch move with every active touch point. Two or more points abandon
    /// any drag (without committing) and drive the pinch zoom; a single point
    /// behaves like [`Interaction::pointer_move`].
    pub fn touch_move(&mut self, touches: &[Point]) -> Option<&BTreeMap<String, ElementStyles>> {
        match touches {
            [] => None,
            [single] => self.pointer_move(*single),
            [first, second, ..] => {
                if self.presenting {
                    return None;
                }
                let distance = first.distance(second);
                let previous = match &self.gesture {
                    Gesture::Pinching { last_distance } => *last_distance,
                    Gesture::Dragging(_) => {
                        debug!("second touch abandons drag");
                        None
                    }
                    Gesture::None => None,
                };
                if let Some(previous) = previous {
                    self.zoom.pinch(previous, distance);
                }
                self.gesture = Gesture::Pinching {
                    last_distance: Some(distance),
                };
                None
            }
        }
    }

    /// Touch end with the number of fingers still down
    pub fn touch_end(&mut self, remaining: usize) -> Option<BTreeMap<String, ElementStyles>> {
        if matches!(self.gesture, Gesture::Pinching { .. }) {
            if remaining < 2 {
                self.gesture = Gesture::None;
            }
            return None;
        }
        self.pointer_up()
    }

    /// Modifier + wheel zoom. Returns whether the zoom changed hands.
    pub fn wheel(&mut self, delta_y: f64, modifier: bool) -> bool {
        if self.presenting || !modifier {
            return false;
        }
        self.zoom.wheel(delta_y);
        true
    }

    /// Add or remove one id (layer panel, modifier click)
    pub fn toggle_selection(&mut self, id: &str) {
        if let Some(index) = self.selection.iter().position(|s| s == id) {
            self.selection.remove(index);
        } else {
            self.selection.push(id.to_string());
        }
    }

    pub fn select_only(&mut self, id: &str) {
        self.gesture = Gesture::None;
        self.selection = vec![id.to_string()];
    }

    pub fn select_many(&mut self, ids: impl IntoIterator<Item = String>) {
        self.gesture = Gesture::None;
        let mut seen = HashSet::new();
        self.selection = ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
    }

    /// Drops selection and any gesture in progress
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.gesture = Gesture::None;
        self.context_menu = None;
    }

    /// Forget selected ids that no longer exist on `slide`
    pub fn retain_existing(&mut self, slide: &Slide) {
        self.selection.retain(|id| slide.contains_element(id));
        if self.selection.is_empty() {
            self.gesture = Gesture::None;
        }
    }

    /// Open the context menu. Right-clicking an unselected element selects it
    /// first.
    pub fn open_context_menu(&mut self, position: Point, target: Option<&str>) -> &ContextMenu {
        if let Some(id) = target {
            if !self.is_selected(id) {
                self.select_only(id);
            }
        }

        let multi = target.is_some() && self.selection.len() > 1;
        self.context_menu.insert(ContextMenu {
            position,
            target: target.map(str::to_string),
            multi,
        })
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu = None;
    }
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arnika_model::{Element, ElementType, LayoutType};

    fn slide() -> Slide {
        Slide::new("s1", "Canvas", LayoutType::Blank).with_elements(vec![
            Element::new("a", ElementType::Text, "a")
                .with_styles(ElementStyles::position("10%", "20%")),
            Element::new("b", ElementType::Text, "b")
                .with_styles(ElementStyles::position("30%", "25%")),
            Element::new("link", ElementType::Button, "Go")
                .with_metadata(NavigationMetadata::internal("s2")),
            Element::new("ghost", ElementType::Shape, "").with_styles(ElementStyles {
                hidden: Some(true),
                ..Default::default()
            }),
        ])
    }

    #[test]
    fn test_click_selects_and_starts_drag() {
        let slide = slide();
        let mut ui = Interaction::new();

        let outcome = ui.pointer_down(&slide, Some("a"), PointerInput::at(0.0, 0.0));
        assert_eq!(outcome, PointerOutcome::DragStarted);
        assert_eq!(ui.state(), InteractionState::Dragging);
        assert_eq!(ui.selection(), ["a".to_string()]);

        // Release without moving commits nothing
        assert!(ui.pointer_up().is_none());
        assert_eq!(ui.state(), InteractionState::SingleSelected);
    }

    #[test]
    fn test_drag_two_selected_elements() {
        let slide = slide();
        let mut ui = Interaction::new();
        ui.select_many(["a".to_string(), "b".to_string()]);

        ui.pointer_down(&slide, Some("b"), PointerInput::at(50.0, 50.0));
        let live = ui.pointer_move(Point::new(150.0, 50.0)).unwrap();
        assert_eq!(live["a"].left.as_deref(), Some("20%"));

        let committed = ui.pointer_up().unwrap();
        assert_eq!(committed["a"].left.as_deref(), Some("20%"));
        assert_eq!(committed["a"].top.as_deref(), Some("20%"));
        assert_eq!(committed["b"].left.as_deref(), Some("40%"));
        assert_eq!(ui.state(), InteractionState::MultiSelected);
    }

    #[test]
    fn test_link_navigates_when_not_selected() {
        let slide = slide();
        let mut ui = Interaction::new();

        let outcome = ui.pointer_down(&slide, Some("link"), PointerInput::at(0.0, 0.0));
        assert_eq!(
            outcome,
            PointerOutcome::Navigate(NavigationMetadata::internal("s2"))
        );
        assert!(ui.selection().is_empty());

        // Selected through the layer panel, it drags instead
        ui.select_only("link");
        let outcome = ui.pointer_down(&slide, Some("link"), PointerInput::at(0.0, 0.0));
        assert_eq!(outcome, PointerOutcome::DragStarted);
    }

    #[test]
    fn test_modifier_adds_without_drag() {
        let slide = slide();
        let mut ui = Interaction::new();
        ui.select_only("a");

        let outcome = ui.pointer_down(
            &slide,
            Some("link"),
            PointerInput::at(0.0, 0.0).with_modifier(),
        );
        assert_eq!(outcome, PointerOutcome::Selected);
        assert_eq!(ui.state(), InteractionState::MultiSelected);

        let outcome = ui.pointer_down(&slide, Some("a"), PointerInput::at(0.0, 0.0).with_modifier());
        assert_eq!(outcome, PointerOutcome::DragStarted);
    }

    #[test]
    fn test_hidden_and_presenting_ignored() {
        let slide = slide();
        let mut ui = Interaction::new();
        assert_eq!(
            ui.pointer_down(&slide, Some("ghost"), PointerInput::at(0.0, 0.0)),
            PointerOutcome::Ignored
        );

        ui.set_presenting(true);
        assert_eq!(
            ui.pointer_down(&slide, Some("a"), PointerInput::at(0.0, 0.0)),
            PointerOutcome::Ignored
        );
        assert!(matches!(
            ui.pointer_down(&slide, Some("link"), PointerInput::at(0.0, 0.0)),
            PointerOutcome::Navigate(_)
        ));
        assert!(!ui.wheel(-100.0, true));
    }

    #[test]
    fn test_empty_canvas_clears() {
        let slide = slide();
        let mut ui = Interaction::new();
        ui.select_only("a");
        assert_eq!(
            ui.pointer_down(&slide, None, PointerInput::at(0.0, 0.0)),
            PointerOutcome::SelectionCleared
        );
        assert_eq!(ui.state(), InteractionState::Idle);
    }

    #[test]
    fn test_second_touch_abandons_drag_and_pinches() {
        let slide = slide();
        let mut ui = Interaction::new();
        ui.pointer_down(&slide, Some("a"), PointerInput::at(0.0, 0.0));
        ui.touch_move(&[Point::new(100.0, 0.0)]);

        ui.touch_move(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        assert_eq!(ui.state(), InteractionState::Pinching);
        ui.touch_move(&[Point::new(0.0, 0.0), Point::new(140.0, 0.0)]);
        assert!((ui.zoom().multiplier() - 1.2).abs() < 1e-9);

        assert!(ui.touch_end(1).is_none());
        assert_eq!(ui.state(), InteractionState::SingleSelected);
    }

    #[test]
    fn test_toggle_and_retain() {
        let mut ui = Interaction::new();
        ui.toggle_selection("a");
        ui.toggle_selection("b");
        ui.toggle_selection("a");
        assert_eq!(ui.selection(), ["b".to_string()]);

        ui.toggle_selection("gone");
        ui.retain_existing(&slide());
        assert_eq!(ui.selection(), ["b".to_string()]);
    }

    #[test]
    fn test_select_many_drops_repeats() {
        let mut ui = Interaction::new();
        ui.select_many(["a", "b", "a"].map(String::from));
        assert_eq!(ui.selection(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_context_menu_items() {
        let mut ui = Interaction::new();
        let menu = ui.open_context_menu(Point::new(5.0, 5.0), None);
        assert_eq!(menu.actions(), vec![ContextAction::Paste]);

        let menu = ui.open_context_menu(Point::new(5.0, 5.0), Some("a"));
        assert_eq!(menu.actions()[0], ContextAction::Ungroup);
        assert_eq!(menu.actions().len(), 8);

        ui.toggle_selection("b");
        let menu = ui.open_context_menu(Point::new(5.0, 5.0), Some("a"));
        assert_eq!(menu.actions()[0], ContextAction::Group);

        assert_eq!(
            "bringFront".parse::<ContextAction>().unwrap(),
            ContextAction::BringToFront
        );
    }
}
