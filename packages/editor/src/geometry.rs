//! Canvas math: drag translation, multi-select alignment, and zoom.
//!
//! Every position is a percentage of the 1000 × 562.5 design canvas, read
//! through [`parse_length`] so drag, alignment and export agree on defaults.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use arnika_model::percent::{DEFAULT_OFFSET, DEFAULT_WIDTH};
use arnika_model::{format_percent, parse_length, Element, ElementStyles, CANVAS_HEIGHT, CANVAS_WIDTH};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.2;
pub const MAX_ZOOM: f64 = 5.0;

/// Zoom-in / zoom-out button increment
pub const ZOOM_STEP: f64 = 0.2;

/// Multiplier delta per wheel unit (applied to `-deltaY`)
pub const WHEEL_ZOOM_RATE: f64 = 0.005;

/// Multiplier delta per pixel of pinch distance change
pub const PINCH_ZOOM_RATE: f64 = 0.005;

/// Space kept around the canvas when fitting it into a container
pub const FIT_MARGIN: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Pointer travel in screen pixels converted to canvas percentage points.
///
/// The canvas is displayed at `CANVAS_WIDTH × scale` by `CANVAS_HEIGHT × scale`
/// pixels, so `dx = Δx / (1000 · scale) · 100`.
pub fn drag_delta(start: Point, current: Point, scale: f64) -> (f64, f64) {
    let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    let dx = (current.x - start.x) / (CANVAS_WIDTH * scale) * 100.0;
    let dy = (current.y - start.y) / (CANVAS_HEIGHT * scale) * 100.0;
    (dx, dy)
}

/// Numeric left/top/width of an element, in percent
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRect {
    pub id: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
}

impl ElementRect {
    pub fn of(element: &Element) -> Self {
        Self {
            id: element.id.clone(),
            left: parse_length(element.left(), DEFAULT_OFFSET),
            top: parse_length(element.top(), DEFAULT_OFFSET),
            width: parse_length(element.width(), DEFAULT_WIDTH),
        }
    }

    pub fn center(&self) -> f64 {
        self.left + self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    /// Even vertical spacing between the topmost and bottommost element
    DistributeVertical,
}

impl Alignment {
    pub const ALL: [Alignment; 4] = [
        Alignment::Left,
        Alignment::Center,
        Alignment::Right,
        Alignment::DistributeVertical,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::DistributeVertical => "distribute",
        }
    }

    /// Fewest elements the alignment does anything with
    pub fn min_elements(&self) -> usize {
        match self {
            Alignment::DistributeVertical => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlignment(pub String);

impl fmt::Display for UnknownAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown alignment '{}' (expected left, center, right or distribute)",
            self.0
        )
    }
}

impl std::error::Error for UnknownAlignment {}

impl FromStr for Alignment {
    type Err = UnknownAlignment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "alignleft" => Ok(Alignment::Left),
            "center" | "centre" | "aligncenter" => Ok(Alignment::Center),
            "right" | "alignright" => Ok(Alignment::Right),
            "distribute" | "distributevertical" | "distribute-vertical" => {
                Ok(Alignment::DistributeVertical)
            }
            other => Err(UnknownAlignment(other.to_string())),
        }
    }
}

/// Compute the batched style update for an alignment.
///
/// Returns an empty map when fewer than [`Alignment::min_elements`] rects are
/// given; callers treat that as a no-op.
pub fn align(rects: &[ElementRect], alignment: Alignment) -> BTreeMap<String, ElementStyles> {
    let mut updates = BTreeMap::new();
    if rects.len() < alignment.min_elements() {
        return updates;
    }

    let left_only = |left: f64| ElementStyles {
        left: Some(format_percent(left)),
        ..Default::default()
    };

    match alignment {
        Alignment::Left => {
            let min_left = rects.iter().map(|r| r.left).fold(f64::INFINITY, f64::min);
            for rect in rects {
                updates.insert(rect.id.clone(), left_only(min_left));
            }
        }
        Alignment::Center => {
            let average = rects.iter().map(ElementRect::center).sum::<f64>() / rects.len() as f64;
            for rect in rects {
                updates.insert(rect.id.clone(), left_only(average - rect.width / 2.0));
            }
        }
        Alignment::Right => {
            let max_right = rects
                .iter()
                .map(ElementRect::right)
                .fold(f64::NEG_INFINITY, f64::max);
            for rect in rects {
                updates.insert(rect.id.clone(), left_only(max_right - rect.width));
            }
        }
        Alignment::DistributeVertical => {
            let mut ordered: Vec<&ElementRect> = rects.iter().collect();
            ordered.sort_by(|a, b| a.top.total_cmp(&b.top));

            let first = ordered[0].top;
            let last = ordered[ordered.len() - 1].top;
            let gap = (last - first) / (ordered.len() - 1) as f64;

            for (i, rect) in ordered.iter().enumerate() {
                updates.insert(
                    rect.id.clone(),
                    ElementStyles {
                        top: Some(format_percent(first + gap * i as f64)),
                        ..Default::default()
                    },
                );
            }
        }
    }

    updates
}

/// Scale at which the canvas fits its container.
///
/// `min((w − 40) / 1000, (h − 40) / 562.5, cap)`, where the cap is 1.5 while
/// presenting and 1 while editing. A container too small for a positive
/// result falls back to 1.
pub fn fit_scale(container_width: f64, container_height: f64, presenting: bool) -> f64 {
    let cap = if presenting { 1.5 } else { 1.0 };
    let scale = ((container_width - FIT_MARGIN) / CANVAS_WIDTH)
        .min((container_height - FIT_MARGIN) / CANVAS_HEIGHT)
        .min(cap);

    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

fn clamp_zoom(value: f64) -> f64 {
    if value.is_nan() {
        return 1.0;
    }
    value.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Fit scale and user zoom multiplier of the canvas view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    base: f64,
    user: f64,
}

impl Zoom {
    pub fn new() -> Self {
        Self {
            base: 1.0,
            user: 1.0,
        }
    }

    /// Recompute the fit scale for a new container size; the user
    /// multiplier is kept.
    pub fn fit(&mut self, container_width: f64, container_height: f64, presenting: bool) {
        self.base = fit_scale(container_width, container_height, presenting);
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn multiplier(&self) -> f64 {
        self.user
    }

    /// Scale the canvas is drawn at, clamped to `[0.2, 5]`
    pub fn effective(&self) -> f64 {
        clamp_zoom(self.base * self.user)
    }

    pub fn adjust(&mut self, delta: f64) {
        self.user = clamp_zoom(self.user + delta);
    }

    /// Modifier + wheel: scrolling up zooms in
    pub fn wheel(&mut self, delta_y: f64) {
        self.adjust(-delta_y * WHEEL_ZOOM_RATE);
    }

    /// Pinch update from the previous and current finger distance
    pub fn pinch(&mut self, previous_distance: f64, distance: f64) {
        self.adjust((distance - previous_distance) * PINCH_ZOOM_RATE);
    }

    pub fn zoom_in(&mut self) {
        self.adjust(ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.adjust(-ZOOM_STEP);
    }

    pub fn reset(&mut self) {
        self.user = 1.0;
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(id: &str, left: f64, top: f64, width: f64) -> ElementRect {
        ElementRect {
            id: id.to_string(),
            left,
            top,
            width,
        }
    }

    fn left_of<'a>(updates: &'a BTreeMap<String, ElementStyles>, id: &str) -> &'a str {
        updates[id].left.as_deref().unwrap()
    }

    #[test]
    fn test_drag_delta_scales_with_zoom() {
        let (dx, dy) = drag_delta(Point::new(0.0, 0.0), Point::new(100.0, 56.25), 1.0);
        assert_eq!(dx, 10.0);
        assert_eq!(dy, 10.0);

        let (dx, _) = drag_delta(Point::new(0.0, 0.0), Point::new(200.0, 0.0), 2.0);
        assert_eq!(dx, 10.0);

        let (dx, _) = drag_delta(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 0.0);
        assert_eq!(dx, 10.0);
    }

    #[test]
    fn test_align_left() {
        let rects = vec![
            rect("a", 10.0, 0.0, 10.0),
            rect("b", 25.0, 0.0, 10.0),
            rect("c", 40.0, 0.0, 10.0),
        ];
        let updates = align(&rects, Alignment::Left);
        for id in ["a", "b", "c"] {
            assert_eq!(left_of(&updates, id), "10%");
            assert!(updates[id].top.is_none());
        }
    }

    #[test]
    fn test_align_center() {
        let rects = vec![rect("a", 10.0, 0.0, 20.0), rect("b", 50.0, 0.0, 10.0)];
        let updates = align(&rects, Alignment::Center);
        assert_eq!(left_of(&updates, "a"), "27.5%");
        assert_eq!(left_of(&updates, "b"), "32.5%");
    }

    #[test]
    fn test_align_right() {
        let rects = vec![rect("a", 10.0, 0.0, 20.0), rect("b", 50.0, 0.0, 10.0)];
        let updates = align(&rects, Alignment::Right);
        assert_eq!(left_of(&updates, "a"), "40%");
        assert_eq!(left_of(&updates, "b"), "50%");
    }

    #[test]
    fn test_align_needs_two() {
        let rects = vec![rect("a", 10.0, 0.0, 20.0)];
        for alignment in Alignment::ALL {
            assert!(align(&rects, alignment).is_empty());
        }
    }

    #[test]
    fn test_distribute_vertical() {
        let rects = vec![
            rect("a", 0.0, 70.0, 10.0),
            rect("b", 0.0, 10.0, 10.0),
            rect("c", 0.0, 15.0, 10.0),
        ];
        let updates = align(&rects, Alignment::DistributeVertical);
        assert_eq!(updates["b"].top.as_deref(), Some("10%"));
        assert_eq!(updates["c"].top.as_deref(), Some("40%"));
        assert_eq!(updates["a"].top.as_deref(), Some("70%"));

        assert!(align(&rects[..2], Alignment::DistributeVertical).is_empty());
    }

    #[test]
    fn test_rect_defaults() {
        let element = Element::new("x", arnika_model::ElementType::Text, "")
            .with_styles(ElementStyles {
                left: Some("auto".into()),
                width: Some("300px".into()),
                ..Default::default()
            });
        let r = ElementRect::of(&element);
        assert_eq!(r.left, 0.0);
        assert_eq!(r.top, 0.0);
        assert_eq!(r.width, 300.0);
    }

    #[test]
    fn test_parse_alignment() {
        assert_eq!("alignCenter".parse::<Alignment>().unwrap(), Alignment::Center);
        assert_eq!("Right".parse::<Alignment>().unwrap(), Alignment::Right);
        assert!("diagonal".parse::<Alignment>().is_err());
    }

    #[test]
    fn test_fit_scale() {
        assert_eq!(fit_scale(2040.0, 2000.0, false), 1.0);
        assert_eq!(fit_scale(2040.0, 2000.0, true), 1.5);
        assert_eq!(fit_scale(540.0, 2000.0, false), 0.5);
        assert_eq!(fit_scale(20.0, 20.0, false), 1.0);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut zoom = Zoom::new();
        for _ in 0..100 {
            zoom.wheel(-500.0);
        }
        assert_eq!(zoom.multiplier(), MAX_ZOOM);

        for _ in 0..100 {
            zoom.pinch(400.0, 0.0);
        }
        assert_eq!(zoom.multiplier(), MIN_ZOOM);

        zoom.reset();
        zoom.zoom_in();
        assert!((zoom.multiplier() - 1.2).abs() < 1e-9);

        zoom.fit(2040.0, 2000.0, true);
        zoom.adjust(10.0);
        assert_eq!(zoom.effective(), MAX_ZOOM);
    }
}
