//! Interactive board: cards on a free-form canvas plus the detail panel.
//!
//! # Responsibility
//! - Turn raw pointer input into card moves or click verdicts.
//! - Materialize card records as visual cards on a host surface.
//! - Own the detail panel and its single map viewport.
//!
//! # Invariants
//! - The host (DOM, map widget) is reached only through the traits in
//!   `surface` and `panel`; nothing here assumes a browser.
//! - Per-card interaction state is keyed by `CardId`, never stored on the
//!   host element.

use std::ops::Sub;
use uuid::Uuid;

pub mod drag;
pub mod markup;
pub mod panel;
pub mod placement;
pub mod renderer;
pub mod surface;

/// Identity of one rendered card.
///
/// Fresh per materialization, so identical records still get distinct ids.
pub type CardId = Uuid;

/// Point in page coordinates (CSS pixels).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Host-assigned pointer identifier (mouse is usually a single fixed id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

/// One pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub pointer: PointerId,
    pub kind: PointerKind,
    pub position: Point,
}

impl PointerInput {
    pub fn new(pointer: PointerId, kind: PointerKind, position: Point) -> Self {
        Self {
            pointer,
            kind,
            position,
        }
    }

    pub fn mouse(x: f64, y: f64) -> Self {
        Self::new(PointerId(1), PointerKind::Mouse, Point::new(x, y))
    }
}

/// Raw pointer events as delivered by the host.
///
/// `Down` targets a card; the rest arrive through document-level listeners
/// and are routed by pointer id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { card: CardId, input: PointerInput },
    Move(PointerInput),
    Up(PointerId),
    Cancel(PointerId),
}
