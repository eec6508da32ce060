//! Input Event Handling
//!
//! Pointer notifications arrive one at a time from the host. The
//! [`StrokeTracker`] turns them into stroke actions: a drag shows previews
//! while the button is held and commits once on release.

use crate::geometry::Point;

/// A pointer input event in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    /// Position in canvas space (pixels from top-left)
    pub position: Point,
    /// Type of event (down, move, up)
    pub event_type: PointerEventType,
}

impl PointerEvent {
    pub fn down(x: i32, y: i32) -> Self {
        Self::new(PointerEventType::Down, x, y)
    }

    pub fn moved(x: i32, y: i32) -> Self {
        Self::new(PointerEventType::Move, x, y)
    }

    pub fn up(x: i32, y: i32) -> Self {
        Self::new(PointerEventType::Up, x, y)
    }

    fn new(event_type: PointerEventType, x: i32, y: i32) -> Self {
        Self {
            position: Point::new(x, y),
            event_type,
        }
    }
}

/// Type of pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventType {
    /// Primary button pressed (start of stroke)
    Down,
    /// Pointer moved
    Move,
    /// Primary button released (end of stroke)
    Up,
}

/// What the surface should do in response to a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeAction {
    /// Show the stroke from `anchor` to `current` without committing it
    Preview { anchor: Point, current: Point },
    /// Make the stroke permanent
    Commit { anchor: Point, current: Point },
}

/// Drag state owned by the input-handling loop
#[derive(Debug, Default)]
pub struct StrokeTracker {
    /// Press position while the button is held
    anchor: Option<Point>,
}

impl StrokeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event. Moves with no button held and releases without a
    /// matching press produce nothing.
    pub fn handle(&mut self, event: PointerEvent) -> Option<StrokeAction> {
        let current = event.position;
        match event.event_type {
            PointerEventType::Down => {
                self.anchor = Some(current);
                None
            }
            PointerEventType::Move => self
                .anchor
                .map(|anchor| StrokeAction::Preview { anchor, current }),
            PointerEventType::Up => self
                .anchor
                .take()
                .map(|anchor| StrokeAction::Commit { anchor, current }),
        }
    }

    /// Abandon the drag in progress, if any. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        self.anchor.take().is_some()
    }

    /// Check if a drag is in progress
    pub fn is_drawing(&self) -> bool {
        self.anchor.is_some()
    }

    /// Press position of the drag in progress
    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }
}
