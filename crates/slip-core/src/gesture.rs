//! Swipe-to-delete tracking for a single receipt card.
//!
//! Horizontal offsets are in pixels; negative means the card moved left.

/// Offset the card snaps to when the delete button is revealed.
pub const SWIPE_THRESHOLD: f32 = 80.0;
/// Furthest the card can be dragged.
pub const DELETE_THRESHOLD: f32 = 150.0;
/// Fraction of [`DELETE_THRESHOLD`] past which releasing deletes.
const DELETE_RATIO: f32 = 0.8;
/// Offsets smaller than this still count as a tap.
const TAP_TOLERANCE: f32 = 10.0;

/// What happened when the finger was lifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Dragged far enough: the receipt should be deleted.
    Delete,
    /// Snapped open with the delete button visible.
    Reveal,
    /// Snapped back to rest.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Card was at rest; open the receipt.
    Open,
    /// Card was swiped; the tap only closed it.
    Close,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwipeTracker {
    offset: f32,
    start_x: f32,
    dragging: bool,
    deleting: bool,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn touch_start(&mut self, x: f32) {
        self.start_x = x;
        self.dragging = true;
    }

    /// Follows the finger leftwards only, clamped at [`DELETE_THRESHOLD`].
    pub fn touch_move(&mut self, x: f32) {
        if !self.dragging {
            return;
        }
        let diff = x - self.start_x;
        if diff < 0.0 {
            self.offset = diff.max(-DELETE_THRESHOLD);
        }
    }

    pub fn touch_end(&mut self) -> SwipeOutcome {
        self.dragging = false;
        if self.offset < -DELETE_THRESHOLD * DELETE_RATIO {
            self.deleting = true;
            SwipeOutcome::Delete
        } else if self.offset < -SWIPE_THRESHOLD {
            self.offset = -SWIPE_THRESHOLD;
            SwipeOutcome::Reveal
        } else {
            self.offset = 0.0;
            SwipeOutcome::Reset
        }
    }

    pub fn tap(&mut self) -> TapOutcome {
        if self.offset.abs() < TAP_TOLERANCE {
            TapOutcome::Open
        } else {
            self.offset = 0.0;
            TapOutcome::Close
        }
    }
}
