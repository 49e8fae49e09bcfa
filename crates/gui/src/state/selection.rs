//! Hover / selection / drag references into the geometry index

use std::collections::HashSet;

use crate::scene::SegmentKey;
use crate::state::trails::{TrailId, VertexId};

/// Color state of a committed segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    Default,
    Hovered,
    Selected,
    Submitted,
}

impl LineState {
    /// submitted > selected > hovered > default
    pub fn resolve(submitted: bool, selected: bool, hovered: bool) -> Self {
        if submitted {
            LineState::Submitted
        } else if selected {
            LineState::Selected
        } else if hovered {
            LineState::Hovered
        } else {
            LineState::Default
        }
    }
}

/// Current hover / selection / drag targets
#[derive(Debug, Default)]
pub struct SelectionState {
    pub hovered_line: Option<SegmentKey>,
    /// Trail whose segments are drawn as selected
    pub selected_trail: Option<TrailId>,
    pub selected_lines: HashSet<SegmentKey>,
    pub dragged_point: Option<VertexId>,
    /// Segments of the dragged vertex's trail, highlighted for the gesture
    pub drag_lines: Vec<SegmentKey>,
}

impl SelectionState {
    pub fn is_selected(&self, key: &SegmentKey) -> bool {
        self.selected_lines.contains(key)
    }

    pub fn is_hovered(&self, key: &SegmentKey) -> bool {
        self.hovered_line.as_ref() == Some(key)
    }

    /// Replace the selection with `trail`'s segments
    pub fn select(&mut self, trail: TrailId, lines: impl IntoIterator<Item = SegmentKey>) {
        self.selected_trail = Some(trail);
        self.selected_lines = lines.into_iter().collect();
    }

    /// Clear selection, returning the segments that were selected
    pub fn clear_selected(&mut self) -> Vec<SegmentKey> {
        self.selected_trail = None;
        self.selected_lines.drain().collect()
    }

    /// Forget a segment that no longer exists
    pub fn forget_line(&mut self, key: &SegmentKey) {
        self.selected_lines.remove(key);
        if self.hovered_line.as_ref() == Some(key) {
            self.hovered_line = None;
        }
        self.drag_lines.retain(|k| k != key);
    }

    pub fn clear_drag(&mut self) {
        self.dragged_point = None;
        self.drag_lines.clear();
    }
}
