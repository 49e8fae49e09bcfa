//! Hover / selection highlighting of committed segments

use super::TrailEditor;
use crate::error::EditError;
use crate::notify::Notifier;
use crate::scene::{Owner, Phase, Renderer, Role, ScreenPos, SegmentKey, Style};
use crate::state::selection::LineState;
use crate::state::trails::TrailId;

impl<R: Renderer, N: Notifier> TrailEditor<R, N> {
    /// Color of a segment line given everything that may highlight it
    pub(super) fn line_style(&self, trail: TrailId, key: SegmentKey, phase: Phase) -> Style {
        let palette = &self.settings.palette;
        let color = if self.add_mode.is_some_and(|a| a.key == key) {
            palette.line_armed
        } else {
            match phase {
                Phase::Moving => palette.line_moving,
                Phase::Pending => palette.line_pending,
                Phase::Committed => match self.line_state(trail, key) {
                    LineState::Submitted => palette.line_submitted,
                    LineState::Selected => palette.line_selected,
                    LineState::Hovered => palette.line_hovered,
                    LineState::Default => palette.line_default,
                },
            }
        };
        Style::new(Role::Line, phase, color)
    }

    pub fn line_state(&self, trail: TrailId, key: SegmentKey) -> LineState {
        LineState::resolve(
            self.is_submitted(trail),
            self.selection.is_selected(&key),
            self.selection.is_hovered(&key),
        )
    }

    pub(super) fn restyle_segment(&mut self, key: SegmentKey) {
        let Some(entry) = self.index.segment(key) else {
            return;
        };
        let (trail, line, phase) = (entry.trail, entry.line, entry.phase);
        let style = self.line_style(trail, key, phase);
        self.renderer.set_style(line, style);
    }

    pub(super) fn restyle_trail(&mut self, trail: TrailId) {
        let keys: Vec<SegmentKey> = self.index.segments_of(trail).into_iter().map(|(k, _)| k).collect();
        for key in keys {
            self.restyle_segment(key);
        }
    }

    /// Make `trail` the selected trail and the submission target
    pub fn select_trail(&mut self, trail: TrailId) -> Result<(), EditError> {
        let group = self.store.get(trail).ok_or(EditError::TrailNotFound(trail))?;
        if group.len() < 2 {
            return Err(EditError::NotAllowed("selecting an empty trail"));
        }
        let lines = group.segments();
        let previous = self.selection.clear_selected();
        self.selection.select(trail, lines.iter().copied());
        for key in previous {
            self.restyle_segment(key);
        }
        self.restyle_trail(trail);
        self.submit_target = Some(trail);
        tracing::debug!("selected trail {trail}");
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        for key in self.selection.clear_selected() {
            self.restyle_segment(key);
        }
    }

    /// Reset the previous hover, then highlight the committed segment under
    /// `screen` if there is one
    pub fn update_hover(&mut self, screen: ScreenPos) {
        if let Some(previous) = self.selection.hovered_line.take() {
            self.restyle_segment(previous);
        }
        let hovered = self
            .renderer
            .pick(screen)
            .and_then(|h| self.index.owner(h))
            .and_then(|owner| match owner {
                Owner::Segment { key, .. } => Some(key),
                _ => None,
            })
            .filter(|key| {
                self.index
                    .segment(*key)
                    .is_some_and(|e| e.phase == Phase::Committed)
            });
        if let Some(key) = hovered {
            self.selection.hovered_line = Some(key);
            self.restyle_segment(key);
        }
    }
}
