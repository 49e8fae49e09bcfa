//! Add mode: split a segment with a new vertex

use super::{ArmedSegment, TrailEditor};
use crate::error::EditError;
use crate::notify::Notifier;
use crate::scene::{Renderer, ScreenPos, SegmentKey};
use crate::state::trails::{TrailId, VertexId};

impl<R: Renderer, N: Notifier> TrailEditor<R, N> {
    /// Arm add mode on a finished segment
    pub fn arm_insert(&mut self, trail: TrailId, key: SegmentKey) -> Result<(), EditError> {
        if self.active_edit().is_some() || self.drag.is_some() {
            return Err(EditError::NotAllowed("inserting a point"));
        }
        let group = self.store.get(trail).ok_or(EditError::TrailNotFound(trail))?;
        if !group.segments().contains(&key) || self.index.segment(key).is_none() {
            return Err(EditError::SegmentNotFound);
        }
        if let Some(previous) = self.add_mode.replace(ArmedSegment { trail, key }) {
            self.restyle_segment(previous.key);
        }
        self.restyle_segment(key);
        tracing::debug!("add mode armed on {key:?} of trail {trail}");
        Ok(())
    }

    pub fn exit_add_mode(&mut self) {
        if let Some(armed) = self.add_mode.take() {
            self.restyle_segment(armed.key);
            tracing::debug!("add mode cleared");
        }
    }

    /// Insert a vertex under `screen` into the armed segment.
    ///
    /// On error add mode stays armed so the user can click elsewhere.
    pub fn commit_insert(&mut self, screen: ScreenPos) -> Result<VertexId, EditError> {
        let armed = self
            .add_mode
            .ok_or(EditError::NotAllowed("inserting without a chosen segment"))?;
        let position = self
            .renderer
            .screen_to_world(screen)
            .ok_or(EditError::NoGroundPosition)?;
        let group = self
            .store
            .get(armed.trail)
            .ok_or(EditError::TrailNotFound(armed.trail))?;
        let (Some(a), Some(b)) = (group.index_of(armed.key.from), group.index_of(armed.key.to)) else {
            self.exit_add_mode();
            return Err(EditError::SegmentNotFound);
        };
        let index = a.min(b);

        let threshold = self.threshold();
        let id = self
            .store
            .insert_vertex(armed.trail, index + 1, position, threshold)?;
        self.add_mode = None;
        self.drop_segment(armed.key);

        let group = self
            .store
            .get(armed.trail)
            .ok_or(EditError::TrailNotFound(armed.trail))?;
        let (before, inserted, after) = (
            group.vertices[index],
            group.vertices[index + 1],
            group.vertices[index + 2],
        );
        let phase = self.phase_of(armed.trail);
        self.draw_point(armed.trail, inserted, phase);
        self.draw_segment(armed.trail, before, inserted, index, phase);
        self.draw_segment(armed.trail, inserted, after, index + 1, phase);
        self.relabel_from(armed.trail, index + 2);
        self.refresh_total(armed.trail);
        self.sync_selection(armed.trail);
        self.restyle_trail(armed.trail);
        tracing::info!("inserted vertex {id} into trail {} at {}", armed.trail, index + 1);
        Ok(id)
    }
}
