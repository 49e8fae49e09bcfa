//! Vertex and whole-trail removal

use super::{DrawState, TrailEditor};
use crate::error::EditError;
use crate::notify::Notifier;
use crate::scene::Renderer;
use crate::state::trails::{TrailId, VertexId};

impl<R: Renderer, N: Notifier> TrailEditor<R, N> {
    /// Delete a vertex and reconnect its neighbours.
    ///
    /// An endpoint loses its single segment instead. A finished trail left
    /// with one vertex is emptied, and if it had been submitted a removal
    /// notice is queued.
    pub fn remove_vertex(&mut self, trail: TrailId, vertex: VertexId) -> Result<(), EditError> {
        if self.add_mode.is_some() || self.drag.is_some() {
            return Err(EditError::NotAllowed("removing a point"));
        }
        let group = self.store.get(trail).ok_or(EditError::TrailNotFound(trail))?;
        let index = group.index_of(vertex).ok_or(EditError::VertexNotFound(vertex))?;
        let (prev, next) = group.neighbours(index);
        let old_fingerprint = group.fingerprint();

        if !self.notifier.confirm("Delete this point?") {
            return Err(EditError::Cancelled);
        }

        let drawing = self.is_active(trail);
        self.store.remove_vertex(trail, vertex)?;
        self.erase_point(vertex);
        for key in self.index.segments_touching(vertex) {
            self.drop_segment(key);
        }

        if let (Some(prev), Some(next)) = (prev, next) {
            let phase = self.phase_of(trail);
            self.draw_segment(trail, prev, next, index - 1, phase);
        }
        self.relabel_from(trail, index.saturating_sub(1));

        let remaining = self.store.get(trail).map_or(0, |g| g.len());
        if drawing {
            if remaining == 0 {
                if let DrawState::Drawing(edit) = &mut self.draw {
                    edit.reverse = false;
                }
                self.pointer = None;
            }
            self.update_preview();
        } else if remaining <= 1 {
            self.demote(trail, &old_fingerprint)?;
        } else {
            self.refresh_total(trail);
            self.sync_selection(trail);
            self.restyle_trail(trail);
        }
        tracing::info!("removed vertex {vertex} from trail {trail}, {remaining} left");
        Ok(())
    }

    /// Empty a finished trail that can no longer stand on its own
    fn demote(&mut self, trail: TrailId, old_fingerprint: &str) -> Result<(), EditError> {
        self.erase_trail_geometry(trail);
        self.store.clear_group(trail)?;
        self.retire_trail(trail, old_fingerprint);
        self.prune_if_configured();
        tracing::info!("trail {trail} demoted to empty");
        Ok(())
    }

    /// Delete every vertex of a trail
    pub fn remove_trail(&mut self, trail: TrailId) -> Result<(), EditError> {
        if self.drag.is_some() {
            return Err(EditError::NotAllowed("removing a trail while dragging"));
        }
        let group = self.store.get(trail).ok_or(EditError::TrailNotFound(trail))?;
        let mut fingerprint = group.fingerprint();
        if !self.notifier.confirm("Delete this trail?") {
            return Err(EditError::Cancelled);
        }

        if self.is_active(trail) {
            self.clear_preview();
            self.draw = DrawState::Idle;
            // Edits since resuming changed the shape the backend knows
            if let Some(resumed) = self.resumed_fingerprint.take() {
                fingerprint = resumed;
            }
        }
        self.erase_trail_geometry(trail);
        self.store.clear_group(trail)?;
        self.retire_trail(trail, &fingerprint);
        self.prune_if_configured();
        tracing::info!("removed trail {trail}");
        Ok(())
    }
}
