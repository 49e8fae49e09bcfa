//! Start / continue / finish drawing a trail

use glam::DVec3;

use super::{ActiveEdit, DrawState, TrailEditor};
use crate::error::EditError;
use crate::notify::Notifier;
use crate::scene::{Phase, Renderer, Role, ScreenPos, Style};
use crate::state::trails::{End, TrailId, VertexId};

impl<R: Renderer, N: Notifier> TrailEditor<R, N> {
    fn ground_at(&self, screen: ScreenPos) -> Result<DVec3, EditError> {
        self.renderer
            .screen_to_world(screen)
            .ok_or(EditError::NoGroundPosition)
    }

    fn ensure_free(&self, gesture: &'static str) -> Result<(), EditError> {
        if self.add_mode.is_some() || self.drag.is_some() {
            return Err(EditError::NotAllowed(gesture));
        }
        Ok(())
    }

    /// Open a new trail with its first vertex under `screen`
    pub fn start_measure(&mut self, screen: ScreenPos) -> Result<TrailId, EditError> {
        self.ensure_free("starting a trail")?;
        if self.active_edit().is_some() {
            return Err(EditError::NotAllowed("starting a trail while drawing"));
        }
        let position = self.ground_at(screen)?;
        if let Some(existing) = self.store.near_existing(position, self.threshold(), None) {
            return Err(EditError::TooClose {
                threshold: self.threshold(),
                existing,
            });
        }

        let trail = self.store.create_group();
        self.draw = DrawState::Drawing(ActiveEdit {
            trail,
            reverse: false,
        });
        self.pointer = Some(position);
        self.extend(trail, false, position)?;
        tracing::info!("started trail {trail}");
        Ok(trail)
    }

    /// Continue drawing an existing finished trail from one of its ends.
    ///
    /// Resuming from the first vertex sets the reverse flag so new vertices
    /// are prepended.
    pub fn resume_measure(&mut self, trail: TrailId, vertex: VertexId) -> Result<(), EditError> {
        self.ensure_free("resuming a trail")?;
        if self.active_edit().is_some() {
            return Err(EditError::NotAllowed("resuming a trail while drawing"));
        }
        let group = self.store.get(trail).ok_or(EditError::TrailNotFound(trail))?;
        let index = group.index_of(vertex).ok_or(EditError::VertexNotFound(vertex))?;
        if !group.is_extremal(vertex) {
            return Err(EditError::NotAllowed("resuming from an interior vertex"));
        }
        let reverse = index == 0 && group.len() > 1;
        let fingerprint = group.fingerprint();

        self.erase_total(trail);
        self.draw = DrawState::Drawing(ActiveEdit { trail, reverse });
        self.resumed_fingerprint = Some(fingerprint);
        self.pointer = self.store.position_of(vertex);
        tracing::info!("resumed trail {trail} (reverse: {reverse})");
        Ok(())
    }

    /// Add a vertex to the trail being drawn
    pub fn continue_measure(&mut self, screen: ScreenPos) -> Result<VertexId, EditError> {
        let Some(edit) = self.active_edit() else {
            return Err(EditError::NotAllowed("adding a point without a trail"));
        };
        let position = self.ground_at(screen)?;
        self.pointer = Some(position);
        let vertex = self.extend(edit.trail, edit.reverse, position)?;
        self.update_preview();
        Ok(vertex)
    }

    /// Place a vertex at the active end and connect it to its neighbour
    fn extend(&mut self, trail: TrailId, reverse: bool, position: DVec3) -> Result<VertexId, EditError> {
        let end = if reverse { End::Front } else { End::Back };
        let threshold = self.threshold();
        let id = self.store.push_vertex(trail, end, position, threshold)?;
        let group = self.store.get(trail).ok_or(EditError::TrailNotFound(trail))?;
        let vertices = group.vertices.clone();
        let len = vertices.len();

        self.draw_point(trail, vertices[if reverse { 0 } else { len - 1 }], Phase::Pending);
        if len >= 2 {
            if reverse {
                self.draw_segment(trail, vertices[0], vertices[1], 0, Phase::Pending);
                self.relabel_from(trail, 1);
            } else {
                self.draw_segment(trail, vertices[len - 2], vertices[len - 1], len - 2, Phase::Pending);
            }
        }
        tracing::debug!("trail {trail}: vertex {id} at {position}");
        Ok(id)
    }

    /// Close the trail being drawn.
    ///
    /// A final vertex goes at `screen` (or the last pointer position) unless it
    /// would sit on top of an existing vertex. Returns the finished trail, or
    /// `None` when fewer than two vertices were placed and the trail was
    /// discarded.
    pub fn finish_measure(&mut self, screen: Option<ScreenPos>) -> Result<Option<TrailId>, EditError> {
        let Some(edit) = self.active_edit() else {
            return Err(EditError::NotAllowed("finishing without a trail"));
        };
        if let Some(position) = screen.and_then(|s| self.renderer.screen_to_world(s)) {
            self.pointer = Some(position);
        }
        if let Some(position) = self.pointer {
            if self.store.near_existing(position, self.threshold(), None).is_none() {
                self.extend(edit.trail, edit.reverse, position)?;
            }
        }
        self.clear_preview();
        let resumed = self.resumed_fingerprint.take();

        let len = self.store.get(edit.trail).map_or(0, |g| g.len());
        if len >= 2 {
            self.draw = DrawState::Complete;
            self.promote(edit.trail);
            self.refresh_total(edit.trail);
            self.submit_target = Some(edit.trail);
            tracing::info!("finished trail {} with {len} vertices", edit.trail);
            Ok(Some(edit.trail))
        } else {
            self.erase_trail_geometry(edit.trail);
            self.store.clear_group(edit.trail)?;
            self.draw = DrawState::Idle;
            self.retire_trail(edit.trail, &resumed.unwrap_or_default());
            self.prune_if_configured();
            tracing::info!("discarded trail {} with {len} vertices", edit.trail);
            Ok(None)
        }
    }

    // ── Rubber band ──────────────────────────────────────────

    /// Segment from the active end of the drawn trail to the pointer
    pub(super) fn update_preview(&mut self) {
        self.clear_preview();
        let (Some(edit), Some(pointer)) = (self.active_edit(), self.pointer) else {
            return;
        };
        let Some(group) = self.store.get(edit.trail) else {
            return;
        };
        let anchor = if edit.reverse { group.first() } else { group.last() };
        let Some(anchor) = anchor.map(|v| v.position) else {
            return;
        };
        if anchor == pointer {
            return;
        }
        let style = Style::new(Role::Line, Phase::Moving, self.settings.palette.line_moving);
        let handle = self.renderer.add_segment(anchor, pointer, style);
        self.index.set_preview(handle);
    }

    pub(super) fn clear_preview(&mut self) {
        if let Some(handle) = self.index.take_preview() {
            self.renderer.remove(handle);
        }
    }
}
