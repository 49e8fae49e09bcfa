//! Dragging a vertex of a finished trail
//!
//! Press on a vertex arms the drag and freezes the camera. Once the pointer
//! travels past the screen threshold the vertex and its adjacent segments are
//! hidden and a moving copy follows the pointer. Release writes the new
//! position into the trail and redraws the real primitives.

use glam::DVec3;

use super::TrailEditor;
use crate::error::EditError;
use crate::notify::Notifier;
use crate::scene::{labels, Owner, Phase, Renderer, Role, ScreenPos, Style};
use crate::state::trails::{TrailId, VertexId};

#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub trail: TrailId,
    pub vertex: VertexId,
    pub start_world: DVec3,
    pub start_screen: ScreenPos,
    /// Past the threshold; originals are hidden
    pub dragging: bool,
}

impl<R: Renderer, N: Notifier> TrailEditor<R, N> {
    /// Press: arm a drag if a finished trail's vertex is under `screen`.
    ///
    /// Returns whether the press was taken.
    pub fn pointer_down(&mut self, screen: ScreenPos) -> bool {
        if self.active_edit().is_some() || self.add_mode.is_some() || self.drag.is_some() {
            return false;
        }
        let Some(Owner::Vertex { trail, vertex }) = self.picked(screen) else {
            return false;
        };
        let Some(group) = self.store.get(trail) else {
            tracing::warn!("picked vertex of unknown trail {trail}");
            return false;
        };
        if group.len() < 2 {
            return false;
        }
        let Some(start_world) = self.store.position_of(vertex) else {
            return false;
        };
        let lines = group.segments();

        self.renderer.set_camera_navigation(false);
        self.selection.dragged_point = Some(vertex);
        self.selection.drag_lines = lines;
        self.drag = Some(DragState {
            trail,
            vertex,
            start_world,
            start_screen: screen,
            dragging: false,
        });
        tracing::debug!("drag armed on vertex {vertex}");
        true
    }

    pub(super) fn drag_move(&mut self, screen: ScreenPos) {
        let Some(drag) = self.drag.clone() else {
            return;
        };
        if !drag.dragging {
            if screen.distance(drag.start_screen) < self.settings.drawing.drag_threshold_px {
                return;
            }
            self.set_originals_visible(drag.vertex, false);
            if let Some(d) = self.drag.as_mut() {
                d.dragging = true;
            }
            tracing::debug!("dragging vertex {}", drag.vertex);
        }
        let Some(world) = self.renderer.screen_to_world(screen) else {
            return;
        };
        self.pointer = Some(world);
        self.redraw_moving(drag.trail, drag.vertex, world);
    }

    fn set_originals_visible(&mut self, vertex: VertexId, visible: bool) {
        if let Some(entry) = self.index.point_mut(vertex) {
            entry.visible = visible;
            self.renderer.set_visible(entry.handle, visible);
        }
        for key in self.index.segments_touching(vertex) {
            if let Some(entry) = self.index.segment_mut(key) {
                entry.visible = visible;
                self.renderer.set_visible(entry.line, visible);
                self.renderer.set_visible(entry.label, visible);
            }
        }
    }

    /// Replace the moving set: one point and one segment + label per neighbour
    fn redraw_moving(&mut self, trail: TrailId, vertex: VertexId, world: DVec3) {
        for handle in self.index.take_transient() {
            self.renderer.remove(handle);
        }
        let Some(group) = self.store.get(trail) else {
            return;
        };
        let Some(index) = group.index_of(vertex) else {
            return;
        };
        let label_number = group.label_number;
        let (prev, next) = group.neighbours(index);

        let palette = &self.settings.palette;
        let point_style = Style::new(Role::Point, Phase::Moving, palette.line_moving);
        let line_style = Style::new(Role::Line, Phase::Moving, palette.line_moving);
        let label_style = Style::new(Role::Label, Phase::Moving, palette.label);

        let mut handles = vec![self.renderer.add_point(world, point_style)];
        let spans = [
            prev.map(|p| (p.position, world, index - 1)),
            next.map(|n| (world, n.position, index)),
        ];
        for (a, b, letter_index) in spans.into_iter().flatten() {
            let distance = self.renderer.ground_clamped_distance(a, b);
            handles.push(self.renderer.add_segment(a, b, line_style));
            handles.push(self.renderer.add_label(
                labels::midpoint(a, b),
                &labels::segment_label(letter_index, label_number, distance),
                label_style,
            ));
        }
        for handle in handles {
            self.index.push_transient(handle);
        }
    }

    /// Release: commit a drag in progress.
    ///
    /// Returns whether a drag was committed (the release is not a click).
    pub fn pointer_up(&mut self, screen: ScreenPos) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        self.renderer.set_camera_navigation(true);
        if !drag.dragging {
            self.selection.clear_drag();
            return false;
        }
        for handle in self.index.take_transient() {
            self.renderer.remove(handle);
        }

        let threshold = self.threshold();
        let result = self
            .renderer
            .screen_to_world(screen)
            .or(self.pointer)
            .ok_or(EditError::NoGroundPosition)
            .and_then(|p| self.store.move_vertex(drag.trail, drag.vertex, p, threshold));

        match result {
            Ok(old) => self.redraw_moved(drag.trail, drag.vertex, old),
            Err(e) => {
                self.set_originals_visible(drag.vertex, true);
                self.report(&e);
            }
        }
        self.selection.clear_drag();
        self.restyle_trail(drag.trail);
        true
    }

    fn redraw_moved(&mut self, trail: TrailId, vertex: VertexId, old: DVec3) {
        let Some(group) = self.store.get(trail) else {
            return;
        };
        let Some(index) = group.index_of(vertex) else {
            return;
        };
        let moved = group.vertices[index];
        let (prev, next) = group.neighbours(index);
        let phase = self.phase_of(trail);

        self.draw_point(trail, moved, phase);
        if let Some(prev) = prev {
            self.draw_segment(trail, prev, moved, index - 1, phase);
        }
        if let Some(next) = next {
            self.draw_segment(trail, moved, next, index, phase);
        }
        self.refresh_total(trail);
        self.sync_selection(trail);
        tracing::info!("moved vertex {vertex} of trail {trail} from {old} to {}", moved.position);
    }
}
