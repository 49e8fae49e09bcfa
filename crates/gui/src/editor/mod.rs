//! Trail-editing state machine
//!
//! `TrailEditor` owns the trail store, the geometry index and the
//! selection/submission state, and talks to the outside world only through a
//! [`Renderer`] and a [`Notifier`]. Gestures arrive as screen positions (see
//! `input.rs`); each one mutates the store first and then brings the
//! renderer primitives in line through the index.
//!
//! Per trail the editor moves through `Idle -> Drawing -> Complete`. The trail
//! being drawn is referenced by an [`ActiveEdit`]; its primitives use the
//! pending phase until the trail is finished.

mod drag;
mod highlight;
mod input;
mod insert;
mod measure;
mod remove;
mod submit;

pub use drag::DragState;

use glam::DVec3;
use shared::RemovalNotice;

use crate::notify::Notifier;
use crate::scene::{
    labels, GeometryIndex, Phase, PointEntry, Renderer, Role, SegmentEntry, SegmentKey, Style,
};
use crate::state::selection::SelectionState;
use crate::state::settings::EditorSettings;
use crate::state::submission::SubmissionController;
use crate::state::trails::{TrailId, TrailSnapshot, TrailStore, Vertex, VertexId};

/// The trail currently being drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveEdit {
    pub trail: TrailId,
    /// New vertices go to the front of the trail
    pub reverse: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawState {
    #[default]
    Idle,
    Drawing(ActiveEdit),
    Complete,
}

/// Segment chosen for vertex insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedSegment {
    pub trail: TrailId,
    pub key: SegmentKey,
}

pub struct TrailEditor<R: Renderer, N: Notifier> {
    pub renderer: R,
    pub notifier: N,
    pub settings: EditorSettings,
    store: TrailStore,
    index: GeometryIndex,
    selection: SelectionState,
    submissions: SubmissionController,
    draw: DrawState,
    add_mode: Option<ArmedSegment>,
    drag: Option<DragState>,
    /// Last ground position under the pointer
    pointer: Option<DVec3>,
    submit_target: Option<TrailId>,
    /// Fingerprint of a finished trail when drawing resumed on it
    resumed_fingerprint: Option<String>,
    removal_notices: Vec<RemovalNotice>,
}

impl<R: Renderer, N: Notifier> TrailEditor<R, N> {
    pub fn new(renderer: R, notifier: N, settings: EditorSettings) -> Self {
        Self {
            renderer,
            notifier,
            settings,
            store: TrailStore::new(),
            index: GeometryIndex::new(),
            selection: SelectionState::default(),
            submissions: SubmissionController::new(),
            draw: DrawState::Idle,
            add_mode: None,
            drag: None,
            pointer: None,
            submit_target: None,
            resumed_fingerprint: None,
            removal_notices: Vec::new(),
        }
    }

    // ── Accessors ────────────────────────────────────────────

    pub fn store(&self) -> &TrailStore {
        &self.store
    }

    pub fn index(&self) -> &GeometryIndex {
        &self.index
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn submissions(&self) -> &SubmissionController {
        &self.submissions
    }

    pub fn draw_state(&self) -> DrawState {
        self.draw
    }

    pub fn active_edit(&self) -> Option<ActiveEdit> {
        match self.draw {
            DrawState::Drawing(edit) => Some(edit),
            _ => None,
        }
    }

    pub fn submit_target(&self) -> Option<TrailId> {
        self.submit_target
    }

    pub fn armed_segment(&self) -> Option<ArmedSegment> {
        self.add_mode
    }

    /// A drag has passed the threshold and is moving a vertex
    pub fn is_dragging(&self) -> bool {
        self.drag.as_ref().is_some_and(|d| d.dragging)
    }

    pub fn pointer(&self) -> Option<DVec3> {
        self.pointer
    }

    /// Changes whenever anything worth autosaving changed
    pub fn revision(&self) -> u64 {
        self.store.version() + self.submissions.version()
    }

    /// Sum of ground-clamped segment lengths
    pub fn trail_length(&self, trail: TrailId) -> Option<f64> {
        let group = self.store.get(trail)?;
        Some(
            group
                .vertices
                .windows(2)
                .map(|w| self.renderer.ground_clamped_distance(w[0].position, w[1].position))
                .sum(),
        )
    }

    /// Whether `trail`'s current shape was accepted by the backend
    pub fn is_submitted(&self, trail: TrailId) -> bool {
        self.store
            .get(trail)
            .is_some_and(|g| g.len() >= 2 && self.submissions.is_submitted(&g.fingerprint()))
    }

    fn is_active(&self, trail: TrailId) -> bool {
        self.active_edit().is_some_and(|e| e.trail == trail)
    }

    fn phase_of(&self, trail: TrailId) -> Phase {
        if self.is_active(trail) {
            Phase::Pending
        } else {
            Phase::Committed
        }
    }

    fn threshold(&self) -> f64 {
        self.settings.drawing.proximity_threshold
    }

    /// Report an edit failure; cancelled gestures stay silent
    fn report(&mut self, error: &crate::error::EditError) {
        tracing::warn!("edit rejected: {error}");
        if *error != crate::error::EditError::Cancelled {
            self.notifier.notify(&error.to_string());
        }
    }

    // ── Styles ───────────────────────────────────────────────

    fn point_style(&self, phase: Phase) -> Style {
        let palette = &self.settings.palette;
        let color = match phase {
            Phase::Committed => palette.point,
            Phase::Pending => palette.point_pending,
            Phase::Moving => palette.line_moving,
        };
        Style::new(Role::Point, phase, color)
    }

    fn label_style(&self, phase: Phase) -> Style {
        Style::new(Role::Label, phase, self.settings.palette.label)
    }

    fn total_style(&self) -> Style {
        Style::new(Role::TotalLabel, Phase::Committed, self.settings.palette.total_label)
    }

    // ── Primitive bookkeeping ────────────────────────────────

    fn draw_point(&mut self, trail: TrailId, vertex: Vertex, phase: Phase) {
        self.erase_point(vertex.id);
        let style = self.point_style(phase);
        let handle = self.renderer.add_point(vertex.position, style);
        self.index.insert_point(
            vertex.id,
            PointEntry {
                trail,
                handle,
                position: vertex.position,
                phase,
                visible: true,
            },
        );
    }

    fn erase_point(&mut self, vertex: VertexId) {
        if let Some(entry) = self.index.remove_point(vertex) {
            self.renderer.remove(entry.handle);
        }
    }

    /// Draw the segment `from -> to` with its label
    fn draw_segment(&mut self, trail: TrailId, from: Vertex, to: Vertex, letter_index: usize, phase: Phase) {
        let key = SegmentKey::new(from.id, to.id);
        self.erase_segment(key);
        let Some(label_number) = self.store.get(trail).map(|g| g.label_number) else {
            tracing::warn!("segment for unknown trail {trail}");
            return;
        };
        let distance = self.renderer.ground_clamped_distance(from.position, to.position);
        let text = labels::segment_label(letter_index, label_number, distance);
        let line_style = self.line_style(trail, key, phase);
        let label_style = self.label_style(phase);
        let line = self.renderer.add_segment(from.position, to.position, line_style);
        let label = self
            .renderer
            .add_label(labels::midpoint(from.position, to.position), &text, label_style);
        self.index.insert_segment(
            key,
            SegmentEntry {
                trail,
                line,
                label,
                from_position: from.position,
                to_position: to.position,
                distance,
                letter_index,
                text,
                phase,
                visible: true,
            },
        );
    }

    fn erase_segment(&mut self, key: SegmentKey) {
        if let Some(entry) = self.index.remove_segment(key) {
            self.renderer.remove(entry.line);
            self.renderer.remove(entry.label);
        }
    }

    /// Erase a segment that no longer exists in its trail
    fn drop_segment(&mut self, key: SegmentKey) {
        self.erase_segment(key);
        self.selection.forget_line(&key);
    }

    /// Recompute letters of every segment from `start` on.
    ///
    /// Letters are positional; only labels whose letter actually changed are
    /// touched, so segments before the edit keep their text.
    fn relabel_from(&mut self, trail: TrailId, start: usize) {
        let Some(group) = self.store.get(trail) else {
            return;
        };
        let label_number = group.label_number;
        for (i, key) in group.segments().into_iter().enumerate().skip(start) {
            let Some(entry) = self.index.segment_mut(key) else {
                tracing::warn!("no drawn segment {key:?} on trail {trail}");
                continue;
            };
            if entry.letter_index != i {
                entry.letter_index = i;
                entry.text = labels::segment_label(i, label_number, entry.distance);
                self.renderer.set_text(entry.label, &entry.text);
            }
        }
    }

    fn erase_total(&mut self, trail: TrailId) {
        if let Some(handle) = self.index.take_total(trail) {
            self.renderer.remove(handle);
        }
    }

    /// Recreate the total label of a finished trail at its last vertex
    fn refresh_total(&mut self, trail: TrailId) {
        self.erase_total(trail);
        if self.is_active(trail) {
            return;
        }
        let Some(group) = self.store.get(trail) else {
            return;
        };
        let Some(last) = group.last().map(|v| v.position) else {
            return;
        };
        if group.len() < 2 {
            return;
        }
        let total = self.trail_length(trail).unwrap_or_default();
        let style = self.total_style();
        let handle = self.renderer.add_label(last, &labels::total_label(total), style);
        self.index.set_total(trail, handle);
    }

    /// Draw every point, segment and the total of `trail`
    fn draw_trail(&mut self, trail: TrailId) {
        let Some(group) = self.store.get(trail) else {
            return;
        };
        let vertices = group.vertices.clone();
        let phase = self.phase_of(trail);
        for v in &vertices {
            self.draw_point(trail, *v, phase);
        }
        for (i, w) in vertices.windows(2).enumerate() {
            self.draw_segment(trail, w[0], w[1], i, phase);
        }
        self.refresh_total(trail);
    }

    fn erase_trail_geometry(&mut self, trail: TrailId) {
        for vertex in self.index.points_of(trail) {
            self.erase_point(vertex);
        }
        let keys: Vec<SegmentKey> = self.index.segments_of(trail).into_iter().map(|(k, _)| k).collect();
        for key in keys {
            self.drop_segment(key);
        }
        self.erase_total(trail);
    }

    /// Switch every pending primitive of `trail` to committed
    fn promote(&mut self, trail: TrailId) {
        let Some(group) = self.store.get(trail) else {
            return;
        };
        let vertex_ids: Vec<VertexId> = group.vertices.iter().map(|v| v.id).collect();
        let keys = group.segments();
        let point_style = self.point_style(Phase::Committed);
        for id in vertex_ids {
            if let Some(entry) = self.index.point_mut(id) {
                if entry.phase == Phase::Pending {
                    entry.phase = Phase::Committed;
                    self.renderer.set_style(entry.handle, point_style);
                }
            }
        }
        let label_style = self.label_style(Phase::Committed);
        for key in keys {
            if let Some(entry) = self.index.segment_mut(key) {
                entry.phase = Phase::Committed;
                self.renderer.set_style(entry.label, label_style);
            }
            self.restyle_segment(key);
        }
    }

    /// A trail lost its shape: forget its submission, selection and target
    fn retire_trail(&mut self, trail: TrailId, old_fingerprint: &str) {
        if self.submissions.forget(old_fingerprint) {
            tracing::info!("queued removal notice for submitted trail {trail}");
            self.removal_notices.push(RemovalNotice {
                track_id: trail.to_string(),
                email: self.settings.submission.submitter_id.clone(),
            });
        }
        if self.selection.selected_trail == Some(trail) {
            self.selection.clear_selected();
        }
        if self.submit_target == Some(trail) {
            self.submit_target = None;
        }
        if self.add_mode.is_some_and(|a| a.trail == trail) {
            self.add_mode = None;
        }
    }

    fn prune_if_configured(&mut self) {
        if self.settings.drawing.prune_empty_trails {
            let keep = self.active_edit().map(|e| e.trail);
            let pruned = self.store.prune_empty(keep);
            if !pruned.is_empty() {
                tracing::debug!("pruned {} empty trails", pruned.len());
            }
        }
    }

    /// Keep the selected line set in step with the selected trail's segments
    fn sync_selection(&mut self, trail: TrailId) {
        if self.selection.selected_trail != Some(trail) {
            return;
        }
        if let Some(group) = self.store.get(trail) {
            self.selection.selected_lines = group.segments().into_iter().collect();
        }
    }

    // ── Session ──────────────────────────────────────────────

    pub fn snapshot(&self) -> TrailSnapshot {
        TrailSnapshot {
            store: self.store.clone(),
            submitted: self.submissions.keys(),
        }
    }

    /// Replace everything with a saved session and redraw it
    pub fn restore(&mut self, snapshot: TrailSnapshot) {
        let trails: Vec<TrailId> = self.store.groups().iter().map(|g| g.id).collect();
        for trail in trails {
            self.erase_trail_geometry(trail);
        }
        self.clear_preview();
        for handle in self.index.take_transient() {
            self.renderer.remove(handle);
        }
        self.store = snapshot.store;
        self.submissions.restore_keys(snapshot.submitted);
        self.selection = SelectionState::default();
        self.draw = DrawState::Idle;
        self.add_mode = None;
        self.drag = None;
        self.submit_target = None;
        self.resumed_fingerprint = None;
        self.renderer.set_camera_navigation(true);

        let trails: Vec<TrailId> = self.store.live_groups().map(|g| g.id).collect();
        for trail in &trails {
            self.draw_trail(*trail);
        }
        tracing::info!("restored {} trails", trails.len());
    }

    /// GeoJSON FeatureCollection of every trail with at least two vertices
    pub fn export_geojson(&self) -> serde_json::Value {
        crate::export::trails_to_geojson(&self.store, &self.settings.georeference, |a, b| {
            self.renderer.ground_clamped_distance(a, b)
        })
    }
}
