//! Headless test harness for driving the trail editor.
//!
//! Wraps a [`TrailEditor`] over an in-memory scene with an identity plan
//! view (one pixel per scene unit), so screen coordinates passed to the
//! gesture helpers are also the ground coordinates of the resulting vertices.

use glam::DVec2;
use serde_json::json;

use crate::editor::TrailEditor;
use crate::notify::ScriptedNotifier;
use crate::scene::{MemoryScene, PlanView};
use crate::state::settings::EditorSettings;
use crate::state::trails::TrailId;

/// Headless editor with scripted confirmations
pub struct TestHarness {
    pub editor: TrailEditor<MemoryScene, ScriptedNotifier>,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    /// Create a harness with default settings (never read from disk).
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        let scene = MemoryScene::new(PlanView::identity(), settings.drawing.pick_radius_px);
        Self {
            editor: TrailEditor::new(scene, ScriptedNotifier::new(), settings),
        }
    }

    // ── Gestures ──────────────────────────────────────────────

    pub fn click(&mut self, x: f64, y: f64) {
        self.editor.click(DVec2::new(x, y));
    }

    pub fn double_click(&mut self, x: f64, y: f64) {
        self.editor.double_click(DVec2::new(x, y));
    }

    pub fn right_click(&mut self, x: f64, y: f64) {
        self.editor.right_click(DVec2::new(x, y));
    }

    pub fn middle_click(&mut self, x: f64, y: f64) {
        self.editor.middle_click(DVec2::new(x, y));
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.editor.pointer_move(DVec2::new(x, y));
    }

    /// Press, move in two steps and release. Returns whether a drag was
    /// committed.
    pub fn drag(&mut self, from: (f64, f64), to: (f64, f64)) -> bool {
        let from_screen = DVec2::new(from.0, from.1);
        let to_screen = DVec2::new(to.0, to.1);
        if !self.editor.pointer_down(from_screen) {
            return false;
        }
        self.editor.pointer_move(from_screen.lerp(to_screen, 0.5));
        self.editor.pointer_move(to_screen);
        self.editor.pointer_up(to_screen)
    }

    /// Click every point but the last, then double-click the last one.
    ///
    /// Returns the finished trail.
    pub fn draw_trail(&mut self, points: &[(f64, f64)]) -> Option<TrailId> {
        let (last, rest) = points.split_last()?;
        for (x, y) in rest {
            self.click(*x, *y);
        }
        if rest.is_empty() {
            self.click(last.0, last.1);
            self.right_click(last.0, last.1);
        } else {
            self.double_click(last.0, last.1);
        }
        self.editor.submit_target()
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn scene(&self) -> &MemoryScene {
        &self.editor.renderer
    }

    pub fn messages(&self) -> &[String] {
        &self.editor.notifier.messages
    }

    /// Queue the answer for the next confirmation prompt
    pub fn answer(&mut self, accept: bool) {
        self.editor.notifier.answer(accept);
    }

    pub fn active_trail(&self) -> Option<TrailId> {
        self.editor.active_edit().map(|e| e.trail)
    }

    /// Number of trails with at least one vertex
    pub fn trail_count(&self) -> usize {
        self.editor.store().live_groups().count()
    }

    pub fn vertex_count(&self, trail: TrailId) -> usize {
        self.editor.store().get(trail).map_or(0, |g| g.len())
    }

    /// Vertex x/y in trail order
    pub fn positions(&self, trail: TrailId) -> Vec<(f64, f64)> {
        self.editor
            .store()
            .get(trail)
            .map(|g| g.vertices.iter().map(|v| (v.position.x, v.position.y)).collect())
            .unwrap_or_default()
    }

    /// Segment label texts in trail order, read back from the scene
    pub fn labels_of(&self, trail: TrailId) -> Vec<String> {
        let Some(group) = self.editor.store().get(trail) else {
            return Vec::new();
        };
        group
            .segments()
            .into_iter()
            .filter_map(|k| self.editor.index().segment(k))
            .filter_map(|e| self.scene().text(e.label))
            .map(str::to_string)
            .collect()
    }

    /// Total label text, read back from the scene
    pub fn total_label(&self, trail: TrailId) -> Option<String> {
        let handle = self.editor.index().total(trail)?;
        self.scene().text(handle).map(str::to_string)
    }

    /// Stored segment distances in trail order
    pub fn distances(&self, trail: TrailId) -> Vec<f64> {
        let Some(group) = self.editor.store().get(trail) else {
            return Vec::new();
        };
        group
            .segments()
            .into_iter()
            .filter_map(|k| self.editor.index().segment(k))
            .map(|e| e.distance)
            .collect()
    }

    /// Summary of every trail, used by the `inspect` command
    pub fn inspect(&self) -> serde_json::Value {
        let trails: Vec<serde_json::Value> = self
            .editor
            .store()
            .groups()
            .iter()
            .map(|g| {
                json!({
                    "id": g.id.to_string(),
                    "label_number": g.label_number,
                    "positions": self.positions(g.id),
                    "labels": self.labels_of(g.id),
                    "total": self.total_label(g.id),
                    "submitted": self.editor.is_submitted(g.id),
                })
            })
            .collect();
        json!({
            "trail_count": self.trail_count(),
            "trails": trails,
            "drawing": self.active_trail().map(|t| t.to_string()),
            "add_mode": self.editor.armed_segment().is_some(),
            "submit_target": self.editor.submit_target().map(|t| t.to_string()),
        })
    }
}
