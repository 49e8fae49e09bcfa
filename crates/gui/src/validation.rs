//! Consistency checks between the trail store and the geometry index.
//!
//! `TrailValidator` checks the invariants every edit must preserve: spaced
//! vertices, one drawn segment per adjacent vertex pair, positional labels,
//! totals equal to the sum of segments, and agreement between id lookups and
//! position-key lookups.

use crate::editor::TrailEditor;
use crate::notify::Notifier;
use crate::scene::{labels, Renderer};

/// Validator over an editor's current state.
pub struct TrailValidator<'a, R: Renderer, N: Notifier> {
    editor: &'a TrailEditor<R, N>,
}

impl<'a, R: Renderer, N: Notifier> TrailValidator<'a, R, N> {
    pub fn new(editor: &'a TrailEditor<R, N>) -> Self {
        Self { editor }
    }

    /// No two vertices of any trails closer than the proximity threshold.
    pub fn vertices_are_spaced(&self) -> bool {
        let threshold = self.editor.settings.drawing.proximity_threshold;
        let all: Vec<_> = self
            .editor
            .store()
            .groups()
            .iter()
            .flat_map(|g| g.vertices.iter())
            .collect();
        all.iter().enumerate().all(|(i, a)| {
            all[i + 1..]
                .iter()
                .all(|b| a.position.distance(b.position) >= threshold)
        })
    }

    /// Every adjacent vertex pair has exactly one drawn segment, and a trail
    /// has no other segments.
    pub fn segments_cover_pairs(&self) -> bool {
        let index = self.editor.index();
        self.editor.store().groups().iter().all(|g| {
            let keys = g.segments();
            keys.iter().all(|k| {
                index.segment(*k).is_some_and(|e| {
                    let from = g.index_of(k.from).and_then(|i| g.vertex(i));
                    let to = g.index_of(k.to).and_then(|i| g.vertex(i));
                    e.trail == g.id
                        && from.is_some_and(|v| v.position == e.from_position)
                        && to.is_some_and(|v| v.position == e.to_position)
                })
            }) && index.segments_of(g.id).len() == keys.len()
        })
    }

    /// Every vertex has a point at its position.
    pub fn points_match_vertices(&self) -> bool {
        let index = self.editor.index();
        self.editor.store().groups().iter().all(|g| {
            g.vertices.iter().all(|v| {
                index
                    .point(v.id)
                    .is_some_and(|p| p.trail == g.id && p.position == v.position)
            }) && index.points_of(g.id).len() == g.len()
        })
    }

    /// Letters follow segment order and texts match stored distances.
    pub fn labels_are_positional(&self) -> bool {
        let index = self.editor.index();
        self.editor.store().groups().iter().all(|g| {
            g.segments().iter().enumerate().all(|(i, k)| {
                index.segment(*k).is_some_and(|e| {
                    e.letter_index == i
                        && e.text == labels::segment_label(i, g.label_number, e.distance)
                })
            })
        })
    }

    /// Stored segment distances sum to the trail length.
    pub fn totals_match_segments(&self, tolerance: f64) -> bool {
        let index = self.editor.index();
        self.editor.store().live_groups().all(|g| {
            let stored: f64 = index.segments_of(g.id).iter().map(|(_, e)| e.distance).sum();
            let length = self.editor.trail_length(g.id).unwrap_or_default();
            (stored - length).abs() <= tolerance
        })
    }

    /// Finished trails with two or more vertices have a total label; others
    /// have none.
    pub fn totals_present(&self) -> bool {
        let active = self.editor.active_edit().map(|e| e.trail);
        self.editor.store().groups().iter().all(|g| {
            let expected = g.len() >= 2 && Some(g.id) != active;
            self.editor.index().total(g.id).is_some() == expected
        })
    }

    /// Position-key join finds the same segments as the id lookup.
    pub fn position_lookup_agrees(&self) -> bool {
        let index = self.editor.index();
        self.editor.store().groups().iter().all(|g| {
            g.vertices.iter().all(|v| {
                index.find_segments_by_positions(&[v.position]) == index.segments_touching(v.id)
            })
        })
    }

    /// Run all checks and return a list of error messages.
    /// An empty list means the editor state is consistent.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.vertices_are_spaced() {
            errors.push("Two vertices are closer than the proximity threshold".to_string());
        }
        if !self.points_match_vertices() {
            errors.push("Drawn points do not match stored vertices".to_string());
        }
        if !self.segments_cover_pairs() {
            errors.push("Drawn segments do not match adjacent vertex pairs".to_string());
        }
        if !self.labels_are_positional() {
            errors.push("Segment labels are out of order".to_string());
        }
        if !self.totals_match_segments(1e-6) {
            errors.push("Segment distances do not add up to the trail length".to_string());
        }
        if !self.totals_present() {
            errors.push("Total labels missing or stale".to_string());
        }
        if !self.position_lookup_agrees() {
            errors.push("Position-key lookup disagrees with vertex ids".to_string());
        }

        errors
    }
}
