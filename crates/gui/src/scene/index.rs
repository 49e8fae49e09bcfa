//! Map from trail structure to renderer primitives.
//!
//! Every point, segment, segment label and total label the editor creates is
//! recorded here under the vertex / segment / trail it depicts, together with
//! a reverse map from handle to owner so picks can be resolved. Nothing in
//! the core scans renderer collections by tag.

use std::collections::{HashMap, HashSet};

use glam::DVec3;

use super::key::PositionKey;
use super::{Phase, PrimitiveHandle};
use crate::state::trails::{TrailId, VertexId};

/// A segment, named by its endpoints in trail order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentKey {
    pub from: VertexId,
    pub to: VertexId,
}

impl SegmentKey {
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self { from, to }
    }

    pub fn touches(&self, vertex: VertexId) -> bool {
        self.from == vertex || self.to == vertex
    }
}

/// What a primitive handle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Vertex { trail: TrailId, vertex: VertexId },
    Segment { trail: TrailId, key: SegmentKey },
    SegmentLabel { trail: TrailId, key: SegmentKey },
    Total { trail: TrailId },
    /// Drag or rubber-band geometry, never a pick target
    Transient,
}

impl Owner {
    pub fn trail(&self) -> Option<TrailId> {
        match *self {
            Owner::Vertex { trail, .. }
            | Owner::Segment { trail, .. }
            | Owner::SegmentLabel { trail, .. }
            | Owner::Total { trail } => Some(trail),
            Owner::Transient => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointEntry {
    pub trail: TrailId,
    pub handle: PrimitiveHandle,
    pub position: DVec3,
    pub phase: Phase,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentEntry {
    pub trail: TrailId,
    pub line: PrimitiveHandle,
    pub label: PrimitiveHandle,
    pub from_position: DVec3,
    pub to_position: DVec3,
    /// Ground-clamped length at the time the segment was drawn
    pub distance: f64,
    pub letter_index: usize,
    pub text: String,
    pub phase: Phase,
    pub visible: bool,
}

#[derive(Debug, Default)]
pub struct GeometryIndex {
    points: HashMap<VertexId, PointEntry>,
    segments: HashMap<SegmentKey, SegmentEntry>,
    totals: HashMap<TrailId, PrimitiveHandle>,
    transient: Vec<PrimitiveHandle>,
    preview: Option<PrimitiveHandle>,
    owners: HashMap<PrimitiveHandle, Owner>,
}

impl GeometryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a picked handle
    pub fn owner(&self, handle: PrimitiveHandle) -> Option<Owner> {
        self.owners.get(&handle).copied()
    }

    // ── Points ───────────────────────────────────────────────

    pub fn insert_point(&mut self, vertex: VertexId, entry: PointEntry) {
        self.owners.insert(
            entry.handle,
            Owner::Vertex {
                trail: entry.trail,
                vertex,
            },
        );
        if let Some(old) = self.points.insert(vertex, entry) {
            self.owners.remove(&old.handle);
        }
    }

    pub fn remove_point(&mut self, vertex: VertexId) -> Option<PointEntry> {
        let entry = self.points.remove(&vertex)?;
        self.owners.remove(&entry.handle);
        Some(entry)
    }

    pub fn point(&self, vertex: VertexId) -> Option<&PointEntry> {
        self.points.get(&vertex)
    }

    pub fn point_mut(&mut self, vertex: VertexId) -> Option<&mut PointEntry> {
        self.points.get_mut(&vertex)
    }

    /// Vertices with a drawn point on `trail`
    pub fn points_of(&self, trail: TrailId) -> Vec<VertexId> {
        let mut ids: Vec<VertexId> = self
            .points
            .iter()
            .filter(|(_, e)| e.trail == trail)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    // ── Segments ─────────────────────────────────────────────

    pub fn insert_segment(&mut self, key: SegmentKey, entry: SegmentEntry) {
        self.owners.insert(
            entry.line,
            Owner::Segment {
                trail: entry.trail,
                key,
            },
        );
        self.owners.insert(
            entry.label,
            Owner::SegmentLabel {
                trail: entry.trail,
                key,
            },
        );
        if let Some(old) = self.segments.insert(key, entry) {
            self.owners.remove(&old.line);
            self.owners.remove(&old.label);
        }
    }

    pub fn remove_segment(&mut self, key: SegmentKey) -> Option<SegmentEntry> {
        let entry = self.segments.remove(&key)?;
        self.owners.remove(&entry.line);
        self.owners.remove(&entry.label);
        Some(entry)
    }

    pub fn segment(&self, key: SegmentKey) -> Option<&SegmentEntry> {
        self.segments.get(&key)
    }

    pub fn segment_mut(&mut self, key: SegmentKey) -> Option<&mut SegmentEntry> {
        self.segments.get_mut(&key)
    }

    /// All segments drawn for `trail`, ordered by letter
    pub fn segments_of(&self, trail: TrailId) -> Vec<(SegmentKey, &SegmentEntry)> {
        let mut found: Vec<(SegmentKey, &SegmentEntry)> = self
            .segments
            .iter()
            .filter(|(_, e)| e.trail == trail)
            .map(|(k, e)| (*k, e))
            .collect();
        found.sort_by_key(|(k, e)| (e.letter_index, *k));
        found
    }

    /// Segments having `vertex` as an endpoint
    pub fn segments_touching(&self, vertex: VertexId) -> Vec<SegmentKey> {
        let mut keys: Vec<SegmentKey> = self
            .segments
            .keys()
            .filter(|k| k.touches(vertex))
            .copied()
            .collect();
        keys.sort();
        keys
    }

    /// Every non-moving segment with an endpoint matching one of `positions`.
    ///
    /// A key-set join over all segments rather than an indexed lookup; trails
    /// are hand drawn and small.
    pub fn find_segments_by_positions(&self, positions: &[DVec3]) -> Vec<SegmentKey> {
        let wanted: HashSet<PositionKey> = positions.iter().map(|p| PositionKey::of(*p)).collect();
        let mut keys: Vec<SegmentKey> = self
            .segments
            .iter()
            .filter(|(_, e)| e.phase != Phase::Moving)
            .filter(|(_, e)| {
                wanted.contains(&PositionKey::of(e.from_position))
                    || wanted.contains(&PositionKey::of(e.to_position))
            })
            .map(|(k, _)| *k)
            .collect();
        keys.sort();
        keys
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    // ── Totals ───────────────────────────────────────────────

    /// Record the total label of `trail`, returning the one it replaces
    pub fn set_total(&mut self, trail: TrailId, handle: PrimitiveHandle) -> Option<PrimitiveHandle> {
        self.owners.insert(handle, Owner::Total { trail });
        let old = self.totals.insert(trail, handle);
        if let Some(old) = old {
            self.owners.remove(&old);
        }
        old
    }

    pub fn take_total(&mut self, trail: TrailId) -> Option<PrimitiveHandle> {
        let handle = self.totals.remove(&trail)?;
        self.owners.remove(&handle);
        Some(handle)
    }

    pub fn total(&self, trail: TrailId) -> Option<PrimitiveHandle> {
        self.totals.get(&trail).copied()
    }

    // ── Transient geometry ───────────────────────────────────

    pub fn push_transient(&mut self, handle: PrimitiveHandle) {
        self.owners.insert(handle, Owner::Transient);
        self.transient.push(handle);
    }

    pub fn take_transient(&mut self) -> Vec<PrimitiveHandle> {
        let handles = std::mem::take(&mut self.transient);
        for h in &handles {
            self.owners.remove(h);
        }
        handles
    }

    pub fn transient_count(&self) -> usize {
        self.transient.len()
    }

    pub fn set_preview(&mut self, handle: PrimitiveHandle) -> Option<PrimitiveHandle> {
        self.owners.insert(handle, Owner::Transient);
        let old = self.preview.replace(handle);
        if let Some(old) = old {
            self.owners.remove(&old);
        }
        old
    }

    pub fn take_preview(&mut self) -> Option<PrimitiveHandle> {
        let handle = self.preview.take()?;
        self.owners.remove(&handle);
        Some(handle)
    }

    pub fn preview(&self) -> Option<PrimitiveHandle> {
        self.preview
    }

    /// Number of handles the index currently tracks
    pub fn handle_count(&self) -> usize {
        self.owners.len()
    }
}
