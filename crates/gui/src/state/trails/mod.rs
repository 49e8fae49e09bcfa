//! Trail groups and the store that owns them
//!
//! A trail is an ordered list of vertices; order defines the segments. Each
//! vertex carries a [`VertexId`] allocated by the store so edits address
//! vertices by id rather than by comparing float positions.

mod persistence;
mod vertex_ops;

pub use persistence::TrailSnapshot;
pub use vertex_ops::End;

use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scene::key;
use crate::scene::SegmentKey;

/// Timestamp-derived trail identifier (UUID v7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrailId(Uuid);

impl TrailId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for TrailId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub u64);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub position: DVec3,
}

/// One operator-drawn polyline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailGroup {
    pub id: TrailId,
    pub vertices: Vec<Vertex>,
    /// Numeric suffix of every segment label, fixed at creation
    pub label_number: u32,
}

impl TrailGroup {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// A single vertex, waiting to be extended or removed
    pub fn positions(&self) -> Vec<DVec3> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    pub fn index_of(&self, vertex: VertexId) -> Option<usize> {
        self.vertices.iter().position(|v| v.id == vertex)
    }

    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    pub fn first(&self) -> Option<&Vertex> {
        self.vertices.first()
    }

    pub fn last(&self) -> Option<&Vertex> {
        self.vertices.last()
    }

    /// First or last vertex
    pub fn is_extremal(&self, vertex: VertexId) -> bool {
        self.first().is_some_and(|v| v.id == vertex) || self.last().is_some_and(|v| v.id == vertex)
    }

    /// Consecutive vertex pairs in trail order
    pub fn segments(&self) -> Vec<SegmentKey> {
        self.vertices
            .windows(2)
            .map(|w| SegmentKey::new(w[0].id, w[1].id))
            .collect()
    }

    /// Segment starting at vertex `index`
    pub fn segment_at(&self, index: usize) -> Option<SegmentKey> {
        let a = self.vertices.get(index)?;
        let b = self.vertices.get(index + 1)?;
        Some(SegmentKey::new(a.id, b.id))
    }

    /// Previous and next vertex of the vertex at `index`
    pub fn neighbours(&self, index: usize) -> (Option<Vertex>, Option<Vertex>) {
        let prev = index.checked_sub(1).and_then(|i| self.vertices.get(i)).copied();
        let next = self.vertices.get(index + 1).copied();
        (prev, next)
    }

    /// `[prev, position, next]` filtered to existing entries.
    ///
    /// Matches by exact equality, so `position` must come from this group.
    /// Empty when the position is not part of the group.
    pub fn find_neighbours(&self, position: DVec3) -> Vec<DVec3> {
        let Some(index) = self.vertices.iter().position(|v| v.position == position) else {
            return Vec::new();
        };
        let (prev, next) = self.neighbours(index);
        prev.map(|v| v.position)
            .into_iter()
            .chain(std::iter::once(position))
            .chain(next.map(|v| v.position))
            .collect()
    }

    /// Ordered PositionKey sequence used to detect unchanged resubmissions
    pub fn fingerprint(&self) -> String {
        key::fingerprint(self.vertices.iter().map(|v| v.position))
    }
}

/// Every trail the editor knows about, in creation order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrailStore {
    groups: Vec<TrailGroup>,
    next_vertex: u64,
    next_label_number: u32,
    /// Bumped on every mutation, used to trigger autosave
    #[serde(skip)]
    version: u64,
}

impl TrailStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn bump(&mut self) {
        self.version += 1;
    }

    /// Open an empty group with the next label number
    pub fn create_group(&mut self) -> TrailId {
        let id = TrailId::new();
        self.groups.push(TrailGroup {
            id,
            vertices: Vec::new(),
            label_number: self.next_label_number,
        });
        self.next_label_number += 1;
        self.bump();
        id
    }

    pub fn allocate_vertex_id(&mut self) -> VertexId {
        let id = VertexId(self.next_vertex);
        self.next_vertex += 1;
        id
    }

    pub fn get(&self, id: TrailId) -> Option<&TrailGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: TrailId) -> Option<&mut TrailGroup> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    pub fn groups(&self) -> &[TrailGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups with at least one vertex
    pub fn live_groups(&self) -> impl Iterator<Item = &TrailGroup> {
        self.groups.iter().filter(|g| !g.is_empty())
    }

    /// Group and vertex stored at exactly `position`
    pub fn find_by_position(&self, position: DVec3) -> Option<(TrailId, VertexId)> {
        self.groups.iter().find_map(|g| {
            g.vertices
                .iter()
                .find(|v| v.position == position)
                .map(|v| (g.id, v.id))
        })
    }

    pub fn position_of(&self, vertex: VertexId) -> Option<DVec3> {
        self.groups
            .iter()
            .flat_map(|g| g.vertices.iter())
            .find(|v| v.id == vertex)
            .map(|v| v.position)
    }

    /// Closest vertex of any group within `threshold` of `position`,
    /// skipping `ignore`
    pub fn near_existing(
        &self,
        position: DVec3,
        threshold: f64,
        ignore: Option<VertexId>,
    ) -> Option<VertexId> {
        self.groups
            .iter()
            .flat_map(|g| g.vertices.iter())
            .filter(|v| Some(v.id) != ignore)
            .map(|v| (v.id, v.position.distance(position)))
            .filter(|(_, d)| *d < threshold)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Drop every zero-vertex group except `keep`
    pub fn prune_empty(&mut self, keep: Option<TrailId>) -> Vec<TrailId> {
        let pruned: Vec<TrailId> = self
            .groups
            .iter()
            .filter(|g| g.is_empty() && Some(g.id) != keep)
            .map(|g| g.id)
            .collect();
        if !pruned.is_empty() {
            self.groups.retain(|g| !pruned.contains(&g.id));
            self.bump();
        }
        pruned
    }
}
