//! Vertex mutations on a trail group
//!
//! Every operation that places a vertex runs the proximity guard against all
//! groups first and leaves the store untouched when it fails.

use glam::DVec3;

use super::{TrailId, TrailStore, Vertex, VertexId};
use crate::error::EditError;

/// Which end of a group a new vertex goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Front,
    Back,
}

impl TrailStore {
    fn guard(&self, position: DVec3, threshold: f64, ignore: Option<VertexId>) -> Result<(), EditError> {
        match self.near_existing(position, threshold, ignore) {
            Some(existing) => Err(EditError::TooClose { threshold, existing }),
            None => Ok(()),
        }
    }

    /// Append or prepend a vertex
    pub fn push_vertex(
        &mut self,
        trail: TrailId,
        end: End,
        position: DVec3,
        threshold: f64,
    ) -> Result<VertexId, EditError> {
        self.get(trail).ok_or(EditError::TrailNotFound(trail))?;
        self.guard(position, threshold, None)?;
        let id = self.allocate_vertex_id();
        let group = self.get_mut(trail).ok_or(EditError::TrailNotFound(trail))?;
        let vertex = Vertex { id, position };
        match end {
            End::Front => group.vertices.insert(0, vertex),
            End::Back => group.vertices.push(vertex),
        }
        self.bump();
        Ok(id)
    }

    /// Insert a vertex so it ends up at `index`
    pub fn insert_vertex(
        &mut self,
        trail: TrailId,
        index: usize,
        position: DVec3,
        threshold: f64,
    ) -> Result<VertexId, EditError> {
        let len = self.get(trail).ok_or(EditError::TrailNotFound(trail))?.len();
        if index > len {
            return Err(EditError::SegmentNotFound);
        }
        self.guard(position, threshold, None)?;
        let id = self.allocate_vertex_id();
        let group = self.get_mut(trail).ok_or(EditError::TrailNotFound(trail))?;
        group.vertices.insert(index, Vertex { id, position });
        self.bump();
        Ok(id)
    }

    /// Remove a vertex, returning its former index
    pub fn remove_vertex(&mut self, trail: TrailId, vertex: VertexId) -> Result<(usize, Vertex), EditError> {
        let group = self.get_mut(trail).ok_or(EditError::TrailNotFound(trail))?;
        let index = group.index_of(vertex).ok_or(EditError::VertexNotFound(vertex))?;
        let removed = group.vertices.remove(index);
        self.bump();
        Ok((index, removed))
    }

    /// Overwrite a vertex position in place, returning the old position
    pub fn move_vertex(
        &mut self,
        trail: TrailId,
        vertex: VertexId,
        position: DVec3,
        threshold: f64,
    ) -> Result<DVec3, EditError> {
        let index = self
            .get(trail)
            .ok_or(EditError::TrailNotFound(trail))?
            .index_of(vertex)
            .ok_or(EditError::VertexNotFound(vertex))?;
        self.guard(position, threshold, Some(vertex))?;
        let group = self.get_mut(trail).ok_or(EditError::TrailNotFound(trail))?;
        let old = std::mem::replace(&mut group.vertices[index].position, position);
        self.bump();
        Ok(old)
    }

    /// Drop every vertex of a group, keeping the (now empty) record
    pub fn clear_group(&mut self, trail: TrailId) -> Result<Vec<Vertex>, EditError> {
        let group = self.get_mut(trail).ok_or(EditError::TrailNotFound(trail))?;
        let removed = std::mem::take(&mut group.vertices);
        self.bump();
        Ok(removed)
    }
}
