//! Progressive box generation
//!
//! Generation as a pull-based sequence of single vertex writes. The host
//! decides the pacing (one vertex per frame, a batch per timer tick, ...);
//! nothing here knows about time. Dropping a [`ProgressiveBoxMesh`] cancels it.

use glam::{UVec3, Vec3};

use super::BoxMeshError;
use super::box_mesh::{BoxMesh, MeshBuffers, VertexSink, finish_mesh};
use super::layout::{BoxDimensions, BoxLayout};
use super::placement::{FlatPlacement, PlacedVertex, RoundedPlacement, VertexPlacement};

/// One step of generation: vertex `index` placed at `vertex`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexWrite {
    /// Vertex index in layout order
    pub index: u32,
    /// Surface grid point the vertex comes from
    pub grid_point: UVec3,
    /// Placed position and normal
    pub vertex: PlacedVertex,
}

/// Iterator over the vertex writes of a box, in index order
#[derive(Debug, Clone)]
pub struct VertexWrites<P> {
    layout: BoxLayout,
    placement: P,
    next: u32,
}

impl<P: VertexPlacement> VertexWrites<P> {
    /// Writes for every vertex of `layout`, starting at index 0
    pub fn new(layout: BoxLayout, placement: P) -> Self {
        Self {
            layout,
            placement,
            next: 0,
        }
    }

    /// Index map being walked
    pub fn layout(&self) -> &BoxLayout {
        &self.layout
    }

    /// Placement applied to each grid point
    pub fn placement(&self) -> &P {
        &self.placement
    }
}

impl<P: VertexPlacement> Iterator for VertexWrites<P> {
    type Item = VertexWrite;

    fn next(&mut self) -> Option<VertexWrite> {
        if self.next >= self.layout.vertex_count() {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let grid_point = self.layout.grid_point(index);
        Some(VertexWrite {
            index,
            grid_point,
            vertex: self
                .placement
                .place(&self.layout.dimensions(), grid_point),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.layout.vertex_count() - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl<P: VertexPlacement> ExactSizeIterator for VertexWrites<P> {}

/// State of a progressive build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealProgress {
    /// `written` of `total` vertices are in place
    Pending {
        /// Vertices written so far
        written: u32,
        /// Vertices in the finished mesh
        total: u32,
    },
    /// Every vertex is written; the mesh can be taken
    Complete,
}

/// Box mesh that is generated a few vertices at a time
///
/// Only the written prefix of the vertex buffer is ever exposed, and the
/// [`BoxMesh`] (with its triangles) only exists once every vertex is written.
#[derive(Debug, Clone)]
pub struct ProgressiveBoxMesh<P> {
    writes: VertexWrites<P>,
    buffers: MeshBuffers,
    written: u32,
}

impl<P: VertexPlacement> ProgressiveBoxMesh<P> {
    /// Start an empty build of `dims` using `placement`
    pub fn new(dims: BoxDimensions, placement: P) -> Self {
        let layout = BoxLayout::new(dims);
        let buffers = MeshBuffers::for_layout(&layout, placement.emits_normals());
        Self {
            writes: VertexWrites::new(layout, placement),
            buffers,
            written: 0,
        }
    }

    /// Vertices in the finished mesh
    pub fn total(&self) -> u32 {
        self.writes.layout().vertex_count()
    }

    /// Current build state
    pub fn progress(&self) -> RevealProgress {
        if self.is_complete() {
            RevealProgress::Complete
        } else {
            RevealProgress::Pending {
                written: self.written,
                total: self.total(),
            }
        }
    }

    /// Whether every vertex is written
    pub fn is_complete(&self) -> bool {
        self.written == self.total()
    }

    /// Write up to `count` more vertices
    pub fn step(&mut self, count: usize) -> RevealProgress {
        for write in self.writes.by_ref().take(count) {
            self.buffers.write(write.index, write.vertex);
            self.written = write.index + 1;
        }
        tracing::trace!(written = self.written, total = self.total(), "Reveal step");
        self.progress()
    }

    /// Positions written so far
    pub fn revealed(&self) -> &[Vec3] {
        &self.buffers.vertices[..self.written as usize]
    }

    /// Normals written so far, if the placement produces them
    pub fn revealed_normals(&self) -> Option<&[Vec3]> {
        self.buffers
            .normals
            .as_deref()
            .map(|normals| &normals[..self.written as usize])
    }

    /// Finished mesh, or `self` back if vertices are still missing
    pub fn into_mesh(self) -> Result<BoxMesh, Self> {
        if !self.is_complete() {
            return Err(self);
        }
        let grouped = self.writes.placement().splits_by_axis();
        Ok(finish_mesh(self.writes.layout(), self.buffers, grouped))
    }

    /// Abandon the build, returning how many vertices had been written
    pub fn cancel(self) -> u32 {
        tracing::debug!(
            written = self.written,
            total = self.total(),
            "Progressive build cancelled"
        );
        self.written
    }
}

impl ProgressiveBoxMesh<FlatPlacement> {
    /// Progressive plain box
    pub fn plain(dims: BoxDimensions) -> Self {
        Self::new(dims, FlatPlacement)
    }
}

impl ProgressiveBoxMesh<RoundedPlacement> {
    /// Progressive rounded box; fails on invalid roundness
    pub fn rounded(dims: BoxDimensions, roundness: u32) -> Result<Self, BoxMeshError> {
        let placement = RoundedPlacement::new(&dims, roundness)?;
        Ok(Self::new(dims, placement))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{generate_box_mesh, generate_rounded_box_mesh};

    #[test]
    fn test_writes_are_exact_size() {
        let dims = BoxDimensions::new(3, 2, 2).unwrap();
        let layout = BoxLayout::new(dims);
        let writes = VertexWrites::new(layout, FlatPlacement);
        assert_eq!(writes.len(), layout.vertex_count() as usize);

        let indices: Vec<u32> = writes.map(|w| w.index).collect();
        assert_eq!(indices, (0..layout.vertex_count()).collect::<Vec<_>>());
    }

    #[test]
    fn test_step_exposes_only_written_prefix() {
        let dims = BoxDimensions::cube(2).unwrap();
        let mut build = ProgressiveBoxMesh::plain(dims);
        assert_eq!(build.revealed().len(), 0);

        let progress = build.step(5);
        assert_eq!(
            progress,
            RevealProgress::Pending {
                written: 5,
                total: 26
            }
        );
        assert_eq!(build.revealed().len(), 5);
        assert_eq!(build.revealed()[1], Vec3::new(1.0, 0.0, 0.0));
        assert!(build.revealed_normals().is_none());
    }

    #[test]
    fn test_incomplete_build_withholds_mesh() {
        let dims = BoxDimensions::cube(3).unwrap();
        let mut build = ProgressiveBoxMesh::plain(dims);
        build.step(10);

        let mut build = build.into_mesh().unwrap_err();
        assert_eq!(build.step(usize::MAX), RevealProgress::Complete);
        let mesh = build.into_mesh().unwrap();
        assert_eq!(mesh, generate_box_mesh(dims));
    }

    #[test]
    fn test_rounded_progressive_matches_direct_build() {
        let dims = BoxDimensions::new(4, 2, 4).unwrap();
        let mut build = ProgressiveBoxMesh::rounded(dims, 1).unwrap();
        while build.step(7) != RevealProgress::Complete {}
        assert_eq!(build.revealed_normals().unwrap().len(), build.total() as usize);

        let mesh = build.into_mesh().unwrap();
        assert_eq!(mesh, generate_rounded_box_mesh(dims, 1).unwrap());
    }

    #[test]
    fn test_cancel_reports_written() {
        let mut build = ProgressiveBoxMesh::plain(BoxDimensions::cube(2).unwrap());
        build.step(3);
        assert_eq!(build.cancel(), 3);
    }

    #[test]
    fn test_rounded_rejects_bad_roundness() {
        let dims = BoxDimensions::cube(2).unwrap();
        assert!(ProgressiveBoxMesh::rounded(dims, 2).is_err());
    }
}
