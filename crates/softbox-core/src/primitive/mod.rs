//! Procedural box mesh generation
//!
//! Generates vertices, optional normals, and triangle indices for:
//! - Box (subdivided rectangular grid surface)
//! - Rounded box (edges and corners blended by a radius, triangles grouped
//!   by face orientation)
//!
//! Both share one [`BoxLayout`] index map and one triangulation; they differ
//! only in the [`VertexPlacement`] used.

mod box_mesh;
mod layout;
mod placement;
mod reveal;
mod triangulate;

pub use box_mesh::{
    BoxMesh, BoxMeshBuilder, MeshBuffers, SubMesh, VertexSink, build_with,
    generate_box_mesh, generate_rounded_box_mesh, generate_vertices,
};
pub use layout::{BoxDimensions, BoxLayout, Cap};
pub use placement::{FlatPlacement, PlacedVertex, RoundedPlacement, VertexPlacement};
pub use reveal::{ProgressiveBoxMesh, RevealProgress, VertexWrite, VertexWrites};
pub use triangulate::{
    AxisGroupedIndices, FaceAxis, FlatIndices, Quad, QuadSink, set_quad, triangulate, wall_axis,
};

/// Box generation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoxMeshError {
    /// An axis has no subdivisions
    #[error("Invalid dimension: {axis} = {value} (must be at least 1)")]
    InvalidDimension {
        /// Axis name (`size_x`, `size_y` or `size_z`)
        axis: &'static str,
        /// Rejected subdivision count
        value: u32,
    },
    /// Roundness exceeds half of the smallest dimension
    #[error("Invalid roundness: {roundness} (must be at most {max})")]
    InvalidRoundness {
        /// Requested roundness
        roundness: u32,
        /// Largest roundness the box allows
        max: u32,
    },
    /// Vertex or index count would not fit a `u32` index buffer
    #[error("Box {size_x}x{size_y}x{size_z} is too large for a u32 index buffer")]
    TooLarge {
        /// Subdivisions along X
        size_x: u32,
        /// Subdivisions along Y
        size_y: u32,
        /// Subdivisions along Z
        size_z: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_mesh() {
        let dims = BoxDimensions::cube(2).unwrap();
        let mesh = generate_box_mesh(dims);
        let layout = BoxLayout::new(dims);
        assert_eq!(layout.ring(), 8);
        assert_eq!(mesh.vertex_count(), 26);
        assert_eq!(mesh.indices().len(), 6 * 2 * 12);
        assert!(mesh.indices().len() % 3 == 0);
    }

    #[test]
    fn test_single_cell_box() {
        let mesh = generate_box_mesh(BoxDimensions::cube(1).unwrap());
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_rounded_box_mesh() {
        let mesh = generate_rounded_box_mesh(BoxDimensions::new(4, 6, 4).unwrap(), 2).unwrap();
        assert_eq!(mesh.vertices.len(), mesh.normals.as_ref().unwrap().len());
        assert_eq!(mesh.submeshes.len(), 3);
        assert!(mesh.triangles().all(|t| t.iter().all(|&i| (i as usize) < mesh.vertex_count())));
    }

    #[test]
    fn test_error_messages() {
        let err = BoxDimensions::new(0, 1, 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid dimension: size_x = 0 (must be at least 1)"
        );
        let err = generate_rounded_box_mesh(BoxDimensions::cube(3).unwrap(), 2).unwrap_err();
        assert_eq!(err.to_string(), "Invalid roundness: 2 (must be at most 1)");
    }
}
