//! Box and rounded-box mesh generation

use glam::Vec3;

use super::BoxMeshError;
use super::layout::{BoxDimensions, BoxLayout};
use super::placement::{FlatPlacement, PlacedVertex, RoundedPlacement, VertexPlacement};
use super::triangulate::{AxisGroupedIndices, FaceAxis, FlatIndices, triangulate};

/// Triangle indices sharing one face orientation (or all of them)
#[derive(Debug, Clone, PartialEq)]
pub struct SubMesh {
    /// `None` for the single ungrouped list of a plain box
    pub axis: Option<FaceAxis>,
    /// Triangle list, three indices per triangle
    pub indices: Vec<u32>,
}

/// Generated box surface
#[derive(Debug, Clone, PartialEq)]
pub struct BoxMesh {
    /// Subdivision counts the mesh was built from
    pub dimensions: BoxDimensions,
    /// Vertex positions in layout order
    pub vertices: Vec<Vec3>,
    /// One normal per vertex (rounded boxes only)
    pub normals: Option<Vec<Vec3>>,
    /// One ungrouped list, or X, Y and Z groups in that order
    pub submeshes: Vec<SubMesh>,
}

impl BoxMesh {
    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// All triangle indices, submeshes concatenated
    pub fn indices(&self) -> Vec<u32> {
        self.submeshes
            .iter()
            .flat_map(|s| s.indices.iter().copied())
            .collect()
    }

    /// Triangles as index triples, submeshes concatenated
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.submeshes
            .iter()
            .flat_map(|s| s.indices.chunks_exact(3))
            .map(|t| [t[0], t[1], t[2]])
    }

    /// Number of triangles over all submeshes
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.indices.len() / 3).sum()
    }

    /// Submesh holding the faces perpendicular to `axis`
    pub fn submesh(&self, axis: FaceAxis) -> Option<&SubMesh> {
        self.submeshes.iter().find(|s| s.axis == Some(axis))
    }

    /// Whether triangles are split by face orientation
    pub fn is_grouped(&self) -> bool {
        self.submeshes.iter().any(|s| s.axis.is_some())
    }

    /// Axis-aligned bounding box `(min, max)` of the vertices
    pub fn bounds(&self) -> (Vec3, Vec3) {
        if self.vertices.is_empty() {
            return (Vec3::ZERO, Vec3::ZERO);
        }
        self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), v| (min.min(*v), max.max(*v)),
        )
    }
}

/// Receives vertices as they are placed
pub trait VertexSink {
    /// Store `vertex` at `index`
    fn write(&mut self, index: u32, vertex: PlacedVertex);
}

/// Pre-sized vertex (and normal) arrays written by index
#[derive(Debug, Clone, Default)]
pub struct MeshBuffers {
    /// Positions, indexed by vertex
    pub vertices: Vec<Vec3>,
    /// Normals, if the placement emits them
    pub normals: Option<Vec<Vec3>>,
}

impl MeshBuffers {
    /// Zeroed buffers sized for every vertex of `layout`
    pub fn for_layout(layout: &BoxLayout, with_normals: bool) -> Self {
        let count = layout.vertex_count() as usize;
        Self {
            vertices: vec![Vec3::ZERO; count],
            normals: with_normals.then(|| vec![Vec3::ZERO; count]),
        }
    }
}

impl VertexSink for MeshBuffers {
    fn write(&mut self, index: u32, vertex: PlacedVertex) {
        self.vertices[index as usize] = vertex.position;
        if let (Some(normals), Some(normal)) = (self.normals.as_mut(), vertex.normal) {
            normals[index as usize] = normal;
        }
    }
}

/// Place every vertex of `layout` into `sink` in index order
pub fn generate_vertices<P, S>(layout: &BoxLayout, placement: &P, sink: &mut S)
where
    P: VertexPlacement + ?Sized,
    S: VertexSink + ?Sized,
{
    let dims = layout.dimensions();
    for (index, point) in layout.grid_points().enumerate() {
        sink.write(index as u32, placement.place(&dims, point));
    }
}

/// Triangulate `layout` and wrap finished vertex buffers into a [`BoxMesh`]
pub(crate) fn finish_mesh(layout: &BoxLayout, buffers: MeshBuffers, grouped: bool) -> BoxMesh {
    let submeshes = if grouped {
        let mut sink = AxisGroupedIndices::for_layout(layout);
        triangulate(layout, &mut sink);
        let AxisGroupedIndices { x, y, z } = sink;
        vec![
            SubMesh {
                axis: Some(FaceAxis::X),
                indices: x,
            },
            SubMesh {
                axis: Some(FaceAxis::Y),
                indices: y,
            },
            SubMesh {
                axis: Some(FaceAxis::Z),
                indices: z,
            },
        ]
    } else {
        let mut sink = FlatIndices::for_layout(layout);
        triangulate(layout, &mut sink);
        vec![SubMesh {
            axis: None,
            indices: sink.into_indices(),
        }]
    };

    let mesh = BoxMesh {
        dimensions: layout.dimensions(),
        vertices: buffers.vertices,
        normals: buffers.normals,
        submeshes,
    };
    tracing::debug!(
        dims = ?layout.dimensions().as_uvec3(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        grouped,
        "Generated box mesh"
    );
    mesh
}

/// Build a complete mesh with `placement`
pub fn build_with<P: VertexPlacement + ?Sized>(layout: &BoxLayout, placement: &P) -> BoxMesh {
    let mut buffers = MeshBuffers::for_layout(layout, placement.emits_normals());
    generate_vertices(layout, placement, &mut buffers);
    finish_mesh(layout, buffers, placement.splits_by_axis())
}

/// Builder for plain and rounded box meshes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxMeshBuilder {
    layout: BoxLayout,
    roundness: Option<u32>,
}

impl BoxMeshBuilder {
    /// Plain box builder for `dims`
    pub fn new(dims: BoxDimensions) -> Self {
        Self {
            layout: BoxLayout::new(dims),
            roundness: None,
        }
    }

    /// Round edges and corners by `roundness` grid units
    pub fn rounded(mut self, roundness: u32) -> Self {
        self.roundness = Some(roundness);
        self
    }

    /// Index map of the box being built
    pub fn layout(&self) -> &BoxLayout {
        &self.layout
    }

    /// Roundness, `None` for a plain box
    pub fn roundness(&self) -> Option<u32> {
        self.roundness
    }

    /// Generate the mesh, validating the roundness first
    pub fn build(&self) -> Result<BoxMesh, BoxMeshError> {
        match self.roundness {
            None => Ok(build_with(&self.layout, &FlatPlacement)),
            Some(roundness) => {
                let placement = RoundedPlacement::new(&self.layout.dimensions(), roundness)?;
                Ok(build_with(&self.layout, &placement))
            }
        }
    }
}

/// Generate a plain box mesh subdivided by `dims`
///
/// # Returns
/// Vertices on the integer grid and a single ungrouped triangle list
pub fn generate_box_mesh(dims: BoxDimensions) -> BoxMesh {
    build_with(&BoxLayout::new(dims), &FlatPlacement)
}

/// Generate a rounded box mesh
///
/// # Returns
/// Vertices, per-vertex normals and X/Y/Z triangle groups
pub fn generate_rounded_box_mesh(
    dims: BoxDimensions,
    roundness: u32,
) -> Result<BoxMesh, BoxMeshError> {
    BoxMeshBuilder::new(dims).rounded(roundness).build()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn dims(x: u32, y: u32, z: u32) -> BoxDimensions {
        BoxDimensions::new(x, y, z).unwrap()
    }

    #[test]
    fn test_plain_box_counts() {
        let mesh = generate_box_mesh(dims(3, 2, 4));
        assert_eq!(mesh.vertex_count(), 8 + 4 * 6 + 2 * (2 + 6 + 3));
        assert_eq!(mesh.indices().len(), 12 * (6 + 12 + 8));
        assert_eq!(mesh.submeshes.len(), 1);
        assert!(mesh.normals.is_none());
        assert!(!mesh.is_grouped());
    }

    #[test]
    fn test_plain_box_bounds() {
        let mesh = generate_box_mesh(dims(2, 4, 6));
        let (min, max) = mesh.bounds();
        assert_eq!(min, Vec3::ZERO);
        assert_eq!(max, Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_plain_box_winding_points_outward() {
        let mesh = generate_box_mesh(dims(3, 2, 4));
        let center = Vec3::new(1.5, 1.0, 2.0);
        for [a, b, c] in mesh.triangles() {
            let (a, b, c) = (
                mesh.vertices[a as usize],
                mesh.vertices[b as usize],
                mesh.vertices[c as usize],
            );
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(
                normal.dot(centroid - center) > 0.0,
                "triangle {a} {b} {c} faces inward"
            );
        }
    }

    #[test]
    fn test_rounded_zero_matches_plain_positions() {
        for (x, y, z) in [(1, 1, 1), (2, 2, 2), (3, 5, 2), (4, 1, 3)] {
            let plain = generate_box_mesh(dims(x, y, z));
            let rounded = generate_rounded_box_mesh(dims(x, y, z), 0).unwrap();
            assert_eq!(plain.vertices, rounded.vertices);
            assert_eq!(plain.triangle_count(), rounded.triangle_count());
        }
    }

    #[test]
    fn test_rounded_normals_are_unit_length() {
        for roundness in 0..=2 {
            let mesh = generate_rounded_box_mesh(dims(4, 5, 6), roundness).unwrap();
            let normals = mesh.normals.as_ref().unwrap();
            assert_eq!(normals.len(), mesh.vertex_count());
            for n in normals {
                assert!(n.is_finite());
                assert_relative_eq!(n.length(), 1.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_rounded_vertices_stay_inside_box() {
        let mesh = generate_rounded_box_mesh(dims(6, 4, 8), 2).unwrap();
        let (min, max) = mesh.bounds();
        assert_relative_eq!(min.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(max.y, 4.0, epsilon = 1e-5);
        assert_relative_eq!(max.z, 8.0, epsilon = 1e-5);
        for v in &mesh.vertices {
            assert!(v.cmpge(Vec3::splat(-1e-5)).all());
            assert!(v.cmple(Vec3::new(6.0, 4.0, 8.0) + 1e-5).all());
        }
    }

    #[test]
    fn test_rounded_submesh_split() {
        let mesh = generate_rounded_box_mesh(dims(3, 2, 4), 1).unwrap();
        assert!(mesh.is_grouped());
        assert_eq!(mesh.submesh(FaceAxis::X).unwrap().indices.len(), 2 * 4 * 12);
        assert_eq!(mesh.submesh(FaceAxis::Y).unwrap().indices.len(), 3 * 4 * 12);
        assert_eq!(mesh.submesh(FaceAxis::Z).unwrap().indices.len(), 3 * 2 * 12);

        let plain = generate_box_mesh(dims(3, 2, 4));
        let mut grouped = mesh.indices();
        let mut flat = plain.indices();
        grouped.sort_unstable();
        flat.sort_unstable();
        assert_eq!(grouped, flat);
    }

    #[test]
    fn test_rounded_side_wall_groups_face_their_axis() {
        let mesh = generate_rounded_box_mesh(dims(4, 4, 4), 0).unwrap();
        let v = &mesh.vertices;
        for axis in FaceAxis::ALL {
            let unit = match axis {
                FaceAxis::X => Vec3::X,
                FaceAxis::Y => Vec3::Y,
                FaceAxis::Z => Vec3::Z,
            };
            for t in mesh.submesh(axis).unwrap().indices.chunks_exact(3) {
                let n = (v[t[1] as usize] - v[t[0] as usize])
                    .cross(v[t[2] as usize] - v[t[0] as usize])
                    .normalize();
                assert_relative_eq!(n.dot(unit).abs(), 1.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_invalid_roundness() {
        let err = BoxMeshBuilder::new(dims(4, 2, 4))
            .rounded(2)
            .build()
            .unwrap_err();
        assert!(matches!(err, BoxMeshError::InvalidRoundness { .. }));
    }
}
