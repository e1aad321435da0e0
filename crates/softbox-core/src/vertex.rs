//! Interleaved vertex format for the rendering collaborator

use glam::Vec3;

/// Position + normal vertex, laid out for direct GPU upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Vertex position in local space.
    pub position: [f32; 3],
    /// Unit surface normal.
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Pack a position and a normal
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// Zip positions and normals into GPU vertices
pub fn interleave(vertices: &[Vec3], normals: &[Vec3]) -> Vec<MeshVertex> {
    debug_assert_eq!(vertices.len(), normals.len());
    vertices
        .iter()
        .zip(normals)
        .map(|(&position, &normal)| MeshVertex::new(position, normal))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::calculate_vertex_normals;
    use crate::primitive::{BoxDimensions, generate_box_mesh};

    #[test]
    fn test_vertex_size() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 24);
    }

    #[test]
    fn test_interleave_bytes() {
        let mesh = generate_box_mesh(BoxDimensions::cube(2).unwrap());
        let normals = calculate_vertex_normals(&mesh.vertices, &mesh.indices());
        let gpu = interleave(&mesh.vertices, &normals);
        assert_eq!(gpu.len(), mesh.vertex_count());

        let bytes: &[u8] = bytemuck::cast_slice(&gpu);
        assert_eq!(bytes.len(), mesh.vertex_count() * 24);

        let floats: &[f32] = bytemuck::cast_slice(&gpu);
        assert_eq!(&floats[0..3], &mesh.vertices[0].to_array());
        assert_eq!(&floats[3..6], &normals[0].to_array());
    }
}
