//! Normal calculation utilities for mesh data

use glam::Vec3;

use crate::constants::{DEGENERATE_TRIANGLE_NORMAL, ISOLATED_VERTEX_NORMAL};

/// Calculate normal for a single triangle
pub fn calculate_triangle_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    (v1 - v0)
        .cross(v2 - v0)
        .try_normalize()
        .unwrap_or(Vec3::from(DEGENERATE_TRIANGLE_NORMAL))
}

/// Calculate face normals from vertices and indices
pub fn calculate_face_normals(vertices: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    indices
        .chunks_exact(3)
        .map(|t| {
            calculate_triangle_normal(
                vertices[t[0] as usize],
                vertices[t[1] as usize],
                vertices[t[2] as usize],
            )
        })
        .collect()
}

/// Calculate smooth per-vertex normals
///
/// Each triangle contributes its unnormalized cross product (area weighted)
/// to its three corners.
pub fn calculate_vertex_normals(vertices: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; vertices.len()];
    recalculate_vertex_normals(vertices, indices, &mut normals);
    normals
}

/// Recompute smooth per-vertex normals into an existing buffer
pub fn recalculate_vertex_normals(vertices: &[Vec3], indices: &[u32], normals: &mut [Vec3]) {
    debug_assert_eq!(vertices.len(), normals.len());
    normals.fill(Vec3::ZERO);

    for t in indices.chunks_exact(3) {
        let (a, b, c) = (t[0] as usize, t[1] as usize, t[2] as usize);
        let weighted = (vertices[b] - vertices[a]).cross(vertices[c] - vertices[a]);
        normals[a] += weighted;
        normals[b] += weighted;
        normals[c] += weighted;
    }

    for normal in normals.iter_mut() {
        *normal = normal
            .try_normalize()
            .unwrap_or(Vec3::from(ISOLATED_VERTEX_NORMAL));
    }
}
