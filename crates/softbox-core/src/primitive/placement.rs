//! Vertex placement strategies
//!
//! A placement turns a surface grid point into a final vertex position (and
//! optionally a normal). The layout and triangulation are shared; only the
//! placement differs between the plain and the rounded box.

use glam::{UVec3, Vec3};

use super::BoxMeshError;
use super::layout::BoxDimensions;

/// Vertex produced by a placement strategy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedVertex {
    /// Final position
    pub position: Vec3,
    /// Unit normal, if the placement computes one
    pub normal: Option<Vec3>,
}

/// Maps grid points of a box surface to vertices
pub trait VertexPlacement {
    /// Place the vertex for `grid` on a box of `dims`
    fn place(&self, dims: &BoxDimensions, grid: UVec3) -> PlacedVertex;

    /// Whether [`VertexPlacement::place`] produces normals
    fn emits_normals(&self) -> bool {
        false
    }

    /// Whether meshes built with this placement split their triangles by
    /// face orientation
    fn splits_by_axis(&self) -> bool {
        false
    }
}

/// Places vertices exactly on the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlatPlacement;

impl VertexPlacement for FlatPlacement {
    fn place(&self, _dims: &BoxDimensions, grid: UVec3) -> PlacedVertex {
        PlacedVertex {
            position: grid.as_vec3(),
            normal: None,
        }
    }
}

/// Rounds edges and corners by `roundness` grid units
///
/// Each grid point is clamped into `[roundness, size - roundness]` on every
/// axis. The normal points from that inner point to the grid point, and the
/// vertex is pushed `roundness` units along it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundedPlacement {
    roundness: u32,
}

impl RoundedPlacement {
    /// Create a rounded placement for `dims`
    ///
    /// `roundness` may not exceed half of the smallest dimension, otherwise
    /// the clamp range inverts and the surface folds through itself.
    /// A roundness of 0 keeps the plain box positions.
    pub fn new(dims: &BoxDimensions, roundness: u32) -> Result<Self, BoxMeshError> {
        let max = dims.min_size() / 2;
        if roundness > max {
            return Err(BoxMeshError::InvalidRoundness { roundness, max });
        }
        Ok(Self { roundness })
    }

    /// Rounding radius in grid units
    pub fn roundness(&self) -> u32 {
        self.roundness
    }
}

impl VertexPlacement for RoundedPlacement {
    fn place(&self, dims: &BoxDimensions, grid: UVec3) -> PlacedVertex {
        let raw = grid.as_vec3();
        let radius = self.roundness as f32;
        let inner = raw.clamp(Vec3::splat(radius), dims.as_vec3() - Vec3::splat(radius));

        let normal = (raw - inner)
            .try_normalize()
            .unwrap_or_else(|| outward_face_normal(dims, grid));

        PlacedVertex {
            position: inner + normal * radius,
            normal: Some(normal),
        }
    }

    fn emits_normals(&self) -> bool {
        true
    }

    fn splits_by_axis(&self) -> bool {
        true
    }
}

/// Normalized sum of the outward axis normals of every face `grid` lies on
fn outward_face_normal(dims: &BoxDimensions, grid: UVec3) -> Vec3 {
    let size = dims.as_uvec3();
    let mut normal = Vec3::ZERO;
    for axis in 0..3 {
        if grid[axis] == 0 {
            normal[axis] -= 1.0;
        } else if grid[axis] == size[axis] {
            normal[axis] += 1.0;
        }
    }
    normal.try_normalize().unwrap_or(Vec3::Y)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_flat_placement_is_identity() {
        let dims = BoxDimensions::new(3, 2, 4).unwrap();
        let placed = FlatPlacement.place(&dims, UVec3::new(3, 1, 2));
        assert_eq!(placed.position, Vec3::new(3.0, 1.0, 2.0));
        assert_eq!(placed.normal, None);
    }

    #[test]
    fn test_roundness_limit() {
        let dims = BoxDimensions::new(6, 5, 8).unwrap();
        assert!(RoundedPlacement::new(&dims, 0).is_ok());
        assert!(RoundedPlacement::new(&dims, 2).is_ok());
        let err = RoundedPlacement::new(&dims, 3).unwrap_err();
        assert!(matches!(
            err,
            BoxMeshError::InvalidRoundness {
                roundness: 3,
                max: 2
            }
        ));
    }

    #[test]
    fn test_flat_face_normal_is_axis_aligned() {
        let dims = BoxDimensions::cube(6).unwrap();
        let placement = RoundedPlacement::new(&dims, 2).unwrap();

        let placed = placement.place(&dims, UVec3::new(3, 6, 3));
        assert_eq!(placed.normal, Some(Vec3::Y));
        assert_eq!(placed.position, Vec3::new(3.0, 6.0, 3.0));

        let placed = placement.place(&dims, UVec3::new(0, 3, 3));
        assert_eq!(placed.normal, Some(Vec3::NEG_X));
    }

    #[test]
    fn test_corner_is_pushed_onto_sphere() {
        let dims = BoxDimensions::cube(4).unwrap();
        let placement = RoundedPlacement::new(&dims, 2).unwrap();
        let placed = placement.place(&dims, UVec3::ZERO);
        let normal = placed.normal.unwrap();

        assert_relative_eq!(normal.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(normal.x, -(1.0f32 / 3.0).sqrt(), epsilon = 1e-6);
        // The corner sits at distance `roundness` from the inner point (2, 2, 2)
        assert_relative_eq!(
            placed.position.distance(Vec3::splat(2.0)),
            2.0,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_zero_roundness_falls_back_to_face_normals() {
        let dims = BoxDimensions::new(2, 3, 4).unwrap();
        let placement = RoundedPlacement::new(&dims, 0).unwrap();

        let placed = placement.place(&dims, UVec3::new(1, 3, 2));
        assert_eq!(placed.position, Vec3::new(1.0, 3.0, 2.0));
        assert_eq!(placed.normal, Some(Vec3::Y));

        let edge = placement.place(&dims, UVec3::new(2, 0, 2)).normal.unwrap();
        assert_relative_eq!(edge.x, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
        assert_relative_eq!(edge.y, -std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
        assert_eq!(edge.z, 0.0);
    }
}
