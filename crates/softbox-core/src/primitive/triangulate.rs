//! Quad stitching over the box layout
//!
//! Winding convention: for every emitted triangle `(a, b, c)`,
//! `(b - a).cross(c - a)` points out of the box.

use serde::{Deserialize, Serialize};

use super::layout::{BoxLayout, Cap};

/// Axis a face (or a group of faces) is perpendicular to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceAxis {
    /// Left and right faces
    X,
    /// Top and bottom caps
    Y,
    /// Front and back faces
    Z,
}

impl FaceAxis {
    /// Every axis, in submesh order
    pub const ALL: [FaceAxis; 3] = [FaceAxis::X, FaceAxis::Y, FaceAxis::Z];

    /// Axis letter
    pub fn name(&self) -> &'static str {
        match self {
            FaceAxis::X => "X",
            FaceAxis::Y => "Y",
            FaceAxis::Z => "Z",
        }
    }
}

/// Quad corners `[v00, v10, v01, v11]`
pub type Quad = [u32; 4];

/// Append a quad as two triangles sharing the `v01`-`v10` diagonal
pub fn set_quad(indices: &mut Vec<u32>, quad: Quad) {
    let [v00, v10, v01, v11] = quad;
    indices.extend_from_slice(&[v00, v01, v10, v10, v01, v11]);
}

/// Receives quads as they are stitched
pub trait QuadSink {
    /// Accept one quad lying on a face perpendicular to `axis`
    fn push_quad(&mut self, axis: FaceAxis, quad: Quad);
}

/// Collects every quad into one index list
#[derive(Debug, Clone, Default)]
pub struct FlatIndices {
    indices: Vec<u32>,
}

impl FlatIndices {
    /// Empty list with room for every index of `layout`
    pub fn for_layout(layout: &BoxLayout) -> Self {
        Self {
            indices: Vec::with_capacity(layout.index_count()),
        }
    }

    /// Collected triangle indices
    pub fn into_indices(self) -> Vec<u32> {
        self.indices
    }
}

impl QuadSink for FlatIndices {
    fn push_quad(&mut self, _axis: FaceAxis, quad: Quad) {
        set_quad(&mut self.indices, quad);
    }
}

/// Collects quads into one index list per face orientation
#[derive(Debug, Clone, Default)]
pub struct AxisGroupedIndices {
    /// Faces perpendicular to X
    pub x: Vec<u32>,
    /// Faces perpendicular to Y
    pub y: Vec<u32>,
    /// Faces perpendicular to Z
    pub z: Vec<u32>,
}

impl AxisGroupedIndices {
    /// Empty groups with room for every index of `layout`
    pub fn for_layout(layout: &BoxLayout) -> Self {
        let dims = layout.dimensions();
        let (sx, sy, sz) = (
            dims.size_x() as usize,
            dims.size_y() as usize,
            dims.size_z() as usize,
        );
        Self {
            x: Vec::with_capacity(sy * sz * 12),
            y: Vec::with_capacity(sx * sz * 12),
            z: Vec::with_capacity(sx * sy * 12),
        }
    }

    /// Index list of the faces perpendicular to `axis`
    pub fn get(&self, axis: FaceAxis) -> &[u32] {
        match axis {
            FaceAxis::X => &self.x,
            FaceAxis::Y => &self.y,
            FaceAxis::Z => &self.z,
        }
    }
}

impl QuadSink for AxisGroupedIndices {
    fn push_quad(&mut self, axis: FaceAxis, quad: Quad) {
        let indices = match axis {
            FaceAxis::X => &mut self.x,
            FaceAxis::Y => &mut self.y,
            FaceAxis::Z => &mut self.z,
        };
        set_quad(indices, quad);
    }
}

/// Stitch the whole box surface: side walls, then top cap, then bottom cap
pub fn triangulate<S: QuadSink + ?Sized>(layout: &BoxLayout, sink: &mut S) {
    stitch_side_walls(layout, sink);
    stitch_cap(layout, Cap::Top, sink);
    stitch_cap(layout, Cap::Bottom, sink);
}

/// Orientation of the wall quad starting at `position` along a ring
pub fn wall_axis(layout: &BoxLayout, position: u32) -> FaceAxis {
    let dims = layout.dimensions();
    let (sx, sz) = (dims.size_x(), dims.size_z());
    if position < sx {
        FaceAxis::Z
    } else if position < sx + sz {
        FaceAxis::X
    } else if position < 2 * sx + sz {
        FaceAxis::Z
    } else {
        FaceAxis::X
    }
}

fn stitch_side_walls<S: QuadSink + ?Sized>(layout: &BoxLayout, sink: &mut S) {
    let ring = layout.ring();
    for y in 0..layout.dimensions().size_y() {
        for position in 0..ring {
            // Last quad of the ring wraps back to position 0
            let next = (position + 1) % ring;
            let quad = [
                layout.ring_index(y, position),
                layout.ring_index(y, next),
                layout.ring_index(y + 1, position),
                layout.ring_index(y + 1, next),
            ];
            sink.push_quad(wall_axis(layout, position), quad);
        }
    }
}

/// Row by row from the front edge (z = 0) to the back edge; the cap index map
/// resolves perimeter cells to ring vertices and the rest to the interior grid
fn stitch_cap<S: QuadSink + ?Sized>(layout: &BoxLayout, cap: Cap, sink: &mut S) {
    let dims = layout.dimensions();
    let index = |x, z| layout.cap_index(cap, x, z);
    for z in 0..dims.size_z() {
        for x in 0..dims.size_x() {
            let quad = match cap {
                Cap::Top => [index(x, z), index(x + 1, z), index(x, z + 1), index(x + 1, z + 1)],
                Cap::Bottom => [index(x, z + 1), index(x + 1, z + 1), index(x, z), index(x + 1, z)],
            };
            sink.push_quad(FaceAxis::Y, quad);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::primitive::layout::BoxDimensions;

    fn layout(x: u32, y: u32, z: u32) -> BoxLayout {
        BoxLayout::new(BoxDimensions::new(x, y, z).unwrap())
    }

    fn flat(layout: &BoxLayout) -> Vec<u32> {
        let mut sink = FlatIndices::for_layout(layout);
        triangulate(layout, &mut sink);
        sink.into_indices()
    }

    #[test]
    fn test_set_quad_order() {
        let mut indices = Vec::new();
        set_quad(&mut indices, [0, 1, 2, 3]);
        assert_eq!(indices, vec![0, 2, 1, 1, 2, 3]);
    }

    #[test]
    fn test_index_count_and_range() {
        for (x, y, z) in [(1, 1, 1), (2, 2, 2), (3, 1, 5), (4, 3, 2), (1, 5, 1), (6, 2, 3)] {
            let l = layout(x, y, z);
            let indices = flat(&l);
            assert_eq!(indices.len(), 12 * (x * y + x * z + y * z) as usize);
            assert_eq!(indices.len(), l.index_count());
            for tri in indices.chunks(3) {
                assert!(tri.iter().all(|&i| i < l.vertex_count()));
                assert!(tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2]);
            }
        }
    }

    #[test]
    fn test_closed_oriented_manifold() {
        for (x, y, z) in [(1, 1, 1), (2, 2, 2), (3, 1, 5), (4, 3, 2), (1, 4, 3), (5, 2, 1)] {
            let l = layout(x, y, z);
            let indices = flat(&l);

            let mut directed: HashMap<(u32, u32), u32> = HashMap::new();
            for tri in indices.chunks(3) {
                for k in 0..3 {
                    *directed.entry((tri[k], tri[(k + 1) % 3])).or_default() += 1;
                }
            }
            for (&(a, b), &count) in &directed {
                assert_eq!(count, 1, "edge ({a}, {b}) repeated in {x}x{y}x{z}");
                assert_eq!(
                    directed.get(&(b, a)),
                    Some(&1),
                    "edge ({a}, {b}) has no opposite in {x}x{y}x{z}"
                );
            }

            // Euler characteristic of a sphere
            let v = l.vertex_count() as i64;
            let e = directed.len() as i64 / 2;
            let f = indices.len() as i64 / 3;
            assert_eq!(v - e + f, 2, "dims {x}x{y}x{z}");
        }
    }

    #[test]
    fn test_grouped_counts() {
        let l = layout(3, 2, 4);
        let mut sink = AxisGroupedIndices::for_layout(&l);
        triangulate(&l, &mut sink);
        assert_eq!(sink.x.len(), 2 * 4 * 12);
        assert_eq!(sink.y.len(), 3 * 4 * 12);
        assert_eq!(sink.z.len(), 3 * 2 * 12);
    }

    #[test]
    fn test_wall_axis_runs() {
        let l = layout(2, 1, 3);
        let axes: Vec<FaceAxis> = (0..l.ring()).map(|p| wall_axis(&l, p)).collect();
        use FaceAxis::{X, Z};
        assert_eq!(axes, vec![Z, Z, X, X, X, Z, Z, X, X, X]);
    }
}
