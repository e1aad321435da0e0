//! Ring/grid index map for the box surface
//!
//! Every surface grid point of a `size_x × size_y × size_z` box owns exactly one
//! vertex index. The layout is:
//!
//! ```text
//! [ ring 0 | ring 1 | ... | ring size_y | top interior | bottom interior ]
//! ```
//!
//! A ring walks the perimeter of one horizontal layer: front edge (z = 0, +x),
//! right edge (x = size_x, +z), back edge (z = size_z, -x), left edge
//! (x = 0, -z), never repeating a corner. The cap interiors are stored
//! row-major over `x ∈ [1, size_x - 1]`, `z ∈ [1, size_z - 1]`.
//!
//! Both vertex emission and triangulation go through this map, so neither
//! depends on the other's loop structure.

use glam::{UVec3, Vec3};

use super::BoxMeshError;

/// Subdivision count of the box along each axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxDimensions {
    size_x: u32,
    size_y: u32,
    size_z: u32,
}

impl BoxDimensions {
    /// Create validated dimensions
    ///
    /// Every axis must be at least 1, and the resulting vertex and index
    /// counts must fit a `u32` index buffer.
    pub fn new(size_x: u32, size_y: u32, size_z: u32) -> Result<Self, BoxMeshError> {
        for (axis, value) in [("size_x", size_x), ("size_y", size_y), ("size_z", size_z)] {
            if value == 0 {
                return Err(BoxMeshError::InvalidDimension { axis, value });
            }
        }
        if !counts_fit_u32(size_x, size_y, size_z) {
            return Err(BoxMeshError::TooLarge {
                size_x,
                size_y,
                size_z,
            });
        }
        Ok(Self {
            size_x,
            size_y,
            size_z,
        })
    }

    /// Create a cube with the same subdivision on every axis
    pub fn cube(size: u32) -> Result<Self, BoxMeshError> {
        Self::new(size, size, size)
    }

    /// Subdivisions along X
    pub fn size_x(&self) -> u32 {
        self.size_x
    }

    /// Subdivisions along Y
    pub fn size_y(&self) -> u32 {
        self.size_y
    }

    /// Subdivisions along Z
    pub fn size_z(&self) -> u32 {
        self.size_z
    }

    /// Smallest subdivision count over the three axes
    pub fn min_size(&self) -> u32 {
        self.size_x.min(self.size_y).min(self.size_z)
    }

    /// Sizes as an integer vector
    pub fn as_uvec3(&self) -> UVec3 {
        UVec3::new(self.size_x, self.size_y, self.size_z)
    }

    /// Sizes as a float vector (the far corner of the box)
    pub fn as_vec3(&self) -> Vec3 {
        self.as_uvec3().as_vec3()
    }
}

/// Vertex and index counts of a box, computed wide so nothing overflows
fn counts_fit_u32(size_x: u32, size_y: u32, size_z: u32) -> bool {
    let (x, y, z) = (u128::from(size_x), u128::from(size_y), u128::from(size_z));
    let vertices = 2 * (x + z) * (y + 1) + 2 * (x - 1) * (z - 1);
    let indices = 12 * (x * y + x * z + y * z);
    let limit = u128::from(u32::MAX);
    vertices <= limit && indices <= limit
}

/// Horizontal cap of the box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cap {
    /// y = size_y
    Top,
    /// y = 0
    Bottom,
}

/// Index map between surface grid points and vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxLayout {
    dims: BoxDimensions,
    ring: u32,
}

impl BoxLayout {
    /// Index map for `dims`
    pub fn new(dims: BoxDimensions) -> Self {
        Self {
            dims,
            ring: 2 * (dims.size_x + dims.size_z),
        }
    }

    /// Dimensions the map was built for
    pub fn dimensions(&self) -> BoxDimensions {
        self.dims
    }

    /// Number of vertices in one horizontal perimeter loop
    pub fn ring(&self) -> u32 {
        self.ring
    }

    /// Box corners, always 8
    pub fn corner_count(&self) -> u32 {
        8
    }

    /// Vertices on the twelve box edges, corners excluded
    pub fn edge_count(&self) -> u32 {
        let BoxDimensions {
            size_x,
            size_y,
            size_z,
        } = self.dims;
        4 * (size_x + size_y + size_z - 3)
    }

    /// Vertices strictly inside the six faces
    pub fn face_interior_count(&self) -> u32 {
        let (x, y, z) = (
            self.dims.size_x - 1,
            self.dims.size_y - 1,
            self.dims.size_z - 1,
        );
        2 * (x * y + x * z + y * z)
    }

    /// Interior vertices of a single cap
    pub fn cap_interior_count(&self) -> u32 {
        (self.dims.size_x - 1) * (self.dims.size_z - 1)
    }

    /// Total vertex count: every ring plus both cap interiors
    pub fn vertex_count(&self) -> u32 {
        self.ring * (self.dims.size_y + 1) + 2 * self.cap_interior_count()
    }

    /// Quads covering all six faces
    pub fn quad_count(&self) -> u32 {
        let BoxDimensions {
            size_x,
            size_y,
            size_z,
        } = self.dims;
        2 * (size_x * size_y + size_x * size_z + size_y * size_z)
    }

    /// Triangle indices for the whole surface (6 per quad)
    pub fn index_count(&self) -> usize {
        self.quad_count() as usize * 6
    }

    /// Vertex index of `position` along the ring of `layer`
    pub fn ring_index(&self, layer: u32, position: u32) -> u32 {
        debug_assert!(layer <= self.dims.size_y, "layer {layer} out of range");
        debug_assert!(position < self.ring, "ring position {position} out of range");
        layer * self.ring + position
    }

    /// Position along the ring of the perimeter point `(x, z)`, or `None` if
    /// the point is not on the perimeter
    pub fn ring_position(&self, x: u32, z: u32) -> Option<u32> {
        let BoxDimensions { size_x, size_z, .. } = self.dims;
        if x > size_x || z > size_z {
            return None;
        }
        if z == 0 {
            Some(x)
        } else if x == size_x {
            Some(size_x + z)
        } else if z == size_z {
            Some(size_x + size_z + (size_x - x))
        } else if x == 0 {
            Some(self.ring - z)
        } else {
            None
        }
    }

    /// Perimeter point `(x, z)` at `position` along a ring
    pub fn ring_point(&self, position: u32) -> (u32, u32) {
        let BoxDimensions { size_x, size_z, .. } = self.dims;
        debug_assert!(position < self.ring, "ring position {position} out of range");
        if position <= size_x {
            (position, 0)
        } else if position <= size_x + size_z {
            (size_x, position - size_x)
        } else if position <= 2 * size_x + size_z {
            (2 * size_x + size_z - position, size_z)
        } else {
            (0, self.ring - position)
        }
    }

    /// First vertex index of a cap's interior block
    pub fn cap_interior_base(&self, cap: Cap) -> u32 {
        let top = self.ring * (self.dims.size_y + 1);
        match cap {
            Cap::Top => top,
            Cap::Bottom => top + self.cap_interior_count(),
        }
    }

    fn cap_layer(&self, cap: Cap) -> u32 {
        match cap {
            Cap::Top => self.dims.size_y,
            Cap::Bottom => 0,
        }
    }

    /// Vertex index of the cap grid point `(x, z)`, perimeter or interior
    pub fn cap_index(&self, cap: Cap, x: u32, z: u32) -> u32 {
        match self.ring_position(x, z) {
            Some(position) => self.ring_index(self.cap_layer(cap), position),
            None => {
                debug_assert!(x <= self.dims.size_x && z <= self.dims.size_z);
                self.cap_interior_base(cap) + (z - 1) * (self.dims.size_x - 1) + (x - 1)
            }
        }
    }

    /// Vertex index of the top cap point `(x, z)`
    pub fn top_index(&self, x: u32, z: u32) -> u32 {
        self.cap_index(Cap::Top, x, z)
    }

    /// Vertex index of the bottom cap point `(x, z)`
    pub fn bottom_index(&self, x: u32, z: u32) -> u32 {
        self.cap_index(Cap::Bottom, x, z)
    }

    /// Vertex index of any surface grid point; `None` for points inside or
    /// outside the box
    pub fn index_of(&self, point: UVec3) -> Option<u32> {
        if point.y > self.dims.size_y {
            return None;
        }
        match self.ring_position(point.x, point.z) {
            Some(position) => Some(self.ring_index(point.y, position)),
            None if point.x > self.dims.size_x || point.z > self.dims.size_z => None,
            None if point.y == self.dims.size_y => Some(self.cap_index(Cap::Top, point.x, point.z)),
            None if point.y == 0 => Some(self.cap_index(Cap::Bottom, point.x, point.z)),
            None => None,
        }
    }

    /// Surface grid point owning vertex `index`
    pub fn grid_point(&self, index: u32) -> UVec3 {
        debug_assert!(index < self.vertex_count(), "vertex {index} out of range");
        let walls = self.ring * (self.dims.size_y + 1);
        if index < walls {
            let (x, z) = self.ring_point(index % self.ring);
            return UVec3::new(x, index / self.ring, z);
        }

        let row = self.dims.size_x - 1;
        let mut offset = index - walls;
        let y = if offset < self.cap_interior_count() {
            self.dims.size_y
        } else {
            offset -= self.cap_interior_count();
            0
        };
        UVec3::new(1 + offset % row, y, 1 + offset / row)
    }

    /// Every surface grid point in vertex index order
    pub fn grid_points(&self) -> impl ExactSizeIterator<Item = UVec3> {
        let layout = *self;
        (0..layout.vertex_count()).map(move |index| layout.grid_point(index))
    }
}
