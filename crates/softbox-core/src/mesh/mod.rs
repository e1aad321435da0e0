//! Mesh utilities shared by the generators and the deformer
//!
//! - Flat and smooth normal calculation
//! - Binary STL export

mod normals;
mod stl;

pub use normals::{
    calculate_face_normals, calculate_triangle_normal, calculate_vertex_normals,
    recalculate_vertex_normals,
};
pub use stl::{StlError, save_stl, write_stl};
