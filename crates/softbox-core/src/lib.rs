//! Softbox Core
//!
//! Procedural box meshes and elastic deformation:
//! - Primitive: subdivided box and rounded box generation over a shared
//!   ring/grid index map, immediate or progressive
//! - Deform: per-vertex damped springs driven by external point forces
//! - Mesh: normal recomputation and STL export
//! - Config: RON-persisted session settings

pub mod config;
pub mod constants;
pub mod deform;
pub mod mesh;
pub mod primitive;
pub mod vertex;

pub use config::{ConfigError, MeshConfig, SimulationConfig, SoftboxConfig};
pub use deform::{DeformError, DeformerConfig, PressInput, SpringDeformer, SurfaceHit};
pub use primitive::{
    BoxDimensions, BoxLayout, BoxMesh, BoxMeshBuilder, BoxMeshError, FaceAxis,
    ProgressiveBoxMesh, RevealProgress, SubMesh, generate_box_mesh, generate_rounded_box_mesh,
};
pub use vertex::MeshVertex;
