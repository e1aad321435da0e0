//! Global constants for softbox-core

/// Default spring constant pulling displaced vertices back to rest
pub const DEFAULT_SPRING_CONSTANT: f32 = 20.0;

/// Default damping constant applied to vertex velocities
pub const DEFAULT_DAMPING_CONSTANT: f32 = 5.0;

/// Default uniform scale of the deformed object
pub const DEFAULT_UNIFORM_SCALE: f32 = 1.0;

/// Default force magnitude injected by a pointer press
pub const DEFAULT_INPUT_FORCE: f32 = 10.0;

/// Default offset along the hit normal at which press forces are applied
pub const DEFAULT_INPUT_FORCE_OFFSET: f32 = 0.1;

/// Default box subdivision along each axis
pub const DEFAULT_BOX_SIZE: [u32; 3] = [4, 4, 4];

/// Default fixed simulation time step (seconds)
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Fallback normal for degenerate triangles
pub const DEGENERATE_TRIANGLE_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];

/// Fallback normal for vertices not referenced by any triangle
pub const ISOLATED_VERTEX_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];
