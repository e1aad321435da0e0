//! Spring-mass vertex deformation
//!
//! Every vertex is tied to its rest position by a damped spring. External
//! point forces push vertices away with inverse-square falloff; each tick
//! integrates the springs and refreshes the smooth normals.
//!
//! Ordering is the host's job: forces for a tick are applied before that
//! tick's [`SpringDeformer::integrate`] call, both on the same thread.

mod input;

use glam::{Affine3A, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DAMPING_CONSTANT, DEFAULT_SPRING_CONSTANT, DEFAULT_UNIFORM_SCALE};
use crate::mesh::recalculate_vertex_normals;
use crate::primitive::BoxMesh;

pub use input::{PressInput, SurfaceHit};

/// Spring and damping parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeformerConfig {
    /// Pull toward the rest shape per unit displacement
    pub spring_constant: f32,
    /// Fraction of velocity removed per second
    pub damping_constant: f32,
    /// Initial uniform scale of the object
    pub uniform_scale: f32,
}

impl Default for DeformerConfig {
    fn default() -> Self {
        Self {
            spring_constant: DEFAULT_SPRING_CONSTANT,
            damping_constant: DEFAULT_DAMPING_CONSTANT,
            uniform_scale: DEFAULT_UNIFORM_SCALE,
        }
    }
}

impl DeformerConfig {
    /// Reject negative or non-finite constants and a non-positive scale
    pub fn validate(&self) -> Result<(), DeformError> {
        if !self.spring_constant.is_finite() || self.spring_constant < 0.0 {
            return Err(DeformError::InvalidParameter {
                name: "spring_constant",
                value: self.spring_constant,
            });
        }
        if !self.damping_constant.is_finite() || self.damping_constant < 0.0 {
            return Err(DeformError::InvalidParameter {
                name: "damping_constant",
                value: self.damping_constant,
            });
        }
        if !self.uniform_scale.is_finite() || self.uniform_scale <= 0.0 {
            return Err(DeformError::InvalidParameter {
                name: "uniform_scale",
                value: self.uniform_scale,
            });
        }
        Ok(())
    }
}

/// Damped spring simulation over a snapshot of mesh vertices
#[derive(Debug, Clone)]
pub struct SpringDeformer {
    config: DeformerConfig,
    /// Object-to-world transform
    transform: Affine3A,
    uniform_scale: f32,
    original: Vec<Vec3>,
    displaced: Vec<Vec3>,
    velocities: Vec<Vec3>,
    indices: Vec<u32>,
    normals: Vec<Vec3>,
}

impl SpringDeformer {
    /// Create an unattached deformer
    pub fn new(config: DeformerConfig) -> Result<Self, DeformError> {
        config.validate()?;
        Ok(Self {
            config,
            transform: Affine3A::from_scale(Vec3::splat(config.uniform_scale)),
            uniform_scale: config.uniform_scale,
            original: Vec::new(),
            displaced: Vec::new(),
            velocities: Vec::new(),
            indices: Vec::new(),
            normals: Vec::new(),
        })
    }

    /// Create a deformer attached to `mesh`
    pub fn from_mesh(mesh: &BoxMesh, config: DeformerConfig) -> Result<Self, DeformError> {
        let mut deformer = Self::new(config)?;
        deformer.attach(&mesh.vertices, &mesh.indices())?;
        Ok(deformer)
    }

    /// Snapshot `vertices` as the rest shape
    ///
    /// `indices` are only used to recompute normals after each tick.
    pub fn attach(&mut self, vertices: &[Vec3], indices: &[u32]) -> Result<(), DeformError> {
        if self.is_attached() {
            return Err(DeformError::AlreadyAttached);
        }
        if vertices.is_empty() {
            return Err(DeformError::EmptyMesh);
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(DeformError::InvalidIndex {
                index,
                vertex_count: vertices.len(),
            });
        }

        self.original = vertices.to_vec();
        self.displaced = vertices.to_vec();
        self.velocities = vec![Vec3::ZERO; vertices.len()];
        self.indices = indices.to_vec();
        self.normals = vec![Vec3::ZERO; vertices.len()];
        recalculate_vertex_normals(&self.displaced, &self.indices, &mut self.normals);

        tracing::debug!(
            vertices = vertices.len(),
            triangles = indices.len() / 3,
            "Deformer attached"
        );
        Ok(())
    }

    /// Whether a rest shape has been captured
    pub fn is_attached(&self) -> bool {
        !self.displaced.is_empty()
    }

    /// Spring and damping parameters
    pub fn config(&self) -> &DeformerConfig {
        &self.config
    }

    /// Object-to-world transform
    pub fn transform(&self) -> &Affine3A {
        &self.transform
    }

    /// Set the object-to-world transform; its scale is picked up on the next tick
    ///
    /// Non-invertible or non-finite transforms are rejected and the previous
    /// transform is kept, since forces are mapped through the inverse.
    pub fn set_transform(&mut self, transform: Affine3A) -> Result<(), DeformError> {
        let determinant = transform.matrix3.determinant();
        if !transform.is_finite() || !determinant.is_finite() || determinant == 0.0 {
            return Err(DeformError::DegenerateTransform(determinant));
        }
        self.transform = transform;
        Ok(())
    }

    /// Scale used by the most recent tick
    pub fn uniform_scale(&self) -> f32 {
        self.uniform_scale
    }

    /// Push every vertex away from `world_point`
    ///
    /// The impulse on each vertex is `magnitude / (1 + d²) * dt` along the
    /// point-to-vertex direction, `d` being the scaled distance. Calls
    /// accumulate. Does nothing before [`SpringDeformer::attach`].
    pub fn apply_force(&mut self, world_point: Vec3, magnitude: f32, dt: f32) {
        if !self.is_attached() {
            tracing::trace!("Ignoring force on unattached deformer");
            return;
        }

        let local_point = self.transform.inverse().transform_point3(world_point);
        let scale = self.uniform_scale;
        for (displaced, velocity) in self.displaced.iter().zip(self.velocities.iter_mut()) {
            let to_vertex = (*displaced - local_point) * scale;
            let attenuated = magnitude / (1.0 + to_vertex.length_squared());
            *velocity += to_vertex.normalize_or_zero() * (attenuated * dt);
        }
    }

    /// Advance the springs by `dt` seconds and refresh normals
    pub fn integrate(&mut self, dt: f32) -> Result<(), DeformError> {
        if !self.is_attached() {
            return Err(DeformError::Uninitialized);
        }
        if !dt.is_finite() || dt < 0.0 {
            return Err(DeformError::InvalidTimeStep(dt));
        }

        self.uniform_scale = self.sample_scale();
        let scale = self.uniform_scale;
        let spring = self.config.spring_constant;
        // Clamped so large steps never flip the velocity
        let damping = (1.0 - self.config.damping_constant * dt).max(0.0);

        for ((displaced, original), velocity) in self
            .displaced
            .iter_mut()
            .zip(&self.original)
            .zip(self.velocities.iter_mut())
        {
            let displacement = (*displaced - *original) * scale;
            *velocity -= displacement * spring * dt;
            *velocity *= damping;
            *displaced += *velocity * (dt / scale);
        }

        recalculate_vertex_normals(&self.displaced, &self.indices, &mut self.normals);
        Ok(())
    }

    /// X-axis scale of the transform, or the previous scale if degenerate
    fn sample_scale(&self) -> f32 {
        let scale = self.transform.matrix3.x_axis.length();
        if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            tracing::warn!(scale, "Degenerate transform scale, keeping previous");
            self.uniform_scale
        }
    }

    /// Snap every vertex back to rest and stop all motion
    pub fn reset(&mut self) {
        self.displaced.copy_from_slice(&self.original);
        self.velocities.fill(Vec3::ZERO);
        recalculate_vertex_normals(&self.displaced, &self.indices, &mut self.normals);
    }

    /// Rest shape
    pub fn original(&self) -> &[Vec3] {
        &self.original
    }

    /// Current simulated positions
    pub fn displaced(&self) -> &[Vec3] {
        &self.displaced
    }

    /// Per-vertex velocities in local units per second
    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    /// Smooth normals of the current positions
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Triangle indices used for normal recomputation
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Largest distance of any vertex from its rest position
    pub fn max_displacement(&self) -> f32 {
        self.displaced
            .iter()
            .zip(&self.original)
            .map(|(d, o)| d.distance(*o))
            .fold(0.0, f32::max)
    }

    /// Sum of `|v|² / 2` over all vertices (unit mass)
    pub fn kinetic_energy(&self) -> f32 {
        self.velocities.iter().map(|v| 0.5 * v.length_squared()).sum()
    }
}

/// Deformer errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeformError {
    /// Integration requested before a mesh was attached
    #[error("Deformer has no rest shape; attach a mesh first")]
    Uninitialized,
    /// A rest shape was already captured
    #[error("Deformer is already attached to a mesh")]
    AlreadyAttached,
    /// Mesh to attach has no vertices
    #[error("Empty mesh: no vertices to deform")]
    EmptyMesh,
    /// A triangle references a missing vertex
    #[error("Triangle index {index} out of range for {vertex_count} vertices")]
    InvalidIndex {
        /// Offending index
        index: u32,
        /// Vertices in the mesh
        vertex_count: usize,
    },
    /// Time step is negative or not finite
    #[error("Invalid time step: {0}")]
    InvalidTimeStep(f32),
    /// Transform cannot be inverted
    #[error("Degenerate transform: determinant {0}")]
    DegenerateTransform(f32),
    /// A deformer parameter is out of range
    #[error("Invalid parameter: {name} = {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: f32,
    },
}
