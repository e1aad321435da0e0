//! Pointer press to deforming force
//!
//! Hit testing is left to the host; this only turns a surface hit into a
//! force application point.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::SpringDeformer;
use crate::constants::{DEFAULT_INPUT_FORCE, DEFAULT_INPUT_FORCE_OFFSET};

/// World-space hit on the deformed surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Hit position
    pub point: Vec3,
    /// Unit surface normal at the hit
    pub normal: Vec3,
}

/// Force injected while a pointer is held down on the surface
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PressInput {
    /// Force magnitude per press tick
    pub force: f32,
    /// Distance above the surface (along the hit normal) the force acts from
    pub force_offset: f32,
}

impl Default for PressInput {
    fn default() -> Self {
        Self {
            force: DEFAULT_INPUT_FORCE,
            force_offset: DEFAULT_INPUT_FORCE_OFFSET,
        }
    }
}

impl PressInput {
    /// Point the force is applied from for `hit`
    pub fn force_point(&self, hit: SurfaceHit) -> Vec3 {
        hit.point + hit.normal * self.force_offset
    }

    /// Apply one tick of pressing at `hit`
    pub fn press(&self, deformer: &mut SpringDeformer, hit: SurfaceHit, dt: f32) {
        deformer.apply_force(self.force_point(hit), self.force, dt);
    }
}
