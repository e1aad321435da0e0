//! Configuration file serialization
//!
//! All tunables of a softbox session, persisted as RON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BOX_SIZE, DEFAULT_TIME_STEP};
use crate::deform::{DeformerConfig, PressInput};
use crate::primitive::{BoxDimensions, BoxMesh, BoxMeshBuilder, BoxMeshError};

/// Box subdivision and rounding
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MeshConfig {
    /// Subdivisions along X
    pub size_x: u32,
    /// Subdivisions along Y
    pub size_y: u32,
    /// Subdivisions along Z
    pub size_z: u32,
    /// `None` for a plain box
    pub roundness: Option<u32>,
}

impl Default for MeshConfig {
    fn default() -> Self {
        let [size_x, size_y, size_z] = DEFAULT_BOX_SIZE;
        Self {
            size_x,
            size_y,
            size_z,
            roundness: None,
        }
    }
}

impl MeshConfig {
    /// Validated box dimensions
    pub fn dimensions(&self) -> Result<BoxDimensions, BoxMeshError> {
        BoxDimensions::new(self.size_x, self.size_y, self.size_z)
    }

    /// Builder for the configured plain or rounded box
    pub fn builder(&self) -> Result<BoxMeshBuilder, BoxMeshError> {
        let builder = BoxMeshBuilder::new(self.dimensions()?);
        Ok(match self.roundness {
            Some(roundness) => builder.rounded(roundness),
            None => builder,
        })
    }

    /// Generate the configured mesh
    pub fn build(&self) -> Result<BoxMesh, BoxMeshError> {
        self.builder()?.build()
    }
}

/// Host-side simulation pacing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed time step per tick (seconds)
    pub time_step: f32,
    /// Ticks during which the press is held
    pub press_ticks: u32,
    /// Ticks of free relaxation after release
    pub settle_ticks: u32,
    /// Vertices written per reveal step (0 builds the mesh at once)
    pub reveal_batch: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            press_ticks: 30,
            settle_ticks: 240,
            reveal_batch: 0,
        }
    }
}

/// Complete session configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SoftboxConfig {
    /// Box to generate
    pub mesh: MeshConfig,
    /// Spring parameters
    pub deformer: DeformerConfig,
    /// Press force
    pub input: PressInput,
    /// Tick pacing
    pub simulation: SimulationConfig,
}

impl SoftboxConfig {
    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = self.to_bytes()?;
        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// Serialize configuration to pretty RON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        Ok(content.into_bytes())
    }

    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        ron::from_str(&content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    /// Load configuration from RON bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, ConfigError> {
        let content =
            std::str::from_utf8(data).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }
}

/// Configuration-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("IO error: {0}")]
    Io(String),
    /// Configuration could not be encoded as RON
    #[error("Serialization error: {0}")]
    Serialize(String),
    /// File content is not a valid configuration
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}
