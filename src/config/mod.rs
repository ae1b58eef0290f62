//! Simulation configuration.
//!
//! Plain serde-backed structs with sensible defaults. The unit scale and step
//! frequency are fixed for the lifetime of one simulation instance; gravity
//! and per-body material properties can change at runtime.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Standard gravity, in world units per second squared, pointing down in the
/// y-down layout coordinate system.
pub const EARTH_GRAVITY: Vec2 = Vec2::new(0.0, 9.81);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Layout units per world unit.
    pub scale: f32,
    /// World gravity applied to all dynamic bodies.
    pub gravity: Vec2,
    /// Fixed integration timestep, in seconds. Wall-clock time is accumulated
    /// and consumed in increments of this size.
    pub step_frequency: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scale: 64.0,
            gravity: EARTH_GRAVITY,
            step_frequency: 1.0 / 90.0,
        }
    }
}

/// Material and damping properties of one body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub angular_damping: f32,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            angular_damping: 0.7,
            density: 1.0,
            friction: 0.2,
            restitution: 0.4,
        }
    }
}

/// Loads a [`SimulationConfig`] from a TOML file, falling back to defaults
/// when the file does not exist or fails to parse.
pub fn load_config(path: &Path) -> SimulationConfig {
    match fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", path.display(), e);
                SimulationConfig::default()
            }
        },
        Err(_) => SimulationConfig::default(),
    }
}

/// Serializes a [`SimulationConfig`] to a TOML file.
pub fn save_config(config: &SimulationConfig, path: &Path) -> std::io::Result<()> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    fs::write(path, contents)
}
