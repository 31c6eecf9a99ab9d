//! Scene configuration
//!
//! Gravity, timestep and solver tuning. Loaded from JSON on native builds,
//! otherwise taken from the engine defaults in `consts`.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Tunables consumed by `Scene`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Constant acceleration applied to every finite-mass body
    pub gravity: Vec2,
    /// Fixed step length in seconds
    pub dt: f32,
    /// Impulse iterations per step
    pub iterations: u32,

    // === Positional correction ===
    /// Overlap tolerated before correction starts
    pub penetration_slop: f32,
    /// Fraction of the remaining overlap removed each step
    pub correction_percent: f32,

    /// Added to one frame of gravity when detecting resting contacts
    pub resting_epsilon: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(GRAVITY_X, GRAVITY_Y),
            dt: SIM_DT,
            iterations: SOLVER_ITERATIONS,
            penetration_slop: PENETRATION_SLOP,
            correction_percent: CORRECTION_PERCENT,
            resting_epsilon: EPSILON,
        }
    }
}

impl SceneConfig {
    /// Parse from a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from `path`, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_path(path) {
            Ok(config) => {
                log::info!("Loaded scene config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("{err}; using default scene config");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Squared relative speed below which a contact counts as resting
    ///
    /// One frame of gravity, plus a little.
    pub fn resting_threshold(&self) -> f32 {
        (self.gravity * self.dt).length_squared() + self.resting_epsilon
    }
}
