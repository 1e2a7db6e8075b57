//! Galaxy configuration.
//!
//! Configurations can be built in code with the `with_*` methods or loaded
//! from JSON. Missing JSON fields take their defaults.
//!
//! ```ignore
//! let config = GalaxyConfig::default()
//!     .with_particle_count(4_000)
//!     .with_seed(7);
//! config.validate()?;
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default number of stars.
pub const DEFAULT_PARTICLE_COUNT: u32 = 12_000;
/// Default galaxy radius in pixels.
pub const DEFAULT_GALAXY_RADIUS: u32 = 300;
/// Default shear per unit of distance, in radians.
pub const DEFAULT_ELLIPSE_TWIST: f32 = 0.023333333;

fn default_particle_count() -> u32 {
    DEFAULT_PARTICLE_COUNT
}

fn default_galaxy_radius() -> u32 {
    DEFAULT_GALAXY_RADIUS
}

fn default_ellipse_twist() -> f32 {
    DEFAULT_ELLIPSE_TWIST
}

/// Generation parameters for a galaxy field.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GalaxyConfig {
    /// Number of stars; sizes both output arrays.
    #[serde(default = "default_particle_count")]
    pub particle_count: u32,
    /// Scale of the radial distribution and the color band threshold.
    #[serde(default = "default_galaxy_radius")]
    pub galaxy_radius: u32,
    /// Orbital shear angle per unit of distance.
    #[serde(default = "default_ellipse_twist")]
    pub ellipse_twist: f32,
    /// Seed for deterministic generation. `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Smallest distance magnitude used in the speed formula.
    ///
    /// `None` keeps the unclamped formula, where a star sampled exactly at
    /// the center gets a non-finite speed.
    #[serde(default)]
    pub speed_distance_floor: Option<f32>,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            galaxy_radius: DEFAULT_GALAXY_RADIUS,
            ellipse_twist: DEFAULT_ELLIPSE_TWIST,
            seed: None,
            speed_distance_floor: None,
        }
    }
}

impl GalaxyConfig {
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    pub fn with_galaxy_radius(mut self, radius: u32) -> Self {
        self.galaxy_radius = radius;
        self
    }

    pub fn with_ellipse_twist(mut self, twist: f32) -> Self {
        self.ellipse_twist = twist;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_speed_distance_floor(mut self, floor: f32) -> Self {
        self.speed_distance_floor = Some(floor);
        self
    }

    /// Reject configurations that cannot produce a galaxy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(ConfigError::ZeroParticleCount);
        }
        if self.galaxy_radius == 0 {
            return Err(ConfigError::ZeroGalaxyRadius);
        }
        if !self.ellipse_twist.is_finite() {
            return Err(ConfigError::InvalidEllipseTwist(self.ellipse_twist));
        }
        if let Some(floor) = self.speed_distance_floor {
            if !(floor.is_finite() && floor > 0.0) {
                return Err(ConfigError::InvalidDistanceFloor(floor));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!(
            "loaded galaxy config from {}: {} particles, radius {}",
            path.display(),
            config.particle_count,
            config.galaxy_radius
        );
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
