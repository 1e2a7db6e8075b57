//! Galaxy particle field generation.
//!
//! Every star gets a distance from a half-normal distribution scaled by half
//! the galaxy radius, a uniform orbital angle, a speed that grows toward the
//! center, an ellipse twist proportional to its distance, and a color from one
//! of two radial bands:
//!
//! - inside a third of the radius: warm white, red rising with distance
//! - outside: cool white, blue rising with distance
//!
//! ```ignore
//! let config = GalaxyConfig::default().with_seed(7);
//! let field = ParticleFieldGenerator::new(config)?.generate()?;
//! queue.write_buffer(&vertex_buffer, 0, field.vertex_bytes());
//! queue.write_buffer(&star_buffer, 0, field.particle_bytes());
//! ```

use crate::config::GalaxyConfig;
use crate::error::{ConfigError, GalaxyError, PackError};
use crate::particle::{particle_bytes, ParticleRecord};
use crate::sampler::{RandomSampler, Sampler};
use crate::vertex::{pack_rgb, GalaxyVertex};
use crate::vertex_array::VertexArray;
use glam::Vec2;
use std::f32::consts::TAU;

/// Half-width of the uniform jitter added to every distance.
pub const DISTANCE_JITTER: f32 = 4.0;
/// Range of the uniform factor in the speed formula.
pub const SPEED_RANGE: (f32, f32) = (0.0015, 0.0025);
/// Final scale applied to every speed.
pub const SPEED_DAMPING: f32 = 0.7;
/// Range of star point sizes.
pub const POINT_SIZE_RANGE: (f32, f32) = (0.5, 1.5);

/// Packed color for a star at `distance` in a galaxy of `radius`.
pub fn band_color(distance: f32, radius: f32) -> u32 {
    let ratio = distance / radius;
    if distance < radius / 3.0 {
        let red = (220.0 + ratio * 35.0).clamp(0.0, 255.0) as u8;
        pack_rgb(red, 220, 220)
    } else {
        let blue = (140.0 + ratio * 115.0).clamp(140.0, 255.0) as u8;
        pack_rgb(180, 180, blue)
    }
}

/// Generated stars: orbit parameters and packed vertices, index-aligned.
pub struct GalaxyField {
    particles: Vec<ParticleRecord>,
    vertices: VertexArray<GalaxyVertex>,
}

impl GalaxyField {
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[ParticleRecord] {
        &self.particles
    }

    /// Orbit parameters, for the frame update to advance `angle`.
    pub fn particles_mut(&mut self) -> &mut [ParticleRecord] {
        &mut self.particles
    }

    pub fn vertices(&self) -> &VertexArray<GalaxyVertex> {
        &self.vertices
    }

    /// Packed vertex buffer, `len() * 16` bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        self.vertices.bytes()
    }

    /// Orbit parameters as raw bytes.
    pub fn particle_bytes(&self) -> &[u8] {
        particle_bytes(&self.particles)
    }

    /// Write a star's screen position and re-pack its vertex.
    pub fn set_position(&mut self, index: usize, position: Vec2) -> Result<(), PackError> {
        self.vertices.update(index, |v| v.position = position)
    }

    /// Hand both arrays over: orbit records, vertex items and packed bytes.
    pub fn into_parts(self) -> (Vec<ParticleRecord>, Vec<GalaxyVertex>, Vec<u8>) {
        let (vertices, bytes) = self.vertices.into_parts();
        (self.particles, vertices, bytes)
    }
}

/// Builds a [`GalaxyField`] from a validated configuration.
pub struct ParticleFieldGenerator<S: Sampler = RandomSampler> {
    config: GalaxyConfig,
    sampler: S,
}

impl ParticleFieldGenerator<RandomSampler> {
    /// Generator seeded from `config.seed`, or from the OS when unset.
    pub fn new(config: GalaxyConfig) -> Result<Self, ConfigError> {
        let sampler = RandomSampler::from_seed_option(config.seed);
        Self::with_sampler(config, sampler)
    }
}

impl<S: Sampler> ParticleFieldGenerator<S> {
    /// Generator drawing from a caller-supplied sampler.
    pub fn with_sampler(config: GalaxyConfig, sampler: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, sampler })
    }

    pub fn config(&self) -> &GalaxyConfig {
        &self.config
    }

    pub fn into_sampler(self) -> S {
        self.sampler
    }

    /// Distance fed to the speed formula, kept away from zero when a floor
    /// is configured.
    fn speed_distance(&self, distance: f32) -> f32 {
        match self.config.speed_distance_floor {
            Some(floor) if distance.abs() < floor => floor.copysign(distance),
            _ => distance,
        }
    }

    /// Sample one star. Draw order: gaussian, jitter, angle, speed, size.
    pub fn sample_particle(&mut self) -> (ParticleRecord, GalaxyVertex) {
        let radius = self.config.galaxy_radius as f32;

        let distance = self.sampler.gaussian().abs() * radius / 2.0
            + self.sampler.uniform(-DISTANCE_JITTER, DISTANCE_JITTER);
        let twist = distance * self.config.ellipse_twist;

        let angle = self.sampler.uniform(0.0, TAU);
        let speed = self.sampler.uniform(SPEED_RANGE.0, SPEED_RANGE.1)
            * (0.5 + (0.5 * radius / self.speed_distance(distance)))
            * SPEED_DAMPING;

        let particle = ParticleRecord {
            angle,
            distance,
            speed,
            s: twist.cos(),
            t: twist.sin(),
        };

        let vertex = GalaxyVertex {
            color: band_color(distance, radius),
            position: Vec2::ZERO,
            point_size: self.sampler.uniform(POINT_SIZE_RANGE.0, POINT_SIZE_RANGE.1),
        };

        (particle, vertex)
    }

    /// Generate every star. Either all `particle_count` stars are produced or
    /// an error is returned and nothing is kept.
    pub fn generate(&mut self) -> Result<GalaxyField, GalaxyError> {
        let count = self.config.particle_count as usize;

        let mut particles = Vec::new();
        particles
            .try_reserve_exact(count)
            .map_err(|_| GalaxyError::Allocation {
                what: "particle records",
                count,
            })?;
        let mut vertices = VertexArray::<GalaxyVertex>::with_buffer(count)?;

        let mut degenerate = 0usize;
        for index in 0..count {
            let (particle, vertex) = self.sample_particle();
            if !particle.speed.is_finite() {
                degenerate += 1;
            }
            vertices.set(vertex, index, true)?;
            particles.push(particle);
        }

        if degenerate > 0 {
            log::warn!(
                "{} stars sampled at the galaxy center have non-finite speed",
                degenerate
            );
        }
        log::debug!(
            "generated {} stars (radius {}, twist {}), {} vertex bytes",
            count,
            self.config.galaxy_radius,
            self.config.ellipse_twist,
            vertices.bytes().len()
        );

        Ok(GalaxyField {
            particles,
            vertices,
        })
    }
}
