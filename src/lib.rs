//! # galaxy - procedural galaxy star field
//!
//! Generates the stars of an elliptical, twisted galaxy and packs their
//! per-vertex attributes into a tightly laid-out buffer ready for a GPU
//! vertex pipeline. Drawing and the per-frame orbit update are left to the
//! caller.
//!
//! ## Quick Start
//!
//! ```ignore
//! use galaxy::prelude::*;
//!
//! let config = GalaxyConfig::default().with_seed(42);
//! let mut field = ParticleFieldGenerator::new(config)?.generate()?;
//!
//! // 16 bytes per star: color (unorm8x4), position (f32x2), point size (f32)
//! let vertex_bytes = field.vertex_bytes();
//! let attributes = GalaxyVertex::schema().vertex_attributes(0);
//!
//! // Each frame: advance angles, then write positions back
//! for i in 0..field.len() {
//!     let star = &mut field.particles_mut()[i];
//!     star.angle += star.speed;
//!     let (sin, cos) = star.angle.sin_cos();
//!     let local = Vec2::new(cos * star.distance, sin * star.distance * 0.5);
//!     let twisted = Vec2::new(star.s, star.t).rotate(local);
//!     field.set_position(i, twisted)?;
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Vertex records
//!
//! Define a vertex struct with `#[derive(Vertex)]`. The macro declares a
//! [`VertexSchema`] with one field per struct field, in declaration order,
//! packed with no padding:
//!
//! ```ignore
//! #[derive(Vertex, Clone, Default)]
//! struct Sprite {
//!     #[vertex(color)]
//!     color: u32,
//!     #[vertex(position)]
//!     position: Vec2,
//!     #[vertex(tex_coord)]
//!     tex_coord: Vec2,
//! }
//! ```
//!
//! Schemas can also be declared by hand with [`VertexSchema::declare_field`].
//!
//! ### Packing
//!
//! A [`RecordPacker`] serializes records into a scratch buffer and commits
//! them to a [`VertexSink`], one record at a time or all at once.
//! [`VertexArray`] wraps a packer together with the typed items.
//!
//! ### Generation
//!
//! [`ParticleFieldGenerator`] draws from a [`Sampler`] and produces a
//! [`GalaxyField`]: one [`ParticleRecord`] and one [`GalaxyVertex`] per star.

// Lets `#[derive(Vertex)]` refer to `galaxy::` paths inside this crate.
extern crate self as galaxy;

pub mod config;
pub mod error;
pub mod generator;
mod packer;
mod particle;
pub mod sampler;
mod schema;
mod state;
mod value;
mod vertex;
mod vertex_array;

pub use bytemuck;
pub use config::GalaxyConfig;
pub use error::{ConfigError, GalaxyError, PackError};
pub use galaxy_derive::Vertex;
pub use generator::{band_color, GalaxyField, ParticleFieldGenerator};
pub use glam::{Vec2, Vec3, Vec4};
pub use packer::{QueueSink, RecordPacker, RecordReader, VertexSink};
pub use particle::{particle_bytes, ParticleRecord};
pub use sampler::{RandomSampler, Sampler};
pub use schema::{FieldKind, FieldType, VertexField, VertexSchema};
pub use state::{GalaxyFieldState, GalaxyStateUniform};
pub use value::FieldValue;
pub use vertex::{pack_rgb, unpack_rgba, GalaxyVertex, TexturedVertex};
pub use vertex_array::VertexArray;

/// Trait implemented by `#[derive(Vertex)]`.
///
/// Bridges a Rust struct to a packed vertex record. The derive macro
/// generates:
/// - a [`VertexSchema`] declaring each field in order
/// - the record stride
/// - field-by-field pack and unpack code
///
/// Implementing it by hand is possible, but `pack` must write exactly the
/// fields `schema` declares, in the same order.
pub trait VertexTrait: Send + Sync {
    /// Packed record size in bytes; equals `Self::schema().stride()`.
    const STRIDE: usize;

    /// Layout of one record.
    fn schema() -> VertexSchema;

    /// Write this record at the packer's current cursor.
    fn pack(&self, packer: &mut RecordPacker);

    /// Read a record back from its packed bytes.
    fn unpack(reader: &mut RecordReader<'_>) -> Self;
}

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use galaxy::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::GalaxyConfig;
    pub use crate::generator::{GalaxyField, ParticleFieldGenerator};
    pub use crate::packer::{RecordPacker, RecordReader, VertexSink};
    pub use crate::particle::ParticleRecord;
    pub use crate::sampler::{RandomSampler, Sampler};
    pub use crate::schema::{FieldKind, FieldType, VertexSchema};
    pub use crate::state::GalaxyFieldState;
    pub use crate::vertex::GalaxyVertex;
    pub use crate::vertex_array::VertexArray;
    pub use crate::VertexTrait;
    pub use crate::{Vec2, Vec3, Vec4};
    pub use galaxy_derive::Vertex;
}
