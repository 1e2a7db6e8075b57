//! Scene-wide galaxy state shared with the frame update.

use crate::config::GalaxyConfig;
use bytemuck::{Pod, Zeroable};

/// GPU-ready snapshot of [`GalaxyFieldState`]; 20 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GalaxyStateUniform {
    pub width: u32,
    pub height: u32,
    pub particles_count: u32,
    pub galaxy_radius: u32,
    pub x_offset: f32,
}

/// Viewport, scroll offset and the fixed galaxy dimensions.
///
/// Host events call [`resize`](Self::resize) and [`set_offset`](Self::set_offset);
/// both mark the state dirty so the consumer knows to re-upload it and
/// re-derive anything that depends on the viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct GalaxyFieldState {
    width: u32,
    height: u32,
    x_offset: f32,
    particle_count: u32,
    galaxy_radius: u32,
    dirty: bool,
}

impl GalaxyFieldState {
    /// New state, initially dirty so the first frame uploads it.
    pub fn new(width: u32, height: u32, particle_count: u32, galaxy_radius: u32) -> Self {
        Self {
            width,
            height,
            x_offset: 0.0,
            particle_count,
            galaxy_radius,
            dirty: true,
        }
    }

    pub fn from_config(width: u32, height: u32, config: &GalaxyConfig) -> Self {
        Self::new(width, height, config.particle_count, config.galaxy_radius)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn x_offset(&self) -> f32 {
        self.x_offset
    }

    #[inline]
    pub fn particle_count(&self) -> u32 {
        self.particle_count
    }

    #[inline]
    pub fn galaxy_radius(&self) -> u32 {
        self.galaxy_radius
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.dirty = true;
    }

    /// Horizontal wallpaper scroll offset, `0.0..=1.0` across home screens.
    pub fn set_offset(&mut self, x_offset: f32) {
        self.x_offset = x_offset;
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return the dirty flag and clear it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn uniform(&self) -> GalaxyStateUniform {
        GalaxyStateUniform {
            width: self.width,
            height: self.height,
            particles_count: self.particle_count,
            galaxy_radius: self.galaxy_radius,
            x_offset: self.x_offset,
        }
    }
}
