//! Vertex records used by the galaxy scene.

use crate::Vertex;
use glam::Vec2;

/// Per-star vertex: packed color, screen position and point size.
///
/// 16 bytes: `Unorm8x4` color, `Float32x2` position, `Float32` point size.
/// Color and point size are fixed at generation; the position belongs to the
/// frame update that moves the star.
#[derive(Vertex, Clone, Copy, Debug, Default, PartialEq)]
pub struct GalaxyVertex {
    #[vertex(color)]
    pub color: u32,
    #[vertex(position)]
    pub position: Vec2,
    #[vertex(point_size)]
    pub point_size: f32,
}

/// Color, position and texture coordinate; 20 bytes.
#[derive(Vertex, Clone, Copy, Debug, Default, PartialEq)]
pub struct TexturedVertex {
    #[vertex(color)]
    pub color: [u8; 4],
    #[vertex(position)]
    pub position: Vec2,
    #[vertex(tex_coord)]
    pub tex_coord: Vec2,
}

/// Pack an opaque RGB color, red in the lowest byte.
#[inline]
pub const fn pack_rgb(red: u8, green: u8, blue: u8) -> u32 {
    (red as u32) | ((green as u32) << 8) | ((blue as u32) << 16) | 0xff00_0000
}

/// Split a packed color into `[r, g, b, a]`.
#[inline]
pub const fn unpack_rgba(color: u32) -> [u8; 4] {
    color.to_le_bytes()
}
