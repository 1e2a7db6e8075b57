//! Orbital parameters of a single star.

use bytemuck::{Pod, Zeroable};

/// Per-star orbit, index-aligned with the star's [`GalaxyVertex`](crate::GalaxyVertex).
///
/// `#[repr(C)]` and `Pod`, so a slice of records can be uploaded to a storage
/// buffer as-is. `angle` is advanced every frame by the updater using `speed`;
/// the other fields never change after generation.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleRecord {
    /// Orbital position in radians, `[0, 2π)` at generation.
    pub angle: f32,
    /// Distance from the galaxy center. Can be slightly negative near the
    /// core because of the radial jitter.
    pub distance: f32,
    /// Angular velocity; larger closer to the center.
    pub speed: f32,
    /// Cosine of the ellipse twist angle `distance * ellipse_twist`.
    pub s: f32,
    /// Sine of the ellipse twist angle.
    pub t: f32,
}

impl ParticleRecord {
    /// WGSL struct matching the `#[repr(C)]` layout.
    pub const WGSL_STRUCT: &'static str = "struct Star {
    angle: f32,
    distance: f32,
    speed: f32,
    s: f32,
    t: f32,
}";
}

/// View particle records as raw bytes for upload.
pub fn particle_bytes(particles: &[ParticleRecord]) -> &[u8] {
    bytemuck::cast_slice(particles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_is_five_packed_floats() {
        assert_eq!(std::mem::size_of::<ParticleRecord>(), 20);

        let record = ParticleRecord {
            angle: 1.0,
            distance: 150.0,
            speed: 0.0021,
            s: -0.5,
            t: 0.25,
        };
        let bytes = particle_bytes(std::slice::from_ref(&record));
        assert_eq!(bytes.len(), 20);
        assert_eq!(&bytes[4..8], &150.0f32.to_ne_bytes()[..]);
        assert_eq!(&bytes[16..20], &0.25f32.to_ne_bytes()[..]);
    }

    #[test]
    fn test_wgsl_struct_matches_layout() {
        let members: Vec<&str> = ParticleRecord::WGSL_STRUCT
            .lines()
            .skip(1)
            .filter(|line| line.contains(':'))
            .map(str::trim)
            .collect();

        assert!(ParticleRecord::WGSL_STRUCT.starts_with("struct Star {"));
        assert_eq!(
            members,
            vec![
                "angle: f32,",
                "distance: f32,",
                "speed: f32,",
                "s: f32,",
                "t: f32,"
            ]
        );
        assert_eq!(members.len() * 4, std::mem::size_of::<ParticleRecord>());
    }
}
