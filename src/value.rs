//! Typed field values for packing and read-back.

use crate::schema::FieldType;
use glam::{Vec2, Vec3, Vec4};

/// One field's value, tagged with its binary type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue {
    Rgba([u8; 4]),
    F32(f32),
    U32(u32),
    I32(i32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
}

impl FieldValue {
    /// Field type this value is written as.
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Rgba(_) => FieldType::Unorm8x4,
            FieldValue::F32(_) => FieldType::Float32,
            FieldValue::U32(_) => FieldType::Uint32,
            FieldValue::I32(_) => FieldType::Sint32,
            FieldValue::Vec2(_) => FieldType::Float32x2,
            FieldValue::Vec3(_) => FieldType::Float32x3,
            FieldValue::Vec4(_) => FieldType::Float32x4,
        }
    }

    /// Write the value's little-endian bytes to the front of `out`.
    ///
    /// `out` must be at least `field_type().byte_width()` long.
    pub fn write_le(&self, out: &mut [u8]) {
        match self {
            FieldValue::Rgba(v) => out[..4].copy_from_slice(v),
            FieldValue::F32(v) => out[..4].copy_from_slice(&v.to_le_bytes()),
            FieldValue::U32(v) => out[..4].copy_from_slice(&v.to_le_bytes()),
            FieldValue::I32(v) => out[..4].copy_from_slice(&v.to_le_bytes()),
            FieldValue::Vec2(v) => write_floats(out, &v.to_array()),
            FieldValue::Vec3(v) => write_floats(out, &v.to_array()),
            FieldValue::Vec4(v) => write_floats(out, &v.to_array()),
        }
    }

    /// Decode a value of type `ty` from the front of `bytes`.
    pub fn read_le(ty: FieldType, bytes: &[u8]) -> Self {
        match ty {
            FieldType::Unorm8x4 => FieldValue::Rgba([bytes[0], bytes[1], bytes[2], bytes[3]]),
            FieldType::Float32 => FieldValue::F32(f32::from_le_bytes(word(bytes, 0))),
            FieldType::Uint32 => FieldValue::U32(u32::from_le_bytes(word(bytes, 0))),
            FieldType::Sint32 => FieldValue::I32(i32::from_le_bytes(word(bytes, 0))),
            FieldType::Float32x2 => FieldValue::Vec2(Vec2::new(float(bytes, 0), float(bytes, 1))),
            FieldType::Float32x3 => FieldValue::Vec3(Vec3::new(
                float(bytes, 0),
                float(bytes, 1),
                float(bytes, 2),
            )),
            FieldType::Float32x4 => FieldValue::Vec4(Vec4::new(
                float(bytes, 0),
                float(bytes, 1),
                float(bytes, 2),
                float(bytes, 3),
            )),
        }
    }
}

fn write_floats(out: &mut [u8], values: &[f32]) {
    for (chunk, v) in out.chunks_exact_mut(4).zip(values) {
        chunk.copy_from_slice(&v.to_le_bytes());
    }
}

fn word(bytes: &[u8], i: usize) -> [u8; 4] {
    let at = i * 4;
    [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]
}

fn float(bytes: &[u8], i: usize) -> f32 {
    f32::from_le_bytes(word(bytes, i))
}

// Conversion traits for ergonomic API
impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::F32(v)
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::U32(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::I32(v)
    }
}

impl From<[u8; 4]> for FieldValue {
    fn from(v: [u8; 4]) -> Self {
        FieldValue::Rgba(v)
    }
}

impl From<Vec2> for FieldValue {
    fn from(v: Vec2) -> Self {
        FieldValue::Vec2(v)
    }
}

impl From<Vec3> for FieldValue {
    fn from(v: Vec3) -> Self {
        FieldValue::Vec3(v)
    }
}

impl From<Vec4> for FieldValue {
    fn from(v: Vec4) -> Self {
        FieldValue::Vec4(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_bytes_are_little_endian_floats() {
        let mut out = [0u8; 12];
        FieldValue::Vec3(Vec3::new(1.0, -2.0, 0.5)).write_le(&mut out);
        assert_eq!(&out[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&out[4..8], &(-2.0f32).to_le_bytes());
        assert_eq!(&out[8..12], &0.5f32.to_le_bytes());
    }

    #[test]
    fn test_read_matches_write() {
        let values = [
            FieldValue::Rgba([1, 2, 3, 255]),
            FieldValue::F32(-0.0),
            FieldValue::U32(0xdead_beef),
            FieldValue::I32(-7),
            FieldValue::Vec2(Vec2::new(3.5, f32::MIN_POSITIVE)),
            FieldValue::Vec4(Vec4::new(1.0, 2.0, 3.0, 4.0)),
        ];
        for value in values {
            let mut out = [0u8; 16];
            value.write_le(&mut out);
            assert_eq!(FieldValue::read_le(value.field_type(), &out), value);
        }
    }

    #[test]
    fn test_u32_color_and_rgba_share_bytes() {
        let mut packed = [0u8; 4];
        FieldValue::U32(0xff10_2030).write_le(&mut packed);
        assert_eq!(
            FieldValue::read_le(FieldType::Unorm8x4, &packed),
            FieldValue::Rgba([0x30, 0x20, 0x10, 0xff])
        );
    }
}
