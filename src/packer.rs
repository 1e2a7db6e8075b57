//! Record packing into tightly laid-out vertex buffers.
//!
//! A [`RecordPacker`] owns a scratch buffer of `stride * record_count` bytes.
//! Callers position it on a record with [`begin_record`](RecordPacker::begin_record),
//! issue one write per field in schema order, then copy the result into a
//! destination: one record at a time with
//! [`commit_record`](RecordPacker::commit_record) or the whole buffer with
//! [`commit_all`](RecordPacker::commit_all).
//!
//! All values are written little-endian, which is what wgpu vertex fetch
//! expects.
//!
//! ```ignore
//! let mut packer = RecordPacker::new(GalaxyVertex::schema(), count)?;
//! packer
//!     .begin_record(i)?
//!     .write_u32(color)
//!     .write_vec2(Vec2::ZERO)
//!     .write_f32(point_size);
//! packer.commit_record(&mut vertex_bytes, i)?;
//! ```

use crate::error::PackError;
use crate::schema::{FieldType, VertexSchema};
use crate::value::FieldValue;
use glam::{Vec2, Vec3, Vec4};

/// Destination for packed records: a CPU byte buffer or a GPU buffer.
pub trait VertexSink {
    /// Copy `bytes` into the destination starting at byte `offset`.
    fn write_at(&mut self, offset: usize, bytes: &[u8]) -> Result<(), PackError>;
}

impl VertexSink for [u8] {
    fn write_at(&mut self, offset: usize, bytes: &[u8]) -> Result<(), PackError> {
        let required = offset + bytes.len();
        if required > self.len() {
            return Err(PackError::DestinationTooSmall {
                required,
                available: self.len(),
            });
        }
        self[offset..required].copy_from_slice(bytes);
        Ok(())
    }
}

impl VertexSink for Vec<u8> {
    fn write_at(&mut self, offset: usize, bytes: &[u8]) -> Result<(), PackError> {
        self.as_mut_slice().write_at(offset, bytes)
    }
}

/// Uploads packed records straight into a wgpu vertex buffer.
///
/// Offsets and lengths must respect `wgpu::COPY_BUFFER_ALIGNMENT`, which holds
/// for any schema whose stride is a multiple of four.
pub struct QueueSink<'a> {
    pub queue: &'a wgpu::Queue,
    pub buffer: &'a wgpu::Buffer,
}

impl<'a> QueueSink<'a> {
    pub fn new(queue: &'a wgpu::Queue, buffer: &'a wgpu::Buffer) -> Self {
        Self { queue, buffer }
    }
}

impl VertexSink for QueueSink<'_> {
    fn write_at(&mut self, offset: usize, bytes: &[u8]) -> Result<(), PackError> {
        let required = offset + bytes.len();
        let available = self.buffer.size() as usize;
        if required > available {
            return Err(PackError::DestinationTooSmall { required, available });
        }
        self.queue
            .write_buffer(self.buffer, offset as wgpu::BufferAddress, bytes);
        Ok(())
    }
}

/// Serializes fixed-schema records into a contiguous scratch buffer.
#[derive(Debug, Clone)]
pub struct RecordPacker {
    schema: VertexSchema,
    scratch: Vec<u8>,
    record_count: usize,
    /// Next write position.
    cursor: usize,
    /// End of the record opened by the last `begin_record`.
    record_end: usize,
}

impl RecordPacker {
    /// Create a packer for `record_count` records of `schema`.
    ///
    /// The schema is moved in, so its layout can no longer change once
    /// records are being packed.
    pub fn new(schema: VertexSchema, record_count: usize) -> Result<Self, PackError> {
        let stride = schema.stride();
        let alloc_error = PackError::Allocation {
            records: record_count,
            stride,
        };
        let len = stride
            .checked_mul(record_count)
            .ok_or_else(|| alloc_error.clone())?;

        let mut scratch = Vec::new();
        scratch.try_reserve_exact(len).map_err(|_| alloc_error)?;
        scratch.resize(len, 0);

        log::debug!(
            "record packer: {} records x {} bytes ({} bytes scratch)",
            record_count,
            stride,
            len
        );

        Ok(Self {
            schema,
            scratch,
            record_count,
            cursor: 0,
            record_end: 0,
        })
    }

    #[inline]
    pub fn schema(&self) -> &VertexSchema {
        &self.schema
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.schema.stride()
    }

    #[inline]
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Whole scratch buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.scratch
    }

    fn check_index(&self, index: usize) -> Result<(), PackError> {
        if index >= self.record_count {
            return Err(PackError::IndexOutOfRange {
                index,
                count: self.record_count,
            });
        }
        Ok(())
    }

    /// Position the cursor at the start of record `index`.
    pub fn begin_record(&mut self, index: usize) -> Result<&mut Self, PackError> {
        self.check_index(index)?;
        self.cursor = index * self.stride();
        self.record_end = self.cursor + self.stride();
        Ok(self)
    }

    /// Claim the next `width` bytes of the current record.
    fn advance(&mut self, width: usize) -> &mut [u8] {
        debug_assert!(
            self.cursor + width <= self.record_end,
            "write of {} bytes at {} runs past the record ending at {}",
            width,
            self.cursor,
            self.record_end
        );
        let start = self.cursor;
        self.cursor += width;
        &mut self.scratch[start..start + width]
    }

    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.advance(4).copy_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_i32(&mut self, value: i32) -> &mut Self {
        self.advance(4).copy_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_f32(&mut self, value: f32) -> &mut Self {
        self.advance(4).copy_from_slice(&value.to_le_bytes());
        self
    }

    /// Four color bytes in R, G, B, A order.
    pub fn write_rgba(&mut self, value: [u8; 4]) -> &mut Self {
        self.advance(4).copy_from_slice(&value);
        self
    }

    pub fn write_vec2(&mut self, value: Vec2) -> &mut Self {
        self.write_value(FieldValue::Vec2(value))
    }

    pub fn write_vec3(&mut self, value: Vec3) -> &mut Self {
        self.write_value(FieldValue::Vec3(value))
    }

    pub fn write_vec4(&mut self, value: Vec4) -> &mut Self {
        self.write_value(FieldValue::Vec4(value))
    }

    pub fn write_value(&mut self, value: FieldValue) -> &mut Self {
        let width = value.field_type().byte_width();
        value.write_le(self.advance(width));
        self
    }

    /// Packed bytes of record `index`.
    pub fn record_bytes(&self, index: usize) -> Result<&[u8], PackError> {
        self.check_index(index)?;
        let start = index * self.stride();
        Ok(&self.scratch[start..start + self.stride()])
    }

    /// Copy record `index` into `dest` at `index * stride`.
    pub fn commit_record<S>(&self, dest: &mut S, index: usize) -> Result<(), PackError>
    where
        S: VertexSink + ?Sized,
    {
        let bytes = self.record_bytes(index)?;
        dest.write_at(index * self.stride(), bytes)
    }

    /// Copy every record into `dest` in one operation.
    pub fn commit_all<S>(&self, dest: &mut S) -> Result<(), PackError>
    where
        S: VertexSink + ?Sized,
    {
        log::debug!("committing {} packed bytes", self.scratch.len());
        dest.write_at(0, &self.scratch)
    }

    /// Sequential reader over record `index`.
    pub fn reader(&self, index: usize) -> Result<RecordReader<'_>, PackError> {
        self.record_bytes(index).map(RecordReader::new)
    }

    /// Decode record `index` field by field according to the schema.
    pub fn decode_record(&self, index: usize) -> Result<Vec<(&str, FieldValue)>, PackError> {
        let bytes = self.record_bytes(index)?;
        Ok(self
            .schema
            .fields()
            .iter()
            .map(|field| {
                let value = FieldValue::read_le(field.ty, &bytes[field.offset..]);
                (field.name.as_str(), value)
            })
            .collect())
    }
}

/// Reads one packed record back in field order.
#[derive(Debug, Clone)]
pub struct RecordReader<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> RecordReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.cursor
    }

    fn take(&mut self, width: usize) -> &'a [u8] {
        let start = self.cursor;
        self.cursor += width;
        &self.bytes[start..start + width]
    }

    fn take_word(&mut self) -> [u8; 4] {
        let b = self.take(4);
        [b[0], b[1], b[2], b[3]]
    }

    pub fn read_u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take_word())
    }

    pub fn read_i32(&mut self) -> i32 {
        i32::from_le_bytes(self.take_word())
    }

    pub fn read_f32(&mut self) -> f32 {
        f32::from_le_bytes(self.take_word())
    }

    pub fn read_rgba(&mut self) -> [u8; 4] {
        self.take_word()
    }

    pub fn read_vec2(&mut self) -> Vec2 {
        Vec2::new(self.read_f32(), self.read_f32())
    }

    pub fn read_vec3(&mut self) -> Vec3 {
        Vec3::new(self.read_f32(), self.read_f32(), self.read_f32())
    }

    pub fn read_vec4(&mut self) -> Vec4 {
        Vec4::new(
            self.read_f32(),
            self.read_f32(),
            self.read_f32(),
            self.read_f32(),
        )
    }

    pub fn read_value(&mut self, ty: FieldType) -> FieldValue {
        FieldValue::read_le(ty, self.take(ty.byte_width()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;

    fn star_schema() -> VertexSchema {
        let mut schema = VertexSchema::new();
        schema.declare_attrib("color", FieldType::Unorm8x4, FieldKind::Color);
        schema.declare_attrib("position", FieldType::Float32x2, FieldKind::Position);
        schema.declare_attrib("point_size", FieldType::Float32, FieldKind::PointSize);
        schema
    }

    #[test]
    fn test_new_allocates_stride_times_count() {
        let packer = RecordPacker::new(star_schema(), 8).unwrap();
        assert_eq!(packer.stride(), 16);
        assert_eq!(packer.as_bytes().len(), 128);
        assert!(packer.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_new_rejects_overflowing_size() {
        let err = RecordPacker::new(star_schema(), usize::MAX).unwrap_err();
        assert_eq!(
            err,
            PackError::Allocation {
                records: usize::MAX,
                stride: 16
            }
        );
    }

    #[test]
    fn test_record_bytes_layout() {
        let mut packer = RecordPacker::new(star_schema(), 3).unwrap();
        packer
            .begin_record(1)
            .unwrap()
            .write_u32(0xff11_2233)
            .write_vec2(Vec2::new(1.5, -2.0))
            .write_f32(0.75);

        let bytes = packer.record_bytes(1).unwrap();
        assert_eq!(&bytes[0..4], &[0x33, 0x22, 0x11, 0xff]);
        assert_eq!(&bytes[4..8], &1.5f32.to_le_bytes());
        assert_eq!(&bytes[8..12], &(-2.0f32).to_le_bytes());
        assert_eq!(&bytes[12..16], &0.75f32.to_le_bytes());

        // neighbours untouched
        assert!(packer.record_bytes(0).unwrap().iter().all(|&b| b == 0));
        assert!(packer.record_bytes(2).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_begin_record_out_of_range() {
        let mut packer = RecordPacker::new(star_schema(), 2).unwrap();
        let err = packer.begin_record(2).unwrap_err();
        assert_eq!(err, PackError::IndexOutOfRange { index: 2, count: 2 });
        assert!(packer.record_bytes(5).is_err());
    }

    #[test]
    fn test_commit_record_writes_only_its_slot() {
        let mut packer = RecordPacker::new(star_schema(), 4).unwrap();
        packer
            .begin_record(2)
            .unwrap()
            .write_rgba([1, 2, 3, 4])
            .write_vec2(Vec2::ONE)
            .write_f32(9.0);

        let mut dest = vec![0xaa; 64];
        packer.commit_record(&mut dest, 2).unwrap();

        assert!(dest[..32].iter().all(|&b| b == 0xaa));
        assert_eq!(&dest[32..36], &[1, 2, 3, 4]);
        assert!(dest[48..].iter().all(|&b| b == 0xaa));
    }

    #[test]
    fn test_commit_record_rejects_bad_index_and_small_destination() {
        let packer = RecordPacker::new(star_schema(), 4).unwrap();

        let mut dest = vec![0u8; 64];
        assert_eq!(
            packer.commit_record(&mut dest, 4),
            Err(PackError::IndexOutOfRange { index: 4, count: 4 })
        );

        let mut short = vec![0u8; 40];
        assert_eq!(
            packer.commit_record(short.as_mut_slice(), 2),
            Err(PackError::DestinationTooSmall {
                required: 48,
                available: 40
            })
        );
    }

    #[test]
    fn test_commit_all_copies_whole_buffer() {
        let mut packer = RecordPacker::new(star_schema(), 3).unwrap();
        for i in 0..3 {
            packer
                .begin_record(i)
                .unwrap()
                .write_u32(i as u32)
                .write_vec2(Vec2::splat(i as f32))
                .write_f32(1.0);
        }

        let mut dest = vec![0u8; 48];
        packer.commit_all(&mut dest).unwrap();
        assert_eq!(dest.as_slice(), packer.as_bytes());

        let mut short = vec![0u8; 47];
        assert!(packer.commit_all(&mut short).is_err());
    }

    #[test]
    fn test_decode_record_round_trip() {
        let mut packer = RecordPacker::new(star_schema(), 1).unwrap();
        packer
            .begin_record(0)
            .unwrap()
            .write_rgba([180, 180, 197, 255])
            .write_vec2(Vec2::new(0.1, 0.2))
            .write_f32(1.25);

        let fields = packer.decode_record(0).unwrap();
        assert_eq!(
            fields,
            vec![
                ("color", FieldValue::Rgba([180, 180, 197, 255])),
                ("position", FieldValue::Vec2(Vec2::new(0.1, 0.2))),
                ("point_size", FieldValue::F32(1.25)),
            ]
        );
    }

    #[test]
    fn test_reader_reads_in_order() {
        let mut packer = RecordPacker::new(star_schema(), 1).unwrap();
        packer
            .begin_record(0)
            .unwrap()
            .write_u32(0xff00_00ff)
            .write_vec2(Vec2::new(3.0, 4.0))
            .write_f32(0.5);

        let mut reader = packer.reader(0).unwrap();
        assert_eq!(reader.read_u32(), 0xff00_00ff);
        assert_eq!(reader.read_vec2(), Vec2::new(3.0, 4.0));
        assert_eq!(reader.read_value(FieldType::Float32), FieldValue::F32(0.5));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "runs past the record")]
    fn test_overrunning_a_record_panics_in_debug() {
        let mut packer = RecordPacker::new(star_schema(), 2).unwrap();
        packer
            .begin_record(0)
            .unwrap()
            .write_vec4(Vec4::ONE)
            .write_vec2(Vec2::ONE);
    }
}
