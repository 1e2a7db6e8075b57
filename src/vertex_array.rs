//! Typed vertex record arrays.
//!
//! A [`VertexArray`] keeps the logical items alongside their packed bytes.
//! Items can be stored with an immediate single-record upload, or stored
//! silently and flushed together with [`copy_all`](VertexArray::copy_all).

use crate::error::PackError;
use crate::packer::{RecordPacker, VertexSink};
use crate::schema::VertexSchema;
use crate::VertexTrait;

/// Items of type `V`, their packer and the destination they are uploaded to.
pub struct VertexArray<V: VertexTrait, S: VertexSink = Vec<u8>> {
    items: Vec<V>,
    packer: RecordPacker,
    sink: S,
}

impl<V: VertexTrait + Default> VertexArray<V, Vec<u8>> {
    /// Array of `count` default items backed by a zeroed CPU byte buffer.
    pub fn with_buffer(count: usize) -> Result<Self, PackError> {
        let len = V::STRIDE.checked_mul(count).ok_or(PackError::Allocation {
            records: count,
            stride: V::STRIDE,
        })?;
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(len)
            .map_err(|_| PackError::Allocation {
                records: count,
                stride: V::STRIDE,
            })?;
        buffer.resize(len, 0);
        Self::new(count, buffer)
    }
}

impl<V: VertexTrait + Default, S: VertexSink> VertexArray<V, S> {
    /// Array of `count` default items uploading into `sink`.
    pub fn new(count: usize, sink: S) -> Result<Self, PackError> {
        let packer = RecordPacker::new(V::schema(), count)?;

        let mut items = Vec::new();
        items
            .try_reserve_exact(count)
            .map_err(|_| PackError::Allocation {
                records: count,
                stride: V::STRIDE,
            })?;
        items.resize_with(count, V::default);

        Ok(Self {
            items,
            packer,
            sink,
        })
    }
}

impl<V: VertexTrait, S: VertexSink> VertexArray<V, S> {
    /// Store `item` at `index`; with `copy_now` it is packed and uploaded
    /// immediately as a single record.
    pub fn set(&mut self, item: V, index: usize, copy_now: bool) -> Result<(), PackError> {
        let count = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(PackError::IndexOutOfRange { index, count })?;
        *slot = item;
        if copy_now {
            self.copy_one(index)?;
        }
        Ok(())
    }

    /// Mutate the item at `index` in place and upload it.
    pub fn update<F>(&mut self, index: usize, f: F) -> Result<(), PackError>
    where
        F: FnOnce(&mut V),
    {
        let count = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(PackError::IndexOutOfRange { index, count })?;
        f(item);
        self.copy_one(index)
    }

    fn copy_one(&mut self, index: usize) -> Result<(), PackError> {
        let item = &self.items[index];
        item.pack(self.packer.begin_record(index)?);
        self.packer.commit_record(&mut self.sink, index)
    }

    /// Pack every item and upload the whole buffer at once.
    pub fn copy_all(&mut self) -> Result<(), PackError> {
        for (index, item) in self.items.iter().enumerate() {
            item.pack(self.packer.begin_record(index)?);
        }
        self.packer.commit_all(&mut self.sink)
    }

    pub fn get(&self, index: usize) -> Option<&V> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[V] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn schema(&self) -> &VertexSchema {
        self.packer.schema()
    }

    pub fn packer(&self) -> &RecordPacker {
        &self.packer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Release the items and the destination.
    pub fn into_parts(self) -> (Vec<V>, S) {
        (self.items, self.sink)
    }
}

impl<V: VertexTrait> VertexArray<V, Vec<u8>> {
    /// Packed bytes as last uploaded.
    pub fn bytes(&self) -> &[u8] {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::TexturedVertex;
    use glam::Vec2;

    fn quad_corner(i: u32) -> TexturedVertex {
        TexturedVertex {
            color: [255, 255, 255, 255],
            position: Vec2::new(i as f32, -(i as f32)),
            tex_coord: Vec2::new(0.25 * i as f32, 1.0),
        }
    }

    #[test]
    fn test_set_without_copy_leaves_buffer_alone() {
        let mut array = VertexArray::<TexturedVertex>::with_buffer(4).unwrap();
        array.set(quad_corner(1), 1, false).unwrap();

        assert_eq!(array.get(1), Some(&quad_corner(1)));
        assert!(array.bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_set_with_copy_uploads_single_record() {
        let mut array = VertexArray::<TexturedVertex>::with_buffer(4).unwrap();
        array.set(quad_corner(2), 2, true).unwrap();

        let stride = TexturedVertex::STRIDE;
        assert_eq!(stride, 20);
        let record = &array.bytes()[2 * stride..3 * stride];
        assert_eq!(&record[0..4], &[255, 255, 255, 255]);
        assert_eq!(&record[4..8], &2.0f32.to_le_bytes());
        assert!(array.bytes()[..2 * stride].iter().all(|&b| b == 0));
        assert!(array.bytes()[3 * stride..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_copy_all_flushes_pending_items() {
        let mut array = VertexArray::<TexturedVertex>::with_buffer(3).unwrap();
        for i in 0..3 {
            array.set(quad_corner(i), i as usize, false).unwrap();
        }
        array.copy_all().unwrap();

        let (items, bytes) = array.into_parts();
        assert_eq!(items.len(), 3);
        for (i, item) in items.iter().enumerate() {
            let mut reader = crate::RecordReader::new(&bytes[i * 20..(i + 1) * 20]);
            assert_eq!(&TexturedVertex::unpack(&mut reader), item);
        }
    }

    #[test]
    fn test_update_repacks_item() {
        let mut array = VertexArray::<TexturedVertex>::with_buffer(2).unwrap();
        array.set(quad_corner(1), 0, true).unwrap();
        array
            .update(0, |v| v.position = Vec2::new(10.0, 20.0))
            .unwrap();

        assert_eq!(&array.bytes()[4..8], &10.0f32.to_le_bytes());
        assert_eq!(&array.bytes()[8..12], &20.0f32.to_le_bytes());
    }

    #[test]
    fn test_out_of_range_index() {
        let mut array = VertexArray::<TexturedVertex>::with_buffer(2).unwrap();
        assert_eq!(
            array.set(quad_corner(0), 2, true),
            Err(PackError::IndexOutOfRange { index: 2, count: 2 })
        );
        assert!(array.update(7, |_| {}).is_err());
    }
}
