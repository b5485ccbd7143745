//! Bounds-checked typed views over module memory.
//!
//! Integers are encoded as 4-byte little-endian `i32`s, contiguous and
//! unpadded, matching the wasm32 memory layout. A view validates its
//! byte range once at construction; element accessors then only check
//! the element index.

use micro_core::{MemoryError, Ptr, INT_SIZE};

use crate::memory::checked_range;

/// Decode one little-endian `i32` from exactly four bytes.
fn decode(chunk: &[u8]) -> i32 {
    let mut raw = [0u8; INT_SIZE as usize];
    raw.copy_from_slice(chunk);
    i32::from_le_bytes(raw)
}

/// Byte length of `count` encoded integers.
pub fn byte_len(count: u32) -> u64 {
    count as u64 * INT_SIZE as u64
}

/// Read-only view of `count` encoded integers.
#[derive(Clone, Copy, Debug)]
pub struct I32View<'a> {
    ptr: Ptr,
    bytes: &'a [u8],
}

impl<'a> I32View<'a> {
    /// View `count` integers starting at `ptr` in `memory`.
    pub fn new(memory: &'a [u8], ptr: Ptr, count: u32) -> Result<Self, MemoryError> {
        let range = checked_range(memory.len(), ptr, byte_len(count))?;
        Ok(Self {
            ptr,
            bytes: &memory[range],
        })
    }

    /// Start offset of the view.
    pub fn ptr(&self) -> Ptr {
        self.ptr
    }

    /// Number of integers in the view.
    pub fn len(&self) -> u32 {
        (self.bytes.len() / INT_SIZE as usize) as u32
    }

    /// Whether the view holds no integers.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The integer at `index`, or `None` past the end.
    pub fn get(&self, index: u32) -> Option<i32> {
        let start = index as usize * INT_SIZE as usize;
        self.bytes
            .get(start..start + INT_SIZE as usize)
            .map(decode)
    }

    /// Iterate over the integers in order.
    pub fn iter(&self) -> impl Iterator<Item = i32> + 'a {
        let bytes: &'a [u8] = self.bytes;
        bytes.chunks_exact(INT_SIZE as usize).map(decode)
    }

    /// Copy the integers out.
    pub fn to_vec(&self) -> Vec<i32> {
        self.iter().collect()
    }

    /// Wrapping sum of the integers.
    pub fn wrapping_sum(&self) -> i32 {
        self.iter().fold(0i32, i32::wrapping_add)
    }
}

/// Mutable view of `count` encoded integers.
#[derive(Debug)]
pub struct I32ViewMut<'a> {
    ptr: Ptr,
    bytes: &'a mut [u8],
}

impl<'a> I32ViewMut<'a> {
    /// Mutable view of `count` integers starting at `ptr` in `memory`.
    pub fn new(memory: &'a mut [u8], ptr: Ptr, count: u32) -> Result<Self, MemoryError> {
        let range = checked_range(memory.len(), ptr, byte_len(count))?;
        Ok(Self {
            ptr,
            bytes: &mut memory[range],
        })
    }

    /// Number of integers in the view.
    pub fn len(&self) -> u32 {
        (self.bytes.len() / INT_SIZE as usize) as u32
    }

    /// Whether the view holds no integers.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Overwrite the integer at `index`.
    pub fn set(&mut self, index: u32, value: i32) -> Result<(), MemoryError> {
        let len = self.len();
        if index >= len {
            return Err(MemoryError::IndexOutOfRange { index, len });
        }
        let start = index as usize * INT_SIZE as usize;
        self.bytes[start..start + INT_SIZE as usize].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Overwrite the whole view with `values`, in order.
    ///
    /// `values.len()` must equal the view's length.
    pub fn copy_from_slice(&mut self, values: &[i32]) -> Result<(), MemoryError> {
        if values.len() != self.len() as usize {
            return Err(MemoryError::LengthMismatch {
                expected: self.len(),
                actual: values.len(),
            });
        }
        for (chunk, value) in self.bytes.chunks_exact_mut(INT_SIZE as usize).zip(values) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        Ok(())
    }

    /// Reborrow as a read-only view.
    pub fn as_view(&self) -> I32View<'_> {
        I32View {
            ptr: self.ptr,
            bytes: &*self.bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_little_endian_and_unpadded() {
        let mut memory = vec![0u8; 32];
        let mut view = I32ViewMut::new(&mut memory, Ptr(8), 2).unwrap();
        view.copy_from_slice(&[1, -2]).unwrap();
        assert_eq!(&memory[8..16], &[1, 0, 0, 0, 0xfe, 0xff, 0xff, 0xff]);
        assert!(memory[..8].iter().chain(&memory[16..]).all(|&b| b == 0));
    }

    #[test]
    fn read_back_matches_written() {
        let mut memory = vec![0u8; 64];
        let values = [1, 2, 3, i32::MIN, i32::MAX];
        I32ViewMut::new(&mut memory, Ptr(4), 5)
            .unwrap()
            .copy_from_slice(&values)
            .unwrap();
        let view = I32View::new(&memory, Ptr(4), 5).unwrap();
        assert_eq!(view.to_vec(), values);
        assert_eq!(view.get(3), Some(i32::MIN));
        assert_eq!(view.get(5), None);
    }

    #[test]
    fn view_past_end_is_rejected() {
        let memory = vec![0u8; 16];
        assert!(I32View::new(&memory, Ptr(4), 3).is_ok());
        assert!(matches!(
            I32View::new(&memory, Ptr(8), 3),
            Err(MemoryError::OutOfBounds { len: 12, .. })
        ));
    }

    #[test]
    fn empty_view_is_valid_anywhere_inside() {
        let memory = vec![0u8; 16];
        let view = I32View::new(&memory, Ptr(16), 0).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.wrapping_sum(), 0);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let mut memory = vec![0u8; 16];
        let mut view = I32ViewMut::new(&mut memory, Ptr(0), 3).unwrap();
        assert_eq!(
            view.copy_from_slice(&[1, 2]),
            Err(MemoryError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn set_is_index_checked() {
        let mut memory = vec![0u8; 16];
        let mut view = I32ViewMut::new(&mut memory, Ptr(0), 2).unwrap();
        view.set(1, 7).unwrap();
        assert_eq!(
            view.set(2, 7),
            Err(MemoryError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            view.set(u32::MAX, 7),
            Err(MemoryError::IndexOutOfRange {
                index: u32::MAX,
                len: 2
            })
        );
        assert_eq!(view.as_view().to_vec(), vec![0, 7]);
    }

    #[test]
    fn wrapping_sum_wraps() {
        let mut memory = vec![0u8; 8];
        I32ViewMut::new(&mut memory, Ptr(0), 2)
            .unwrap()
            .copy_from_slice(&[i32::MAX, 1])
            .unwrap();
        let view = I32View::new(&memory, Ptr(0), 2).unwrap();
        assert_eq!(view.wrapping_sum(), i32::MIN);
    }
}
