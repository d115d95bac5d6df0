//! Fixed-capacity segment with independent read and write cursors.

use crate::error::{copy_checked, BufferError};

/// A fixed-size byte block, the unit of allocation of a [`ChainedBuffer`].
///
/// Bytes are appended at the write cursor and consumed at the read cursor.
/// Neither cursor ever moves backwards, so a segment is used exactly once:
/// it fills up, drains, and is then dropped by its owner.
///
/// Invariant: `read_offset <= write_offset <= capacity`.
///
/// [`ChainedBuffer`]: crate::ChainedBuffer
#[derive(Debug)]
pub struct Segment {
    storage: Box<[u8]>,
    read_offset: usize,
    write_offset: usize,
}

impl Segment {
    /// Creates an empty, zero-filled segment.
    pub fn new(capacity: usize) -> Self {
        Segment {
            storage: vec![0u8; capacity].into_boxed_slice(),
            read_offset: 0,
            write_offset: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn read_offset(&self) -> usize {
        self.read_offset
    }

    pub fn write_offset(&self) -> usize {
        self.write_offset
    }

    /// Bytes written but not yet read.
    pub fn readable(&self) -> usize {
        self.write_offset - self.read_offset
    }

    /// Bytes that can still be written.
    pub fn writable(&self) -> usize {
        self.capacity() - self.write_offset
    }

    /// Reads buffered bytes into `dest`.
    ///
    /// Returns the number of bytes copied, which is `Ok(0)` when the reader
    /// has caught up with the writer inside this segment.
    pub fn read(&mut self, dest: &mut [u8]) -> Result<usize, BufferError> {
        if dest.is_empty() {
            return Err(BufferError::InvalidArgument);
        }
        if self.read_offset == self.write_offset {
            return Ok(0);
        }

        let n = dest.len().min(self.readable());
        let src = &self.storage[self.read_offset..self.read_offset + n];
        let copied = copy_checked(dest, src)?;
        self.read_offset += copied;
        Ok(copied)
    }

    /// Writes as much of `src` as fits.
    ///
    /// Returns the number of bytes copied, which is `Ok(0)` when the segment
    /// is full and a new one is needed.
    pub fn write(&mut self, src: &[u8]) -> Result<usize, BufferError> {
        if src.is_empty() {
            return Err(BufferError::InvalidArgument);
        }
        if self.write_offset == self.capacity() {
            return Ok(0);
        }

        let n = src.len().min(self.writable());
        let copied = copy_checked(&mut self.storage[self.write_offset..], &src[..n])?;
        self.write_offset += copied;
        Ok(copied)
    }

    /// Returns true if the segment is fully written.
    pub fn needs_new_write_segment(&self) -> bool {
        self.write_offset == self.capacity()
    }

    /// Returns true if the segment is fully drained and can be reclaimed.
    pub fn needs_new_read_segment(&self) -> bool {
        self.read_offset == self.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let seg = Segment::new(8);
        assert_eq!(seg.capacity(), 8);
        assert_eq!(seg.readable(), 0);
        assert_eq!(seg.writable(), 8);
        assert!(!seg.needs_new_write_segment());
        assert!(!seg.needs_new_read_segment());
    }

    #[test]
    fn test_basic_write_read() {
        let mut seg = Segment::new(8);
        assert_eq!(seg.write(&[1, 2, 3]).unwrap(), 3);

        let mut data = [0u8; 3];
        assert_eq!(seg.read(&mut data).unwrap(), 3);
        assert_eq!(data, [1, 2, 3]);
        assert_eq!(seg.read_offset(), 3);
        assert_eq!(seg.write_offset(), 3);
    }

    #[test]
    fn test_write_truncates_to_free_space() {
        let mut seg = Segment::new(4);
        assert_eq!(seg.write(&[1, 2, 3, 4, 5, 6]).unwrap(), 4);
        assert!(seg.needs_new_write_segment());

        // Full segment accepts nothing more
        assert_eq!(seg.write(&[7]).unwrap(), 0);
    }

    #[test]
    fn test_read_caught_up_returns_zero() {
        let mut seg = Segment::new(4);
        let mut data = [0u8; 4];
        assert_eq!(seg.read(&mut data).unwrap(), 0);

        seg.write(&[1, 2]).unwrap();
        assert_eq!(seg.read(&mut data).unwrap(), 2);
        assert_eq!(seg.read(&mut data).unwrap(), 0);
        // Drained but not full, so not reclaimable yet
        assert!(!seg.needs_new_read_segment());
    }

    #[test]
    fn test_partial_reads() {
        let mut seg = Segment::new(6);
        seg.write(&[1, 2, 3, 4, 5, 6]).unwrap();

        let mut data = [0u8; 4];
        assert_eq!(seg.read(&mut data).unwrap(), 4);
        assert_eq!(data, [1, 2, 3, 4]);
        assert_eq!(seg.read(&mut data).unwrap(), 2);
        assert_eq!(&data[..2], &[5, 6]);
        assert!(seg.needs_new_read_segment());
    }

    #[test]
    fn test_empty_span_is_invalid() {
        let mut seg = Segment::new(4);
        assert_eq!(seg.write(&[]), Err(BufferError::InvalidArgument));
        assert_eq!(seg.read(&mut []), Err(BufferError::InvalidArgument));
    }

    #[test]
    fn test_zero_capacity_segment() {
        let mut seg = Segment::new(0);
        assert!(seg.needs_new_write_segment());
        assert!(seg.needs_new_read_segment());
        assert_eq!(seg.write(&[1]).unwrap(), 0);
    }
}
