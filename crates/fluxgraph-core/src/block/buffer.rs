//! Move-only buffer handle.
//!
//! A [`BufferHandle`] is an owned view over a contiguous heap
//! allocation with a read offset and a mutable logical length. It is
//! deliberately not `Clone`: transferring a buffer downstream moves
//! the handle, so the type system forbids the previous owner from
//! touching the bytes after the hand-off.

use thiserror::Error;

/// Buffer invariant violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Requested logical length exceeds the physical span.
    #[error("requested length {requested} exceeds actual length {actual}")]
    LengthExceedsCapacity {
        /// Requested logical length in bytes.
        requested: usize,
        /// Physical bytes available behind the view.
        actual: usize,
    },
    /// Advance past the current logical length.
    #[error("cannot advance {advance} bytes past logical length {length}")]
    AdvancePastLength {
        /// Bytes the caller tried to advance by.
        advance: usize,
        /// Current logical length in bytes.
        length: usize,
    },
}

/// Owned, relocatable view over a contiguous byte range.
///
/// Invariant: `len() <= actual_len()` at all times.
#[derive(Debug)]
pub struct BufferHandle {
    storage: Box<[u8]>,
    offset: usize,
    length: usize,
}

impl BufferHandle {
    /// Wraps an existing allocation; the view spans the whole slice.
    pub fn new(storage: Box<[u8]>) -> Self {
        let length = storage.len();
        Self {
            storage,
            offset: 0,
            length,
        }
    }

    /// Allocates a zeroed buffer of exactly `bytes` bytes.
    pub fn zeroed(bytes: usize) -> Self {
        Self::new(vec![0u8; bytes].into_boxed_slice())
    }

    /// Current logical length in bytes.
    pub fn len(&self) -> usize {
        self.length
    }

    /// True when the logical view is empty.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Physical bytes available from the current offset.
    pub fn actual_len(&self) -> usize {
        self.storage.len() - self.offset
    }

    /// Sets the requested logical length.
    pub fn set_len(&mut self, bytes: usize) -> Result<(), BufferError> {
        if bytes > self.actual_len() {
            return Err(BufferError::LengthExceedsCapacity {
                requested: bytes,
                actual: self.actual_len(),
            });
        }
        self.length = bytes;
        Ok(())
    }

    /// Advances the view past `bytes` consumed bytes.
    pub fn advance(&mut self, bytes: usize) -> Result<(), BufferError> {
        if bytes > self.length {
            return Err(BufferError::AdvancePastLength {
                advance: bytes,
                length: self.length,
            });
        }
        self.offset += bytes;
        self.length -= bytes;
        Ok(())
    }

    /// The logical byte range.
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[self.offset..self.offset + self.length]
    }

    /// Mutable access to the logical byte range.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.storage[self.offset..self.offset + self.length]
    }
}
