//! Fixed-capacity heap buffer for frame and blob data.
//!
//! A [`FixedCapacityBuffer<T, S>`] allocates exactly `S` elements on the heap
//! when it is created and keeps that allocation for its whole lifetime.  A
//! separate `len` records how many of the `S` slots currently hold meaningful
//! data; the rest are still initialised (to `T::default()` or whatever was
//! last written there) but are not part of the logical contents.
//!
//! # Why not a `Vec`? (for beginners)
//!
//! Depth frames arrive 30 times a second and are always the same size.  The
//! capture pipeline keeps a handful of these buffers and copies frames
//! between them with [`FixedCapacityBuffer::copy_to`].  Because both sides
//! have the same capacity (checked at compile time through the const generic
//! `S`), the copy is a single contiguous memory copy with no reallocation and
//! no length bookkeeping beyond one integer.
//!
//! # Copy contract
//!
//! `copy_to` duplicates the **entire** `S`-element backing store, not just
//! the first `len` elements, and then copies `len` verbatim.  After the copy
//! the destination's full backing store is element-for-element identical to
//! the source's.

use thiserror::Error;

use super::{DEPTH_PIXELS, MAX_BLOBS};

/// Error returned when an operation would exceed the buffer's capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("length {requested} exceeds buffer capacity {capacity}")]
pub struct CapacityError {
    /// The length that was asked for.
    pub requested: usize,
    /// The fixed capacity `S` of the buffer.
    pub capacity: usize,
}

/// Owned, contiguous, heap-allocated block of exactly `S` elements.
///
/// Invariant: `0 <= len <= S` at all times.
pub struct FixedCapacityBuffer<T, const S: usize> {
    data: Box<[T; S]>,
    len: usize,
}

/// One depth frame: 640×480 16-bit millimetre readings.
pub type DepthBuffer = FixedCapacityBuffer<u16, DEPTH_PIXELS>;

/// Per-frame list of blob ids, capped at [`MAX_BLOBS`].
pub type BlobIdBuffer = FixedCapacityBuffer<u32, MAX_BLOBS>;

impl<T: Copy + Default, const S: usize> FixedCapacityBuffer<T, S> {
    /// Allocates a buffer of `S` default-initialised elements with `len == 0`.
    pub fn new() -> Self {
        // Build on the heap directly; `Box::new([T; S])` would stage the whole
        // array on the stack first, which overflows for frame-sized `S`.
        let data: Box<[T; S]> = match vec![T::default(); S].into_boxed_slice().try_into() {
            Ok(array) => array,
            Err(_) => unreachable!("vec was allocated with exactly S elements"),
        };
        Self { data, len: 0 }
    }

    /// Copies the whole backing store and the length into `dst`.
    ///
    /// Elements beyond `self.len()` are copied too, so `dst` ends up with a
    /// backing store identical to `self`'s.
    pub fn copy_to(&self, dst: &mut Self) {
        dst.data.copy_from_slice(&self.data[..]);
        dst.len = self.len;
    }

    /// Appends `value` after the last meaningful element.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the buffer already holds `S` elements.
    pub fn push(&mut self, value: T) -> Result<(), CapacityError> {
        if self.len == S {
            return Err(CapacityError {
                requested: S + 1,
                capacity: S,
            });
        }
        self.data[self.len] = value;
        self.len += 1;
        Ok(())
    }
}

impl<T, const S: usize> FixedCapacityBuffer<T, S> {
    /// The fixed number of slots, `S`.
    pub const fn capacity(&self) -> usize {
        S
    }

    /// Number of meaningful elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when no slot is meaningful.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` when every slot is meaningful.
    pub fn is_full(&self) -> bool {
        self.len == S
    }

    /// Sets the number of meaningful elements without touching the data.
    ///
    /// Used after a producer has written directly into
    /// [`backing_mut`](Self::backing_mut).
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `len > S`; the buffer is left unchanged.
    pub fn set_len(&mut self, len: usize) -> Result<(), CapacityError> {
        if len > S {
            return Err(CapacityError {
                requested: len,
                capacity: S,
            });
        }
        self.len = len;
        Ok(())
    }

    /// Marks every slot as not meaningful.  Backing data is kept as is.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// The meaningful prefix of the backing store.
    pub fn as_slice(&self) -> &[T] {
        &self.data[..self.len]
    }

    /// Mutable view of the meaningful prefix.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data[..self.len]
    }

    /// The full `S`-element backing store, including slots past `len`.
    pub fn backing(&self) -> &[T; S] {
        &self.data
    }

    /// Mutable access to the full backing store.
    pub fn backing_mut(&mut self) -> &mut [T; S] {
        &mut self.data
    }
}

impl<T: Copy + Default, const S: usize> Default for FixedCapacityBuffer<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default, const S: usize> Clone for FixedCapacityBuffer<T, S> {
    fn clone(&self) -> Self {
        let mut copy = Self::new();
        self.copy_to(&mut copy);
        copy
    }
}

impl<T: std::fmt::Debug, const S: usize> std::fmt::Debug for FixedCapacityBuffer<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedCapacityBuffer")
            .field("capacity", &S)
            .field("len", &self.len)
            .field("items", &self.as_slice())
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
