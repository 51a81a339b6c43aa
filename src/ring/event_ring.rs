//! EventRing - single-producer ring buffer with a published-sequence cursor
//!
//! One producer claims slots by sequence number, writes the payload in
//! place and publishes; any number of consumers poll [`cursor`] and read
//! newly visible slots, each tracking its own read position externally.
//!
//! ## Allocation strategies
//!
//! - `with_capacity()` - standard heap allocation
//! - `new_mapped()` - memory-mapped with mlock (no page faults)
//!
//! ## Wrap-around
//!
//! Slot reuse occurs every `capacity` publishes. The ring does not gate
//! the producer against slow consumers: a consumer still holding slot
//! `S` when the producer publishes `S + capacity` races with the
//! overwrite. Size the ring so readers stay within one lap.
//!
//! [`cursor`]: EventRing::cursor

use std::ptr;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::debug;

use crate::config_error;
use crate::error::{Result, SpineError};
use crate::event::EventRecord;
use crate::ring::padding::PaddedCursor;
use crate::ring::{RingConfig, Sequence, INITIAL_CURSOR};

/// Single-producer, multi-reader ring buffer over fixed-size records.
pub struct EventRing<T: EventRecord> {
    /// Direct pointer to the slot array (no enum dispatch in hot path)
    buffer: *mut T,
    /// Number of slots (power of two)
    capacity: usize,
    /// Mask for fast index calculation
    mask: usize,
    /// Highest published sequence, `INITIAL_CURSOR` when empty
    cursor: PaddedCursor,
    /// Keep heap allocation alive (None for mmap)
    _heap: Option<Box<[T]>>,
    /// Is this mmap'd? (for Drop)
    is_mapped: bool,
}

impl<T: EventRecord> EventRing<T> {
    /// Create with heap allocation.
    ///
    /// `capacity` must be a power of two; violating that is a
    /// construction-time failure, never a runtime error path.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if !capacity.is_power_of_two() {
            return Err(config_error!("ring capacity {} is not a power of 2", capacity));
        }

        let buffer: Box<[T]> = (0..capacity)
            .map(|_| T::default())
            .collect::<Vec<_>>()
            .into_boxed_slice();

        let ptr = buffer.as_ptr() as *mut T;
        debug!(capacity, "event ring created (heap)");

        Ok(Self {
            buffer: ptr,
            capacity,
            mask: capacity - 1,
            cursor: PaddedCursor::new(INITIAL_CURSOR),
            _heap: Some(buffer),
            is_mapped: false,
        })
    }

    /// Create from a validated [`RingConfig`].
    pub fn with_config(config: &RingConfig) -> Result<Self> {
        Self::with_capacity(config.capacity)
    }

    /// Create with memory-mapped allocation (mmap + mlock).
    pub fn new_mapped(capacity: usize) -> Result<Self> {
        if !capacity.is_power_of_two() {
            return Err(config_error!("ring capacity {} is not a power of 2", capacity));
        }

        let buffer_size = capacity
            .checked_mul(std::mem::size_of::<T>())
            .ok_or_else(|| SpineError::config("Ring buffer size overflow"))?;

        let ptr = unsafe {
            let p = libc::mmap(
                ptr::null_mut(),
                buffer_size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            );

            if p == libc::MAP_FAILED {
                return Err(SpineError::system_resource("mmap failed"));
            }

            // Lock memory to prevent swapping
            let _ = libc::mlock(p, buffer_size);

            // Zero-initialize
            std::ptr::write_bytes(p as *mut u8, 0, buffer_size);

            p as *mut T
        };

        debug!(capacity, buffer_size, "event ring created (mapped)");

        Ok(Self {
            buffer: ptr,
            capacity,
            mask: capacity - 1,
            cursor: PaddedCursor::new(INITIAL_CURSOR),
            _heap: None,
            is_mapped: true,
        })
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub fn mask(&self) -> usize {
        self.mask
    }

    /// Get a mutable reference to the slot at `sequence` for in-place
    /// population. Index is `sequence & (capacity - 1)`.
    ///
    /// # Safety
    ///
    /// - Only the single producer thread may call this, and only with a
    ///   sequence it legitimately owns (`cursor() < sequence` and within
    ///   one lap of the slowest reader). A sequence the producer does
    ///   not own is a contract violation, not a recoverable error.
    /// - The returned reference must be dropped before `publish`.
    #[inline(always)]
    pub unsafe fn get(&self, sequence: Sequence) -> &mut T {
        debug_assert!(sequence >= 0, "sequence must be non-negative");
        let idx = (sequence as usize) & self.mask;
        &mut *self.buffer.add(idx)
    }

    /// Write a whole record into the slot at `sequence`.
    ///
    /// # Safety
    ///
    /// Same ownership contract as [`get`](Self::get).
    #[inline(always)]
    pub unsafe fn write(&self, sequence: Sequence, value: T) {
        debug_assert!(sequence >= 0, "sequence must be non-negative");
        let idx = (sequence as usize) & self.mask;
        std::ptr::write_volatile(self.buffer.add(idx), value);
    }

    /// Copy the record out of the slot at `sequence`.
    ///
    /// # Safety
    ///
    /// The caller must have observed `cursor() >= sequence` before the
    /// call; reading an unpublished slot returns garbage.
    #[inline(always)]
    pub unsafe fn read(&self, sequence: Sequence) -> T {
        debug_assert!(sequence >= 0, "sequence must be non-negative");
        debug_assert!(
            sequence <= self.cursor.value.load(Ordering::Relaxed),
            "read past published cursor"
        );
        let idx = (sequence as usize) & self.mask;
        std::ptr::read_volatile(self.buffer.add(idx))
    }

    /// Publish `sequence`, making the slot visible to consumers.
    ///
    /// Release store: every write the producer made through
    /// [`get`](Self::get)/[`write`](Self::write) before this call is
    /// visible to any thread that subsequently observes
    /// `cursor() >= sequence`.
    #[inline(always)]
    pub fn publish(&self, sequence: Sequence) {
        debug_assert!(
            sequence > self.cursor.value.load(Ordering::Relaxed),
            "publish must advance the cursor"
        );
        self.cursor.value.store(sequence, Ordering::Release);
    }

    /// Latest published sequence (acquire load), `INITIAL_CURSOR` when
    /// nothing has been published yet.
    #[inline(always)]
    pub fn cursor(&self) -> Sequence {
        self.cursor.value.load(Ordering::Acquire)
    }

    /// The raw cursor cell, for external coordination (wait strategies,
    /// bench loops).
    #[inline(always)]
    pub fn cursor_cell(&self) -> &AtomicI64 {
        &self.cursor.value
    }
}

impl<T: EventRecord> Drop for EventRing<T> {
    fn drop(&mut self) {
        if self.is_mapped && !self.buffer.is_null() {
            let buffer_size = self.capacity * std::mem::size_of::<T>();
            unsafe {
                libc::munmap(self.buffer as *mut libc::c_void, buffer_size);
            }
        }
        // Heap storage (_heap) is dropped automatically
    }
}

// SAFETY: the slot array is written only by the single producer, which
// synchronizes with readers through the release/acquire cursor. EventRing
// itself holds no thread-affine state.
unsafe impl<T: EventRecord> Send for EventRing<T> {}
unsafe impl<T: EventRecord> Sync for EventRing<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MarketEvent;

    #[test]
    fn test_heap_allocation() {
        let ring = EventRing::<MarketEvent>::with_capacity(1024).unwrap();
        assert_eq!(ring.capacity(), 1024);
        assert_eq!(ring.mask(), 1023);
        assert_eq!(ring.cursor(), INITIAL_CURSOR);
    }

    #[test]
    fn test_mapped_allocation() {
        let ring = EventRing::<MarketEvent>::new_mapped(1024).unwrap();
        assert_eq!(ring.capacity(), 1024);
        assert_eq!(ring.cursor(), INITIAL_CURSOR);
    }

    #[test]
    fn test_invalid_capacity() {
        assert!(EventRing::<MarketEvent>::with_capacity(1000).is_err());
        assert!(EventRing::<MarketEvent>::with_capacity(0).is_err());
        assert!(EventRing::<MarketEvent>::new_mapped(1000).is_err());
    }

    #[test]
    fn test_get_publish_cursor() {
        let ring = EventRing::<MarketEvent>::with_capacity(8).unwrap();

        for seq in 0..3i64 {
            unsafe {
                let slot = ring.get(seq);
                slot.clear();
                slot.symbol = 1;
                slot.last_price = 100.0 + seq as f64;
            }
            ring.publish(seq);
            assert_eq!(ring.cursor(), seq);
        }

        for seq in 0..3i64 {
            let event = unsafe { ring.read(seq) };
            assert_eq!(event.last_price, 100.0 + seq as f64);
        }
    }

    #[test]
    fn test_wrap_around_reuses_slots() {
        let ring = EventRing::<MarketEvent>::with_capacity(4).unwrap();

        for seq in 0..8i64 {
            unsafe {
                ring.get(seq).last_price = seq as f64;
            }
            ring.publish(seq);
        }

        // Sequences 4..8 overwrote 0..4 in place.
        for seq in 4..8i64 {
            let event = unsafe { ring.read(seq) };
            assert_eq!(event.last_price, seq as f64);
        }
        assert_eq!(ring.cursor(), 7);
    }

    #[test]
    fn test_mapped_write_read() {
        let ring = EventRing::<MarketEvent>::new_mapped(16).unwrap();

        unsafe {
            ring.write(0, MarketEvent::trade(9, 42.5, 1.0, 7));
        }
        ring.publish(0);

        let event = unsafe { ring.read(0) };
        assert_eq!(event.symbol, 9);
        assert_eq!(event.last_price, 42.5);
    }
}
