//! SpscQueue - bounded single-producer single-consumer queue
//!
//! Point-to-point handoff (e.g. order requests flowing from strategy
//! logic to a dispatcher). Tail is advanced only by the producer after
//! a successful push, head only by the consumer after a successful pop;
//! both live on their own padded cache lines.
//!
//! `try_push` and `try_pop` never wait. Full and empty are ordinary
//! outcomes, not errors.

use std::sync::atomic::Ordering;
use tracing::debug;

use crate::config_error;
use crate::error::Result;
use crate::event::EventRecord;
use crate::ring::padding::PaddedIndex;

/// Bounded SPSC queue over fixed-size records.
pub struct SpscQueue<T: EventRecord> {
    /// Direct pointer to the cell array
    buffer: *mut T,
    /// Number of cells (power of two)
    capacity: usize,
    /// Mask for fast index calculation
    mask: usize,
    /// Next cell to read; written only by the consumer
    head: PaddedIndex,
    /// Next cell to write; written only by the producer
    tail: PaddedIndex,
    /// Keep the allocation alive
    _heap: Box<[T]>,
}

impl<T: EventRecord> SpscQueue<T> {
    /// Create a queue with the given power-of-two capacity.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if !capacity.is_power_of_two() {
            return Err(config_error!("queue capacity {} is not a power of 2", capacity));
        }

        let buffer: Box<[T]> = (0..capacity)
            .map(|_| T::default())
            .collect::<Vec<_>>()
            .into_boxed_slice();

        let ptr = buffer.as_ptr() as *mut T;
        debug!(capacity, "spsc queue created");

        Ok(Self {
            buffer: ptr,
            capacity,
            mask: capacity - 1,
            head: PaddedIndex::new(0),
            tail: PaddedIndex::new(0),
            _heap: buffer,
        })
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy `item` into the queue. Returns `false` (with no state
    /// change) when the queue already holds `capacity` unconsumed items.
    ///
    /// Producer thread only.
    #[inline(always)]
    pub fn try_push(&self, item: T) -> bool {
        let tail = self.tail.value.load(Ordering::Relaxed);
        // Acquire pairs with the consumer's release on head: the cell we
        // are about to overwrite has really been read out.
        let head = self.head.value.load(Ordering::Acquire);

        if tail.wrapping_sub(head) >= self.capacity as u64 {
            return false;
        }

        unsafe {
            let idx = (tail as usize) & self.mask;
            std::ptr::write_volatile(self.buffer.add(idx), item);
        }

        self.tail.value.store(tail.wrapping_add(1), Ordering::Release);
        true
    }

    /// Copy out the oldest item, or `None` (with no state change) when
    /// the queue is empty.
    ///
    /// Consumer thread only.
    #[inline(always)]
    pub fn try_pop(&self) -> Option<T> {
        let head = self.head.value.load(Ordering::Relaxed);
        // Acquire pairs with the producer's release on tail: the cell's
        // payload is fully written before we copy it out.
        let tail = self.tail.value.load(Ordering::Acquire);

        if head == tail {
            return None;
        }

        let item = unsafe {
            let idx = (head as usize) & self.mask;
            std::ptr::read_volatile(self.buffer.add(idx))
        };

        self.head.value.store(head.wrapping_add(1), Ordering::Release);
        Some(item)
    }

    /// Number of unconsumed items at the time of the call.
    ///
    /// Under concurrent producer/consumer activity this is a snapshot,
    /// not a synchronization point.
    #[inline(always)]
    pub fn len(&self) -> usize {
        // Head is read first: head never passes tail, so a later tail
        // read can only overcount, never underflow.
        let head = self.head.value.load(Ordering::Relaxed);
        let tail = self.tail.value.load(Ordering::Relaxed);
        tail.wrapping_sub(head) as usize
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// SAFETY: cells are handed off between exactly one producer and one
// consumer through the release/acquire tail and head indices.
unsafe impl<T: EventRecord> Send for SpscQueue<T> {}
unsafe impl<T: EventRecord> Sync for SpscQueue<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{OrderRequest, Side};

    #[test]
    fn test_invalid_capacity() {
        assert!(SpscQueue::<OrderRequest>::with_capacity(100).is_err());
        assert!(SpscQueue::<OrderRequest>::with_capacity(0).is_err());
    }

    #[test]
    fn test_push_pop_fifo() {
        let queue = SpscQueue::<OrderRequest>::with_capacity(8).unwrap();

        for i in 0..5u64 {
            let order = OrderRequest::limit(i, 1, Side::Buy, 100.0 + i as f64, 1.0, 0);
            assert!(queue.try_push(order));
        }
        assert_eq!(queue.len(), 5);

        for i in 0..5u64 {
            let order = queue.try_pop().unwrap();
            assert_eq!(order.order_id, i);
            assert_eq!(order.price, 100.0 + i as f64);
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_full_push_fails_without_corruption() {
        let queue = SpscQueue::<OrderRequest>::with_capacity(4).unwrap();

        for i in 0..4u64 {
            assert!(queue.try_push(OrderRequest::limit(i, 1, Side::Sell, 1.0, 1.0, 0)));
        }
        assert!(!queue.try_push(OrderRequest::default()));
        assert_eq!(queue.len(), 4);

        // Contents are intact and still FIFO.
        for i in 0..4u64 {
            assert_eq!(queue.try_pop().unwrap().order_id, i);
        }
    }

    #[test]
    fn test_empty_pop_fails_without_state_change() {
        let queue = SpscQueue::<OrderRequest>::with_capacity(4).unwrap();
        assert!(queue.try_pop().is_none());
        assert_eq!(queue.len(), 0);

        assert!(queue.try_push(OrderRequest::default()));
        assert!(queue.try_pop().is_some());
        assert!(queue.try_pop().is_none());
    }

    #[test]
    fn test_wrap_around_reuse() {
        let queue = SpscQueue::<OrderRequest>::with_capacity(4).unwrap();

        // Cycle many times through the fixed storage.
        for round in 0..10u64 {
            for i in 0..3u64 {
                let id = round * 3 + i;
                assert!(queue.try_push(OrderRequest::limit(id, 1, Side::Buy, 1.0, 1.0, 0)));
            }
            for i in 0..3u64 {
                assert_eq!(queue.try_pop().unwrap().order_id, round * 3 + i);
            }
        }
        assert!(queue.is_empty());
    }
}
