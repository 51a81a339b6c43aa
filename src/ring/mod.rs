//! Lock-free event transport between threads.
//!
//! | Pattern | Type | Use case |
//! |---------|------|----------|
//! | Single producer, N readers | [`EventRing<T>`] | Market-data fan-out |
//! | SPSC | [`SpscQueue<T>`] | Strategy -> dispatcher handoff |
//!
//! Both structures preallocate a power-of-two slot array and index it
//! with `sequence & (capacity - 1)`. The only inter-thread
//! synchronization points are the published cursor (ring) and the
//! head/tail indices (queue), all release-store / acquire-load pairs on
//! dedicated cache lines.
//!
//! ## Safety
//!
//! Slot access uses `unsafe` for direct memory access. Callers must
//! honor the claim/publish protocol: one producer per instance, reads
//! only behind the published cursor.

pub mod event_ring;
pub mod padding;
pub mod spsc_queue;
pub mod wait;

pub use event_ring::EventRing;
pub use spsc_queue::SpscQueue;
pub use wait::{
    BlockingWaitStrategy, BusySpinWaitStrategy, SleepingWaitStrategy, WaitStrategy,
    YieldingWaitStrategy,
};

use crate::config_error;
use crate::constants::{DEFAULT_BATCH_SIZE, DEFAULT_RING_CAPACITY, MAX_RING_CAPACITY};
use crate::error::Result;

/// Sequence number type for ring buffer positions.
///
/// Issued by the single producer: strictly increasing, contiguous,
/// never reused, never reset.
pub type Sequence = i64;

/// Cursor value of an empty ring - nothing published yet.
pub const INITIAL_CURSOR: Sequence = -1;

/// Available wait strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStrategyKind {
    /// Busy spin for lowest latency
    BusySpin,
    /// Spin then yield for balanced behavior
    Yielding,
    /// Spin, yield, then sleep for lowest CPU usage
    Sleeping,
    /// Block on a condvar, woken by the producer
    Blocking,
}

impl WaitStrategyKind {
    /// Build the corresponding strategy instance.
    pub fn strategy(&self) -> Box<dyn WaitStrategy> {
        match self {
            Self::BusySpin => Box::new(BusySpinWaitStrategy::new()),
            Self::Yielding => Box::new(YieldingWaitStrategy::new()),
            Self::Sleeping => Box::new(SleepingWaitStrategy::default_sleep()),
            Self::Blocking => Box::new(BlockingWaitStrategy::new()),
        }
    }
}

/// Configuration for ring buffer behavior
#[derive(Debug, Clone)]
pub struct RingConfig {
    /// Number of slots (must be power of 2)
    pub capacity: usize,
    /// Wait strategy for consumers that choose to wait
    pub wait_strategy: WaitStrategyKind,
    /// Batch size hint for draining consumers
    pub batch_size: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_RING_CAPACITY,
            wait_strategy: WaitStrategyKind::BusySpin,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl RingConfig {
    /// Create a new configuration with the specified capacity
    pub fn new(capacity: usize) -> Result<Self> {
        if !capacity.is_power_of_two() {
            return Err(config_error!("ring capacity {} is not a power of 2", capacity));
        }
        if capacity > MAX_RING_CAPACITY {
            return Err(config_error!(
                "ring capacity {} exceeds maximum {}",
                capacity,
                MAX_RING_CAPACITY
            ));
        }

        Ok(Self {
            capacity,
            ..Default::default()
        })
    }

    /// Set the wait strategy
    pub fn with_wait_strategy(mut self, kind: WaitStrategyKind) -> Self {
        self.wait_strategy = kind;
        self
    }

    /// Set the consumer batch size hint
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}
