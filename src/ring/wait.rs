//! Wait strategies for consumers polling a ring cursor.
//!
//! The core never blocks; callers that want to wait for new data layer
//! one of these strategies on top of [`EventRing::cursor_cell`]. Each
//! strategy trades latency against CPU usage.
//!
//! [`EventRing::cursor_cell`]: crate::ring::EventRing::cursor_cell

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::thread;
use std::time::Duration;

use crate::error::{Result, SpineError};
use crate::ring::Sequence;

/// Trait for strategies that wait until a sequence has been published.
pub trait WaitStrategy: Send + Sync {
    /// Wait until `cursor >= sequence`.
    ///
    /// Returns the observed cursor value (the caller may find more than
    /// one new sequence available), or [`SpineError::Shutdown`] once
    /// `running` goes false.
    fn wait_for(
        &self,
        sequence: Sequence,
        cursor: &AtomicI64,
        running: &AtomicBool,
    ) -> Result<Sequence>;

    /// Signal waiting consumers that new data is available.
    fn signal_all_when_blocking(&self);
}

/// Busy spin - lowest latency, burns a full core while waiting.
pub struct BusySpinWaitStrategy;

impl BusySpinWaitStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BusySpinWaitStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitStrategy for BusySpinWaitStrategy {
    fn wait_for(
        &self,
        sequence: Sequence,
        cursor: &AtomicI64,
        running: &AtomicBool,
    ) -> Result<Sequence> {
        loop {
            let available = cursor.load(Ordering::Acquire);
            if available >= sequence {
                return Ok(available);
            }
            if !running.load(Ordering::Acquire) {
                return Err(SpineError::Shutdown);
            }
            std::hint::spin_loop();
        }
    }

    fn signal_all_when_blocking(&self) {
        // No-op - no blocked threads to signal
    }
}

/// Spin briefly, then yield to other threads. A reasonable default when
/// consumers share cores with other work.
pub struct YieldingWaitStrategy {
    spin_tries: usize,
}

impl YieldingWaitStrategy {
    pub fn new() -> Self {
        Self { spin_tries: 100 }
    }

    pub fn with_spin_tries(spin_tries: usize) -> Self {
        Self { spin_tries }
    }
}

impl Default for YieldingWaitStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitStrategy for YieldingWaitStrategy {
    fn wait_for(
        &self,
        sequence: Sequence,
        cursor: &AtomicI64,
        running: &AtomicBool,
    ) -> Result<Sequence> {
        let mut counter = 0usize;
        loop {
            let available = cursor.load(Ordering::Acquire);
            if available >= sequence {
                return Ok(available);
            }
            if !running.load(Ordering::Acquire) {
                return Err(SpineError::Shutdown);
            }

            if counter < self.spin_tries {
                std::hint::spin_loop();
                counter += 1;
            } else {
                thread::yield_now();
            }
        }
    }

    fn signal_all_when_blocking(&self) {
        // No-op - threads wake up on their own
    }
}

/// Spin, yield, then sleep. Lowest CPU usage, highest latency.
pub struct SleepingWaitStrategy {
    spin_tries: usize,
    yield_tries: usize,
    sleep_duration: Duration,
}

impl SleepingWaitStrategy {
    pub fn new(sleep_duration: Duration) -> Self {
        Self {
            spin_tries: 100,
            yield_tries: 10,
            sleep_duration,
        }
    }

    /// Default sleep of 100 microseconds.
    pub fn default_sleep() -> Self {
        Self::new(Duration::from_micros(100))
    }
}

impl Default for SleepingWaitStrategy {
    fn default() -> Self {
        Self::default_sleep()
    }
}

impl WaitStrategy for SleepingWaitStrategy {
    fn wait_for(
        &self,
        sequence: Sequence,
        cursor: &AtomicI64,
        running: &AtomicBool,
    ) -> Result<Sequence> {
        let mut counter = 0usize;
        loop {
            let available = cursor.load(Ordering::Acquire);
            if available >= sequence {
                return Ok(available);
            }
            if !running.load(Ordering::Acquire) {
                return Err(SpineError::Shutdown);
            }

            if counter < self.spin_tries {
                std::hint::spin_loop();
            } else if counter < self.spin_tries + self.yield_tries {
                thread::yield_now();
            } else {
                thread::sleep(self.sleep_duration);
            }
            counter += 1;
        }
    }

    fn signal_all_when_blocking(&self) {
        // No-op - threads wake up on their own
    }
}

/// Block on a condvar with a timed wait. The producer must call
/// [`signal_all_when_blocking`] after publishing.
///
/// [`signal_all_when_blocking`]: WaitStrategy::signal_all_when_blocking
pub struct BlockingWaitStrategy {
    mutex: parking_lot::Mutex<()>,
    condition: parking_lot::Condvar,
}

impl BlockingWaitStrategy {
    pub fn new() -> Self {
        Self {
            mutex: parking_lot::Mutex::new(()),
            condition: parking_lot::Condvar::new(),
        }
    }
}

impl Default for BlockingWaitStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitStrategy for BlockingWaitStrategy {
    fn wait_for(
        &self,
        sequence: Sequence,
        cursor: &AtomicI64,
        running: &AtomicBool,
    ) -> Result<Sequence> {
        // Spin first for the common fast case.
        for _ in 0..100 {
            let available = cursor.load(Ordering::Acquire);
            if available >= sequence {
                return Ok(available);
            }
            std::hint::spin_loop();
        }

        let timeout = Duration::from_micros(100);
        loop {
            let available = cursor.load(Ordering::Acquire);
            if available >= sequence {
                return Ok(available);
            }
            if !running.load(Ordering::Acquire) {
                return Err(SpineError::Shutdown);
            }

            let mut guard = self.mutex.lock();
            // Re-check under the lock so a signal between the load and
            // the wait is not lost; the timed wait covers the rest.
            if cursor.load(Ordering::Acquire) >= sequence {
                return Ok(cursor.load(Ordering::Acquire));
            }
            let _ = self.condition.wait_for(&mut guard, timeout);
        }
    }

    fn signal_all_when_blocking(&self) {
        self.condition.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_busy_spin_returns_available_sequence() {
        let strategy = BusySpinWaitStrategy::new();
        let cursor = AtomicI64::new(5);
        let running = AtomicBool::new(true);

        let result = strategy.wait_for(3, &cursor, &running).unwrap();
        assert!(result >= 3);
        assert_eq!(result, 5);
    }

    #[test]
    fn test_shutdown_while_waiting() {
        let strategy = BusySpinWaitStrategy::new();
        let cursor = AtomicI64::new(-1);
        let running = AtomicBool::new(false);

        let result = strategy.wait_for(0, &cursor, &running);
        assert!(matches!(result, Err(SpineError::Shutdown)));
    }

    #[test]
    fn test_yielding_sees_concurrent_publish() {
        let strategy = YieldingWaitStrategy::new();
        let cursor = Arc::new(AtomicI64::new(-1));
        let running = AtomicBool::new(true);

        let cursor_pub = cursor.clone();
        let publisher = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(5));
            cursor_pub.store(10, Ordering::Release);
        });

        let result = strategy.wait_for(10, &cursor, &running).unwrap();
        assert_eq!(result, 10);
        publisher.join().unwrap();
    }

    #[test]
    fn test_blocking_wakes_on_signal() {
        let strategy = Arc::new(BlockingWaitStrategy::new());
        let cursor = Arc::new(AtomicI64::new(-1));
        let running = AtomicBool::new(true);

        let strategy_pub = strategy.clone();
        let cursor_pub = cursor.clone();
        let publisher = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(5));
            cursor_pub.store(0, Ordering::Release);
            strategy_pub.signal_all_when_blocking();
        });

        let result = strategy.wait_for(0, &cursor, &running).unwrap();
        assert_eq!(result, 0);
        publisher.join().unwrap();
    }

    #[test]
    fn test_sleeping_returns_when_already_available() {
        let strategy = SleepingWaitStrategy::default_sleep();
        let cursor = AtomicI64::new(0);
        let running = AtomicBool::new(true);

        let result = strategy.wait_for(0, &cursor, &running).unwrap();
        assert_eq!(result, 0);
    }
}
