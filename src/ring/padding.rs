//! Cache-line padded atomic cells.
//!
//! The publish cursor and the queue's head/tail indices are written by
//! different threads. Each cell is padded to 128 bytes (two cache lines,
//! matching CPUs that prefetch line pairs) so a store to one never
//! invalidates the line backing another thread's hot-path load.

use std::sync::atomic::{AtomicI64, AtomicU64};

/// Cache-line padded publish cursor.
#[repr(align(128))]
pub struct PaddedCursor {
    pub value: AtomicI64,
    _padding: [u8; 120],
}

impl PaddedCursor {
    pub fn new(initial: i64) -> Self {
        Self {
            value: AtomicI64::new(initial),
            _padding: [0; 120],
        }
    }
}

/// Cache-line padded queue index (head or tail).
#[repr(align(128))]
pub struct PaddedIndex {
    pub value: AtomicU64,
    _padding: [u8; 120],
}

impl PaddedIndex {
    pub fn new(initial: u64) -> Self {
        Self {
            value: AtomicU64::new(initial),
            _padding: [0; 120],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_cells_span_full_lines() {
        use crate::constants::CACHE_LINE_SIZE;

        assert_eq!(std::mem::size_of::<PaddedCursor>(), 2 * CACHE_LINE_SIZE);
        assert_eq!(std::mem::align_of::<PaddedCursor>(), 2 * CACHE_LINE_SIZE);
        assert_eq!(std::mem::size_of::<PaddedIndex>(), 2 * CACHE_LINE_SIZE);
        assert_eq!(std::mem::align_of::<PaddedIndex>(), 2 * CACHE_LINE_SIZE);
    }
}
