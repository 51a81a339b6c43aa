//! Core constants used by the ring buffer and queue implementations.

/// Default ring buffer capacity (must be power of 2)
pub const DEFAULT_RING_CAPACITY: usize = 64 * 1024;

/// Maximum ring buffer capacity
pub const MAX_RING_CAPACITY: usize = 4 * 1024 * 1024;

/// Cache line size for alignment (64 bytes on most CPUs)
pub const CACHE_LINE_SIZE: usize = 64;

/// Default consumer batch size
pub const DEFAULT_BATCH_SIZE: usize = 4096;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_capacities_are_powers_of_two() {
        assert!(DEFAULT_RING_CAPACITY.is_power_of_two());
        assert!(MAX_RING_CAPACITY.is_power_of_two());
    }

    #[test]
    fn test_cache_line_size_is_power_of_two() {
        assert!(CACHE_LINE_SIZE.is_power_of_two());
    }
}
