//! Monotonic nanosecond clock for event timestamps.
//!
//! Wall time is read once at first use; after that the clock advances by
//! a monotonic `Instant` delta, so timestamps never go backwards even
//! when NTP steps the system clock.

use std::sync::OnceLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

struct Anchor {
    wall_ns: u64,
    instant: Instant,
}

static ANCHOR: OnceLock<Anchor> = OnceLock::new();

/// Current time in nanoseconds since the UNIX epoch, monotonic.
#[inline]
pub fn now_nanos() -> u64 {
    let anchor = ANCHOR.get_or_init(|| Anchor {
        wall_ns: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64,
        instant: Instant::now(),
    });
    anchor.wall_ns + anchor.instant.elapsed().as_nanos() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_nanos_is_monotonic() {
        let a = now_nanos();
        let b = now_nanos();
        let c = now_nanos();
        assert!(a <= b);
        assert!(b <= c);
    }

    #[test]
    fn test_now_nanos_is_epoch_based() {
        // Anything after 2020-01-01 in nanoseconds.
        assert!(now_nanos() > 1_577_836_800_000_000_000);
    }
}
