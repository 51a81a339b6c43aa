//! Market-data event record.

use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

use crate::event::EventRecord;

/// Discriminant for market-data events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventKind {
    /// Empty / cleared slot
    #[default]
    Invalid = 0,
    /// Top-of-book quote update
    Tick = 1,
    /// Trade print
    Trade = 2,
    /// Depth update
    Depth = 3,
}

/// One cache line of market data.
///
/// Layout is fixed at compile time and padded to exactly 64 bytes so a
/// slot never straddles cache lines.
#[repr(C, align(64))]
#[derive(Debug, Clone, Copy)]
pub struct MarketEvent {
    /// Instrument identifier
    pub symbol: u32,
    /// Event discriminant
    pub kind: EventKind,
    _pad0: [u8; 3],
    /// Nanosecond timestamp assigned at production
    pub timestamp_ns: u64,
    /// Last traded price
    pub last_price: f64,
    /// Last traded quantity
    pub last_qty: f64,
    /// Best bid price
    pub bid_price: f64,
    /// Best ask price
    pub ask_price: f64,
    _pad1: [u8; 16],
}

const_assert_eq!(std::mem::size_of::<MarketEvent>(), 64);
const_assert_eq!(std::mem::align_of::<MarketEvent>(), 64);

impl Default for MarketEvent {
    fn default() -> Self {
        Self {
            symbol: 0,
            kind: EventKind::Invalid,
            _pad0: [0; 3],
            timestamp_ns: 0,
            last_price: 0.0,
            last_qty: 0.0,
            bid_price: 0.0,
            ask_price: 0.0,
            _pad1: [0; 16],
        }
    }
}

impl MarketEvent {
    /// Create a trade print for `symbol` at the given price and quantity
    #[inline(always)]
    pub fn trade(symbol: u32, price: f64, qty: f64, timestamp_ns: u64) -> Self {
        Self {
            symbol,
            kind: EventKind::Trade,
            timestamp_ns,
            last_price: price,
            last_qty: qty,
            ..Self::default()
        }
    }

    /// Create a top-of-book tick for `symbol`
    #[inline(always)]
    pub fn tick(symbol: u32, bid: f64, ask: f64, timestamp_ns: u64) -> Self {
        Self {
            symbol,
            kind: EventKind::Tick,
            timestamp_ns,
            bid_price: bid,
            ask_price: ask,
            ..Self::default()
        }
    }

    /// Mid price of the quoted spread
    #[inline(always)]
    pub fn mid_price(&self) -> f64 {
        (self.bid_price + self.ask_price) * 0.5
    }
}

impl EventRecord for MarketEvent {
    #[inline(always)]
    fn clear(&mut self) {
        *self = Self::default();
    }

    #[inline(always)]
    fn timestamp_ns(&self) -> u64 {
        self.timestamp_ns
    }

    #[inline(always)]
    fn set_timestamp_ns(&mut self, ts: u64) {
        self.timestamp_ns = ts;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_event_layout() {
        assert_eq!(std::mem::size_of::<MarketEvent>(), 64);
        assert_eq!(std::mem::align_of::<MarketEvent>(), 64);
    }

    #[test]
    fn test_default_is_canonical_empty() {
        let event = MarketEvent::default();
        assert_eq!(event.kind, EventKind::Invalid);
        assert_eq!(event.symbol, 0);
        assert_eq!(event.timestamp_ns, 0);
        assert_eq!(event.last_price, 0.0);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut event = MarketEvent::trade(7, 50_000.0, 0.25, 1_000);
        event.clear();
        assert_eq!(event.kind, EventKind::Invalid);
        assert_eq!(event.last_price, 0.0);

        event.clear();
        assert_eq!(event.kind, EventKind::Invalid);
        assert_eq!(event.timestamp_ns, 0);
    }

    #[test]
    fn test_timestamp_accessors() {
        let mut event = MarketEvent::default();
        event.set_timestamp_ns(42);
        assert_eq!(event.timestamp_ns(), 42);
    }

    #[test]
    fn test_mid_price() {
        let event = MarketEvent::tick(1, 99.0, 101.0, 0);
        assert_eq!(event.mid_price(), 100.0);
    }
}
