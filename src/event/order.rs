//! Order-request record for strategy -> dispatcher handoff.

use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

use crate::event::EventRecord;

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// Empty / cleared slot
    #[default]
    None = 0,
    Buy = 1,
    Sell = 2,
}

/// One cache line describing an order request.
///
/// Fixed 64-byte layout, same slot discipline as [`MarketEvent`]:
/// preallocated, reused, never heap-allocated per order.
///
/// [`MarketEvent`]: crate::event::MarketEvent
#[repr(C, align(64))]
#[derive(Debug, Clone, Copy)]
pub struct OrderRequest {
    /// Caller-assigned order identifier
    pub order_id: u64,
    /// Instrument identifier
    pub symbol: u32,
    /// Buy or sell
    pub side: Side,
    _pad0: [u8; 3],
    /// Limit price
    pub price: f64,
    /// Order quantity
    pub quantity: f64,
    /// Nanosecond timestamp assigned at production
    pub timestamp_ns: u64,
    _pad1: [u8; 24],
}

const_assert_eq!(std::mem::size_of::<OrderRequest>(), 64);
const_assert_eq!(std::mem::align_of::<OrderRequest>(), 64);

impl Default for OrderRequest {
    fn default() -> Self {
        Self {
            order_id: 0,
            symbol: 0,
            side: Side::None,
            _pad0: [0; 3],
            price: 0.0,
            quantity: 0.0,
            timestamp_ns: 0,
            _pad1: [0; 24],
        }
    }
}

impl OrderRequest {
    /// Create a limit order request
    #[inline(always)]
    pub fn limit(
        order_id: u64,
        symbol: u32,
        side: Side,
        price: f64,
        quantity: f64,
        timestamp_ns: u64,
    ) -> Self {
        Self {
            order_id,
            symbol,
            side,
            price,
            quantity,
            timestamp_ns,
            ..Self::default()
        }
    }

    #[inline(always)]
    pub fn is_buy(&self) -> bool {
        self.side == Side::Buy
    }
}

impl EventRecord for OrderRequest {
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
