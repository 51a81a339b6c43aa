//! Capability interfaces for the external producers and consumers that
//! feed the backbone.
//!
//! Exchange adapters live outside this crate; callers inject them
//! through these traits so tests can substitute deterministic fakes
//! without touching a network.

use crate::error::Result;
use crate::event::{MarketEvent, OrderRequest};

/// A source of market events (e.g. an exchange market-data adapter).
pub trait MarketDataSource {
    /// Establish the upstream session.
    fn connect(&mut self) -> Result<()>;

    /// Subscribe to events for `symbol`.
    fn subscribe(&mut self, symbol: u32) -> Result<()>;

    /// Pull the next available event, if any. Never blocks.
    fn poll(&mut self) -> Option<MarketEvent>;
}

/// A destination for order requests (e.g. an execution adapter).
pub trait OrderSink {
    /// Hand an order request to the venue.
    fn submit(&mut self, order: &OrderRequest) -> Result<()>;
}

/// Deterministic in-memory [`MarketDataSource`] that replays a fixed
/// event script. Used by tests and demos in place of a live adapter.
pub struct ReplayFeed {
    events: Vec<MarketEvent>,
    position: usize,
    connected: bool,
    subscriptions: Vec<u32>,
}

impl ReplayFeed {
    pub fn new(events: Vec<MarketEvent>) -> Self {
        Self {
            events,
            position: 0,
            connected: false,
            subscriptions: Vec::new(),
        }
    }

    /// Events remaining in the script.
    pub fn remaining(&self) -> usize {
        self.events.len().saturating_sub(self.position)
    }
}

impl MarketDataSource for ReplayFeed {
    fn connect(&mut self) -> Result<()> {
        self.connected = true;
        Ok(())
    }

    fn subscribe(&mut self, symbol: u32) -> Result<()> {
        if !self.subscriptions.contains(&symbol) {
            self.subscriptions.push(symbol);
        }
        Ok(())
    }

    fn poll(&mut self) -> Option<MarketEvent> {
        if !self.connected {
            return None;
        }
        while self.position < self.events.len() {
            let event = self.events[self.position];
            self.position += 1;
            if self.subscriptions.is_empty() || self.subscriptions.contains(&event.symbol) {
                return Some(event);
            }
        }
        None
    }
}

/// [`OrderSink`] that records every submitted order, for assertions in
/// tests.
#[derive(Default)]
pub struct RecordingSink {
    submitted: Vec<OrderRequest>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> &[OrderRequest] {
        &self.submitted
    }
}

impl OrderSink for RecordingSink {
    fn submit(&mut self, order: &OrderRequest) -> Result<()> {
        self.submitted.push(*order);
        Ok(())
    }
}
