//! spine - lock-free event-passing backbone for low-latency trading
//! engines.
//!
//! The crate moves fixed-size event records between threads that already
//! exist. It supplies exactly two transport structures and their memory
//! ordering contract, nothing else: no scheduling, no networking, no
//! serialization of wire protocols.
//!
//! - [`EventRing`]: fixed-capacity ring with a single published-sequence
//!   cursor; one producer, any number of independent readers.
//! - [`SpscQueue`]: bounded queue with independent head/tail indices for
//!   exactly one producer and one consumer thread.
//!
//! ## Quick start
//!
//! ```
//! use spine::event::EventRecord;
//! use spine::{clock, EventRing, MarketEvent};
//!
//! let ring = EventRing::<MarketEvent>::with_capacity(1024).unwrap();
//!
//! // Producer: claim, populate in place, publish.
//! for seq in 0..100i64 {
//!     unsafe {
//!         let slot = ring.get(seq);
//!         slot.clear();
//!         slot.symbol = 1;
//!         slot.last_price = 50_000.0 + seq as f64;
//!         slot.set_timestamp_ns(clock::now_nanos());
//!     }
//!     ring.publish(seq);
//! }
//!
//! // Consumer: everything at or below the cursor is safe to read.
//! let published = ring.cursor();
//! assert_eq!(published, 99);
//! let event = unsafe { ring.read(0) };
//! assert_eq!(event.last_price, 50_000.0);
//! ```

pub mod adapter;
pub mod clock;
pub mod constants;
pub mod cpu;
pub mod error;
pub mod event;
pub mod ring;

pub use adapter::{MarketDataSource, OrderSink, RecordingSink, ReplayFeed};
pub use error::{Result, SpineError};
pub use event::{EventKind, EventRecord, MarketEvent, OrderRequest, Side};
pub use ring::{
    BlockingWaitStrategy, BusySpinWaitStrategy, EventRing, RingConfig, Sequence,
    SleepingWaitStrategy, SpscQueue, WaitStrategy, WaitStrategyKind, YieldingWaitStrategy,
    INITIAL_CURSOR,
};
