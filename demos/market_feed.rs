//! Market feed demo
//!
//! Replays a deterministic feed into the event ring on one thread while
//! a strategy thread drains it, emits order requests into the SPSC
//! queue, and a dispatcher drains those into a recording sink.

use spine::event::EventRecord;
use spine::{
    clock, EventRing, MarketDataSource, MarketEvent, OrderRequest, OrderSink, RecordingSink,
    ReplayFeed, RingConfig, Side, SpscQueue, WaitStrategyKind,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

// One lap of the ring at most, so the replay never overwrites a slot
// the strategy has not read yet.
const TICKS: usize = 200_000;
const RING_CAPACITY: usize = 256 * 1024;
const QUEUE_CAPACITY: usize = 16 * 1024;
const SYMBOL: u32 = 42;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("Market feed demo: {} ticks, symbol {}", TICKS, SYMBOL);

    let script: Vec<MarketEvent> = (0..TICKS)
        .map(|i| {
            let mid = 50_000.0 + ((i % 200) as f64 - 100.0) * 0.5;
            MarketEvent::tick(SYMBOL, mid - 0.25, mid + 0.25, i as u64)
        })
        .collect();

    let config = RingConfig::new(RING_CAPACITY)
        .unwrap()
        .with_wait_strategy(WaitStrategyKind::BusySpin);
    let ring = Arc::new(EventRing::<MarketEvent>::with_config(&config).unwrap());
    let queue = Arc::new(SpscQueue::<OrderRequest>::with_capacity(QUEUE_CAPACITY).unwrap());
    let running = Arc::new(AtomicBool::new(true));

    let start = Instant::now();

    // Feed thread: adapter -> ring. Drops `running` once the script is
    // exhausted so waiting consumers shut down cleanly.
    let feed_thread = {
        let ring = ring.clone();
        let running = running.clone();
        thread::spawn(move || {
            // Best effort; fails harmlessly on constrained hosts.
            let _ = spine::cpu::pin_to_cpu(0);

            let mut feed = ReplayFeed::new(script);
            feed.connect().unwrap();
            feed.subscribe(SYMBOL).unwrap();

            let mut seq: i64 = 0;
            while let Some(mut event) = feed.poll() {
                event.set_timestamp_ns(clock::now_nanos());
                unsafe {
                    ring.write(seq, event);
                }
                ring.publish(seq);
                seq += 1;
            }
            running.store(false, Ordering::Release);
            seq
        })
    };

    // Strategy thread: ring -> order queue. Buys whenever the mid dips
    // below 49,980.
    let strategy_thread = {
        let ring = ring.clone();
        let queue = queue.clone();
        let running = running.clone();
        let wait = config.wait_strategy.strategy();
        thread::spawn(move || {
            let _ = spine::cpu::pin_to_cpu(1);

            let mut next: i64 = 0;
            let mut orders = 0u64;
            loop {
                let published = match wait.wait_for(next, ring.cursor_cell(), &running) {
                    Ok(published) => published,
                    // Shutdown: drain whatever is still published.
                    Err(_) => ring.cursor(),
                };
                while next <= published {
                    let event = unsafe { ring.read(next) };
                    if event.mid_price() < 49_980.0 {
                        let order = OrderRequest::limit(
                            orders,
                            event.symbol,
                            Side::Buy,
                            event.ask_price,
                            0.1,
                            clock::now_nanos(),
                        );
                        while !queue.try_push(order) {
                            std::hint::spin_loop();
                        }
                        orders += 1;
                    }
                    next += 1;
                }
                if !running.load(Ordering::Acquire) && ring.cursor() < next {
                    break;
                }
            }
            (next, orders)
        })
    };

    // Dispatcher: order queue -> sink, on the main thread.
    let mut sink = RecordingSink::new();
    let mut dispatched = 0u64;
    loop {
        match queue.try_pop() {
            Some(order) => {
                sink.submit(&order).unwrap();
                dispatched += 1;
            }
            None => {
                if strategy_thread.is_finished() && queue.is_empty() {
                    break;
                }
                std::hint::spin_loop();
            }
        }
    }

    let published = feed_thread.join().unwrap();
    let (consumed, orders) = strategy_thread.join().unwrap();
    let elapsed = start.elapsed();

    println!("Published:  {} events", published);
    println!("Consumed:   {} events", consumed);
    println!("Orders:     {} emitted, {} dispatched", orders, dispatched);
    println!(
        "Throughput: {:.2}M events/sec",
        published as f64 / elapsed.as_secs_f64() / 1_000_000.0
    );

    assert_eq!(consumed, published);
    assert_eq!(dispatched, orders);
    assert_eq!(sink.submitted().len() as u64, orders);
    println!("OK");
}
