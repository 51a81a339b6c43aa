//! Ring buffer throughput benchmark.
//!
//! One producer publishing market events, one reader draining behind
//! the published cursor.

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;
use std::sync::Arc;
use std::thread;

use spine::{EventRing, MarketEvent};

const RING_CAPACITY: usize = 256 * 1024;
const TOTAL_EVENTS: i64 = 1_000_000;

fn run_ring(events: i64) -> i64 {
    let ring = Arc::new(EventRing::<MarketEvent>::with_capacity(RING_CAPACITY).unwrap());

    let reader = {
        let ring = ring.clone();
        thread::spawn(move || {
            let mut next: i64 = 0;
            let mut sum = 0.0f64;
            while next < events {
                let published = ring.cursor();
                if published < next {
                    std::hint::spin_loop();
                    continue;
                }
                while next <= published && next < events {
                    let event = unsafe { ring.read(next) };
                    sum += event.last_price;
                    next += 1;
                }
            }
            black_box(sum);
            next
        })
    };

    for seq in 0..events {
        unsafe {
            let slot = ring.get(seq);
            slot.symbol = 1;
            slot.last_price = seq as f64;
        }
        ring.publish(seq);
    }

    reader.join().unwrap()
}

fn benchmark_ring(c: &mut Criterion) {
    let mut group = c.benchmark_group("EventRing (1M events)");
    group.throughput(Throughput::Elements(TOTAL_EVENTS as u64));
    group.sample_size(20);

    group.bench_function("publish_consume", |b| b.iter(|| run_ring(TOTAL_EVENTS)));

    group.finish();
}

criterion_group!(benches, benchmark_ring);
criterion_main!(benches);
