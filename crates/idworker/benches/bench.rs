use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use idworker::{
    BasicIdWorker, IdGenStatus, IdGenerator, LockIdWorker, MonotonicClock, SystemClock,
    TWITTER_EPOCH, TimeSource, WorkerConfig,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded). One full millisecond of sequence space.
const TOTAL_IDS: usize = 4096;

fn config() -> WorkerConfig {
    WorkerConfig::new(TWITTER_EPOCH, 1, 1).expect("valid config")
}

/// Benchmarks a hot-path generator where IDs are always `Ready`.
fn bench_generator<G>(c: &mut Criterion, group_name: &str)
where
    G: IdGenerator<FixedMockTime>,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = G::new(
                    config(),
                    FixedMockTime {
                        millis: TWITTER_EPOCH + 1,
                    },
                );
                for _ in 0..TOTAL_IDS {
                    match generator.poll_id() {
                        Ok(IdGenStatus::Ready { id }) => {
                            black_box(id);
                        }
                        other => unreachable!("{other:?}"),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks blocking generation against a real clock, including the wait
/// for the next millisecond whenever a sequence is exhausted.
fn bench_generator_blocking<G, T>(c: &mut Criterion, group_name: &str, clock: impl Fn() -> T)
where
    G: IdGenerator<T>,
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        let generator = G::new(config(), clock());
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.next_id().expect("id"));
            }
        });
    });

    group.finish();
}

/// Benchmarks a shared [`LockIdWorker`] under contention.
fn bench_lock_threaded(c: &mut Criterion, group_name: &str) {
    let threads = num_cpus::get().clamp(2, 8);
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));

    group.bench_function(format!("threads/{threads}/elems/{TOTAL_IDS}"), |b| {
        let generator = LockIdWorker::new(config(), MonotonicClock::new());
        b.iter_custom(|iters| {
            let barrier = Arc::new(Barrier::new(threads + 1));
            let mut start = Instant::now();
            scope(|s| {
                for _ in 0..threads {
                    let generator = generator.clone();
                    let barrier = Arc::clone(&barrier);
                    s.spawn(move || {
                        barrier.wait();
                        for _ in 0..iters {
                            for _ in 0..TOTAL_IDS {
                                black_box(generator.next_id().expect("id"));
                            }
                        }
                    });
                }
                barrier.wait();
                start = Instant::now();
            });
            start.elapsed()
        });
    });

    group.finish();
}

fn benchmarks(c: &mut Criterion) {
    bench_generator::<BasicIdWorker<FixedMockTime>>(c, "mock/basic");
    bench_generator::<LockIdWorker<FixedMockTime>>(c, "mock/lock");

    bench_generator_blocking::<BasicIdWorker<SystemClock>, _>(c, "system/basic", || SystemClock);
    bench_generator_blocking::<LockIdWorker<SystemClock>, _>(c, "system/lock", || SystemClock);
    bench_generator_blocking::<BasicIdWorker<MonotonicClock>, _>(
        c,
        "monotonic/basic",
        MonotonicClock::new,
    );
    bench_generator_blocking::<LockIdWorker<MonotonicClock>, _>(
        c,
        "monotonic/lock",
        MonotonicClock::new,
    );

    bench_lock_threaded(c, "monotonic/lock/threaded");
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
