use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use portable_atomic::{AtomicU64, Ordering};

use crate::{SystemClock, TimeSource};

/// Shared ticker state updated once per millisecond.
struct SharedTickerInner {
    current: AtomicU64,
}

/// A time source that never moves backward.
///
/// The wall clock is read once at construction; from then on time advances by
/// the monotonic [`Instant`] elapsed since startup. NTP steps and manual clock
/// changes after construction are not observed, so generators driven by this
/// clock never hit [`Error::ClockMovedBackward`].
///
/// Internally a background thread stores the elapsed milliseconds into a
/// shared atomic, keeping syscalls off the hot path. Clones share that thread,
/// and it exits once the last clone is dropped.
///
/// [`Error::ClockMovedBackward`]: crate::Error::ClockMovedBackward
#[derive(Clone)]
pub struct MonotonicClock {
    inner: Arc<SharedTickerInner>,
    /// Unix milliseconds at construction.
    anchor: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Anchors a new clock to the current wall-clock time and starts its
    /// ticker thread.
    ///
    /// # Example
    ///
    /// ```
    /// use idworker::{MonotonicClock, SystemClock, TimeSource};
    ///
    /// let clock = MonotonicClock::new();
    /// let first = clock.current_millis();
    /// std::thread::sleep(std::time::Duration::from_millis(5));
    /// assert!(clock.current_millis() >= first);
    /// assert!(first <= SystemClock.current_millis());
    /// ```
    pub fn new() -> Self {
        let anchor = SystemClock.current_millis();
        let inner = Arc::new(SharedTickerInner {
            current: AtomicU64::new(0),
        });

        let weak_inner = Arc::downgrade(&inner);
        thread::spawn(move || {
            let start = Instant::now();
            let mut tick = 0;

            loop {
                let Some(inner_ref) = weak_inner.upgrade() else {
                    break;
                };

                // Absolute target time of the next tick
                let target = start + Duration::from_millis(tick);

                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                inner_ref.current.store(now_ms, Ordering::Relaxed);

                // Align to the next tick after the actual time
                tick = now_ms + 1;
            }
        });

        Self { inner, anchor }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.anchor + self.inner.current.load(Ordering::Acquire)
    }
}
