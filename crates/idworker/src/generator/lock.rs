use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    IdGenStatus, IdGenerator, Result, SnowflakeId, SystemClock, TimeSource, WorkerConfig,
    generator::{Mutex, MutexGuard, interface::spin_until_ready, state::State},
};

/// A lock-based Snowflake ID generator for multi-threaded use.
///
/// The state is wrapped in an [`Arc<Mutex<_>>`]; clones share it, so any
/// number of threads can draw from one `(datacenter, worker)` identity. Every
/// attempt reads the clock *after* taking the lock: a reading taken earlier
/// could predate an ID another thread has just committed.
///
/// [`LockIdWorker::next_id`] keeps the lock while it waits for the next
/// millisecond, so no other caller can interleave during the spin.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Fair access across threads
///
/// ## See Also
/// - [`BasicIdWorker`]
///
/// [`BasicIdWorker`]: crate::BasicIdWorker
pub struct LockIdWorker<T = SystemClock>
where
    T: TimeSource,
{
    state: Arc<Mutex<State>>,
    config: WorkerConfig,
    time: T,
}

impl<T> Clone for LockIdWorker<T>
where
    T: TimeSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            config: self.config,
            time: self.time.clone(),
        }
    }
}

impl LockIdWorker<SystemClock> {
    /// Builds a generator on the system wall clock from three raw integers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `worker_id` or
    /// `datacenter_id` is outside `0..=31`.
    ///
    /// [`Error::InvalidConfiguration`]: crate::Error::InvalidConfiguration
    pub fn with_system_clock(epoch: u64, worker_id: i64, datacenter_id: i64) -> Result<Self> {
        Ok(Self::new(
            WorkerConfig::new(epoch, worker_id, datacenter_id)?,
            SystemClock,
        ))
    }
}

impl<T> LockIdWorker<T>
where
    T: TimeSource,
{
    /// Creates a new [`LockIdWorker`] with no ID produced yet.
    ///
    /// # Example
    /// ```
    /// use idworker::{LockIdWorker, SystemClock, TWITTER_EPOCH, WorkerConfig};
    ///
    /// let worker = LockIdWorker::new(WorkerConfig::new(TWITTER_EPOCH, 3, 7)?, SystemClock);
    ///
    /// let handles: Vec<_> = (0..4)
    ///     .map(|_| {
    ///         let worker = worker.clone();
    ///         std::thread::spawn(move || worker.next_id())
    ///     })
    ///     .collect();
    /// for handle in handles {
    ///     let id = handle.join().unwrap()?;
    ///     assert_eq!((id.datacenter_id(), id.worker_id()), (7, 3));
    /// }
    /// # Ok::<(), idworker::Error>(())
    /// ```
    pub fn new(config: WorkerConfig, time: T) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::new())),
            config,
            time,
        }
    }

    /// Returns the configuration encoded into every ID.
    pub const fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Generates the next ID, holding the lock until it is produced.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockMovedBackward`] or [`Error::TimestampOutOfRange`]; the
    ///   state is left untouched.
    /// - `Error::LockPoisoned` if another thread panicked while holding the
    ///   std mutex.
    ///
    /// [`Error::ClockMovedBackward`]: crate::Error::ClockMovedBackward
    /// [`Error::TimestampOutOfRange`]: crate::Error::TimestampOutOfRange
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        let mut state = self.lock()?;
        spin_until_ready(|| self.step(&mut state))
    }

    /// Makes one generation attempt without waiting.
    ///
    /// # Errors
    ///
    /// See [`LockIdWorker::next_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> Result<IdGenStatus> {
        let mut state = self.lock()?;
        self.step(&mut state)
    }

    fn step(&self, state: &mut MutexGuard<'_, State>) -> Result<IdGenStatus> {
        let now = self.time.current_millis();
        let (next, status) = state.step(&self.config, now)?;
        **state = next;
        Ok(status)
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }
}

impl<T> IdGenerator<T> for LockIdWorker<T>
where
    T: TimeSource,
{
    fn new(config: WorkerConfig, time: T) -> Self {
        Self::new(config, time)
    }

    fn config(&self) -> &WorkerConfig {
        self.config()
    }

    fn poll_id(&self) -> Result<IdGenStatus> {
        self.poll_id()
    }

    fn next_id(&self) -> Result<SnowflakeId> {
        self.next_id()
    }
}
