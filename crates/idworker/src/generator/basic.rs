use core::cell::Cell;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    IdGenStatus, IdGenerator, Result, SnowflakeId, SystemClock, TimeSource, WorkerConfig,
    generator::state::State,
};

/// A non-concurrent Snowflake ID generator for a single owner.
///
/// The state lives in a [`Cell`], so the generator is `Send` but not `Sync`:
/// the compiler confines it to one thread at a time, which is exactly the
/// serialization the algorithm requires. Share it across tasks through an
/// `IdWorkerHandle`, or use [`LockIdWorker`] instead.
///
/// ## Features
/// - ❌ Not thread-safe
/// - ✅ No locking on the hot path
///
/// ## Recommended When
/// - One thread or task owns the generator
/// - You want the fastest generator
///
/// ## See Also
/// - [`LockIdWorker`]
///
/// [`LockIdWorker`]: crate::LockIdWorker
pub struct BasicIdWorker<T = SystemClock>
where
    T: TimeSource,
{
    state: Cell<State>,
    config: WorkerConfig,
    time: T,
}

impl BasicIdWorker<SystemClock> {
    /// Builds a generator on the system wall clock from three raw integers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `worker_id` or
    /// `datacenter_id` is outside `0..=31`.
    ///
    /// # Example
    ///
    /// ```
    /// use idworker::{BasicIdWorker, TWITTER_EPOCH};
    ///
    /// let worker = BasicIdWorker::with_system_clock(TWITTER_EPOCH, 1, 1)?;
    /// let a = worker.next_id()?;
    /// let b = worker.next_id()?;
    /// assert!(a < b);
    /// # Ok::<(), idworker::Error>(())
    /// ```
    ///
    /// [`Error::InvalidConfiguration`]: crate::Error::InvalidConfiguration
    pub fn with_system_clock(epoch: u64, worker_id: i64, datacenter_id: i64) -> Result<Self> {
        Ok(Self::new(
            WorkerConfig::new(epoch, worker_id, datacenter_id)?,
            SystemClock,
        ))
    }
}

impl<T> BasicIdWorker<T>
where
    T: TimeSource,
{
    /// Creates a new [`BasicIdWorker`] with no ID produced yet.
    ///
    /// # Parameters
    ///
    /// - `config`: the epoch, worker ID and datacenter ID encoded into every
    ///   ID.
    /// - `time`: a [`TimeSource`] (e.g. [`SystemClock`]) read on every
    ///   attempt.
    pub const fn new(config: WorkerConfig, time: T) -> Self {
        Self {
            state: Cell::new(State::new()),
            config,
            time,
        }
    }

    /// Returns the configuration encoded into every ID.
    pub const fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Generates the next ID, spinning until the next millisecond if the
    /// current one is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockMovedBackward`] or [`Error::TimestampOutOfRange`];
    /// in both cases the state is left untouched.
    ///
    /// [`Error::ClockMovedBackward`]: crate::Error::ClockMovedBackward
    /// [`Error::TimestampOutOfRange`]: crate::Error::TimestampOutOfRange
    pub fn next_id(&self) -> Result<SnowflakeId> {
        <Self as IdGenerator<T>>::next_id(self)
    }

    /// Makes one generation attempt.
    ///
    /// # Returns
    /// - `Ok(IdGenStatus::Ready { id })`: a new ID is available
    /// - `Ok(IdGenStatus::Pending { yield_until })`: the sequence is
    ///   exhausted; retry once the clock reaches `yield_until`
    /// - `Err(e)`: the clock regressed or left the 41-bit range
    ///
    /// # Errors
    ///
    /// See [`BasicIdWorker::next_id`].
    ///
    /// # Example
    /// ```
    /// use idworker::{BasicIdWorker, IdGenStatus, TWITTER_EPOCH};
    ///
    /// let worker = BasicIdWorker::with_system_clock(TWITTER_EPOCH, 0, 0)?;
    /// let id = loop {
    ///     match worker.poll_id()? {
    ///         IdGenStatus::Ready { id } => break id,
    ///         IdGenStatus::Pending { .. } => std::thread::yield_now(),
    ///     }
    /// };
    /// assert_eq!(id.sequence(), 0);
    /// # Ok::<(), idworker::Error>(())
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> Result<IdGenStatus> {
        let now = self.time.current_millis();
        let (next, status) = self.state.get().step(&self.config, now)?;
        self.state.set(next);
        Ok(status)
    }
}

impl<T> IdGenerator<T> for BasicIdWorker<T>
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
}
