use crate::{IdGenStatus, Result, SnowflakeId, TimeSource, WorkerConfig};

/// Busy spins between clock reads before falling back to yielding the thread.
const SPINS_BEFORE_YIELD: u32 = 64;

/// A minimal interface for generating Snowflake IDs.
pub trait IdGenerator<T>
where
    T: TimeSource,
{
    /// Creates a new generator from a validated configuration and a clock.
    fn new(config: WorkerConfig, time: T) -> Self
    where
        Self: Sized;

    /// Returns the configuration this generator encodes into every ID.
    fn config(&self) -> &WorkerConfig;

    /// Makes a single generation attempt without blocking.
    ///
    /// The returned [`IdGenStatus`] contains either:
    /// - the newly generated ID, or
    /// - the millisecond to wait for if the sequence is exhausted.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockMovedBackward`] if the clock reads earlier than the
    ///   last generated ID.
    /// - [`Error::TimestampOutOfRange`] if the time relative to the epoch is
    ///   negative or exceeds 41 bits.
    /// - `Error::LockPoisoned` if the implementation uses a std mutex that
    ///   was poisoned.
    ///
    /// [`Error::ClockMovedBackward`]: crate::Error::ClockMovedBackward
    /// [`Error::TimestampOutOfRange`]: crate::Error::TimestampOutOfRange
    fn poll_id(&self) -> Result<IdGenStatus>;

    /// Generates the next ID, waiting for the next millisecond if the current
    /// one is exhausted.
    ///
    /// # Errors
    ///
    /// Same as [`IdGenerator::poll_id`].
    fn next_id(&self) -> Result<SnowflakeId> {
        spin_until_ready(|| self.poll_id())
    }
}

/// Polls until an ID is ready, spinning briefly and then yielding the thread.
///
/// The wait is bounded by the clock: an exhausted sequence clears as soon as
/// the next millisecond is observed.
pub(crate) fn spin_until_ready(
    mut poll: impl FnMut() -> Result<IdGenStatus>,
) -> Result<SnowflakeId> {
    let mut spins = 0;
    loop {
        match poll()? {
            IdGenStatus::Ready { id } => break Ok(id),
            IdGenStatus::Pending { .. } if spins < SPINS_BEFORE_YIELD => {
                spins += 1;
                core::hint::spin_loop();
            }
            IdGenStatus::Pending { .. } => std::thread::yield_now(),
        }
    }
}
