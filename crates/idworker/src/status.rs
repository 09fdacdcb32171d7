use crate::SnowflakeId;

/// Represents the result of a single, non-blocking generation attempt.
///
/// - [`IdGenStatus::Ready`] indicates a new ID was generated.
/// - [`IdGenStatus::Pending`] means all 4096 sequence values of the current
///   millisecond are spent; no state was changed and the caller may retry once
///   the clock reaches `yield_until`.
///
/// # Example
///
/// ```
/// use idworker::{BasicIdWorker, IdGenStatus, TimeSource, WorkerConfig};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_700_000_000_000
///     }
/// }
///
/// let config = WorkerConfig::new(1_600_000_000_000, 1, 1)?;
/// let mut worker = BasicIdWorker::new(config, FixedTime);
/// match worker.poll_id()? {
///     IdGenStatus::Ready { id } => println!("ID: {id}"),
///     IdGenStatus::Pending { yield_until } => println!("Back off until: {yield_until}"),
/// }
/// # Ok::<(), idworker::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowflakeId,
    },
    /// The sequence is exhausted for the current millisecond.
    Pending {
        /// The first Unix millisecond (inclusive) at which generation may
        /// resume.
        yield_until: u64,
    },
}
