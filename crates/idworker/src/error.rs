/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `idworker` can produce.
///
/// Every variant is surfaced to the immediate caller. The generator never
/// retries on its own; the only internal wait is the spin for the next
/// millisecond once a sequence is exhausted, which is not an error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A worker or datacenter ID was outside `0..=31`.
    ///
    /// Raised at construction. The caller must supply corrected values.
    #[error("invalid configuration: {field} = {value} is outside 0..={max}")]
    InvalidConfiguration {
        /// Name of the offending field (`worker_id` or `datacenter_id`).
        field: &'static str,
        /// The rejected value, as supplied by the caller.
        value: i64,
        /// The largest accepted value.
        max: u64,
    },

    /// The clock reads earlier than the timestamp of the last generated ID.
    ///
    /// No ID was produced and the generator state is untouched. Retrying
    /// immediately will most likely observe the same regressed clock.
    #[error("clock moved backward: now = {now} ms, last = {last} ms")]
    ClockMovedBackward {
        /// Unix milliseconds of the last generated ID.
        last: u64,
        /// Unix milliseconds observed by this call.
        now: u64,
    },

    /// The timestamp does not fit the 41-bit field.
    ///
    /// Either the epoch lies in the future, or the generator has outlived its
    /// ID space. Fatal for this configuration.
    #[error("timestamp out of range: now = {now} ms, epoch = {epoch} ms")]
    TimestampOutOfRange {
        /// Unix milliseconds observed by this call.
        now: u64,
        /// The configured epoch in Unix milliseconds.
        epoch: u64,
    },

    /// The lock guarding a [`LockIdWorker`] was poisoned by a panicking
    /// thread.
    ///
    /// Only reachable with `std::sync::Mutex`; `parking_lot` mutexes do not
    /// poison.
    ///
    /// [`LockIdWorker`]: crate::LockIdWorker
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,

    /// The task behind an [`IdWorkerHandle`] has shut down.
    ///
    /// [`IdWorkerHandle`]: crate::IdWorkerHandle
    #[cfg_attr(docsrs, doc(cfg(feature = "async-tokio")))]
    #[cfg(feature = "async-tokio")]
    #[error("id worker task is unavailable")]
    WorkerUnavailable,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
// Collapse every poisoned guard into `LockPoisoned`
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
