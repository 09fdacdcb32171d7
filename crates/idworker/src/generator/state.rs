use crate::{Error, IdGenStatus, Result, SnowflakeId, WorkerConfig};

/// Mutable generation state shared by every generator flavor.
///
/// `last_timestamp` is in Unix milliseconds; `None` means no ID has been
/// produced yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct State {
    pub(crate) last_timestamp: Option<u64>,
    pub(crate) sequence: u64,
}

impl State {
    pub(crate) const fn new() -> Self {
        Self {
            last_timestamp: None,
            sequence: 0,
        }
    }

    /// Computes the outcome of one generation attempt at `now`.
    ///
    /// Returns the state to commit together with the status. A `Pending`
    /// status comes back with `self` unchanged, and on error nothing is
    /// returned to commit, so a failed or throttled attempt never alters the
    /// state.
    pub(crate) fn step(self, config: &WorkerConfig, now: u64) -> Result<(Self, IdGenStatus)> {
        let sequence = match self.last_timestamp {
            Some(last) if now < last => return Err(Self::cold_clock_behind(last, now)),
            Some(last) if now == last => {
                if self.sequence < SnowflakeId::MAX_SEQUENCE {
                    self.sequence + 1
                } else {
                    return Ok((
                        self,
                        IdGenStatus::Pending {
                            yield_until: last.saturating_add(1),
                        },
                    ));
                }
            }
            _ => 0,
        };

        let relative = now
            .checked_sub(config.epoch())
            .filter(|ts| *ts <= SnowflakeId::MAX_TIMESTAMP)
            .ok_or(Error::TimestampOutOfRange {
                now,
                epoch: config.epoch(),
            })?;

        let id = SnowflakeId::from_components(
            relative,
            config.datacenter_id(),
            config.worker_id(),
            sequence,
        );

        #[cfg(feature = "tracing")]
        tracing::trace!(%id, "new id");

        let next = Self {
            last_timestamp: Some(now),
            sequence,
        };
        Ok((next, IdGenStatus::Ready { id }))
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(last: u64, now: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(last, now, behind_ms = last - now, "clock moved backward");
        Error::ClockMovedBackward { last, now }
    }
}
