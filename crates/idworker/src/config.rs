use crate::{Error, Result, SnowflakeId};

/// Validated, immutable configuration of one generator instance.
///
/// Identifiers are taken as signed integers so that any caller input, negative
/// values included, is range-checked here and reported as
/// [`Error::InvalidConfiguration`].
///
/// # Example
///
/// ```
/// use idworker::{Error, TWITTER_EPOCH, WorkerConfig};
///
/// let config = WorkerConfig::new(TWITTER_EPOCH, 31, 31)?;
/// assert_eq!(config.worker_id(), 31);
///
/// assert!(matches!(
///     WorkerConfig::new(TWITTER_EPOCH, 32, 0),
///     Err(Error::InvalidConfiguration { field: "worker_id", .. })
/// ));
/// # Ok::<(), Error>(())
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorkerConfig {
    epoch: u64,
    worker_id: u64,
    datacenter_id: u64,
}

impl WorkerConfig {
    /// Checks `worker_id` and `datacenter_id` against `0..=31` and builds the
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first field that is
    /// out of range.
    pub fn new(epoch: u64, worker_id: i64, datacenter_id: i64) -> Result<Self> {
        Ok(Self {
            epoch,
            worker_id: check_field("worker_id", worker_id, SnowflakeId::MAX_WORKER_ID)?,
            datacenter_id: check_field(
                "datacenter_id",
                datacenter_id,
                SnowflakeId::MAX_DATACENTER_ID,
            )?,
        })
    }

    /// Reference instant in Unix milliseconds.
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Worker ID in `0..=31`.
    pub const fn worker_id(&self) -> u64 {
        self.worker_id
    }

    /// Datacenter ID in `0..=31`.
    pub const fn datacenter_id(&self) -> u64 {
        self.datacenter_id
    }
}

fn check_field(field: &'static str, value: i64, max: u64) -> Result<u64> {
    match u64::try_from(value) {
        Ok(v) if v <= max => Ok(v),
        _ => Err(Error::InvalidConfiguration { field, value, max }),
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for WorkerConfig {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Raw {
            epoch: u64,
            worker_id: i64,
            datacenter_id: i64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.epoch, raw.worker_id, raw.datacenter_id).map_err(serde::de::Error::custom)
    }
}
