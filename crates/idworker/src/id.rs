use core::fmt;

/// A 64-bit Snowflake ID split into datacenter and worker fields.
///
/// - 1 bit reserved (always zero)
/// - 41 bits timestamp (ms since the generator's epoch)
/// - 5 bits datacenter ID
/// - 5 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21            17 16        12 11             0
///              +--------------+----------------+----------------+------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | datacenter (5) | worker (5) | sequence (12) |
///              +--------------+----------------+----------------+------------+---------------+
///              |<------------------ MSB ----------- 64 bits ------------ LSB --------------->|
/// ```
///
/// Ordering and hashing follow the raw value, so IDs sort by timestamp first,
/// then by datacenter and worker, then by sequence.
///
/// # Example
///
/// ```
/// use idworker::SnowflakeId;
///
/// let id = SnowflakeId::from_components(1000, 3, 2, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.datacenter_id(), 3);
/// assert_eq!(id.worker_id(), 2);
/// assert_eq!(id.sequence(), 1);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Width of the timestamp field.
    pub const TIMESTAMP_BITS: u32 = 41;

    /// Width of the datacenter ID field.
    pub const DATACENTER_ID_BITS: u32 = 5;

    /// Width of the worker ID field.
    pub const WORKER_ID_BITS: u32 = 5;

    /// Width of the sequence field.
    pub const SEQUENCE_BITS: u32 = 12;

    /// Bitmask for the 41-bit timestamp field. Occupies bits 22 through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for the 5-bit datacenter ID field. Occupies bits 17 through 21.
    pub const DATACENTER_ID_MASK: u64 = (1 << Self::DATACENTER_ID_BITS) - 1;

    /// Bitmask for the 5-bit worker ID field. Occupies bits 12 through 16.
    pub const WORKER_ID_MASK: u64 = (1 << Self::WORKER_ID_BITS) - 1;

    /// Bitmask for the 12-bit sequence field. Occupies bits 0 through 11.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Shift of the timestamp field.
    pub const TIMESTAMP_SHIFT: u32 =
        Self::SEQUENCE_BITS + Self::WORKER_ID_BITS + Self::DATACENTER_ID_BITS;

    /// Shift of the datacenter ID field.
    pub const DATACENTER_ID_SHIFT: u32 = Self::SEQUENCE_BITS + Self::WORKER_ID_BITS;

    /// Shift of the worker ID field.
    pub const WORKER_ID_SHIFT: u32 = Self::SEQUENCE_BITS;

    /// Shift of the sequence field.
    pub const SEQUENCE_SHIFT: u32 = 0;

    /// Largest relative timestamp that fits the layout (~69 years of ms).
    pub const MAX_TIMESTAMP: u64 = Self::TIMESTAMP_MASK;

    /// Largest datacenter ID.
    pub const MAX_DATACENTER_ID: u64 = Self::DATACENTER_ID_MASK;

    /// Largest worker ID.
    pub const MAX_WORKER_ID: u64 = Self::WORKER_ID_MASK;

    /// Largest sequence value; 4096 IDs fit in one millisecond.
    pub const MAX_SEQUENCE: u64 = Self::SEQUENCE_MASK;

    /// Packs the four fields into an ID. Each field is masked to its width.
    pub const fn from_components(
        timestamp: u64,
        datacenter_id: u64,
        worker_id: u64,
        sequence: u64,
    ) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(
            datacenter_id <= Self::DATACENTER_ID_MASK,
            "datacenter_id overflow"
        );
        debug_assert!(worker_id <= Self::WORKER_ID_MASK, "worker_id overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");

        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let datacenter_id = (datacenter_id & Self::DATACENTER_ID_MASK) << Self::DATACENTER_ID_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | datacenter_id | worker_id | sequence,
        }
    }

    /// Extracts the timestamp, in ms relative to the generator's epoch.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the datacenter ID.
    pub const fn datacenter_id(&self) -> u64 {
        (self.id >> Self::DATACENTER_ID_SHIFT) & Self::DATACENTER_ID_MASK
    }

    /// Extracts the worker ID.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the sequence number.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the raw `u64` value.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Wraps a raw `u64` value without validation.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the ID as a zero-padded 20-digit string.
    ///
    /// Padded strings sort lexicographically in the same order as the IDs.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl From<u64> for SnowflakeId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("datacenter_id", &self.datacenter_id())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_id_fields_and_bounds() {
        let ts = SnowflakeId::MAX_TIMESTAMP;
        let dc = SnowflakeId::MAX_DATACENTER_ID;
        let worker = SnowflakeId::MAX_WORKER_ID;
        let seq = SnowflakeId::MAX_SEQUENCE;

        let id = SnowflakeId::from_components(ts, dc, worker, seq);
        assert_eq!(id.timestamp(), ts);
        assert_eq!(id.datacenter_id(), dc);
        assert_eq!(id.worker_id(), worker);
        assert_eq!(id.sequence(), seq);
        assert_eq!(SnowflakeId::from_raw(id.to_raw()), id);
        // reserved bit stays clear
        assert_eq!(id.to_raw() >> 63, 0);
        assert_eq!(id.to_raw(), u64::MAX >> 1);
    }

    #[test]
    fn test_layout_constants() {
        assert_eq!(SnowflakeId::TIMESTAMP_SHIFT, 22);
        assert_eq!(SnowflakeId::DATACENTER_ID_SHIFT, 17);
        assert_eq!(SnowflakeId::WORKER_ID_SHIFT, 12);
        assert_eq!(SnowflakeId::MAX_DATACENTER_ID, 31);
        assert_eq!(SnowflakeId::MAX_WORKER_ID, 31);
        assert_eq!(SnowflakeId::MAX_SEQUENCE, 4095);
        assert_eq!(SnowflakeId::MAX_TIMESTAMP, (1 << 41) - 1);
    }

    #[test]
    fn test_fields_do_not_overlap() {
        let dc_only = SnowflakeId::from_components(0, 1, 0, 0);
        let worker_only = SnowflakeId::from_components(0, 0, 1, 0);
        assert_eq!(dc_only.to_raw(), 1 << 17);
        assert_eq!(worker_only.to_raw(), 1 << 12);
        assert_eq!(dc_only.worker_id(), 0);
        assert_eq!(worker_only.datacenter_id(), 0);
    }

    #[test]
    fn test_ordering_follows_timestamp_then_sequence() {
        let a = SnowflakeId::from_components(10, 31, 31, 4095);
        let b = SnowflakeId::from_components(11, 0, 0, 0);
        let c = SnowflakeId::from_components(11, 0, 0, 1);
        assert!(a < b && b < c);
        assert!(a.to_padded_string() < b.to_padded_string());
    }

    #[test]
    fn test_display_and_padding() {
        let id = SnowflakeId::from_raw(135_168);
        assert_eq!(id.to_string(), "135168");
        assert_eq!(id.to_padded_string(), "00000000000000135168");
        assert_eq!(u64::from(id), 135_168);
        assert_eq!(SnowflakeId::from(135_168_u64), id);
    }

    #[test]
    #[should_panic(expected = "timestamp overflow")]
    fn timestamp_overflow_panics() {
        let _ = SnowflakeId::from_components(SnowflakeId::MAX_TIMESTAMP + 1, 0, 0, 0);
    }

    #[test]
    #[should_panic(expected = "datacenter_id overflow")]
    fn datacenter_id_overflow_panics() {
        let _ = SnowflakeId::from_components(0, SnowflakeId::MAX_DATACENTER_ID + 1, 0, 0);
    }

    #[test]
    #[should_panic(expected = "worker_id overflow")]
    fn worker_id_overflow_panics() {
        let _ = SnowflakeId::from_components(0, 0, SnowflakeId::MAX_WORKER_ID + 1, 0);
    }

    #[test]
    #[should_panic(expected = "sequence overflow")]
    fn sequence_overflow_panics() {
        let _ = SnowflakeId::from_components(0, 0, 0, SnowflakeId::MAX_SEQUENCE + 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_is_transparent() {
        let id = SnowflakeId::from_raw(135_169);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "135169");
        let back: SnowflakeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
