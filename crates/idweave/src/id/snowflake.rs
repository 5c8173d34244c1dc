use chrono::{DateTime, Utc};

/// Custom epoch: Wednesday, January 1, 2020 00:00:00 UTC, in Unix
/// milliseconds.
pub const SNOWFLAKE_EPOCH_MS: i64 = 1_577_836_800_000;

/// Number of bits in the sequence field.
pub const SEQUENCE_BITS: u32 = 10;
/// Number of bits in the machine id field.
pub const MACHINE_ID_BITS: u32 = 4;
/// Number of bits in the data-center id field.
pub const DATA_CENTER_ID_BITS: u32 = 4;
/// Number of usable timestamp bits; the sign bit is never set.
pub const TIMESTAMP_BITS: u32 = 63 - TIMESTAMP_SHIFT;

pub const MACHINE_ID_SHIFT: u32 = SEQUENCE_BITS;
pub const DATA_CENTER_ID_SHIFT: u32 = MACHINE_ID_SHIFT + MACHINE_ID_BITS;
pub const TIMESTAMP_SHIFT: u32 = DATA_CENTER_ID_SHIFT + DATA_CENTER_ID_BITS;

pub const SEQUENCE_MASK: i64 = (1 << SEQUENCE_BITS) - 1;
pub const MAX_MACHINE_ID: u8 = (1 << MACHINE_ID_BITS) - 1;
pub const MAX_DATA_CENTER_ID: u8 = (1 << DATA_CENTER_ID_BITS) - 1;
pub const MAX_TIMESTAMP: i64 = (1 << TIMESTAMP_BITS) - 1;

/// The decomposed fields of a Snowflake id.
///
/// ```text
///  Bit Index:  63           18 17        14 13      10 9            0
///              +---------------+------------+----------+--------------+
///  Field:      | timestamp (45)| dc id (4)  | mach (4) | sequence (10)|
///              +---------------+------------+----------+--------------+
///              |<----- MSB ---------- 64 bits ----------- LSB ------->|
/// ```
///
/// `timestamp` counts milliseconds since [`SNOWFLAKE_EPOCH_MS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnowflakeParts {
    pub timestamp: i64,
    pub data_center_id: u8,
    pub machine_id: u8,
    pub sequence: u16,
}

impl SnowflakeParts {
    /// Splits a raw id into its fields.
    ///
    /// # Example
    ///
    /// ```
    /// use idweave::SnowflakeParts;
    ///
    /// let parts = SnowflakeParts { timestamp: 1000, data_center_id: 3, machine_id: 2, sequence: 1 };
    /// assert_eq!(SnowflakeParts::from_id(parts.compose()), parts);
    /// ```
    pub const fn from_id(id: i64) -> Self {
        Self {
            timestamp: (id >> TIMESTAMP_SHIFT) & MAX_TIMESTAMP,
            data_center_id: ((id >> DATA_CENTER_ID_SHIFT) & MAX_DATA_CENTER_ID as i64) as u8,
            machine_id: ((id >> MACHINE_ID_SHIFT) & MAX_MACHINE_ID as i64) as u8,
            sequence: (id & SEQUENCE_MASK) as u16,
        }
    }

    /// Packs the fields into a raw id. Fields wider than their slot are
    /// masked.
    pub const fn compose(self) -> i64 {
        ((self.timestamp & MAX_TIMESTAMP) << TIMESTAMP_SHIFT)
            | (((self.data_center_id & MAX_DATA_CENTER_ID) as i64) << DATA_CENTER_ID_SHIFT)
            | (((self.machine_id & MAX_MACHINE_ID) as i64) << MACHINE_ID_SHIFT)
            | (self.sequence as i64 & SEQUENCE_MASK)
    }

    /// The timestamp in Unix milliseconds.
    pub const fn unix_millis(&self) -> i64 {
        self.timestamp + SNOWFLAKE_EPOCH_MS
    }

    /// The instant the id was generated at, at millisecond precision.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.unix_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_documented_shifts() {
        assert_eq!(TIMESTAMP_SHIFT, 18);
        assert_eq!(DATA_CENTER_ID_SHIFT, 14);
        assert_eq!(MACHINE_ID_SHIFT, 10);
        assert_eq!(SEQUENCE_MASK, 0x3FF);
        assert_eq!(MAX_MACHINE_ID, 15);
        assert_eq!(MAX_DATA_CENTER_ID, 15);
    }

    #[test]
    fn compose_places_each_field() {
        let id = SnowflakeParts {
            timestamp: 1,
            data_center_id: 1,
            machine_id: 1,
            sequence: 1,
        }
        .compose();
        assert_eq!(id, (1 << 18) | (1 << 14) | (1 << 10) | 1);
    }

    #[test]
    fn max_fields_stay_positive() {
        let id = SnowflakeParts {
            timestamp: MAX_TIMESTAMP,
            data_center_id: MAX_DATA_CENTER_ID,
            machine_id: MAX_MACHINE_ID,
            sequence: 0x3FF,
        }
        .compose();
        assert_eq!(id, i64::MAX);
    }

    #[test]
    fn created_at_adds_epoch() {
        let parts = SnowflakeParts::from_id(0);
        assert_eq!(parts.unix_millis(), SNOWFLAKE_EPOCH_MS);
        assert_eq!(
            parts.created_at().unwrap().to_rfc3339(),
            "2020-01-01T00:00:00+00:00"
        );
    }
}
