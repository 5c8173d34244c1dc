use core::fmt;

use uuid::Uuid;

/// Milliseconds between 0001-01-01T00:00:00Z and the Unix epoch.
///
/// COMB timestamps count milliseconds from year 1 so ids stay bit-compatible
/// with COMB values produced by .NET `DateTime` tick arithmetic.
pub const COMB_EPOCH_OFFSET_MS: i64 = 62_135_596_800_000;

/// Number of timestamp bytes embedded in a COMB id.
pub const COMB_TIMESTAMP_LEN: usize = 6;

/// Number of random bytes embedded in a COMB id.
pub const COMB_RANDOM_LEN: usize = 10;

/// Selects where the timestamp lands inside a COMB id, depending on how the
/// target database compares GUID values.
///
/// | Mode       | Engine bytes                          | Target storage                      |
/// |------------|---------------------------------------|-------------------------------------|
/// | `AsString` | timestamp `[0..6)`, random `[6..16)`  | MySQL `CHAR(36)`, SQLite `TEXT`     |
/// | `AsBinary` | timestamp `[0..6)`, random `[6..16)`  | Oracle `RAW(16)`                    |
/// | `AtEnd`    | random `[0..10)`, timestamp `[10..16)`| SQL Server `UNIQUEIDENTIFIER`       |
///
/// `AsString` and `AsBinary` share an engine layout but differ in how the
/// value is built. A .NET `Guid(byte[])` reads its first three fields
/// little-endian, which is exactly [`Uuid::from_bytes_le`]; `AsBinary` and
/// `AtEnd` go through it so [`Self::storage_bytes`] hands back the engine
/// bytes. `AsString` needs the canonical string to start with the timestamp in
/// order, and `Uuid`'s string rendering already follows its byte order, so
/// that mode uses [`Uuid::from_bytes`] directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CombGenerationMode {
    /// Sortable by the canonical string rendering.
    AsString,
    /// Sortable by the raw 16-byte sequence.
    AsBinary,
    /// Sortable by SQL Server's `UNIQUEIDENTIFIER` comparison, which treats
    /// the last 6 bytes as most significant.
    #[default]
    AtEnd,
}

impl CombGenerationMode {
    /// Builds the GUID value for this mode from its timestamp and random
    /// parts.
    pub fn assemble(
        self,
        timestamp: [u8; COMB_TIMESTAMP_LEN],
        random: [u8; COMB_RANDOM_LEN],
    ) -> Uuid {
        let mut bytes = [0_u8; 16];
        match self {
            Self::AsString | Self::AsBinary => {
                bytes[..COMB_TIMESTAMP_LEN].copy_from_slice(&timestamp);
                bytes[COMB_TIMESTAMP_LEN..].copy_from_slice(&random);
            }
            Self::AtEnd => {
                bytes[..COMB_RANDOM_LEN].copy_from_slice(&random);
                bytes[COMB_RANDOM_LEN..].copy_from_slice(&timestamp);
            }
        }

        match self {
            Self::AsString => Uuid::from_bytes(bytes),
            Self::AsBinary | Self::AtEnd => Uuid::from_bytes_le(bytes),
        }
    }

    /// Returns the 16 bytes in the order the target engine compares them.
    ///
    /// For `AsBinary` and `AtEnd` these are the bytes to persist in binary
    /// columns. For `AsString` they are the bytes of the canonical string
    /// rendering.
    pub fn storage_bytes(self, id: &Uuid) -> [u8; 16] {
        match self {
            Self::AsString => *id.as_bytes(),
            Self::AsBinary | Self::AtEnd => id.to_bytes_le(),
        }
    }

    /// Decodes the embedded timestamp of an id produced in this mode, in Unix
    /// milliseconds.
    pub fn timestamp_millis(self, id: &Uuid) -> i64 {
        let bytes = self.storage_bytes(id);
        let range = match self {
            Self::AsString | Self::AsBinary => 0..COMB_TIMESTAMP_LEN,
            Self::AtEnd => COMB_RANDOM_LEN..16,
        };

        let mut wide = [0_u8; 8];
        wide[8 - COMB_TIMESTAMP_LEN..].copy_from_slice(&bytes[range]);
        i64::from_be_bytes(wide) - COMB_EPOCH_OFFSET_MS
    }
}

impl fmt::Display for CombGenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AsString => "as-string",
            Self::AsBinary => "as-binary",
            Self::AtEnd => "at-end",
        })
    }
}

/// Encodes Unix milliseconds as the 6 low-order bytes of the big-endian
/// year-1 millisecond count.
///
/// Dropping the two high bytes bounds the representable range (well past the
/// year 8000), which matches how existing COMB values were produced.
pub(crate) fn timestamp_bytes(unix_ms: i64) -> [u8; COMB_TIMESTAMP_LEN] {
    let wide = (unix_ms + COMB_EPOCH_OFFSET_MS).to_be_bytes();
    let mut out = [0_u8; COMB_TIMESTAMP_LEN];
    out.copy_from_slice(&wide[8 - COMB_TIMESTAMP_LEN..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: [u8; 6] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
    const RAND: [u8; 10] = [0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9];

    #[test]
    fn as_string_renders_timestamp_first() {
        let id = CombGenerationMode::AsString.assemble(TS, RAND);
        assert_eq!(id.to_string(), "01020304-0506-a0a1-a2a3-a4a5a6a7a8a9");
    }

    #[test]
    fn as_binary_stores_timestamp_first() {
        let id = CombGenerationMode::AsBinary.assemble(TS, RAND);
        let stored = CombGenerationMode::AsBinary.storage_bytes(&id);
        assert_eq!(&stored[..6], &TS);
        assert_eq!(&stored[6..], &RAND);
        // Same rendering a .NET Guid built from these bytes would print.
        assert_eq!(id.to_string(), "04030201-0605-a1a0-a2a3-a4a5a6a7a8a9");
    }

    #[test]
    fn at_end_stores_timestamp_last() {
        let id = CombGenerationMode::AtEnd.assemble(TS, RAND);
        assert_eq!(&id.as_bytes()[10..], &TS);
        let stored = CombGenerationMode::AtEnd.storage_bytes(&id);
        assert_eq!(&stored[..10], &RAND);
        assert_eq!(&stored[10..], &TS);
    }

    #[test]
    fn timestamp_survives_each_mode() {
        let unix_ms = 1_700_000_000_123;
        for mode in [
            CombGenerationMode::AsString,
            CombGenerationMode::AsBinary,
            CombGenerationMode::AtEnd,
        ] {
            let id = mode.assemble(timestamp_bytes(unix_ms), RAND);
            assert_eq!(mode.timestamp_millis(&id), unix_ms, "{mode}");
        }
    }

    #[test]
    fn timestamp_bytes_are_big_endian_year_one_millis() {
        let bytes = timestamp_bytes(0);
        let mut wide = [0_u8; 8];
        wide[2..].copy_from_slice(&bytes);
        assert_eq!(i64::from_be_bytes(wide), COMB_EPOCH_OFFSET_MS);
    }
}
