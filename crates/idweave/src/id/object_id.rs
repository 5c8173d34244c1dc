use core::{fmt, str::FromStr};

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// Length of an ObjectId in bytes.
pub const OBJECT_ID_LEN: usize = 12;

/// Length of an ObjectId's hex rendering.
pub const OBJECT_ID_HEX_LEN: usize = OBJECT_ID_LEN * 2;

/// A decomposed view over a 12-byte MongoDB-style ObjectId.
///
/// ```text
///  Byte:   0         4            7          9           12
///          +---------+------------+----------+-----------+
///  Field:  | seconds | machine    | process  | increment |
///          | (BE 32) | hash (24)  | id (16)  | (BE 24)   |
///          +---------+------------+----------+-----------+
/// ```
///
/// Every field is stored most-significant byte first, so comparing two
/// descriptors byte by byte (which is what [`Ord`] does) orders them the same
/// way as comparing their hex renderings ordinally.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectIdDescriptor {
    bytes: [u8; OBJECT_ID_LEN],
}

/// Alias under the generator family's naming, see
/// [`MongoIdentificationGenerator`](crate::MongoIdentificationGenerator).
pub type MonggoIdentificationDescriptor = ObjectIdDescriptor;

impl ObjectIdDescriptor {
    /// The all-zero ObjectId, rendered as `"000000000000000000000000"`.
    pub const EMPTY: Self = Self {
        bytes: [0; OBJECT_ID_LEN],
    };

    /// Wraps 12 raw bytes.
    pub const fn from_bytes(bytes: [u8; OBJECT_ID_LEN]) -> Self {
        Self { bytes }
    }

    /// Assembles an ObjectId from its fields. Only the low 24 bits of
    /// `increment` are kept.
    pub fn from_parts(seconds: u32, machine_hash: [u8; 3], process_id: u16, increment: u32) -> Self {
        let mut bytes = [0_u8; OBJECT_ID_LEN];
        bytes[0..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..7].copy_from_slice(&machine_hash);
        bytes[7..9].copy_from_slice(&process_id.to_be_bytes());
        bytes[9..12].copy_from_slice(&increment.to_be_bytes()[1..]);
        Self { bytes }
    }

    /// Parses a 24-character hex string.
    ///
    /// Parsing is strict: any character outside `[0-9a-fA-F]` rejects the
    /// whole input instead of decoding that byte as zero.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidObjectIdLength`] if `input` is not 24 characters.
    /// - [`Error::InvalidObjectIdHex`] on the first non-hex character.
    ///
    /// # Example
    ///
    /// ```
    /// use idweave::ObjectIdDescriptor;
    ///
    /// let id = ObjectIdDescriptor::parse("5f1d7f3a0102030405000001").unwrap();
    /// assert_eq!(id.timestamp(), 0x5f1d7f3a);
    /// assert_eq!(id.machine_id(), 0x010203);
    /// assert_eq!(id.process_id(), 0x0405);
    /// assert_eq!(id.increment(), 1);
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        if input.len() != OBJECT_ID_HEX_LEN {
            return Err(Error::InvalidObjectIdLength { len: input.len() });
        }

        let mut bytes = [0_u8; OBJECT_ID_LEN];
        hex::decode_to_slice(input, &mut bytes).map_err(|e| match e {
            hex::FromHexError::InvalidHexCharacter { c, index } => Error::InvalidObjectIdHex {
                character: c,
                index,
            },
            _ => Error::InvalidObjectIdLength { len: input.len() },
        })?;
        Ok(Self { bytes })
    }

    /// The raw bytes.
    pub const fn as_bytes(&self) -> &[u8; OBJECT_ID_LEN] {
        &self.bytes
    }

    /// The 24-character lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Seconds since the Unix epoch, bytes `[0..4)` read big-endian.
    pub const fn timestamp(&self) -> i32 {
        i32::from_be_bytes([self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]])
    }

    /// Machine hash, bytes `[4..7)` read big-endian.
    pub const fn machine_id(&self) -> i32 {
        i32::from_be_bytes([0, self.bytes[4], self.bytes[5], self.bytes[6]])
    }

    /// Process id fragment, bytes `[7..9)` read as a big-endian `i16` and
    /// sign-extended.
    pub const fn process_id(&self) -> i32 {
        i16::from_be_bytes([self.bytes[7], self.bytes[8]]) as i32
    }

    /// Counter value, bytes `[9..12)` read big-endian.
    pub const fn increment(&self) -> i32 {
        i32::from_be_bytes([0, self.bytes[9], self.bytes[10], self.bytes[11]])
    }

    /// The generation time, at second precision.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::from(self.timestamp() as u32), 0)
    }

    /// Whether this is [`Self::EMPTY`].
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl Default for ObjectIdDescriptor {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for ObjectIdDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectIdDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectIdDescriptor")
            .field("hex", &format_args!("{self}"))
            .field("timestamp", &self.timestamp())
            .field("machine_id", &self.machine_id())
            .field("process_id", &self.process_id())
            .field("increment", &self.increment())
            .finish()
    }
}

impl FromStr for ObjectIdDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<[u8; OBJECT_ID_LEN]> for ObjectIdDescriptor {
    fn from(bytes: [u8; OBJECT_ID_LEN]) -> Self {
        Self::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_renders_as_zeros() {
        assert_eq!(ObjectIdDescriptor::EMPTY.to_string(), "000000000000000000000000");
        assert!(ObjectIdDescriptor::default().is_empty());
    }

    #[test]
    fn display_matches_hex_rendering() {
        let id = ObjectIdDescriptor::from_parts(0xFFFF_0001, [0x0A, 0xB0, 0x00], 0x00FE, 0x0F_FFFF);
        assert_eq!(format!("{id}"), id.to_hex());
        assert_eq!(id.to_hex(), "ffff00010ab00000fe0fffff");
    }

    #[test]
    fn parse_format_roundtrip() {
        let hex = "65a1b2c3deadbe7fff00abcd";
        let id = ObjectIdDescriptor::parse(hex).unwrap();
        assert_eq!(id.to_string(), hex);
        assert_eq!(id.to_hex(), hex);
        assert_eq!(hex.parse::<ObjectIdDescriptor>().unwrap(), id);
    }

    #[test]
    fn fields_are_read_from_fixed_offsets() {
        let id = ObjectIdDescriptor::from_parts(0x65A1_B2C3, [0xDE, 0xAD, 0xBE], 0x7FFF, 0x00AB_CDEF);
        assert_eq!(id.timestamp(), 0x65A1_B2C3);
        assert_eq!(id.machine_id(), 0x00DE_ADBE);
        assert_eq!(id.process_id(), 0x7FFF);
        assert_eq!(id.increment(), 0x00AB_CDEF);
    }

    #[test]
    fn process_id_is_sign_extended() {
        let id = ObjectIdDescriptor::from_parts(0, [0; 3], 0xFFFE, 0);
        assert_eq!(id.process_id(), -2);
    }

    #[test]
    fn increment_keeps_low_24_bits() {
        let id = ObjectIdDescriptor::from_parts(0, [0; 3], 0, 0xFF12_3456);
        assert_eq!(id.increment(), 0x0012_3456);
    }

    #[test]
    fn uppercase_hex_is_accepted_and_lowercased() {
        let id = ObjectIdDescriptor::parse("65A1B2C3DEADBE7FFF00ABCD").unwrap();
        assert_eq!(id.to_string(), "65a1b2c3deadbe7fff00abcd");
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert_eq!(
            ObjectIdDescriptor::parse("abc"),
            Err(Error::InvalidObjectIdLength { len: 3 })
        );
        assert_eq!(
            ObjectIdDescriptor::parse(&"0".repeat(25)),
            Err(Error::InvalidObjectIdLength { len: 25 })
        );
    }

    #[test]
    fn malformed_pair_fails_instead_of_zeroing() {
        assert_eq!(
            ObjectIdDescriptor::parse("65a1b2c3zzadbe7fff00abcd"),
            Err(Error::InvalidObjectIdHex {
                character: 'z',
                index: 8
            })
        );
    }

    #[test]
    fn ordering_matches_hex_ordering() {
        let mut hexes = [
            "ffffffff0000000000000000",
            "0000000100000000000000ff",
            "00000001000000000000ff00",
            "7fffffffffffffffffffffff",
            "800000000000000000000000",
        ];
        let mut ids: Vec<_> = hexes
            .iter()
            .map(|h| ObjectIdDescriptor::parse(h).unwrap())
            .collect();
        hexes.sort_unstable();
        ids.sort();
        let rendered: Vec<_> = ids.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, hexes);
    }

    #[test]
    fn created_at_uses_unsigned_seconds() {
        let id = ObjectIdDescriptor::from_parts(0x8000_0000, [0; 3], 0, 0);
        assert_eq!(id.timestamp(), i32::MIN);
        assert_eq!(id.created_at().unwrap().timestamp(), 0x8000_0000);
    }
}
