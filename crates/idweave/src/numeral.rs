use crate::error::{Error, Result};

/// Digits used by [`NumeralSystem::new`]: the first `radix` characters of this
/// alphabet are the digits `0..radix`.
pub const DEFAULT_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Radix used by [`NumeralSystem::default`].
pub const DEFAULT_RADIX: usize = 52;

/// A positional numeral system over an ASCII alphabet.
///
/// Rendering is one-way: it exists to make ids compact, not to be decoded.
///
/// # Example
///
/// ```
/// use idweave::NumeralSystem;
///
/// let hex = NumeralSystem::new(16).unwrap();
/// assert_eq!(hex.encode(255), "FF");
///
/// let binary = NumeralSystem::with_alphabet("01").unwrap();
/// assert_eq!(binary.encode(5), "101");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NumeralSystem {
    digits: Box<[u8]>,
}

impl NumeralSystem {
    /// A numeral system over the first `radix` characters of
    /// [`DEFAULT_ALPHABET`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRadix`] unless `2 <= radix <= 62`.
    pub fn new(radix: usize) -> Result<Self> {
        let max = DEFAULT_ALPHABET.len();
        if !(2..=max).contains(&radix) {
            return Err(Error::InvalidRadix { radix, max });
        }
        Ok(Self {
            digits: DEFAULT_ALPHABET.as_bytes()[..radix].into(),
        })
    }

    /// A numeral system whose digits are the characters of `alphabet`, in
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAlphabet`] if the alphabet has fewer than two
    /// characters, contains anything other than printable ASCII, contains
    /// `-` (reserved for the sign), or repeats a character.
    pub fn with_alphabet(alphabet: &str) -> Result<Self> {
        if alphabet.len() < 2 {
            return Err(Error::InvalidAlphabet {
                reason: "needs at least two digits",
            });
        }

        let mut seen = [false; 128];
        for &b in alphabet.as_bytes() {
            if !b.is_ascii_graphic() {
                return Err(Error::InvalidAlphabet {
                    reason: "digits must be printable ASCII",
                });
            }
            if b == b'-' {
                return Err(Error::InvalidAlphabet {
                    reason: "'-' is reserved for the sign",
                });
            }
            if core::mem::replace(&mut seen[usize::from(b)], true) {
                return Err(Error::InvalidAlphabet {
                    reason: "digits must be distinct",
                });
            }
        }

        Ok(Self {
            digits: alphabet.as_bytes().into(),
        })
    }

    /// The number of digits.
    pub fn radix(&self) -> usize {
        self.digits.len()
    }

    /// Renders `value`, most significant digit first. Negative values get a
    /// leading `-`.
    pub fn encode(&self, value: i64) -> String {
        let magnitude = self.encode_u64(value.unsigned_abs());
        if value < 0 {
            format!("-{magnitude}")
        } else {
            magnitude
        }
    }

    /// Renders `value`, most significant digit first.
    pub fn encode_u64(&self, mut value: u64) -> String {
        let radix = self.digits.len() as u64;
        // 64 digits is enough for radix 2.
        let mut buf = [0_u8; 64];
        let mut pos = buf.len();
        loop {
            pos -= 1;
            buf[pos] = self.digits[(value % radix) as usize];
            value /= radix;
            if value == 0 {
                break;
            }
        }
        buf[pos..].iter().map(|&b| char::from(b)).collect()
    }
}

impl Default for NumeralSystem {
    fn default() -> Self {
        Self {
            digits: DEFAULT_ALPHABET.as_bytes()[..DEFAULT_RADIX].into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_radix_52() {
        let system = NumeralSystem::default();
        assert_eq!(system.radix(), 52);
        assert_eq!(system, NumeralSystem::new(52).unwrap());
        assert_eq!(system.encode(51), "p");
        assert_eq!(system.encode(52), "10");
    }

    #[test]
    fn zero_renders_as_first_digit() {
        assert_eq!(NumeralSystem::default().encode(0), "0");
        assert_eq!(NumeralSystem::with_alphabet("ab").unwrap().encode(0), "a");
    }

    #[test]
    fn extremes_render() {
        let binary = NumeralSystem::new(2).unwrap();
        assert_eq!(binary.encode_u64(u64::MAX), "1".repeat(64));
        assert_eq!(NumeralSystem::new(16).unwrap().encode(i64::MIN), "-8000000000000000");
        assert_eq!(NumeralSystem::new(36).unwrap().encode(i64::MAX), "1Y2P0IJ32E8E7");
    }

    #[test]
    fn longer_values_render_longer() {
        let system = NumeralSystem::default();
        let mut last = 0;
        for exp in 0..10 {
            let len = system.encode(52_i64.pow(exp)).len();
            assert_eq!(len, exp as usize + 1);
            assert!(len > last);
            last = len;
        }
    }

    #[test]
    fn radix_out_of_range_is_rejected() {
        assert_eq!(
            NumeralSystem::new(1),
            Err(Error::InvalidRadix { radix: 1, max: 62 })
        );
        assert_eq!(
            NumeralSystem::new(63),
            Err(Error::InvalidRadix { radix: 63, max: 62 })
        );
    }

    #[test]
    fn bad_alphabets_are_rejected() {
        for alphabet in ["", "a", "aa", "a b", "ab-", "aé"] {
            assert!(
                matches!(
                    NumeralSystem::with_alphabet(alphabet),
                    Err(Error::InvalidAlphabet { .. })
                ),
                "{alphabet:?}"
            );
        }
    }
}
