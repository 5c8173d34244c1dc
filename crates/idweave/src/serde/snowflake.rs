use serde::{Deserializer, Serializer};

/// Serializes Snowflake ids as decimal strings.
///
/// 64-bit integers lose precision in JavaScript and in any JSON consumer that
/// parses numbers as doubles, so Snowflake ids crossing such a boundary are
/// usually carried as strings.
///
/// ```
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Order {
///     #[serde(with = "idweave::serde::as_decimal_string")]
///     id: i64,
/// }
/// ```
pub mod as_decimal_string {
    use super::{Deserializer, Serializer};

    /// Serialize an id as its decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &i64, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// Deserialize an id from a decimal string. Bare integers are accepted
    /// too.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not a decimal integer that fits in `i64`
    /// - The value is negative, which no Snowflake generator produces
    pub fn deserialize<'de, D>(d: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl serde::de::Visitor<'_> for DecimalVisitor {
            type Value = i64;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a non-negative decimal Snowflake id")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let id: i64 = v.parse().map_err(serde::de::Error::custom)?;
                self.visit_i64(id)
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if v < 0 {
                    return Err(serde::de::Error::invalid_value(
                        serde::de::Unexpected::Signed(v),
                        &self,
                    ));
                }
                Ok(v)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                i64::try_from(v).map_err(|_| {
                    serde::de::Error::invalid_value(serde::de::Unexpected::Unsigned(v), &self)
                })
            }
        }

        d.deserialize_any(DecimalVisitor)
    }
}
