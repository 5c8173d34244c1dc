use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::id::ObjectIdDescriptor;

/// ObjectIds serialize as their 24-character lowercase hex rendering.
impl Serialize for ObjectIdDescriptor {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&self.to_hex())
    }
}

/// ObjectIds deserialize from a 24-character hex string, rejecting malformed
/// input.
impl<'de> Deserialize<'de> for ObjectIdDescriptor {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct HexVisitor;

        impl serde::de::Visitor<'_> for HexVisitor {
            type Value = ObjectIdDescriptor;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a 24-character hex ObjectId")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                ObjectIdDescriptor::parse(v).map_err(serde::de::Error::custom)
            }
        }

        d.deserialize_str(HexVisitor)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::Error;

    #[test]
    fn hex_string_roundtrip() {
        let id = ObjectIdDescriptor::parse("65a1b2c3deadbe7fff00abcd").unwrap();
        let json = serde_json::to_value(id).expect("serialize");
        assert_eq!(json, json!("65a1b2c3deadbe7fff00abcd"));
        let back: ObjectIdDescriptor = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, id);
    }

    #[test]
    fn malformed_hex_reports_parse_error() {
        let err = serde_json::from_value::<ObjectIdDescriptor>(json!("65a1b2c3zzadbe7fff00abcd"))
            .expect_err("should fail");
        assert_eq!(
            err.to_string(),
            Error::InvalidObjectIdHex {
                character: 'z',
                index: 8
            }
            .to_string()
        );
    }

    #[test]
    fn comb_mode_uses_kebab_case() {
        use crate::CombGenerationMode;

        let json = serde_json::to_value(CombGenerationMode::AtEnd).expect("serialize");
        assert_eq!(json, json!("at-end"));
        let mode: CombGenerationMode = serde_json::from_value(json!("as-string")).expect("deserialize");
        assert_eq!(mode, CombGenerationMode::AsString);
    }
}
