use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::id::{SnowflakeId, Ulid};

/// Serializes as the raw 64-bit integer.
impl Serialize for SnowflakeId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.to_raw().serialize(s)
    }
}

impl<'de> Deserialize<'de> for SnowflakeId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        u64::deserialize(d).map(Self::from_raw)
    }
}

/// Serializes as the canonical 26-character Crockford Base32 string.
impl Serialize for Ulid {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ulid {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct Base32Visitor;

        impl de::Visitor<'_> for Base32Visitor {
            type Value = Ulid;

            fn expecting(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                f.write_str("a 26-character Crockford Base32 string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ulid::from_base32(v).map_err(de::Error::custom)
            }
        }

        d.deserialize_str(Base32Visitor)
    }
}

#[cfg(test)]
mod tests {
    use crate::id::{SnowflakeId, Ulid};

    #[test]
    fn snowflake_roundtrips_as_integer() {
        let id = SnowflakeId::from_raw(4_194_439_168);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "4194439168");
        assert_eq!(serde_json::from_str::<SnowflakeId>(&json).unwrap(), id);
    }

    #[test]
    fn ulid_roundtrips_as_base32_string() {
        let id = Ulid::from_base32("01AN4Z07BY79KA1307SR9X4MV3").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"01AN4Z07BY79KA1307SR9X4MV3\"");
        assert_eq!(serde_json::from_str::<Ulid>(&json).unwrap(), id);
    }

    #[test]
    fn ulid_rejects_malformed_text() {
        assert!(serde_json::from_str::<Ulid>("\"not-a-ulid\"").is_err());
    }
}
