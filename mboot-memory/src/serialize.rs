//! Serializers writing addresses and sizes as hex strings for human readable formats
//! (YAML, JSON), and as plain integers for binary ones, and the matching deserializer.

use serde::{Deserializer, Serializer};

/// Unsigned words that can be written either as hex text or as an integer.
pub(crate) trait HexWord: std::fmt::LowerHex {
    fn serialize_int<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error>;
}

impl HexWord for u32 {
    fn serialize_int<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(*self)
    }
}

impl HexWord for u64 {
    fn serialize_int<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(*self)
    }
}

pub(crate) fn hex_u_int<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: HexWord,
    S: Serializer,
{
    if serializer.is_human_readable() {
        serializer.serialize_str(&format!("{value:#x}"))
    } else {
        value.serialize_int(serializer)
    }
}

pub(crate) fn hex_option<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: HexWord,
    S: Serializer,
{
    match value {
        Some(value) => serializer.serialize_some(&Hex(value)),
        None => serializer.serialize_none(),
    }
}

struct Hex<'a, T>(&'a T);

impl<T: HexWord> serde::Serialize for Hex<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        hex_u_int(self.0, serializer)
    }
}

/// Reads an address or size written either as an integer or as a string such as `"0x8000"`.
pub(crate) fn hex_or_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct HexOrIntVisitor;

    impl serde::de::Visitor<'_> for HexOrIntVisitor {
        type Value = u64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(formatter, "an unsigned integer or a hex string")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(v)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            u64::try_from(v).map_err(serde::de::Error::custom)
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_int::parse::<u64>(v).map_err(serde::de::Error::custom)
        }
    }

    if deserializer.is_human_readable() {
        deserializer.deserialize_any(HexOrIntVisitor)
    } else {
        deserializer.deserialize_u64(HexOrIntVisitor)
    }
}
