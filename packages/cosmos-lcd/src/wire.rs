//! Serde helpers for the way the LCD encodes numbers and bytes in JSON.
//!
//! Heights, gas amounts and sequence numbers cross the wire as decimal strings,
//! though some nodes (and some mocks) send plain JSON numbers instead. Both are
//! accepted and parsed into fixed-width integers. Floats are always rejected.

use std::{fmt::Display, marker::PhantomData, str::FromStr};

use base64::Engine;
use serde::{de::Visitor, Deserializer, Serializer};

/// Integers written as decimal strings, read from either strings or numbers.
pub(crate) mod int_string {
    use super::*;

    pub(crate) fn serialize<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Display,
    {
        serializer.collect_str(value)
    }

    pub(crate) fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr + TryFrom<u64> + TryFrom<i64>,
        <T as FromStr>::Err: Display,
    {
        deserializer.deserialize_any(IntVisitor(PhantomData))
    }
}

struct IntVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for IntVisitor<T>
where
    T: FromStr + TryFrom<u64> + TryFrom<i64>,
    <T as FromStr>::Err: Display,
{
    type Value = T;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("an integer or a string containing an integer")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        parse_int(v).map_err(E::custom)
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        <T as TryFrom<u64>>::try_from(v)
            .map_err(|_| E::custom(format!("Integer {v} out of range")))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        <T as TryFrom<i64>>::try_from(v)
            .map_err(|_| E::custom(format!("Integer {v} out of range")))
    }
}

/// Parse an integer the way it appears on the wire, with overflow checking.
pub(crate) fn parse_int<T>(s: &str) -> Result<T, String>
where
    T: FromStr,
    <T as FromStr>::Err: Display,
{
    s.parse().map_err(|e| format!("Invalid integer {s:?}: {e}"))
}

/// Byte strings encoded as standard base64.
pub(crate) mod base64_bytes {
    use super::*;

    pub(crate) fn serialize<S>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&encode(value))
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = serde::Deserialize::deserialize(deserializer)?;
        decode(&s).map_err(serde::de::Error::custom)
    }
}

/// Cosmos `Dec` values such as delegation shares, always sent as strings.
pub(crate) mod decimal_string {
    use rust_decimal::Decimal;

    use super::*;

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = serde::Deserialize::deserialize(deserializer)?;
        Decimal::from_str(&s)
            .map_err(|e| serde::de::Error::custom(format!("Invalid decimal {s:?}: {e}")))
    }
}

/// Protobuf JSON durations, e.g. `"1814400s"` or `"0.5s"`.
pub(crate) mod duration_string {
    use std::time::Duration;

    use super::*;

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = serde::Deserialize::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(crate) fn parse_duration(s: &str) -> Result<Duration, String> {
        let secs = s
            .strip_suffix('s')
            .ok_or_else(|| format!("Duration {s:?} must end in s"))?;
        let (whole, fraction) = secs.split_once('.').unwrap_or((secs, ""));
        let whole: u64 = parse_int(whole)?;
        if fraction.len() > 9 || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("Invalid fractional seconds in duration {s:?}"));
        }
        let nanos = if fraction.is_empty() {
            0
        } else {
            parse_int::<u32>(&format!("{fraction:0<9}"))?
        };
        Ok(Duration::new(whole, nanos))
    }
}

pub(crate) fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub(crate) fn decode(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    base64::engine::general_purpose::STANDARD.decode(s)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Heights {
        #[serde(with = "super::int_string")]
        height: i64,
        #[serde(with = "super::int_string")]
        gas: u64,
    }

    #[test]
    fn strings_and_numbers() {
        let from_strings: Heights =
            serde_json::from_str(r#"{"height":"20000","gas":"300000"}"#).unwrap();
        let from_numbers: Heights =
            serde_json::from_str(r#"{"height":20000,"gas":300000}"#).unwrap();
        assert_eq!(from_strings, from_numbers);
        assert_eq!(
            serde_json::to_string(&from_strings).unwrap(),
            r#"{"height":"20000","gas":"300000"}"#
        );
    }

    #[test]
    fn rejects_overflow_and_floats() {
        serde_json::from_str::<Heights>(r#"{"height":"1","gas":"18446744073709551616"}"#)
            .unwrap_err();
        serde_json::from_str::<Heights>(r#"{"height":"1","gas":-1}"#).unwrap_err();
        serde_json::from_str::<Heights>(r#"{"height":1.5,"gas":"1"}"#).unwrap_err();
    }

    #[test]
    fn durations() {
        use std::time::Duration;

        use super::duration_string::parse_duration;

        assert_eq!(parse_duration("1814400s").unwrap(), Duration::from_secs(1_814_400));
        assert_eq!(parse_duration("0.5s").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("1.000000001s").unwrap(), Duration::new(1, 1));
        parse_duration("1814400").unwrap_err();
        parse_duration("-1s").unwrap_err();
        parse_duration("1.5.5s").unwrap_err();
    }
}
