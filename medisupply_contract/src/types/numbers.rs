//! Serde adapters for numeric record fields
//!
//! The validator treats a JSON number by value: `2` and `2.0` are the same
//! integer. Records follow suit. Counts deserialize from any integral number
//! within the safe range, and measures that hold an integral value serialize
//! without a fraction, the way the web client writes them.

use crate::schema::MAX_SAFE_INTEGER;
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

fn as_safe_integer(value: f64) -> Option<i64> {
    let negative_zero = value == 0.0 && value.is_sign_negative();
    if value.is_finite()
        && value.fract() == 0.0
        && value.abs() <= MAX_SAFE_INTEGER as f64
        && !negative_zero
    {
        Some(value as i64)
    } else {
        None
    }
}

/// `f64` fields: prices, coordinates, the snapshot version
pub mod real {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        match as_safe_integer(*value) {
            Some(integer) => serializer.serialize_i64(integer),
            None => serializer.serialize_f64(*value),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        f64::deserialize(deserializer)
    }
}

/// `Option<f64>` fields
pub mod real_opt {
    use super::*;

    struct Real(f64);

    impl Serialize for Real {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            real::serialize(&self.0, serializer)
        }
    }

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_some(&Real(*v)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        Option::<f64>::deserialize(deserializer)
    }
}

struct CountVisitor;

impl<'de> Visitor<'de> for CountVisitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a non-negative integer no larger than {}", MAX_SAFE_INTEGER)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
        if v <= MAX_SAFE_INTEGER {
            Ok(v)
        } else {
            Err(E::invalid_value(Unexpected::Unsigned(v), &self))
        }
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
        match u64::try_from(v) {
            Ok(unsigned) => self.visit_u64(unsigned),
            Err(_) => Err(E::invalid_value(Unexpected::Signed(v), &self)),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<u64, E> {
        match as_safe_integer(v).and_then(|i| u64::try_from(i).ok()) {
            Some(count) => Ok(count),
            None if v == 0.0 => Ok(0),
            None => Err(E::invalid_value(Unexpected::Float(v), &self)),
        }
    }
}

struct Count(u64);

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_u64(CountVisitor).map(Count)
    }
}

/// `u64` fields: stock and quantities
pub mod count {
    use super::*;

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        Count::deserialize(deserializer).map(|c| c.0)
    }
}

/// `Option<u64>` fields
pub mod count_opt {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        Option::<Count>::deserialize(deserializer).map(|c| c.map(|c| c.0))
    }
}
