use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A region's data value for one map version.
///
/// On the wire, a value may be a number, a numeric string, `"NA"`, `""` or
/// `null`; anything non-numeric is [`RegionValue::NotAvailable`]. It is
/// written back as a number or `"NA"`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RegionValue {
    Known(f64),
    #[default]
    NotAvailable,
}

pub const NA: &str = "NA";

impl RegionValue {
    pub fn known(&self) -> Option<f64> {
        match self {
            RegionValue::Known(v) => Some(*v),
            RegionValue::NotAvailable => None,
        }
    }

    pub fn is_na(&self) -> bool {
        matches!(self, RegionValue::NotAvailable)
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => RegionValue::Known(v),
            _ => RegionValue::NotAvailable,
        }
    }
}

impl From<f64> for RegionValue {
    fn from(v: f64) -> Self {
        if v.is_finite() {
            RegionValue::Known(v)
        } else {
            RegionValue::NotAvailable
        }
    }
}

impl From<Option<f64>> for RegionValue {
    fn from(v: Option<f64>) -> Self {
        v.map(RegionValue::from).unwrap_or_default()
    }
}

impl fmt::Display for RegionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionValue::Known(v) => write!(f, "{}", v),
            RegionValue::NotAvailable => write!(f, "{}", NA),
        }
    }
}

impl Serialize for RegionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RegionValue::Known(v) => serializer.serialize_f64(*v),
            RegionValue::NotAvailable => serializer.serialize_str(NA),
        }
    }
}

struct RegionValueVisitor;

impl<'de> de::Visitor<'de> for RegionValueVisitor {
    type Value = RegionValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a number, a numeric string, \"NA\", \"\" or null")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<RegionValue, E> {
        Ok(RegionValue::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RegionValue, E> {
        Ok(RegionValue::Known(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RegionValue, E> {
        Ok(RegionValue::Known(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RegionValue, E> {
        Ok(RegionValue::parse(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<RegionValue, E> {
        Ok(RegionValue::NotAvailable)
    }

    fn visit_none<E: de::Error>(self) -> Result<RegionValue, E> {
        Ok(RegionValue::NotAvailable)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<RegionValue, D::Error> {
        d.deserialize_any(self)
    }
}

impl<'de> Deserialize<'de> for RegionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RegionValueVisitor)
    }
}
