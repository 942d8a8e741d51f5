//! Region, polygon and config ids arrive as JSON strings or numbers; they're
//! normalized to strings on the way in.

use serde::{Deserialize, Deserializer};

pub type RegionId = String;
pub type PolygonId = String;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Str(String),
    Int(i64),
    Float(f64),
}

impl From<RawId> for String {
    fn from(id: RawId) -> String {
        match id {
            RawId::Str(s) => s,
            RawId::Int(i) => i.to_string(),
            // `12.0` renders as `12`, matching the integer form.
            RawId::Float(f) => f.to_string(),
        }
    }
}

pub fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

pub fn deserialize_ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let ids = Vec::<RawId>::deserialize(deserializer)?;
    Ok(ids.into_iter().map(String::from).collect())
}
