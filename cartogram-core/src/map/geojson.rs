//! GeoJSON output types for exporting a map version.

use serde::{Deserialize, Serialize};
use tsify::Tsify;

use super::ids::RegionId;
use super::value::RegionValue;

const FEATURE_COLLECTION: &str = "FeatureCollection";
const FEATURE: &str = "Feature";
const MULTI_POLYGON: &str = "MultiPolygon";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub bbox: [f64; 4],
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(bbox: [f64; 4], features: Vec<Feature>) -> Self {
        FeatureCollection { kind: FEATURE_COLLECTION.to_string(), bbox, features }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: FeatureProperties,
    pub geometry: MultiPolygon,
}

impl Feature {
    pub fn new(properties: FeatureProperties, geometry: MultiPolygon) -> Self {
        Feature { kind: FEATURE.to_string(), properties, geometry }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct FeatureProperties {
    pub cartogram_id: RegionId,
    pub name: String,
    #[tsify(type = "number | \"NA\"")]
    pub value: RegionValue,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct MultiPolygon {
    #[serde(rename = "type")]
    pub kind: String,
    /// Polygons, each `[outer, hole, …]`, each ring a list of `[x, y]`.
    pub coordinates: Vec<Vec<Vec<[f64; 2]>>>,
}

impl MultiPolygon {
    pub fn new(coordinates: Vec<Vec<Vec<[f64; 2]>>>) -> Self {
        MultiPolygon { kind: MULTI_POLYGON.to_string(), coordinates }
    }
}
