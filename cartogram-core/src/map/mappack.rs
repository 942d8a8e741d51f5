//! Wire types for a mappack: the bundle of layers, colors, abbreviations,
//! labels and drawing config that describes one map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tsify::Tsify;

use super::ids::{deserialize_id, deserialize_ids, PolygonId, RegionId};
use super::value::RegionValue;
use crate::error::MapError;
use crate::geometry::bbox::Extrema;
use crate::geometry::polygon::Ring;
use crate::geometry::r2::R2;

pub const DEFAULT_DATA_NAMES: [&str; 2] = ["original", "population"];

/// Per-map drawing config. Some maps only draw properly with certain
/// polygons hidden or drawn last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(default)]
pub struct MapConfig {
    #[serde(deserialize_with = "deserialize_ids")]
    pub dont_draw: Vec<PolygonId>,
    #[serde(deserialize_with = "deserialize_ids")]
    pub elevate: Vec<PolygonId>,
    pub data_names: Option<Vec<String>>,
    /// CSS font size for abbreviation labels, e.g. `"9px"`.
    pub label_size: Option<String>,
    /// Cosmetic multiplier on the provisional canvas size.
    pub scale: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            dont_draw: vec![],
            elevate: vec![],
            data_names: None,
            label_size: None,
            scale: 1.,
        }
    }
}

impl MapConfig {
    pub fn data_names(&self) -> Vec<String> {
        match &self.data_names {
            Some(names) if !names.is_empty() => names.clone(),
            _ => DEFAULT_DATA_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct TextLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct LineLabel {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Pre-rendered labels, in the coordinates of the drawing they were made
/// on; `scale_x` / `scale_y` map geojson units to those coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Labels {
    pub scale_x: f64,
    pub scale_y: f64,
    #[serde(default, rename = "skipSVG", skip_serializing_if = "Option::is_none")]
    pub skip_svg: Option<bool>,
    #[serde(default)]
    pub labels: Vec<TextLabel>,
    #[serde(default)]
    pub lines: Vec<LineLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct TooltipEntry {
    pub name: String,
    #[serde(default)]
    #[tsify(type = "number | \"NA\"")]
    pub value: RegionValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Tooltip {
    pub label: String,
    #[serde(default)]
    pub unit: String,
    /// Keyed `id_<region id>`.
    pub data: BTreeMap<String, TooltipEntry>,
}

impl Tooltip {
    pub fn region(&self, region_id: &str) -> Result<&TooltipEntry, MapError> {
        self.data
            .get(&format!("id_{}", region_id))
            .ok_or_else(|| MapError::MissingRegionData(region_id.to_string()))
    }
}

/// One map layer, in either GeoJSON form (`bbox`) or the legacy form
/// (`extrema`). `features` is parsed once the form is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f64; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extrema: Option<Extrema>,
    #[serde(default)]
    pub features: Value,
    pub tooltip: Tooltip,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<String>,
}

impl LayerData {
    pub fn is_world(&self) -> bool {
        self.extent.as_deref() == Some("world")
    }
}

/// A legacy polygon record; records sharing `id` belong to one region.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyFeature {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: RegionId,
    pub properties: LegacyProperties,
    pub coordinates: Ring,
    #[serde(default)]
    pub holes: Vec<Ring>,
    #[serde(default, rename = "representPt")]
    pub represent_pt: Option<R2<f64>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyProperties {
    #[serde(deserialize_with = "deserialize_id")]
    pub polygon_id: PolygonId,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoFeature {
    pub geometry: Geometry,
    pub properties: GeoProperties,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoProperties {
    #[serde(deserialize_with = "deserialize_id")]
    pub cartogram_id: RegionId,
}

/// Geometry with its coordinates left unparsed until `type` is checked.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

/// A whole mappack. Every top-level key besides the known ones is a layer,
/// parsed on demand by [`Mappack::layer`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mappack {
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default)]
    pub abbreviations: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
    #[serde(default)]
    pub config: MapConfig,
    #[serde(flatten)]
    pub layers: BTreeMap<String, Value>,
}

impl Mappack {
    pub fn from_json(json: &str) -> Result<Mappack, MapError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn layer(&self, name: &str) -> Result<LayerData, MapError> {
        let value = self
            .layers
            .get(name)
            .ok_or_else(|| MapError::MissingLayer(name.to_string()))?;
        Ok(LayerData::deserialize(value)?)
    }
}
