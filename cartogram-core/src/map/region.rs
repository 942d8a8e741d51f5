use serde::{Deserialize, Serialize};
use tsify::Tsify;

use super::geojson::{Feature, FeatureProperties, MultiPolygon};
use super::ids::PolygonId;
use super::repo::Repo;
use super::value::RegionValue;
use crate::geometry::polygon::Polygon;
use crate::geometry::r2::R2;

/// A drawable polygon: its SVG path in canvas px, and the raw rings it was
/// drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct MapPolygon {
    pub id: PolygonId,
    pub path: String,
    pub raw: Polygon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tsify(type = "[number, number]", optional)]
    pub represent_pt: Option<R2<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct RegionVersion {
    /// Dataset name, e.g. "Population".
    pub name: String,
    pub unit: String,
    #[tsify(type = "number | \"NA\"")]
    pub value: RegionValue,
    pub polygons: Vec<MapPolygon>,
}

impl RegionVersion {
    /// Raw polygon area, holes subtracted.
    pub fn area(&self) -> f64 {
        self.polygons.iter().map(|p| p.raw.area()).sum()
    }

    pub fn polygon(&self, id: &str) -> Option<&MapPolygon> {
        self.polygons.iter().find(|p| p.id == id)
    }

    pub fn to_geojson(&self, name: &str, cartogram_id: &str) -> Feature {
        Feature::new(
            FeatureProperties {
                cartogram_id: cartogram_id.to_string(),
                name: name.to_string(),
                value: self.value,
                unit: self.unit.clone(),
            },
            MultiPolygon::new(self.polygons.iter().map(|p| p.raw.geojson_coords()).collect()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Region {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    pub versions: Repo<RegionVersion>,
}

impl Region {
    pub fn new(name: String, abbreviation: Option<String>) -> Self {
        Region {
            name,
            abbreviation: abbreviation.filter(|a| !a.is_empty()),
            versions: Repo::new(),
        }
    }

    /// The abbreviation, falling back to the full name.
    pub fn label(&self) -> &str {
        self.abbreviation.as_deref().unwrap_or(&self.name)
    }
}
