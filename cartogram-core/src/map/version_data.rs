//! Builds a [`MapVersionData`] from one mappack layer.
//!
//! Two layer formats are accepted. GeoJSON layers carry a `bbox` and
//! `Polygon` / `MultiPolygon` features keyed by `properties.cartogram_id`;
//! polygon ids are assigned by a [`PolygonIdCounter`]. Legacy layers carry
//! `extrema` and one record per polygon, each with its own `polygon_id`.

use std::collections::BTreeMap;

use log::debug;
use serde::Deserialize;

use super::ids::{PolygonId, RegionId};
use super::mappack::{GeoFeature, Labels, LayerData, LegacyFeature, Tooltip};
use super::value::RegionValue;
use crate::error::MapError;
use crate::geometry::bbox::Extrema;
use crate::geometry::polygon::{Polygon, Ring};
use crate::geometry::projection::{GallPeters, WorldProjection};
use crate::geometry::r2::R2;

/// Hands out sequential polygon ids for GeoJSON layers, starting at 1.
///
/// Every ring consumes an id, holes included, so ids line up with those in
/// legacy layers generated from the same source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolygonIdCounter {
    next: u64,
}

impl Default for PolygonIdCounter {
    fn default() -> Self {
        PolygonIdCounter { next: 1 }
    }
}

impl PolygonIdCounter {
    pub fn next_id(&mut self) -> PolygonId {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }

    pub fn skip(&mut self) {
        self.next += 1;
    }

    pub fn peek(&self) -> u64 {
        self.next
    }
}

/// One polygon in layer coordinates (projected, for world layers).
#[derive(Debug, Clone, PartialEq)]
pub struct RawPolygon {
    pub id: PolygonId,
    pub polygon: Polygon,
    pub represent_pt: Option<R2<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionData {
    pub polygons: Vec<RawPolygon>,
    pub name: String,
    pub value: RegionValue,
    pub abbreviation: Option<String>,
}

impl RegionData {
    pub fn area(&self) -> f64 {
        self.polygons.iter().map(|p| p.polygon.area()).sum()
    }
}

/// Map-wide extras only the base layer is built with.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionExtras<'a> {
    pub abbreviations: Option<&'a BTreeMap<String, String>>,
    pub labels: Option<&'a Labels>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapVersionData {
    pub extrema: Extrema,
    pub regions: BTreeMap<RegionId, RegionData>,
    pub name: String,
    pub unit: String,
    pub labels: Option<Labels>,
    pub world: bool,
}

enum LayerFormat {
    GeoJson([f64; 4]),
    Legacy(Extrema),
}

impl MapVersionData {
    pub fn from_layer(layer: &LayerData, extras: VersionExtras) -> Result<Self, MapError> {
        let mut counter = PolygonIdCounter::default();
        Self::from_layer_with_counter(layer, extras, &mut counter)
    }

    pub fn from_layer_with_counter(
        layer: &LayerData,
        extras: VersionExtras,
        counter: &mut PolygonIdCounter,
    ) -> Result<Self, MapError> {
        let format = match (layer.bbox, layer.extrema) {
            (Some(bbox), _) => LayerFormat::GeoJson(bbox),
            (None, Some(extrema)) => LayerFormat::Legacy(extrema),
            (None, None) => return Err(MapError::UnsupportedMapFormat),
        };
        let world = layer.is_world();
        let project = |p: R2<f64>| if world { GallPeters.transform_long_lat(p) } else { p };
        let mut builder = RegionsBuilder {
            tooltip: &layer.tooltip,
            abbreviations: extras.abbreviations,
            regions: BTreeMap::new(),
        };
        let extrema = match format {
            LayerFormat::GeoJson(bbox) => {
                let features = Vec::<GeoFeature>::deserialize(&layer.features)?;
                for feature in features {
                    let polygons = geo_polygons(&feature, counter, &project)?;
                    builder.add(&feature.properties.cartogram_id, polygons)?;
                }
                Extrema::from_bbox(bbox)
            }
            LayerFormat::Legacy(extrema) => {
                let features = Vec::<LegacyFeature>::deserialize(&layer.features)?;
                for feature in features {
                    let polygon = RawPolygon {
                        id: feature.properties.polygon_id,
                        polygon: Polygon::new(feature.coordinates, feature.holes).map(&project),
                        represent_pt: feature.represent_pt.map(&project),
                    };
                    builder.add(&feature.id, vec![polygon])?;
                }
                extrema
            }
        };
        let extrema = if world { GallPeters.extrema() } else { extrema };
        debug!(
            "{}: {} regions, extrema {:?}{}",
            layer.tooltip.label,
            builder.regions.len(),
            extrema,
            if world { " (world)" } else { "" },
        );
        Ok(MapVersionData {
            extrema,
            regions: builder.regions,
            name: layer.tooltip.label.clone(),
            unit: layer.tooltip.unit.clone(),
            labels: extras.labels.cloned(),
            world,
        })
    }

    /// Sum of all regions' polygon areas, in layer units.
    pub fn area(&self) -> f64 {
        self.regions.values().map(RegionData::area).sum()
    }
}

struct RegionsBuilder<'a> {
    tooltip: &'a Tooltip,
    abbreviations: Option<&'a BTreeMap<String, String>>,
    regions: BTreeMap<RegionId, RegionData>,
}

impl RegionsBuilder<'_> {
    /// Appends `polygons` to the region, creating it from tooltip data on
    /// first sight.
    fn add(&mut self, region_id: &str, polygons: Vec<RawPolygon>) -> Result<(), MapError> {
        if let Some(region) = self.regions.get_mut(region_id) {
            region.polygons.extend(polygons);
            return Ok(());
        }
        let entry = self.tooltip.region(region_id)?;
        let abbreviation = self
            .abbreviations
            .and_then(|abbrs| abbrs.get(&entry.name))
            .cloned();
        self.regions.insert(
            region_id.to_string(),
            RegionData {
                polygons,
                name: entry.name.clone(),
                value: entry.value,
                abbreviation,
            },
        );
        Ok(())
    }
}

/// The first ring is the boundary and takes the next id; each hole
/// consumes one more.
fn geo_polygon(
    rings: Vec<Ring>,
    counter: &mut PolygonIdCounter,
    project: impl Fn(R2<f64>) -> R2<f64>,
) -> RawPolygon {
    let id = counter.next_id();
    let mut rings = rings.into_iter();
    let outer = rings.next().unwrap_or_default();
    let holes: Vec<Ring> = rings.collect();
    for _ in &holes {
        counter.skip();
    }
    RawPolygon {
        id,
        polygon: Polygon::new(outer, holes).map(project),
        represent_pt: None,
    }
}

fn geo_polygons(
    feature: &GeoFeature,
    counter: &mut PolygonIdCounter,
    project: impl Fn(R2<f64>) -> R2<f64>,
) -> Result<Vec<RawPolygon>, MapError> {
    let geometry = &feature.geometry;
    match geometry.kind.as_str() {
        "Polygon" => {
            let rings = Vec::<Ring>::deserialize(&geometry.coordinates)?;
            Ok(vec![geo_polygon(rings, counter, &project)])
        }
        "MultiPolygon" => {
            let polygons = Vec::<Vec<Ring>>::deserialize(&geometry.coordinates)?;
            Ok(polygons
                .into_iter()
                .map(|rings| geo_polygon(rings, counter, &project))
                .collect())
        }
        kind => Err(MapError::UnsupportedFeatureType(kind.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use serde_json::json;
    use super::*;
    use test_log::test;

    fn tooltip() -> serde_json::Value {
        json!({
            "label": "Population",
            "unit": "people",
            "data": {
                "id_1": {"name": "Alpha", "value": 100},
                "id_2": {"name": "Beta", "value": "NA"},
            }
        })
    }

    fn layer(value: serde_json::Value) -> LayerData {
        serde_json::from_value(value).unwrap()
    }

    fn square(x: f64, y: f64, s: f64) -> serde_json::Value {
        json!([[x, y], [x + s, y], [x + s, y + s], [x, y + s], [x, y]])
    }

    #[test]
    fn geojson_ids() {
        let l = layer(json!({
            "bbox": [0, 0, 20, 10],
            "features": [
                {
                    "type": "Feature",
                    "properties": {"cartogram_id": 1},
                    "geometry": {"type": "Polygon", "coordinates": [square(0., 0., 10.), square(2., 2., 2.), square(6., 6., 2.)]},
                },
                {
                    "type": "Feature",
                    "properties": {"cartogram_id": "2"},
                    "geometry": {"type": "MultiPolygon", "coordinates": [[square(10., 0., 5.)], [square(15., 0., 5.), square(16., 1., 1.)]]},
                },
            ],
            "tooltip": tooltip(),
        }));
        let mut counter = PolygonIdCounter::default();
        let data = MapVersionData::from_layer_with_counter(&l, VersionExtras::default(), &mut counter).unwrap();
        assert_eq!(data.name, "Population");
        assert_eq!(data.unit, "people");
        assert_eq!(data.extrema, Extrema { min_x: 0., max_x: 20., min_y: 0., max_y: 10. });

        // Polygon: boundary 1, holes 2 and 3. MultiPolygon: 4, then 5 (hole 6).
        let ids = |r: &str| -> Vec<String> { data.regions[r].polygons.iter().map(|p| p.id.clone()).collect() };
        assert_eq!(ids("1"), vec!["1"]);
        assert_eq!(ids("2"), vec!["4", "5"]);
        assert_eq!(counter.peek(), 7);

        assert_relative_eq!(data.regions["1"].area(), 100. - 4. - 4.);
        assert_relative_eq!(data.regions["2"].area(), 25. + 25. - 1.);
        assert!(data.regions["2"].value.is_na());
        assert_eq!(data.regions["1"].abbreviation, None);
    }

    #[test]
    fn legacy_records_accumulate() {
        let abbreviations = BTreeMap::from([("Alpha".to_string(), "AL".to_string())]);
        let l = layer(json!({
            "extrema": {"min_x": 0, "max_x": 20, "min_y": 0, "max_y": 10},
            "features": [
                {"id": 1, "properties": {"polygon_id": 11}, "coordinates": square(0., 0., 4.), "representPt": [2, 2]},
                {"id": "1", "properties": {"polygon_id": "12"}, "coordinates": square(5., 0., 4.), "holes": [square(6., 1., 1.)]},
                {"id": 2, "properties": {"polygon_id": 13}, "coordinates": square(10., 0., 10.)},
            ],
            "tooltip": tooltip(),
        }));
        let extras = VersionExtras { abbreviations: Some(&abbreviations), labels: None };
        let data = MapVersionData::from_layer(&l, extras).unwrap();
        let alpha = &data.regions["1"];
        assert_eq!(alpha.polygons.len(), 2);
        assert_eq!(alpha.polygons[0].id, "11");
        assert_eq!(alpha.polygons[0].represent_pt, Some(R2::new(2., 2.)));
        assert_eq!(alpha.polygons[1].polygon.holes.len(), 1);
        assert_eq!(alpha.abbreviation.as_deref(), Some("AL"));
        assert_relative_eq!(data.area(), 16. + 15. + 100.);
    }

    #[test]
    fn world_layers_are_projected() {
        let l = layer(json!({
            "extrema": {"min_x": -10, "max_x": 10, "min_y": -10, "max_y": 10},
            "extent": "world",
            "features": [
                {"id": 1, "properties": {"polygon_id": 1}, "coordinates": [[0, 0], [90, 0], [90, 30]], "representPt": [45, 10]},
            ],
            "tooltip": tooltip(),
        }));
        let data = MapVersionData::from_layer(&l, VersionExtras::default()).unwrap();
        assert!(data.world);
        assert_eq!(data.extrema, GallPeters.extrema());
        let p = &data.regions["1"].polygons[0];
        assert_relative_eq!(p.polygon.outer[1].x, GallPeters.transform_longitude(90.));
        assert_relative_eq!(p.polygon.outer[2].y, GallPeters.transform_latitude(30.));
        assert_relative_eq!(p.represent_pt.unwrap().y, GallPeters.transform_latitude(10.));
    }

    #[test]
    fn errors() {
        let l = layer(json!({
            "bbox": [0, 0, 1, 1],
            "features": [{"properties": {"cartogram_id": 1}, "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}}],
            "tooltip": tooltip(),
        }));
        let err = MapVersionData::from_layer(&l, VersionExtras::default()).unwrap_err();
        assert!(matches!(&err, MapError::UnsupportedFeatureType(t) if t == "LineString"));
        assert_eq!(err.to_string(), "Feature type 'LineString' not supported");

        let l = layer(json!({"features": [], "tooltip": tooltip()}));
        assert!(matches!(MapVersionData::from_layer(&l, VersionExtras::default()), Err(MapError::UnsupportedMapFormat)));

        let l = layer(json!({
            "bbox": [0, 0, 1, 1],
            "features": [{"properties": {"cartogram_id": 9}, "geometry": {"type": "Polygon", "coordinates": [square(0., 0., 1.)]}}],
            "tooltip": tooltip(),
        }));
        assert!(matches!(MapVersionData::from_layer(&l, VersionExtras::default()), Err(MapError::MissingRegionData(id)) if id == "9"));
    }
}
