//! End-to-end tests over a small two-version mappack.
//!
//! `original` (legacy format, 20×20 extrema):
//! - region 1 "Alpha": polygon 1, 10×10 with a representative point.
//! - region 2 "Beta": polygon 2, 10×10; polygon 3, 4×4.
//!
//! `population` (GeoJSON, 40×20 bbox):
//! - region 1: polygon 1, 20×20 with a 2×2 hole (the hole takes id 2).
//! - region 2: polygon 3, 20×20; value NA.

use serde_json::{json, Value};

use super::*;


pub fn square(x: f64, y: f64, s: f64) -> Value {
    json!([[x, y], [x + s, y], [x + s, y + s], [x, y + s], [x, y]])
}

pub fn mappack_json() -> Value {
    json!({
        "colors": {"id_1": "#111111", "id_2": "#222222"},
        "abbreviations": {"Alpha": "AL"},
        "config": {"dont_draw": [], "elevate": [1], "label_size": "9px"},
        "original": {
            "extrema": {"min_x": 0, "max_x": 20, "min_y": 0, "max_y": 20},
            "features": [
                {"id": 1, "properties": {"polygon_id": 1}, "coordinates": square(0., 0., 10.), "representPt": [5, 5]},
                {"id": 2, "properties": {"polygon_id": 2}, "coordinates": square(10., 0., 10.), "representPt": [15, 5]},
                {"id": 2, "properties": {"polygon_id": 3}, "coordinates": square(0., 12., 4.)},
            ],
            "tooltip": {
                "label": "Land Area",
                "unit": "km²",
                "data": {"id_1": {"name": "Alpha", "value": 100}, "id_2": {"name": "Beta", "value": "116"}},
            },
        },
        "population": {
            "bbox": [0, 0, 40, 20],
            "features": [
                {
                    "type": "Feature",
                    "properties": {"cartogram_id": 1},
                    "geometry": {"type": "Polygon", "coordinates": [square(0., 0., 20.), square(5., 5., 2.)]},
                },
                {
                    "type": "Feature",
                    "properties": {"cartogram_id": 2},
                    "geometry": {"type": "MultiPolygon", "coordinates": [[square(20., 0., 20.)]]},
                },
            ],
            "tooltip": {
                "label": "Population",
                "unit": "people",
                "data": {"id_1": {"name": "Alpha", "value": 300}, "id_2": {"name": "Beta", "value": "NA"}},
            },
        },
    })
}

pub fn mappack() -> Mappack {
    serde_json::from_value(mappack_json()).unwrap()
}

pub fn cart_map() -> CartMap {
    let mut map = CartMap::new("fixture");
    let last = map.init(&mappack()).unwrap();
    assert_eq!(last, "1-population");
    map
}
