use serde::{Deserialize, Serialize};
use tsify::Tsify;

use super::equalize::{Dimension, ScaleFactors};
use super::mappack::Labels;
use crate::geometry::bbox::Extrema;
use crate::legend::grid::LegendGrid;

/// Totals backing a version's legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct LegendData {
    /// Polygon area as drawn, in px².
    pub drawn_area: f64,
    /// Polygon area in layer units².
    pub geo_area: f64,
    /// Sum of known values plus NA regions' imputed values.
    pub total_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<LegendGrid>,
}

/// One drawable dataset layer of a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct MapVersion {
    pub name: String,
    pub unit: String,
    pub extrema: Extrema,
    pub dimension: Dimension,
    pub scale: ScaleFactors,
    pub labels: Option<Labels>,
    pub world: bool,
    pub legend: LegendData,
}
