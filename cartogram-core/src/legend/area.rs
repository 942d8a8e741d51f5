//! Stateful legend behind the resizable legend widget.
//!
//! Unlike [`LegendGrid`] sizing a whole map version at once, [`AreaLegend`]
//! is fed per-region rows as they're drawn, and its total area is refreshed
//! whenever the on-screen size changes. Its value text follows the user's
//! zoom through the accumulated affine scale.

use log::debug;
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use super::format::format_compact;
use super::grid::{LegendConfig, LegendGrid};
use crate::map::value::RegionValue;

/// One region's value and drawn area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
pub struct AreaRow {
    #[tsify(type = "number | \"NA\"")]
    pub value: RegionValue,
    pub area: f64,
}

/// Sum of known values, and of all areas, after imputing NA regions' values
/// at the known regions' average density.
pub fn impute_totals(rows: &[AreaRow]) -> (f64, f64) {
    let mut known_value = 0.;
    let mut known_area = 0.;
    let mut na_area = 0.;
    for row in rows {
        match row.value {
            RegionValue::Known(v) => {
                known_value += v;
                known_area += row.area;
            }
            RegionValue::NotAvailable => na_area += row.area,
        }
    }
    let density = if known_area > 0. { known_value / known_area } else { 0. };
    (known_area + na_area, known_value + density * na_area)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tsify)]
pub struct AreaLegend {
    pub total_area: f64,
    pub total_value: f64,
    pub grid: Option<LegendGrid>,
    pub value_text: String,
    pub total_text: String,
    #[serde(default)]
    pub config: LegendConfig,
}

impl AreaLegend {
    pub fn new(config: LegendConfig) -> Self {
        AreaLegend { config, ..Default::default() }
    }

    pub fn init(&mut self, rows: &[AreaRow]) {
        let (total_area, total_value) = impute_totals(rows);
        self.total_area = total_area;
        self.total_value = total_value;
        self.total_text = format_compact(total_value);
        debug!("area legend: total value {} over {}px²", total_value, total_area);
    }

    pub fn update_total_area<I: IntoIterator<Item = f64>>(&mut self, areas: I) {
        self.total_area = areas.into_iter().sum();
    }

    /// Recomputes grid options; leaves the previous grid in place when the
    /// total value or area is zero.
    pub fn update_grid_data(&mut self) {
        if self.total_value == 0. || self.total_area == 0. {
            return;
        }
        if let Some(grid) = LegendGrid::compute(self.total_value, self.total_area, &self.config) {
            self.grid = Some(grid);
        }
    }

    /// Value text for grid option `grid_index` under the accumulated zoom
    /// `affine_scale`; empty when there's no such option.
    pub fn update_legend_value(&mut self, grid_index: usize, affine_scale: (f64, f64)) -> &str {
        let option = self
            .grid
            .as_ref()
            .and_then(|grid| grid.options.get(grid_index).map(|o| (o.nice_number, grid.scale_power_of_10)));
        self.value_text = match option {
            Some((nice, power)) => {
                let (sx, sy) = affine_scale;
                format_compact(nice / (sx * sy) * 10f64.powi(power))
            }
            None => String::new(),
        };
        &self.value_text
    }
}
