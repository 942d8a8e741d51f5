use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tsify::Tsify;

pub const LEGEND_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
pub struct LegendCheck {
    /// Total implied by the legend: squares covering the drawn area, times
    /// the value per square.
    pub legend_total: f64,
    pub actual_total: f64,
    pub ok: bool,
}

/// Checks that `square_width` px squares worth `value_per_square` each,
/// tiling `drawn_area` px², add up to `total_value`.
///
/// The tolerance is absolute for totals up to 1 and relative above. A
/// mismatch is logged, never returned as an error.
pub fn verify_legend(
    sysname: &str,
    square_width: f64,
    value_per_square: f64,
    drawn_area: f64,
    total_value: f64,
) -> LegendCheck {
    let legend_total = value_per_square * drawn_area / (square_width * square_width);
    let scale = total_value.abs().max(1.);
    let ok = (total_value - legend_total).abs() / scale < LEGEND_TOLERANCE;
    if ok {
        debug!(
            "{}: legend value {} at {}px is correct (legend total {}, actual total {})",
            sysname, value_per_square, square_width, legend_total, total_value,
        );
    } else {
        warn!(
            "{}: legend value {} at {}px is not correct: legend implies a total of {}, but it should be {}",
            sysname, value_per_square, square_width, legend_total, total_value,
        );
    }
    LegendCheck { legend_total, actual_total: total_value, ok }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legend::grid::{LegendConfig, LegendGrid};
    use test_log::test;

    #[test]
    fn computed_grid_verifies() {
        let (total, area) = (3_270_000., 81_234.5);
        let grid = LegendGrid::compute(total, area, &LegendConfig::default()).unwrap();
        for (idx, option) in grid.options.iter().enumerate() {
            let check = verify_legend("1-population", option.width, grid.square_value(idx).unwrap(), area, total);
            assert!(check.ok, "{:?}", check);
        }
    }

    #[test]
    fn mismatch() {
        let check = verify_legend("1-population", 20., 100., 40_000., 20_000.);
        assert!(!check.ok);
        assert_eq!(check.legend_total, 10_000.);
    }

    #[test]
    fn small_totals_are_absolute() {
        assert!(verify_legend("0-base", 10., 0.01, 100., 0.0105).ok);
        assert!(!verify_legend("0-base", 10., 0.01, 100., 0.012).ok);
    }
}
