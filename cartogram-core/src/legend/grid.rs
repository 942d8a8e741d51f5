//! Legend grid sizing.
//!
//! A legend square initially stands for 1% of a version's total value. If that
//! square would be narrower than [`MIN_SQUARE_WIDTH`] px, the value per square
//! doubles until it isn't. The value is then snapped to a nice number, and a
//! few neighbouring nice numbers are offered as alternative grid sizes.

use serde::{Deserialize, Serialize};
use tsify::Tsify;

use super::nice::{find_nearest_nice_number, nice_window};
use crate::error::MapError;

/// Grid options offered besides the snapped one.
pub const NUM_GRID_OPTIONS: usize = 3;
pub const MIN_SQUARE_WIDTH: f64 = 20.;
/// Left inset of the first vertical grid line.
pub const GRID_LEFT_PADDING: f64 = 20.;
pub const GRID_LINES: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(default)]
pub struct LegendConfig {
    pub num_grid_options: usize,
    pub min_square_width: f64,
    pub grid_lines: usize,
}

impl Default for LegendConfig {
    fn default() -> Self {
        LegendConfig {
            num_grid_options: NUM_GRID_OPTIONS,
            min_square_width: MIN_SQUARE_WIDTH,
            grid_lines: GRID_LINES,
        }
    }
}

/// Value per square and the matching square width, before snapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareSizing {
    pub value_per_square: f64,
    pub width: f64,
}

/// Sizes a square for `total_value` spread over `drawn_area` px².
///
/// `None` when either input is non-positive or non-finite: there's no density
/// to size against, and doubling a zero value per square would never widen it.
pub fn size_square(total_value: f64, drawn_area: f64, min_width: f64) -> Option<SquareSizing> {
    if !(total_value.is_finite() && total_value > 0. && drawn_area.is_finite() && drawn_area > 0.) {
        return None;
    }
    let value_per_pixel = total_value / drawn_area;
    let mut value_per_square = total_value / 100.;
    let mut width = (value_per_square / value_per_pixel).sqrt();
    while width < min_width {
        value_per_square *= 2.;
        width = (value_per_square / value_per_pixel).sqrt();
    }
    Some(SquareSizing { value_per_square, width })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct GridOption {
    pub width: f64,
    pub nice_number: f64,
    /// Empty until [`LegendGrid::trace_paths`] is called with a canvas size.
    #[serde(default)]
    pub grid_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct LegendGrid {
    pub options: Vec<GridOption>,
    pub scale_power_of_10: i32,
    pub value_per_square: f64,
    pub base_width: f64,
}

impl LegendGrid {
    pub fn compute(total_value: f64, drawn_area: f64, config: &LegendConfig) -> Option<LegendGrid> {
        let SquareSizing { value_per_square, width } =
            size_square(total_value, drawn_area, config.min_square_width)?;
        let (nice, power) = find_nearest_nice_number(value_per_square)?;
        let unit = 10f64.powi(power);
        let options = nice_window(nice, config.num_grid_options + 1)
            .into_iter()
            .map(|nice_number| GridOption {
                width: width * (nice_number * unit / value_per_square).sqrt(),
                nice_number,
                grid_path: String::new(),
            })
            .collect();
        Some(LegendGrid {
            options,
            scale_power_of_10: power,
            value_per_square,
            base_width: width,
        })
    }

    /// Fills in each option's grid path over a `width` × `height` canvas.
    pub fn trace_paths(&mut self, width: f64, height: f64, lines: usize) {
        for option in &mut self.options {
            option.grid_path = grid_path(option.width, width, height, lines);
        }
    }

    pub fn option(&self, index: usize) -> Result<&GridOption, MapError> {
        self.options.get(index).ok_or(MapError::GridOption {
            index,
            count: self.options.len(),
        })
    }

    /// Value one square of option `index` stands for.
    pub fn square_value(&self, index: usize) -> Result<f64, MapError> {
        Ok(self.option(index)?.nice_number * 10f64.powi(self.scale_power_of_10))
    }
}

/// SVG path of `lines` vertical lines (from [`GRID_LEFT_PADDING`] rightward)
/// and `lines` horizontal lines (upward from the bottom edge), `square` px
/// apart, spanning a `width` × `height` canvas.
pub fn grid_path(square: f64, width: f64, height: f64, lines: usize) -> String {
    let mut path = String::new();
    for i in 0..lines {
        let x = GRID_LEFT_PADDING + square * i as f64;
        path += &format!("M{} 0 L{} {} ", x, x, height);
    }
    for j in 1..=lines {
        let y = height - square * j as f64;
        path += &format!("M0 {} L{} {} ", y, width, y);
    }
    path
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use super::*;
    use test_log::test;

    #[test]
    fn sizing() {
        // 1% of 10_000 over 100_000 px² → 100 per square at 0.1 per px → 31.6 px.
        let s = size_square(10_000., 100_000., MIN_SQUARE_WIDTH).unwrap();
        assert_relative_eq!(s.value_per_square, 100.);
        assert_relative_eq!(s.width, 1000f64.sqrt());
    }

    #[test]
    fn doubling() {
        // 1% of 100 px² is a 1 px square; doubling stops once √(2^k) ≥ 20.
        let s = size_square(1_000., 100., MIN_SQUARE_WIDTH).unwrap();
        assert!(s.width >= MIN_SQUARE_WIDTH);
        assert!(s.width / 2f64.sqrt() < MIN_SQUARE_WIDTH);
        assert_relative_eq!(s.value_per_square, 10. * 512.);
        assert_relative_eq!(s.width, 512f64.sqrt());
    }

    #[test]
    fn degenerate() {
        assert_eq!(size_square(0., 100., MIN_SQUARE_WIDTH), None);
        assert_eq!(size_square(100., 0., MIN_SQUARE_WIDTH), None);
        assert_eq!(size_square(f64::NAN, 100., MIN_SQUARE_WIDTH), None);
        assert_eq!(LegendGrid::compute(0., 100., &LegendConfig::default()), None);
    }

    #[test]
    fn options() {
        // Value per square 470 snaps to 5·10²; options are [2, 5, 10, 20]·10².
        let grid = LegendGrid::compute(47_000., 470_000., &LegendConfig::default()).unwrap();
        assert_eq!(grid.scale_power_of_10, 2);
        let nice: Vec<f64> = grid.options.iter().map(|o| o.nice_number).collect();
        assert_eq!(nice, vec![2., 5., 10., 20.]);
        // A square's pixel area is proportional to the value it stands for.
        for option in &grid.options {
            let value = option.nice_number * 100.;
            assert_relative_eq!(option.width * option.width * 0.1, value, max_relative = 1e-12);
        }
        assert_relative_eq!(grid.square_value(1).unwrap(), 500.);
        assert!(grid.option(4).is_err());
    }

    #[test]
    fn path() {
        let p = grid_path(10., 100., 50., 2);
        assert_eq!(p, "M20 0 L20 50 M30 0 L30 50 M0 40 L100 40 M0 30 L100 30 ");

        let mut grid = LegendGrid::compute(47_000., 470_000., &LegendConfig::default()).unwrap();
        grid.trace_paths(350., 300., GRID_LINES);
        for option in &grid.options {
            assert_eq!(option.grid_path.matches('M').count(), 2 * GRID_LINES);
            assert!(option.grid_path.starts_with("M20 0 L20 300 "));
        }
    }
}
