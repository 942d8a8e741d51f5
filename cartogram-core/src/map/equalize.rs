//! Canvas sizing and area equalization.
//!
//! Every version is first fitted into a [`MAX_SIZE`] square keeping its
//! aspect ratio. When there is a base version, the canvas is then scaled
//! uniformly so the version's drawn area matches the base's: regions on a
//! cartogram and on the conventional map are compared at the same scale.

use log::debug;
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::error::MapError;
use crate::geometry::bbox::Extrema;
use crate::geometry::r2::R2;

/// Longer canvas side, in px, before equalization.
pub const MAX_SIZE: f64 = 350.;

/// Canvas size of a version, in px.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Dimension {
    pub x: f64,
    pub y: f64,
}

/// Pixels per layer unit, on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

impl ScaleFactors {
    pub fn area(&self) -> f64 {
        self.x * self.y
    }
}

/// Sizing of one version.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizing {
    pub dimension: Dimension,
    pub scale: ScaleFactors,
    /// Sum of polygon areas, in layer units².
    pub geo_area: f64,
    /// `geo_area` as drawn, in px².
    pub drawn_area: f64,
}

impl Sizing {
    /// Maps a layer point to canvas px, flipping y so north is up.
    pub fn project(&self, extrema: &Extrema, p: R2<f64>) -> R2<f64> {
        R2 {
            x: self.scale.x * (p.x - extrema.min_x),
            y: self.scale.y * (extrema.max_y - p.y),
        }
    }
}

/// Fits `extrema` into a [`MAX_SIZE`] box (times `scale`), keeping its
/// aspect ratio.
pub fn provisional_dimension(sysname: &str, extrema: &Extrema, scale: f64) -> Result<Dimension, MapError> {
    let (width, height) = (extrema.width(), extrema.height());
    if !(width.is_finite() && height.is_finite() && width > 0. && height > 0.) {
        return Err(MapError::DegenerateExtrema { sysname: sysname.to_string(), width, height });
    }
    let (x, y) = if width >= height {
        (MAX_SIZE, MAX_SIZE * height / width)
    } else {
        (MAX_SIZE * width / height, MAX_SIZE)
    };
    Ok(Dimension { x: x * scale, y: y * scale })
}

/// Sizes a version whose polygons cover `geo_area` layer units², matching
/// `base_drawn_area` px² when a base version exists.
pub fn size_version(
    sysname: &str,
    extrema: &Extrema,
    geo_area: f64,
    scale: f64,
    base_drawn_area: Option<f64>,
) -> Result<Sizing, MapError> {
    let mut dimension = provisional_dimension(sysname, extrema, scale)?;
    if !(geo_area.is_finite() && geo_area > 0.) {
        return Err(MapError::DegenerateGeometry { sysname: sysname.to_string(), area: geo_area });
    }
    let (width, height) = (extrema.width(), extrema.height());
    if let Some(base_drawn_area) = base_drawn_area {
        let drawn_area = geo_area * (dimension.x / width) * (dimension.y / height);
        let factor = base_drawn_area / drawn_area;
        debug!("{}: equalization factor {} (drawn {}px², base {}px²)", sysname, factor, drawn_area, base_drawn_area);
        dimension.x *= factor.sqrt();
        dimension.y *= factor.sqrt();
    }
    let scale = ScaleFactors { x: dimension.x / width, y: dimension.y / height };
    let drawn_area = geo_area * scale.area();
    debug!("{}: {}x{}px, scale {:?}, drawn area {}px²", sysname, dimension.x, dimension.y, scale, drawn_area);
    Ok(Sizing { dimension, scale, geo_area, drawn_area })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use super::*;
    use test_log::test;

    fn extrema(width: f64, height: f64) -> Extrema {
        Extrema { min_x: 10., max_x: 10. + width, min_y: -5., max_y: -5. + height }
    }

    #[test]
    fn aspect_ratio() {
        let wide = provisional_dimension("0-base", &extrema(200., 100.), 1.).unwrap();
        assert_eq!(wide, Dimension { x: 350., y: 175. });
        let tall = provisional_dimension("0-base", &extrema(100., 400.), 1.).unwrap();
        assert_eq!(tall, Dimension { x: 87.5, y: 350. });
        let scaled = provisional_dimension("0-base", &extrema(100., 100.), 2.).unwrap();
        assert_eq!(scaled, Dimension { x: 700., y: 700. });
    }

    #[test]
    fn equalized_to_base() {
        let base = size_version("0-base", &extrema(200., 100.), 12_000., 1., None).unwrap();
        assert_relative_eq!(base.drawn_area, 12_000. * (350. / 200.) * (175. / 100.));

        let e = extrema(300., 120.);
        let other = size_version("1-population", &e, 9_000., 1., Some(base.drawn_area)).unwrap();
        assert_relative_eq!(other.drawn_area, base.drawn_area, max_relative = 1e-9);
        // Equalization scales both sides alike.
        assert_relative_eq!(other.dimension.x / other.dimension.y, 300. / 120., max_relative = 1e-12);
        assert_relative_eq!(other.scale.x, other.dimension.x / 300.);
    }

    #[test]
    fn projection() {
        let e = extrema(200., 100.);
        let s = size_version("0-base", &e, 100., 1., None).unwrap();
        let top_left = s.project(&e, R2::new(e.min_x, e.max_y));
        assert_eq!(top_left, R2::new(0., 0.));
        let bottom_right = s.project(&e, R2::new(e.max_x, e.min_y));
        assert_relative_eq!(bottom_right.x, 350.);
        assert_relative_eq!(bottom_right.y, 175.);
    }

    #[test]
    fn degenerate() {
        let flat = extrema(100., 0.);
        assert!(matches!(
            size_version("0-base", &flat, 10., 1., None),
            Err(MapError::DegenerateExtrema { height, .. }) if height == 0.
        ));
        assert!(matches!(
            size_version("0-base", &extrema(10., 10.), 0., 1., None),
            Err(MapError::DegenerateGeometry { .. })
        ));
        assert!(size_version("0-base", &extrema(10., 10.), f64::NAN, 1., None).is_err());
    }
}
