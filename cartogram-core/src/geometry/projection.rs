//! World-map projections, applied once at ingestion to longitude/latitude.

use std::f64::consts::{PI, SQRT_2};

use super::{bbox::Extrema, r2::R2};

pub trait WorldProjection {
    fn transform_longitude(&self, longitude: f64) -> f64;
    fn transform_latitude(&self, latitude: f64) -> f64;

    fn transform_long_lat(&self, long_lat: R2<f64>) -> R2<f64> {
        R2 {
            x: self.transform_longitude(long_lat.x),
            y: self.transform_latitude(long_lat.y),
        }
    }

    /// The projected `[-180, 180] × [-90, 90]` box. World layers use this as
    /// their extrema so every world version shares one frame.
    fn extrema(&self) -> Extrema {
        Extrema {
            min_x: self.transform_longitude(-180.),
            max_x: self.transform_longitude(180.),
            min_y: self.transform_latitude(-90.),
            max_y: self.transform_latitude(90.),
        }
    }
}

/// Gall–Peters equal-area cylindrical projection, scaled by 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct GallPeters;

impl WorldProjection for GallPeters {
    fn transform_longitude(&self, longitude: f64) -> f64 {
        let radians = longitude * PI / 180.;
        radians * 100. / SQRT_2
    }

    fn transform_latitude(&self, latitude: f64) -> f64 {
        let radians = latitude * PI / 180.;
        100. * SQRT_2 * radians.sin()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use super::*;
    use test_log::test;

    #[test]
    fn origin_is_fixed() {
        assert_eq!(GallPeters.transform_longitude(0.), 0.);
        assert_eq!(GallPeters.transform_latitude(0.), 0.);
    }

    #[test]
    fn symmetric() {
        let p = GallPeters;
        assert_eq!(p.transform_longitude(-180.), -p.transform_longitude(180.));
        assert_relative_eq!(p.transform_latitude(-45.), -p.transform_latitude(45.));
        assert_relative_eq!(p.transform_longitude(180.), PI * 100. / SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(p.transform_latitude(90.), 100. * SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn equal_area() {
        // Bands of equal sin(latitude) difference cover equal surface area;
        // the projection maps them to bands of equal height.
        let p = GallPeters;
        let band = |lat0: f64, lat1: f64| p.transform_latitude(lat1) - p.transform_latitude(lat0);
        let lat = |s: f64| s.asin().to_degrees();
        assert_relative_eq!(band(lat(0.), lat(0.25)), band(lat(0.5), lat(0.75)), epsilon = 1e-9);
    }

    #[test]
    fn world_extrema() {
        let e = GallPeters.extrema();
        assert_relative_eq!(e.min_x, -e.max_x);
        assert_relative_eq!(e.min_y, -e.max_y);
        assert_relative_eq!(e.width() / e.height(), PI / 2., epsilon = 1e-12);
    }

    #[test]
    fn long_lat() {
        let p = GallPeters.transform_long_lat(R2::new(90., 30.));
        assert_relative_eq!(p.x, 50. * PI / SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(p.y, 100. * SQRT_2 * 0.5, epsilon = 1e-12);
    }
}
