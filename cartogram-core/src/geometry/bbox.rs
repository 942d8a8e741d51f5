use serde::{Deserialize, Serialize};
use tsify::Tsify;

use super::r2::R2;

/// Axis-aligned bounding box of a layer's raw coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Extrema {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Extrema {
    /// From a GeoJSON `bbox`: `[min_x, min_y, max_x, max_y]`.
    pub fn from_bbox([min_x, min_y, max_x, max_y]: [f64; 4]) -> Self {
        Extrema { min_x, max_x, min_y, max_y }
    }

    pub fn bbox(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn of_points<'a>(points: impl IntoIterator<Item = &'a R2<f64>>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Extrema { min_x: p.x, max_x: p.x, min_y: p.y, max_y: p.y },
                Some(e) => e.union(&Extrema { min_x: p.x, max_x: p.x, min_y: p.y, max_y: p.y }),
            })
        })
    }

    pub fn union(&self, o: &Extrema) -> Extrema {
        Extrema {
            min_x: self.min_x.min(o.min_x),
            max_x: self.max_x.max(o.max_x),
            min_y: self.min_y.min(o.min_y),
            max_y: self.max_y.max(o.max_y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn bbox_order() {
        let e = Extrema::from_bbox([-1., -2., 3., 4.]);
        assert_eq!(e.width(), 4.);
        assert_eq!(e.height(), 6.);
        assert_eq!(e.bbox(), [-1., -2., 3., 4.]);
    }

    #[test]
    fn of_points() {
        let pts = [R2::new(1., 5.), R2::new(-2., 3.), R2::new(0., 7.)];
        let e = Extrema::of_points(pts.iter()).unwrap();
        assert_eq!(e, Extrema { min_x: -2., max_x: 1., min_y: 3., max_y: 7. });
        assert_eq!(Extrema::of_points(std::iter::empty()), None);
    }
}
