use std::fmt::{self, Display, Write};

use derive_more::{Deref, From};
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use super::{bbox::Extrema, r2::R2};

/// An ordered sequence of vertices, implicitly closed.
///
/// GeoJSON rings repeat their first vertex at the end; that duplicate adds a
/// zero-length edge and doesn't affect area.
#[derive(Debug, Clone, Default, Deref, From, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(transparent)]
pub struct Ring(pub Vec<R2<f64>>);

impl Ring {
    /// Shoelace area; negative for clockwise winding.
    pub fn signed_area(&self) -> f64 {
        let n = self.0.len();
        if n < 3 {
            return 0.;
        }
        let mut sum = 0.;
        for i in 0..n {
            let j = (i + 1) % n;
            sum += self.0[i].x * self.0[j].y - self.0[j].x * self.0[i].y;
        }
        sum / 2.
    }

    /// Unsigned area, independent of winding order.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn map(&self, f: impl Fn(R2<f64>) -> R2<f64>) -> Ring {
        Ring(self.0.iter().copied().map(f).collect())
    }

    pub fn extrema(&self) -> Option<Extrema> {
        Extrema::of_points(self.0.iter())
    }

    pub fn coords(&self) -> Vec<[f64; 2]> {
        self.0.iter().copied().map(Into::into).collect()
    }

    /// Appends `M x,y L x,y … z ` for this ring, mapping each vertex through `f`.
    pub fn write_path(&self, path: &mut String, f: impl Fn(R2<f64>) -> R2<f64>) {
        for (idx, p) in self.0.iter().enumerate() {
            let R2 { x, y } = f(*p);
            let cmd = if idx == 0 { 'M' } else { 'L' };
            // Writing to a String can't fail.
            let _ = write!(path, "{} {},{} ", cmd, x, y);
        }
        path.push_str("z ");
    }
}

/// An outer ring plus zero or more holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Polygon {
    pub outer: Ring,
    #[serde(default)]
    pub holes: Vec<Ring>,
}

impl Polygon {
    pub fn new(outer: impl Into<Ring>, holes: Vec<Ring>) -> Self {
        Polygon { outer: outer.into(), holes }
    }

    /// Area of the outer ring minus the area of each hole.
    ///
    /// Each ring is taken as an absolute value first, so a hole subtracts
    /// exactly its own area whichever way either ring is wound.
    pub fn area(&self) -> f64 {
        self.outer.area() - self.holes.iter().map(Ring::area).sum::<f64>()
    }

    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    pub fn map(&self, f: impl Fn(R2<f64>) -> R2<f64>) -> Polygon {
        Polygon {
            outer: self.outer.map(&f),
            holes: self.holes.iter().map(|h| h.map(&f)).collect(),
        }
    }

    /// SVG path data for the outer ring followed by each hole.
    pub fn path(&self, f: impl Fn(R2<f64>) -> R2<f64>) -> String {
        let mut path = String::new();
        for ring in self.rings() {
            ring.write_path(&mut path, &f);
        }
        path
    }

    /// `[outer, hole, hole, …]`, the GeoJSON polygon coordinate layout.
    pub fn geojson_coords(&self) -> Vec<Vec<[f64; 2]>> {
        self.rings().map(Ring::coords).collect()
    }

    /// Arithmetic mean of the outer ring's vertices.
    pub fn center(&self) -> Option<R2<f64>> {
        let n = self.outer.len();
        if n == 0 {
            return None;
        }
        let sum = self.outer.iter().fold(R2::new(0., 0.), |acc, p| acc + *p);
        Some(sum / n as f64)
    }
}

impl Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verts: Vec<String> = self
            .outer
            .iter()
            .map(|v| format!("({:.3}, {:.3})", v.x, v.y))
            .collect();
        write!(f, "Polygon[{}]", verts.join(", "))?;
        if !self.holes.is_empty() {
            write!(f, " ({} holes)", self.holes.len())?;
        }
        Ok(())
    }
}
