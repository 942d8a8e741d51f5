use std::{ops::{Sub, Mul, Add, Div}, fmt::{Display, Formatter, self}};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 2-D point or vector.
///
/// Wire formats carry coordinates as `[x, y]` arrays; `R2` converts to and
/// from that shape so the rest of the crate can use named fields.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct R2<D> {
    pub x: D,
    pub y: D,
}

impl<D: Display> Display for R2<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

impl R2<f64> {
    pub fn new(x: f64, y: f64) -> Self {
        R2 { x, y }
    }

    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Angle of the vector from the positive x-axis, in radians.
    pub fn atan2(&self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for R2<f64> {
    fn from([x, y]: [f64; 2]) -> Self {
        R2 { x, y }
    }
}

impl From<R2<f64>> for [f64; 2] {
    fn from(p: R2<f64>) -> Self {
        [p.x, p.y]
    }
}

impl Serialize for R2<f64> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.x, self.y].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for R2<f64> {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        <[f64; 2]>::deserialize(deserializer).map(R2::from)
    }
}

impl<D: Add<Output = D>> Add for R2<D> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        R2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<D: Sub<Output = D>> Sub for R2<D> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        R2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl<D: Mul<Output = D>> Mul for R2<D> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        R2 {
            x: self.x * rhs.x,
            y: self.y * rhs.y,
        }
    }
}

impl<D: Mul<D, Output = D> + Clone> Mul<D> for R2<D> {
    type Output = Self;
    fn mul(self, rhs: D) -> Self::Output {
        R2 {
            x: self.x * rhs.clone(),
            y: self.y * rhs,
        }
    }
}

impl<D: Div<D, Output = D> + Clone> Div<D> for R2<D> {
    type Output = Self;
    fn div(self, rhs: D) -> Self::Output {
        R2 {
            x: self.x / rhs.clone(),
            y: self.y / rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn ops() {
        let a = R2::new(1., 2.);
        let b = R2::new(3., -1.);
        assert_eq!(a + b, R2::new(4., 1.));
        assert_eq!(b - a, R2::new(2., -3.));
        assert_eq!(a * 2., R2::new(2., 4.));
        assert_eq!(b / 2., R2::new(1.5, -0.5));
        assert_eq!(R2::new(3., 4.).norm(), 5.);
    }

    #[test]
    fn array_wire_format() {
        let p: R2<f64> = serde_json::from_str("[1.5, -2]").unwrap();
        assert_eq!(p, R2::new(1.5, -2.));
        assert_eq!(serde_json::to_string(&p).unwrap(), "[1.5,-2.0]");
    }
}
