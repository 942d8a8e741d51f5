//! Homogeneous 2-D affine matrices.
//!
//! [`Affine`] wraps a `nalgebra::Matrix3` so products can't be malformed. The
//! row-vector form (`Vec<Vec<f64>>`) is what crosses the WASM boundary;
//! [`multiply_matrix`] validates it before multiplying.

use std::ops::Mul;

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use super::r2::R2;
use crate::error::MatrixError;

pub type Rows = Vec<Vec<f64>>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine(pub Matrix3<f64>);

impl Default for Affine {
    fn default() -> Self {
        Self::original()
    }
}

impl Affine {
    /// The identity matrix.
    pub fn original() -> Self {
        Affine(Matrix3::identity())
    }

    #[rustfmt::skip]
    pub fn scale(x: f64, y: f64) -> Self {
        Affine(Matrix3::new(
            x, 0., 0.,
            0., y, 0.,
            0., 0., 1.,
        ))
    }

    #[rustfmt::skip]
    pub fn rotate(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Affine(Matrix3::new(
            cos, -sin, 0.,
            sin, cos, 0.,
            0., 0., 1.,
        ))
    }

    #[rustfmt::skip]
    pub fn translate(x: f64, y: f64) -> Self {
        Affine(Matrix3::new(
            1., 0., x,
            0., 1., y,
            0., 0., 1.,
        ))
    }

    pub fn apply(&self, p: R2<f64>) -> R2<f64> {
        let m = &self.0;
        R2 {
            x: m[(0, 0)] * p.x + m[(0, 1)] * p.y + m[(0, 2)],
            y: m[(1, 0)] * p.x + m[(1, 1)] * p.y + m[(1, 2)],
        }
    }

    /// SVG `transform` attribute value: `matrix(a b c d e f)`, in SVG's
    /// column-major order.
    pub fn svg_transform(&self) -> String {
        let m = &self.0;
        format!(
            "matrix({} {} {} {} {} {})",
            m[(0, 0)], m[(1, 0)], m[(0, 1)], m[(1, 1)], m[(0, 2)], m[(1, 2)],
        )
    }

    /// Lengths of the transformed unit axes: how much the matrix stretches
    /// x and y, independent of rotation.
    pub fn scale_factors(&self) -> R2<f64> {
        let m = &self.0;
        R2 {
            x: m[(0, 0)].hypot(m[(1, 0)]),
            y: m[(0, 1)].hypot(m[(1, 1)]),
        }
    }

    pub fn to_rows(&self) -> Rows {
        (0..3).map(|i| (0..3).map(|j| self.0[(i, j)]).collect()).collect()
    }
}

impl Mul for Affine {
    type Output = Affine;
    fn mul(self, rhs: Affine) -> Affine {
        Affine(self.0 * rhs.0)
    }
}

impl TryFrom<&[Vec<f64>]> for Affine {
    type Error = MatrixError;
    fn try_from(rows: &[Vec<f64>]) -> Result<Self, Self::Error> {
        let cols = rows.iter().map(Vec::len).find(|&n| n != 3).unwrap_or(3);
        if rows.len() != 3 || cols != 3 {
            return Err(MatrixError::NotThreeByThree { rows: rows.len(), cols });
        }
        Ok(Affine(Matrix3::from_fn(|i, j| rows[i][j])))
    }
}

impl Serialize for Affine {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_rows().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Affine {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Rows::deserialize(deserializer)?;
        Affine::try_from(rows.as_slice()).map_err(serde::de::Error::custom)
    }
}

/// 3×3 product of two row-major matrices.
pub fn multiply_matrix(a: &[Vec<f64>], b: &[Vec<f64>]) -> Result<Rows, MatrixError> {
    let a = Affine::try_from(a)?;
    let b = Affine::try_from(b)?;
    Ok((a * b).to_rows())
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;
    use super::*;
    use test_log::test;

    fn sample() -> Rows {
        vec![
            vec![1., 2., 3.],
            vec![4., 5., 6.],
            vec![7., 8., 9.],
        ]
    }

    #[test]
    fn identity_is_neutral() {
        let m = sample();
        let id = Affine::original().to_rows();
        assert_eq!(multiply_matrix(&id, &m).unwrap(), m);
        assert_eq!(multiply_matrix(&m, &id).unwrap(), m);
    }

    #[test]
    fn product() {
        let m = sample();
        let p = multiply_matrix(&m, &m).unwrap();
        assert_eq!(p[0], vec![30., 36., 42.]);
        assert_eq!(p[2], vec![102., 126., 150.]);
    }

    #[test]
    fn rejects_2x2() {
        let small = vec![vec![1., 0.], vec![0., 1.]];
        let err = multiply_matrix(&small, &sample()).unwrap_err();
        assert_eq!(err, MatrixError::NotThreeByThree { rows: 2, cols: 2 });
        assert!(multiply_matrix(&sample(), &small).is_err());

        let ragged = vec![vec![1., 0., 0.], vec![0., 1.], vec![0., 0., 1.]];
        assert!(multiply_matrix(&ragged, &sample()).is_err());
    }

    #[test]
    fn apply() {
        let p = R2::new(1., 0.);
        let r = Affine::rotate(FRAC_PI_2).apply(p);
        assert_relative_eq!(r.x, 0., epsilon = 1e-12);
        assert_relative_eq!(r.y, 1., epsilon = 1e-12);

        // Rotate, then scale, then translate (rightmost applies first).
        let m = Affine::translate(10., 20.) * Affine::scale(2., 3.) * Affine::rotate(FRAC_PI_2);
        let q = m.apply(p);
        assert_relative_eq!(q.x, 10., epsilon = 1e-12);
        assert_relative_eq!(q.y, 23., epsilon = 1e-12);
    }

    #[test]
    fn svg_transform() {
        let m = Affine::translate(5., 6.) * Affine::scale(2., 3.);
        assert_eq!(m.svg_transform(), "matrix(2 0 0 3 5 6)");
    }

    #[test]
    fn scale_factors() {
        let m = Affine::rotate(0.7) * Affine::scale(2., 3.);
        let s = m.scale_factors();
        assert_relative_eq!(s.x, 2., epsilon = 1e-12);
        assert_relative_eq!(s.y, 3., epsilon = 1e-12);
    }

    #[test]
    fn serde_rows() {
        let m = Affine::scale(2., 4.);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "[[2.0,0.0,0.0],[0.0,4.0,0.0],[0.0,0.0,1.0]]");
        let back: Affine = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
        assert!(serde_json::from_str::<Affine>("[[1.0]]").is_err());
    }
}
