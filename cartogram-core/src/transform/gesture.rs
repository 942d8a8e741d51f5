//! Pointer and wheel gestures composed into one affine matrix for the map
//! group: pan with one finger, pinch/rotate with two, stretch along the
//! finger axis with three (or two, when the aspect ratio isn't locked).
//!
//! The host supplies timestamps (ms), so the state machine is deterministic
//! and can be driven from tests or serialized across the WASM boundary
//! between events.

use log::debug;
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use super::touch::{PointerId, TouchInfo, MAX_POINTERS};
use crate::geometry::matrix::Affine;
use crate::geometry::r2::R2;
use crate::legend::nice::find_nearest_nice_number;

/// Two single-pointer downs closer than this are a double tap. A single
/// pointer also only pans once held this long.
pub const DOUBLE_TAP_THRESHOLD_MS: f64 = 300.;
/// Wheel delta per unit of scale or radian of rotation.
pub const WHEEL_DIVISOR: f64 = 1000.;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "lowercase")]
pub enum StretchDirection {
    X,
    #[default]
    Y,
}

/// Angle, midpoint and spread of the merged pointers at the previous sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Capture {
    /// `None` with a single pointer.
    pub angle: Option<f64>,
    #[tsify(type = "[number, number]")]
    pub position: R2<f64>,
    pub distance: Option<f64>,
}

impl Capture {
    fn of(points: &[R2<f64>]) -> Option<Capture> {
        let position = centroid(points)?;
        let axis = match points {
            [a, b, ..] => Some(*b - *a),
            _ => None,
        };
        Some(Capture {
            angle: axis.map(|v| v.atan2()),
            position,
            distance: axis.map(|v| v.norm()),
        })
    }
}

fn centroid(points: &[R2<f64>]) -> Option<R2<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(R2::new(0., 0.), |acc, p| acc + *p);
    Some(sum / points.len() as f64)
}

/// Ratio of a new distance to the previous one, when that is a usable scale.
fn ratio(next: f64, prev: Option<f64>) -> Option<f64> {
    let s = next / prev?;
    (s.is_finite() && s != 0.).then_some(s)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Transformer {
    pub touches: TouchInfo,
    #[tsify(type = "number[][]")]
    pub matrix: Affine,
    /// Accumulated x/y scale, tracked separately from `matrix` so the legend
    /// grid can be rescaled without decomposing it.
    #[tsify(type = "[number, number]")]
    pub affine_scale: R2<f64>,
    /// Value of one legend grid square at scale 1.
    pub grid_scale_nice_number: f64,
    pub capture: Option<Capture>,
    pub last_touch: Option<f64>,
}

impl Default for Transformer {
    fn default() -> Self {
        Transformer {
            touches: TouchInfo::default(),
            matrix: Affine::original(),
            affine_scale: R2::new(1., 1.),
            grid_scale_nice_number: 1.,
            capture: None,
            last_touch: None,
        }
    }
}

impl Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn affine_scale(&self) -> R2<f64> {
        self.affine_scale
    }

    pub fn matrix(&self) -> Affine {
        self.matrix
    }

    pub fn svg_transform(&self) -> String {
        self.matrix.svg_transform()
    }

    pub fn reset(&mut self) {
        self.matrix = Affine::original();
        self.affine_scale = R2::new(1., 1.);
    }

    pub fn set_grid_scale_nice_number(&mut self, value: f64) {
        self.grid_scale_nice_number = value;
    }

    fn apply(&mut self, m: Affine) {
        self.matrix = m * self.matrix;
    }

    fn recapture(&mut self) {
        if let Some(capture) = Capture::of(&self.touches.merged_points()) {
            self.capture = Some(capture);
        }
    }

    /// Returns `true` if this was a double tap, which resets the transform.
    pub fn pointer_down(&mut self, id: PointerId, point: R2<f64>, now: f64) -> bool {
        self.touches.add(id, point);
        let since = self.last_touch.map(|last| now - last);
        let double_tap = self.touches.len() == 1
            && since.is_some_and(|dt| dt > 0. && dt < DOUBLE_TAP_THRESHOLD_MS);
        if double_tap {
            debug!("double tap after {:?}ms, resetting transform", since);
            self.reset();
        } else {
            self.recapture();
        }
        self.last_touch = Some(now);
        double_tap
    }

    /// Applies the motion since the previous sample. Returns `false` when the
    /// move is ignored: no gesture in progress, or no pointer down.
    pub fn pointer_move(&mut self, id: PointerId, point: R2<f64>, lock_ratio: bool, now: f64) -> bool {
        self.touches.update(id, point);
        let count = self.touches.len();
        if count == 0 || count > MAX_POINTERS {
            return false;
        }
        let Some(mut capture) = self.capture else {
            return false;
        };
        let points = self.touches.merged_points();
        let mut m = Affine::original();

        if let [a, b, ..] = points.as_slice() {
            let axis = *b - *a;
            let (angle, distance) = (axis.atan2(), axis.norm());
            if count == 3 || !lock_ratio {
                let turn = capture.angle.map_or(0., |prev| angle - prev);
                capture.angle = Some(angle);
                m = m * Affine::rotate(turn);
                // Stretch along the current finger axis.
                let stretch = ratio(distance, capture.distance);
                capture.distance = Some(distance);
                if let Some(s) = stretch {
                    self.affine_scale.x *= s;
                    m = m * Affine::rotate(angle) * Affine::scale(s, 1.) * Affine::rotate(-angle);
                }
            } else {
                if let Some(prev) = capture.angle {
                    capture.angle = Some(angle);
                    m = m * Affine::rotate(angle - prev);
                }
                if capture.distance.is_some() {
                    let scale = ratio(distance, capture.distance);
                    capture.distance = Some(distance);
                    if let Some(s) = scale {
                        self.affine_scale = self.affine_scale * s;
                        m = m * Affine::scale(s, s);
                    }
                }
            }
        }

        let held = self.last_touch.map_or(true, |last| now - last > DOUBLE_TAP_THRESHOLD_MS);
        if count > 1 || held {
            if let Some(position) = centroid(&points) {
                let delta = position - capture.position;
                capture.position = position;
                m = m * Affine::translate(delta.x, delta.y);
            }
        }

        self.capture = Some(capture);
        self.apply(m);
        true
    }

    /// Releases a pointer, snaps the scale to a nice legend value, and
    /// restarts the gesture from the remaining pointers (if any).
    pub fn pointer_up(&mut self, id: PointerId) {
        self.touches.remove(id);
        self.snap_to_better_number();
        if self.touches.is_empty() {
            self.capture = None;
        } else {
            self.recapture();
        }
    }

    /// Shift+wheel rotates by `delta / 1000` radians; otherwise scales by
    /// `1 + delta / 1000`, on both axes when `lock_ratio`, else only along
    /// `direction`.
    pub fn wheel(&mut self, delta: f64, shift: bool, lock_ratio: bool, direction: StretchDirection) {
        let m = if shift {
            Affine::rotate(delta / WHEEL_DIVISOR)
        } else {
            let scale = 1. + delta / WHEEL_DIVISOR;
            let (sx, sy) = match (lock_ratio, direction) {
                (true, _) => (scale, scale),
                (false, StretchDirection::X) => (scale, 1.),
                (false, StretchDirection::Y) => (1., scale),
            };
            self.affine_scale = self.affine_scale * R2::new(sx, sy);
            Affine::scale(sx, sy)
        };
        self.apply(m);
    }

    /// Uniformly rescales so one legend grid square stands for a nice value
    /// again after free-form zooming.
    pub fn snap_to_better_number(&mut self) {
        let value = self.grid_scale_nice_number / (self.affine_scale.x * self.affine_scale.y);
        let Some((nice, power)) = find_nearest_nice_number(value) else {
            return;
        };
        let target = nice * 10f64.powi(power);
        let adjust = (value / target).sqrt();
        self.affine_scale = self.affine_scale * adjust;
        self.apply(Affine::scale(adjust, adjust));
    }

    /// Legend value of one grid square at the current scale.
    pub fn grid_value(&self) -> f64 {
        self.grid_scale_nice_number / (self.affine_scale.x * self.affine_scale.y)
    }
}
