use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::geometry::r2::R2;

pub type PointerId = i32;

/// Gestures use at most three fingers; further pointers are ignored.
pub const MAX_POINTERS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Pointer {
    pub id: PointerId,
    #[tsify(type = "[number, number]")]
    pub point: R2<f64>,
}

/// Active pointers, in the order they went down, and which of them is the
/// "thumb": the pivot that rotations and stretches are measured from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tsify)]
pub struct TouchInfo {
    pub pointers: Vec<Pointer>,
    pub thumb: Option<PointerId>,
}

impl TouchInfo {
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    pub fn get(&self, id: PointerId) -> Option<R2<f64>> {
        self.pointers.iter().find(|p| p.id == id).map(|p| p.point)
    }

    /// Registers a new pointer. Returns `false` (and changes nothing) when
    /// [`MAX_POINTERS`] are already down or `id` is already tracked.
    ///
    /// The first pointer is the thumb, and stays so when a second one joins.
    /// When a third joins, the two closest pointers are taken to be index
    /// and middle finger, and the remaining one becomes the thumb.
    pub fn add(&mut self, id: PointerId, point: R2<f64>) -> bool {
        if self.len() >= MAX_POINTERS || self.get(id).is_some() {
            return false;
        }
        self.pointers.push(Pointer { id, point });
        match self.pointers.as_slice() {
            [only] => self.thumb = Some(only.id),
            [a, b, c] => {
                let distances = [(b.point - a.point).norm(), (c.point - b.point).norm(), (a.point - c.point).norm()];
                // Closest pair (0,1) → thumb 2; (1,2) → 0; (2,0) → 1. Ties go to the earlier pair.
                let closest = distances.iter().position_min_by_key(|d| OrderedFloat(**d)).unwrap_or(0);
                self.thumb = Some(self.pointers[(closest + 2) % 3].id);
            }
            _ => {}
        }
        true
    }

    /// Moves a tracked pointer; unknown ids are ignored.
    pub fn update(&mut self, id: PointerId, point: R2<f64>) -> bool {
        match self.pointers.iter_mut().find(|p| p.id == id) {
            Some(pointer) => {
                pointer.point = point;
                true
            }
            None => false,
        }
    }

    /// Drops a pointer. If it was the thumb, the earliest remaining pointer
    /// takes over.
    pub fn remove(&mut self, id: PointerId) {
        self.pointers.retain(|p| p.id != id);
        if self.thumb == Some(id) {
            self.thumb = self.pointers.first().map(|p| p.id);
        }
    }

    pub fn clear(&mut self) {
        self.pointers.clear();
        self.thumb = None;
    }

    /// `[thumb]`, or `[thumb, centroid of the other pointers]`; empty when
    /// no pointer is down.
    pub fn merged_points(&self) -> Vec<R2<f64>> {
        let Some(thumb) = self.thumb.and_then(|id| self.get(id)) else {
            return vec![];
        };
        let others: Vec<R2<f64>> = self
            .pointers
            .iter()
            .filter(|p| Some(p.id) != self.thumb)
            .map(|p| p.point)
            .collect();
        if others.is_empty() {
            return vec![thumb];
        }
        let sum = others.iter().fold(R2::new(0., 0.), |acc, p| acc + *p);
        vec![thumb, sum / others.len() as f64]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn first_pointer_is_thumb() {
        let mut touches = TouchInfo::default();
        assert!(touches.merged_points().is_empty());
        assert!(touches.add(7, R2::new(1., 1.)));
        assert!(!touches.add(7, R2::new(2., 2.)));
        assert_eq!(touches.merged_points(), vec![R2::new(1., 1.)]);

        touches.add(8, R2::new(3., 5.));
        assert_eq!(touches.thumb, Some(7));
        assert_eq!(touches.merged_points(), vec![R2::new(1., 1.), R2::new(3., 5.)]);
    }

    #[test]
    fn three_pointers() {
        let mut touches = TouchInfo::default();
        touches.add(0, R2::new(0., 0.));
        touches.add(1, R2::new(1., 0.));
        touches.add(2, R2::new(10., 10.));
        // 0 and 1 are closest, so 2 is the thumb.
        assert_eq!(touches.thumb, Some(2));
        assert_eq!(touches.merged_points(), vec![R2::new(10., 10.), R2::new(0.5, 0.)]);
        assert!(!touches.add(3, R2::new(5., 5.)));
        assert_eq!(touches.len(), 3);

        touches.remove(2);
        assert_eq!(touches.thumb, Some(0));
        touches.remove(0);
        touches.remove(1);
        assert!(touches.is_empty());
        assert_eq!(touches.thumb, None);
    }

    #[test]
    fn closest_pair_picks_thumb() {
        let mut touches = TouchInfo::default();
        touches.add(0, R2::new(0., 0.));
        touches.add(1, R2::new(10., 0.));
        touches.add(2, R2::new(11., 0.));
        assert_eq!(touches.thumb, Some(0));

        let mut touches = TouchInfo::default();
        touches.add(0, R2::new(0., 0.));
        touches.add(1, R2::new(10., 0.));
        touches.add(2, R2::new(1., 0.));
        assert_eq!(touches.thumb, Some(1));
    }

    #[test]
    fn updates_known_pointers_only() {
        let mut touches = TouchInfo::default();
        touches.add(1, R2::new(0., 0.));
        assert!(touches.update(1, R2::new(4., 4.)));
        assert!(!touches.update(2, R2::new(9., 9.)));
        assert_eq!(touches.get(1), Some(R2::new(4., 4.)));
        assert_eq!(touches.len(), 1);
    }
}
