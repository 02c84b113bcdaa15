//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in geographic degrees or projected units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// An empty box that any point will expand.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Smallest box containing every finite point. `None` if there are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut bbox = Self::empty();
        for (x, y) in points {
            bbox.expand_to_include(x, y);
        }
        if bbox.is_empty() {
            None
        } else {
            Some(bbox)
        }
    }

    /// Grow the box to include a point. Non-finite points are ignored.
    pub fn expand_to_include(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Scale factor and offsets that map this box into `target` preserving
    /// aspect ratio, centered. The y axis is flipped (screen rows grow down).
    ///
    /// Returns `(scale, offset_x, offset_y)` such that
    /// `px = offset_x + (x - min_x) * scale` and
    /// `py = offset_y + (max_y - y) * scale`.
    pub fn fit_into(&self, target: &BoundingBox) -> Option<(f64, f64, f64)> {
        if self.is_empty() || target.is_empty() {
            return None;
        }
        // Degenerate extents (a single column of cells) still get a finite scale.
        let w = self.width().max(f64::EPSILON);
        let h = self.height().max(f64::EPSILON);
        let scale = (target.width() / w).min(target.height() / h);
        if !scale.is_finite() || scale <= 0.0 {
            return None;
        }
        let offset_x = target.min_x + (target.width() - w * scale) / 2.0;
        let offset_y = target.min_y + (target.height() - h * scale) / 2.0;
        Some((scale, offset_x, offset_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_skips_non_finite() {
        let bbox = BoundingBox::from_points([(1.0, 2.0), (f64::NAN, 5.0), (-3.0, 4.0)]).unwrap();
        assert_eq!(bbox, BoundingBox::new(-3.0, 2.0, 1.0, 4.0));
        assert!(BoundingBox::from_points([(f64::NAN, 0.0)]).is_none());
    }

    #[test]
    fn test_fit_into_preserves_aspect() {
        let src = BoundingBox::new(0.0, 0.0, 2.0, 1.0);
        let dst = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let (scale, ox, oy) = src.fit_into(&dst).unwrap();
        assert_eq!(scale, 50.0);
        assert_eq!(ox, 0.0);
        assert_eq!(oy, 25.0);
    }
}
