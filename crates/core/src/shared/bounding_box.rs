use serde::{Deserialize, Serialize};

/// Axis-aligned box in `(xmin, ymin, xmax, ymax)` pixel coordinates.
///
/// Coordinates are stored exactly as read. `xmin < xmax` and `ymin < ymax`
/// are expected but not enforced; use [`BoundingBox::is_valid`] before
/// relying on the area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Signed area. Negative when the corners are swapped on one axis.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// True when every coordinate is finite and both extents are positive.
    pub fn is_valid(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite()) && self.width() > 0.0 && self.height() > 0.0
    }

    /// Area shared with `other`; zero when disjoint or merely touching.
    pub fn intersection_area(&self, other: &BoundingBox) -> f64 {
        let overlap_x = (self.xmax.min(other.xmax) - self.xmin.max(other.xmin)).max(0.0);
        let overlap_y = (self.ymax.min(other.ymax) - self.ymin.max(other.ymin)).max(0.0);
        overlap_x * overlap_y
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.xmin, self.ymin, self.xmax, self.ymax
        )
    }
}
