use crate::shared::bounding_box::BoundingBox;

/// Result of comparing two boxes geometrically.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Overlap {
    /// Intersection area as a percentage of the smaller box's area.
    Ratio(f64),
    /// At least one box has non-positive width or height, or a
    /// non-finite coordinate. Never counts as a match.
    InvalidGeometry,
}

impl Overlap {
    /// Strict `>` comparison; a ratio exactly at the threshold does not match.
    pub fn exceeds(&self, threshold: f64) -> bool {
        matches!(self, Overlap::Ratio(r) if *r > threshold)
    }

    pub fn ratio(&self) -> Option<f64> {
        match self {
            Overlap::Ratio(r) => Some(*r),
            Overlap::InvalidGeometry => None,
        }
    }
}

/// Containment-style overlap between two boxes, in percent.
///
/// Normalizes the intersection by the smaller of the two areas rather than
/// by the union, so a small box lying fully inside a large one scores 100.
/// For valid boxes the result is independent of argument order.
pub fn overlap_ratio(a: &BoundingBox, b: &BoundingBox) -> Overlap {
    if !a.is_valid() || !b.is_valid() {
        return Overlap::InvalidGeometry;
    }
    let inter = a.intersection_area(b);
    let smaller = a.area().min(b.area());
    Overlap::Ratio(inter / smaller * 100.0)
}
