use serde::{Deserialize, Serialize};

use crate::shared::bounding_box::BoundingBox;

/// Whether the two sides of a geometric match carry the same label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Agreeing,
    Disagreeing,
}

/// A box from one source that overlaps a box from the other source above
/// the match threshold.
///
/// `bbox` and `label_a` come from the scanned side; `counterpart_bbox` and
/// `label_b` from the box it overlapped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub image_id: String,
    pub bbox: BoundingBox,
    pub label_a: String,
    pub label_b: String,
    pub counterpart_bbox: BoundingBox,
    pub overlap: f64,
}

impl MatchRecord {
    pub fn kind(&self) -> MatchKind {
        if self.label_a == self.label_b {
            MatchKind::Agreeing
        } else {
            MatchKind::Disagreeing
        }
    }

    pub fn is_agreeing(&self) -> bool {
        self.kind() == MatchKind::Agreeing
    }
}
