use serde::{Deserialize, Serialize};

use crate::shared::bounding_box::BoundingBox;

/// One labelled box belonging to one image of one source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub image_id: String,
    pub label: String,
    pub bbox: BoundingBox,
}

impl Annotation {
    pub fn new(image_id: impl Into<String>, label: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            image_id: image_id.into(),
            label: label.into(),
            bbox,
        }
    }
}

/// Which of the two compared sources a value belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceSide {
    A,
    B,
}

impl std::fmt::Display for SourceSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceSide::A => write!(f, "A"),
            SourceSide::B => write!(f, "B"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_str_and_string() {
        let a = Annotation::new("img1", String::from("cat"), BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(a.image_id, "img1");
        assert_eq!(a.label, "cat");
    }
}
