use std::collections::BTreeMap;

use crate::annotations::domain::annotation_source::{AnnotationError, AnnotationSource};
use crate::shared::annotation::Annotation;
use crate::shared::bounding_box::BoundingBox;

/// Annotation source held entirely in memory.
///
/// Useful for callers that parse annotations themselves and for tests.
#[derive(Clone, Debug, Default)]
pub struct InMemorySource {
    name: String,
    images: BTreeMap<String, Vec<Annotation>>,
}

impl InMemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            images: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) an image with `(label, box)` records in order.
    pub fn with_image<L: Into<String>>(
        mut self,
        image_id: &str,
        records: impl IntoIterator<Item = (L, BoundingBox)>,
    ) -> Self {
        self.insert(image_id, records);
        self
    }

    pub fn insert<L: Into<String>>(
        &mut self,
        image_id: &str,
        records: impl IntoIterator<Item = (L, BoundingBox)>,
    ) {
        let annotations = records
            .into_iter()
            .map(|(label, bbox)| Annotation::new(image_id, label, bbox))
            .collect();
        self.images.insert(image_id.to_string(), annotations);
    }
}

impl AnnotationSource for InMemorySource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn image_ids(&self) -> Result<Vec<String>, AnnotationError> {
        Ok(self.images.keys().cloned().collect())
    }

    fn load(&self, image_id: &str) -> Result<Vec<Annotation>, AnnotationError> {
        self.images
            .get(image_id)
            .cloned()
            .ok_or_else(|| AnnotationError::NotFound(image_id.to_string()))
    }
}
