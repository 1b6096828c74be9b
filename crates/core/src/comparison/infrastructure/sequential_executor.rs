use crate::comparison::comparison_accumulator::ImageOutcome;
use crate::comparison::comparison_executor::{ComparisonExecutor, ImageJob};

/// Runs every job on the calling thread, in order.
pub struct SequentialExecutor;

impl SequentialExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SequentialExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ComparisonExecutor for SequentialExecutor {
    fn execute(&self, image_ids: &[String], job: &ImageJob<'_>) -> Vec<ImageOutcome> {
        image_ids.iter().map(|id| job(id.as_str())).collect()
    }
}
