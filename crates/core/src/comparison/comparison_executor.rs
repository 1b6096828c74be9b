use crate::comparison::comparison_accumulator::ImageOutcome;

/// Per-image comparison job: image identifier in, outcome out.
pub type ImageJob<'a> = dyn Fn(&str) -> ImageOutcome + Sync + 'a;

/// Abstracts how per-image comparison jobs are scheduled.
///
/// This is a port (application-layer interface). Infrastructure provides
/// concrete implementations (e.g. sequential, threaded). Every
/// implementation returns one outcome per identifier, in input order.
pub trait ComparisonExecutor: Send {
    fn execute(&self, image_ids: &[String], job: &ImageJob<'_>) -> Vec<ImageOutcome>;
}
