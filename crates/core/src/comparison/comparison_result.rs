use serde::Serialize;

use crate::matching::domain::match_record::MatchRecord;
use crate::shared::annotation::{Annotation, SourceSide};
use crate::shared::config::TieBreak;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SourceTotals {
    pub images: usize,
    pub boxes: usize,
}

/// Corpus-wide counts.
///
/// `totals_b` only covers B files that have a counterpart in A, which is
/// the basis of the legacy `unmatched_count_b` formula:
/// `|totals_b.boxes - matched_count|`. That value is an approximation;
/// `symmetric_unmatched_count_b` holds the count from a real B-perspective
/// scan over every B image when it was requested.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CorpusSummary {
    pub totals_a: SourceTotals,
    pub totals_b: SourceTotals,
    pub matched_count: usize,
    pub unmatched_count_a: usize,
    pub unmatched_count_b: usize,
    pub symmetric_unmatched_count_b: Option<usize>,
    pub invalid_geometry_a: usize,
    pub invalid_geometry_b: usize,
}

/// An image whose annotation file could not be loaded. The image
/// contributes nothing else to the result.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImageError {
    pub image_id: String,
    pub side: SourceSide,
    pub message: String,
}

impl std::fmt::Display for ImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.side, self.image_id, self.message)
    }
}

/// Everything a comparison run produced, ordered by image identifier and
/// then by annotation order within each image.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub source_a: String,
    pub source_b: String,
    pub threshold: f64,
    pub tie_break: TieBreak,
    pub summary: CorpusSummary,
    pub match_records: Vec<MatchRecord>,
    pub unmatched_records: Vec<Annotation>,
    pub unique_to_a: Vec<Annotation>,
    pub unique_to_b: Vec<Annotation>,
    pub invalid_geometry: Vec<(SourceSide, Annotation)>,
    pub errors: Vec<ImageError>,
}

impl ComparisonResult {
    pub fn agreeing(&self) -> impl Iterator<Item = &MatchRecord> {
        self.match_records.iter().filter(|r| r.is_agreeing())
    }

    pub fn disagreeing(&self) -> impl Iterator<Item = &MatchRecord> {
        self.match_records.iter().filter(|r| !r.is_agreeing())
    }

    /// Disagreeing records sharing the image of the `index`-th disagreeing
    /// record, in record order.
    pub fn disagreeing_for_image_of(&self, index: usize) -> Option<Vec<&MatchRecord>> {
        let selected = self.disagreeing().nth(index)?;
        Some(
            self.disagreeing()
                .filter(|r| r.image_id == selected.image_id)
                .collect(),
        )
    }
}
