use crate::comparison::comparison_result::{
    ComparisonResult, CorpusSummary, ImageError, SourceTotals,
};
use crate::matching::domain::image_matcher::ImageMatch;
use crate::matching::domain::match_record::MatchRecord;
use crate::shared::annotation::{Annotation, SourceSide};
use crate::shared::config::{ComparisonConfig, TieBreak};

/// Everything one image contributes to a comparison run.
///
/// Produced independently per image so images can be compared in any
/// order or in parallel; merged by [`ComparisonAccumulator`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageOutcome {
    pub image_id: String,
    /// Box count when the image was loaded from A.
    pub boxes_a: Option<usize>,
    /// Box count of B's file when both sources have the image.
    pub paired_boxes_b: Option<usize>,
    /// A-perspective scan. For an image missing from B every A box is
    /// listed as unmatched.
    pub image_match: ImageMatch,
    pub symmetric_unmatched_b: Option<usize>,
    pub unique_to_a: Vec<Annotation>,
    pub unique_to_b: Vec<Annotation>,
    pub invalid_a: Vec<Annotation>,
    pub invalid_b: Vec<Annotation>,
    pub errors: Vec<ImageError>,
}

/// Folds per-image outcomes into a [`ComparisonResult`].
///
/// Outcomes must be added in ascending image-identifier order for the
/// record lists to be reproducible.
pub struct ComparisonAccumulator {
    source_a: String,
    source_b: String,
    threshold: f64,
    tie_break: TieBreak,
    symmetric: bool,
    summary: CorpusSummary,
    symmetric_unmatched_b: usize,
    result_lists: ResultLists,
}

#[derive(Default)]
struct ResultLists {
    match_records: Vec<MatchRecord>,
    unmatched_records: Vec<Annotation>,
    unique_to_a: Vec<Annotation>,
    unique_to_b: Vec<Annotation>,
    invalid_geometry: Vec<(SourceSide, Annotation)>,
    errors: Vec<ImageError>,
}

impl ComparisonAccumulator {
    pub fn new(config: &ComparisonConfig, source_a: String, source_b: String) -> Self {
        Self {
            source_a,
            source_b,
            threshold: config.threshold,
            tie_break: config.tie_break,
            symmetric: config.symmetric,
            summary: CorpusSummary::default(),
            symmetric_unmatched_b: 0,
            result_lists: ResultLists::default(),
        }
    }

    pub fn add(&mut self, outcome: ImageOutcome) {
        let summary = &mut self.summary;
        let lists = &mut self.result_lists;

        if let Some(boxes) = outcome.boxes_a {
            add_totals(&mut summary.totals_a, boxes);
        }
        if let Some(boxes) = outcome.paired_boxes_b {
            add_totals(&mut summary.totals_b, boxes);
        }

        summary.matched_count += outcome.image_match.matching_count();
        summary.unmatched_count_a += outcome.image_match.unmatched.len();
        summary.invalid_geometry_a += outcome.invalid_a.len();
        summary.invalid_geometry_b += outcome.invalid_b.len();
        self.symmetric_unmatched_b += outcome.symmetric_unmatched_b.unwrap_or(0);

        lists.match_records.extend(outcome.image_match.records);
        lists.unmatched_records.extend(outcome.image_match.unmatched);
        lists.unique_to_a.extend(outcome.unique_to_a);
        lists.unique_to_b.extend(outcome.unique_to_b);
        lists
            .invalid_geometry
            .extend(outcome.invalid_a.into_iter().map(|a| (SourceSide::A, a)));
        lists
            .invalid_geometry
            .extend(outcome.invalid_b.into_iter().map(|b| (SourceSide::B, b)));
        lists.errors.extend(outcome.errors);
    }

    pub fn finish(self) -> ComparisonResult {
        let mut summary = self.summary;
        summary.unmatched_count_b = summary.totals_b.boxes.abs_diff(summary.matched_count);
        summary.symmetric_unmatched_count_b = self.symmetric.then_some(self.symmetric_unmatched_b);

        let lists = self.result_lists;
        ComparisonResult {
            source_a: self.source_a,
            source_b: self.source_b,
            threshold: self.threshold,
            tie_break: self.tie_break,
            summary,
            match_records: lists.match_records,
            unmatched_records: lists.unmatched_records,
            unique_to_a: lists.unique_to_a,
            unique_to_b: lists.unique_to_b,
            invalid_geometry: lists.invalid_geometry,
            errors: lists.errors,
        }
    }
}

fn add_totals(totals: &mut SourceTotals, boxes: usize) {
    totals.images += 1;
    totals.boxes += boxes;
}
