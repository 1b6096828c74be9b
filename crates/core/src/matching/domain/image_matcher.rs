use crate::matching::domain::match_record::MatchRecord;
use crate::matching::domain::overlap_evaluator::overlap_ratio;
use crate::shared::annotation::Annotation;
use crate::shared::config::{ComparisonConfig, TieBreak};
use crate::shared::constants::DEFAULT_MATCH_THRESHOLD;

/// State of the scan of one source-A annotation over the source-B list.
///
/// ```text
/// Scanning ──overlap, same label──────▶ MatchedAgree      (terminal)
///    │ ▲
///    │ └─────────── continue ─────────  MatchedDisagree   (emits record)
///    └──no overlap left───────────────▶ Exhausted         (terminal)
/// ```
///
/// With [`TieBreak::StopAtFirstOverlap`] `MatchedDisagree` is terminal too.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScanState {
    Scanning { position: usize },
    MatchedAgree { candidate: usize, overlap: f64 },
    MatchedDisagree { candidate: usize, overlap: f64 },
    Exhausted,
}

/// Classification of every source-A annotation of a single image.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageMatch {
    /// One record per overlapping pair encountered, in scan order.
    pub records: Vec<MatchRecord>,
    /// Annotations that overlapped nothing, including invalid ones.
    pub unmatched: Vec<Annotation>,
    /// Subset of `unmatched` whose box has invalid geometry.
    pub invalid: Vec<Annotation>,
}

impl ImageMatch {
    /// Number of overlapping pairs found; the legacy "matching count".
    pub fn matching_count(&self) -> usize {
        self.records.len()
    }
}

/// Greedy first-match scan of one image's annotations from one source
/// against the other source's annotations for the same image.
///
/// Order-sensitive: both input orders affect the records produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageMatcher {
    threshold: f64,
    tie_break: TieBreak,
}

impl ImageMatcher {
    pub fn new(threshold: f64, tie_break: TieBreak) -> Self {
        Self {
            threshold,
            tie_break,
        }
    }

    pub fn from_config(config: &ComparisonConfig) -> Self {
        Self::new(config.threshold, config.tie_break)
    }

    pub fn match_image(&self, list_a: &[Annotation], list_b: &[Annotation]) -> ImageMatch {
        let mut result = ImageMatch::default();
        for a in list_a {
            if !a.bbox.is_valid() {
                log::debug!(
                    "Invalid geometry {} for '{}' in {}",
                    a.bbox,
                    a.label,
                    a.image_id
                );
                result.invalid.push(a.clone());
                result.unmatched.push(a.clone());
                continue;
            }
            self.scan(a, list_b, &mut result);
        }
        result
    }

    fn scan(&self, a: &Annotation, list_b: &[Annotation], result: &mut ImageMatch) {
        let mut matched = false;
        let mut state = ScanState::Scanning { position: 0 };
        loop {
            state = match state {
                ScanState::Scanning { position } => self.advance(a, list_b, position),
                ScanState::MatchedAgree { candidate, overlap } => {
                    result.records.push(record(a, &list_b[candidate], overlap));
                    return;
                }
                ScanState::MatchedDisagree { candidate, overlap } => {
                    matched = true;
                    result.records.push(record(a, &list_b[candidate], overlap));
                    match self.tie_break {
                        TieBreak::ContinueOnLabelMismatch => ScanState::Scanning {
                            position: candidate + 1,
                        },
                        TieBreak::StopAtFirstOverlap => return,
                    }
                }
                ScanState::Exhausted => {
                    if !matched {
                        result.unmatched.push(a.clone());
                    }
                    return;
                }
            };
        }
    }

    /// Finds the next overlapping candidate at or after `position`.
    fn advance(&self, a: &Annotation, list_b: &[Annotation], position: usize) -> ScanState {
        for (offset, b) in list_b.iter().enumerate().skip(position) {
            let overlap = overlap_ratio(&a.bbox, &b.bbox);
            if !overlap.exceeds(self.threshold) {
                continue;
            }
            let overlap = overlap.ratio().unwrap_or_default();
            return if a.label == b.label {
                ScanState::MatchedAgree {
                    candidate: offset,
                    overlap,
                }
            } else {
                ScanState::MatchedDisagree {
                    candidate: offset,
                    overlap,
                }
            };
        }
        ScanState::Exhausted
    }
}

impl Default for ImageMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_THRESHOLD, TieBreak::default())
    }
}

fn record(a: &Annotation, b: &Annotation, overlap: f64) -> MatchRecord {
    MatchRecord {
        image_id: a.image_id.clone(),
        bbox: a.bbox,
        label_a: a.label.clone(),
        label_b: b.label.clone(),
        counterpart_bbox: b.bbox,
        overlap,
    }
}
