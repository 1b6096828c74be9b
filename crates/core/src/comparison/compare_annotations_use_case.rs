use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use thiserror::Error;

use crate::annotations::domain::annotation_source::{AnnotationError, AnnotationSource};
use crate::comparison::comparison_accumulator::{ComparisonAccumulator, ImageOutcome};
use crate::comparison::comparison_executor::ComparisonExecutor;
use crate::comparison::comparison_logger::ComparisonLogger;
use crate::comparison::comparison_result::{ComparisonResult, ImageError};
use crate::matching::domain::image_matcher::ImageMatcher;
use crate::matching::domain::unique_detector::UniqueDetector;
use crate::shared::annotation::{Annotation, SourceSide};
use crate::shared::config::{ComparisonConfig, ConfigError};

#[derive(Error, Debug)]
pub enum ComparisonError {
    #[error("failed to list images of source {side} ({origin}): {source}")]
    Enumerate {
        side: SourceSide,
        origin: String,
        #[source]
        source: AnnotationError,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Corpus comparison: enumerate both sources → compare each image →
/// merge outcomes in image-identifier order.
///
/// Every image of either source is visited once. Images only in A have all
/// their boxes reported as unmatched and unique to A; images only in B have
/// all their boxes reported as unique to B. An image whose file fails to
/// load is reported in `errors` and otherwise skipped.
pub struct CompareAnnotationsUseCase {
    source_a: Box<dyn AnnotationSource>,
    source_b: Box<dyn AnnotationSource>,
    executor: Box<dyn ComparisonExecutor>,
    logger: Box<dyn ComparisonLogger>,
    config: ComparisonConfig,
}

impl CompareAnnotationsUseCase {
    pub fn new(
        source_a: Box<dyn AnnotationSource>,
        source_b: Box<dyn AnnotationSource>,
        executor: Box<dyn ComparisonExecutor>,
        logger: Box<dyn ComparisonLogger>,
        config: ComparisonConfig,
    ) -> Self {
        Self {
            source_a,
            source_b,
            executor,
            logger,
            config,
        }
    }

    pub fn execute(&mut self) -> Result<ComparisonResult, ComparisonError> {
        self.config.validate()?;

        let ids_a = enumerate(&*self.source_a, SourceSide::A)?;
        let ids_b = enumerate(&*self.source_b, SourceSide::B)?;
        let set_a: BTreeSet<&str> = ids_a.iter().map(String::as_str).collect();
        let set_b: BTreeSet<&str> = ids_b.iter().map(String::as_str).collect();
        let all_ids: Vec<String> = set_a.union(&set_b).map(|s| s.to_string()).collect();

        self.logger.info(&format!(
            "Comparing {} images ({} in A, {} in B)",
            all_ids.len(),
            set_a.len(),
            set_b.len()
        ));

        let comparison = ImageComparison {
            source_a: &*self.source_a,
            source_b: &*self.source_b,
            matcher: ImageMatcher::from_config(&self.config),
            detector: UniqueDetector::new(self.config.threshold),
            symmetric: self.config.symmetric,
        };
        let total = all_ids.len();
        let completed = AtomicUsize::new(0);

        let outcomes = {
            let logger = Mutex::new(&mut self.logger);
            let job = |image_id: &str| {
                let outcome =
                    comparison.run(image_id, set_a.contains(image_id), set_b.contains(image_id));
                let current = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if let Ok(mut logger) = logger.lock() {
                    for error in &outcome.errors {
                        logger.image_failed(error);
                    }
                    logger.progress(current, total);
                }
                outcome
            };
            self.executor.execute(&all_ids, &job)
        };

        let mut accumulator = ComparisonAccumulator::new(
            &self.config,
            self.source_a.describe(),
            self.source_b.describe(),
        );
        for outcome in outcomes {
            accumulator.add(outcome);
        }
        let result = accumulator.finish();

        self.logger.summary();
        Ok(result)
    }
}

fn enumerate(
    source: &dyn AnnotationSource,
    side: SourceSide,
) -> Result<Vec<String>, ComparisonError> {
    source.image_ids().map_err(|e| ComparisonError::Enumerate {
        side,
        origin: source.describe(),
        source: e,
    })
}

/// Work done for a single image identifier. Holds no mutable state so it
/// can run on any worker.
struct ImageComparison<'a> {
    source_a: &'a dyn AnnotationSource,
    source_b: &'a dyn AnnotationSource,
    matcher: ImageMatcher,
    detector: UniqueDetector,
    symmetric: bool,
}

impl ImageComparison<'_> {
    fn run(&self, image_id: &str, in_a: bool, in_b: bool) -> ImageOutcome {
        let mut outcome = ImageOutcome {
            image_id: image_id.to_string(),
            ..ImageOutcome::default()
        };

        let list_a = self.load(self.source_a, SourceSide::A, image_id, in_a, &mut outcome);
        let list_b = self.load(self.source_b, SourceSide::B, image_id, in_b, &mut outcome);
        if !outcome.errors.is_empty() {
            return outcome;
        }

        outcome.boxes_a = list_a.as_ref().map(Vec::len);
        if let Some(b) = &list_b {
            outcome.invalid_b = invalid(b);
        }

        match (list_a, list_b) {
            (Some(a), Some(b)) => {
                outcome.paired_boxes_b = Some(b.len());
                outcome.image_match = self.matcher.match_image(&a, &b);
                if self.symmetric {
                    let reverse = self.matcher.match_image(&b, &a);
                    outcome.symmetric_unmatched_b = Some(reverse.unmatched.len());
                }
                outcome.unique_to_a = self.detector.find_unique(&a, &b);
                outcome.unique_to_b = self.detector.find_unique(&b, &a);
            }
            (Some(a), None) => {
                // nothing to scan against: every box lands in `unmatched`
                outcome.image_match = self.matcher.match_image(&a, &[]);
                outcome.unique_to_a = a;
            }
            (None, Some(b)) => {
                if self.symmetric {
                    outcome.symmetric_unmatched_b = Some(b.len());
                }
                outcome.unique_to_b = b;
            }
            (None, None) => {}
        }
        outcome.invalid_a = outcome.image_match.invalid.clone();
        outcome
    }

    fn load(
        &self,
        source: &dyn AnnotationSource,
        side: SourceSide,
        image_id: &str,
        present: bool,
        outcome: &mut ImageOutcome,
    ) -> Option<Vec<Annotation>> {
        if !present {
            return None;
        }
        match source.load(image_id) {
            Ok(list) => Some(list),
            Err(e) => {
                outcome.errors.push(ImageError {
                    image_id: image_id.to_string(),
                    side,
                    message: e.to_string(),
                });
                None
            }
        }
    }
}

fn invalid(list: &[Annotation]) -> Vec<Annotation> {
    list.iter().filter(|a| !a.bbox.is_valid()).cloned().collect()
}
