use crate::matching::domain::overlap_evaluator::overlap_ratio;
use crate::shared::annotation::Annotation;
use crate::shared::constants::DEFAULT_MATCH_THRESHOLD;

/// Existence check: which annotations have no box in the other source
/// overlapping them above the threshold, labels ignored.
///
/// Unlike [`ImageMatcher`](super::image_matcher::ImageMatcher) this has no
/// tie-break and produces no match records.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniqueDetector {
    threshold: f64,
}

impl UniqueDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn find_unique(&self, list: &[Annotation], other: &[Annotation]) -> Vec<Annotation> {
        list.iter()
            .filter(|a| {
                !other
                    .iter()
                    .any(|b| overlap_ratio(&a.bbox, &b.bbox).exceeds(self.threshold))
            })
            .cloned()
            .collect()
    }
}

impl Default for UniqueDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::bounding_box::BoundingBox;

    fn ann(label: &str, x1: f64, y1: f64, x2: f64, y2: f64) -> Annotation {
        Annotation::new("img1", label, BoundingBox::new(x1, y1, x2, y2))
    }

    #[test]
    fn test_empty_other_makes_everything_unique() {
        let list = vec![ann("cat", 0.0, 0.0, 10.0, 10.0)];
        assert_eq!(UniqueDetector::default().find_unique(&list, &[]), list);
    }

    #[test]
    fn test_label_is_ignored() {
        let list = vec![ann("cat", 0.0, 0.0, 10.0, 10.0)];
        let other = vec![ann("dog", 1.0, 1.0, 9.0, 9.0)];
        assert!(UniqueDetector::default().find_unique(&list, &other).is_empty());
    }

    #[test]
    fn test_both_directions() {
        let a = vec![ann("cat", 0.0, 0.0, 10.0, 10.0)];
        let b = vec![ann("cat", 1.0, 1.0, 9.0, 9.0), ann("dog", 50.0, 50.0, 60.0, 60.0)];
        let detector = UniqueDetector::default();
        assert!(detector.find_unique(&a, &b).is_empty());
        assert_eq!(detector.find_unique(&b, &a), vec![b[1].clone()]);
    }

    #[test]
    fn test_boundary_overlap_is_unique() {
        let list = vec![ann("cat", 0.0, 0.0, 10.0, 10.0)];
        let other = vec![ann("cat", 5.0, 0.0, 15.0, 10.0)];
        assert_eq!(UniqueDetector::default().find_unique(&list, &other).len(), 1);
    }

    #[test]
    fn test_invalid_geometry_is_unique() {
        let list = vec![ann("cat", 10.0, 0.0, 0.0, 10.0)];
        let other = vec![ann("cat", 0.0, 0.0, 10.0, 10.0)];
        assert_eq!(UniqueDetector::default().find_unique(&list, &other).len(), 1);
    }

    #[test]
    fn test_preserves_input_order() {
        let list = vec![
            ann("a", 100.0, 100.0, 110.0, 110.0),
            ann("b", 0.0, 0.0, 10.0, 10.0),
            ann("c", 200.0, 200.0, 210.0, 210.0),
        ];
        let other = vec![ann("x", 0.0, 0.0, 10.0, 10.0)];
        let unique = UniqueDetector::default().find_unique(&list, &other);
        let labels: Vec<_> = unique.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "c"]);
    }
}
