pub mod image_matcher;
pub mod match_record;
pub mod overlap_evaluator;
pub mod unique_detector;
