pub mod compare_annotations_use_case;
pub mod comparison_accumulator;
pub mod comparison_executor;
pub mod comparison_logger;
pub mod comparison_result;
pub mod infrastructure;
