use crate::comparison::comparison_result::ComparisonResult;

/// Turns a comparison result into a document (table, JSON, ...).
pub trait ReportRenderer {
    fn render(&self, result: &ComparisonResult) -> Result<String, Box<dyn std::error::Error>>;
}
