use std::path::Path;

use crate::comparison::comparison_result::ComparisonResult;
use crate::report::domain::report_renderer::ReportRenderer;

/// Serializes the full [`ComparisonResult`] as pretty-printed JSON.
pub struct JsonReport;

impl JsonReport {
    pub fn new() -> Self {
        Self
    }

    pub fn write_to(
        &self,
        result: &ComparisonResult,
        path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.render(result)?)?;
        log::info!("Wrote JSON report to {}", path.display());
        Ok(())
    }
}

impl Default for JsonReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for JsonReport {
    fn render(&self, result: &ComparisonResult) -> Result<String, Box<dyn std::error::Error>> {
        Ok(serde_json::to_string_pretty(result)?)
    }
}
