use std::fmt::Write;

use crate::comparison::comparison_result::ComparisonResult;
use crate::report::domain::report_renderer::ReportRenderer;
use crate::shared::annotation::Annotation;

/// Plain-text report: summary block followed by one table per record list.
///
/// Empty tables are left out.
pub struct TextReport;

impl TextReport {
    pub fn new() -> Self {
        Self
    }

    pub fn render_string(&self, result: &ComparisonResult) -> String {
        let s = &result.summary;
        let mut out = String::new();

        let _ = writeln!(
            out,
            "Comparison of {} (A) and {} (B), overlap > {}%, tie-break {}",
            result.source_a, result.source_b, result.threshold, result.tie_break
        );
        out.push('\n');

        let mut lines = vec![
            ("Annotated images in A", s.totals_a.images.to_string()),
            ("Annotated images in B", s.totals_b.images.to_string()),
            ("Bounding boxes in A", s.totals_a.boxes.to_string()),
            ("Bounding boxes in B", s.totals_b.boxes.to_string()),
            ("Matching bounding boxes", s.matched_count.to_string()),
            ("Unmatched bounding boxes in A", s.unmatched_count_a.to_string()),
            ("Unmatched bounding boxes in B", s.unmatched_count_b.to_string()),
            ("Unique detections in A", result.unique_to_a.len().to_string()),
            ("Unique detections in B", result.unique_to_b.len().to_string()),
        ];
        if let Some(n) = s.symmetric_unmatched_count_b {
            lines.push(("Unmatched in B (B-side scan)", n.to_string()));
        }
        if s.invalid_geometry_a + s.invalid_geometry_b > 0 {
            lines.push((
                "Invalid boxes (A / B)",
                format!("{} / {}", s.invalid_geometry_a, s.invalid_geometry_b),
            ));
        }
        let width = lines.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in lines {
            let _ = writeln!(out, "{key:width$}  {value}");
        }

        let agreeing: Vec<Vec<String>> = result
            .agreeing()
            .map(|r| vec![r.image_id.clone(), r.bbox.to_string(), r.label_a.clone()])
            .collect();
        section(
            &mut out,
            "Matching boxes with matching classes",
            &["image", "box", "class"],
            agreeing,
        );

        let disagreeing: Vec<Vec<String>> = result
            .disagreeing()
            .enumerate()
            .map(|(i, r)| {
                vec![
                    i.to_string(),
                    r.image_id.clone(),
                    r.bbox.to_string(),
                    r.label_a.clone(),
                    r.label_b.clone(),
                ]
            })
            .collect();
        section(
            &mut out,
            "Matching boxes with different classes",
            &["#", "image", "box", "class A", "class B"],
            disagreeing,
        );

        section(
            &mut out,
            "Unique detections in A",
            &["image", "box", "class"],
            annotation_rows(&result.unique_to_a),
        );
        section(
            &mut out,
            "Unique detections in B",
            &["image", "box", "class"],
            annotation_rows(&result.unique_to_b),
        );

        let invalid: Vec<Vec<String>> = result
            .invalid_geometry
            .iter()
            .map(|(side, a)| {
                vec![
                    side.to_string(),
                    a.image_id.clone(),
                    a.bbox.to_string(),
                    a.label.clone(),
                ]
            })
            .collect();
        section(
            &mut out,
            "Invalid boxes (excluded from matching)",
            &["source", "image", "box", "class"],
            invalid,
        );

        let errors: Vec<Vec<String>> = result
            .errors
            .iter()
            .map(|e| vec![e.side.to_string(), e.image_id.clone(), e.message.clone()])
            .collect();
        section(&mut out, "Images skipped", &["source", "image", "error"], errors);

        out
    }
}

impl Default for TextReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for TextReport {
    fn render(&self, result: &ComparisonResult) -> Result<String, Box<dyn std::error::Error>> {
        Ok(self.render_string(result))
    }
}

fn annotation_rows(annotations: &[Annotation]) -> Vec<Vec<String>> {
    annotations
        .iter()
        .map(|a| vec![a.image_id.clone(), a.bbox.to_string(), a.label.clone()])
        .collect()
}

fn section(out: &mut String, title: &str, headers: &[&str], rows: Vec<Vec<String>>) {
    if rows.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{title}: {}", rows.len());

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    write_row(out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, &rule, &widths);
    for row in &rows {
        write_row(out, row, &widths);
    }
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{cell:w$}"))
        .collect();
    let _ = writeln!(out, "  {}", line.join("  ").trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::comparison_result::{CorpusSummary, ImageError, SourceTotals};
    use crate::matching::domain::match_record::MatchRecord;
    use crate::shared::annotation::SourceSide;
    use crate::shared::bounding_box::BoundingBox;
    use crate::shared::config::TieBreak;

    fn result() -> ComparisonResult {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let record = |label_b: &str| MatchRecord {
            image_id: "img1".into(),
            bbox,
            label_a: "cat".into(),
            label_b: label_b.into(),
            counterpart_bbox: bbox,
            overlap: 100.0,
        };
        ComparisonResult {
            source_a: "left".into(),
            source_b: "right".into(),
            threshold: 50.0,
            tie_break: TieBreak::ContinueOnLabelMismatch,
            summary: CorpusSummary {
                totals_a: SourceTotals { images: 1, boxes: 1 },
                totals_b: SourceTotals { images: 1, boxes: 3 },
                matched_count: 2,
                unmatched_count_a: 0,
                unmatched_count_b: 1,
                symmetric_unmatched_count_b: None,
                invalid_geometry_a: 0,
                invalid_geometry_b: 0,
            },
            match_records: vec![record("dog"), record("cat")],
            unmatched_records: vec![],
            unique_to_a: vec![],
            unique_to_b: vec![Annotation::new(
                "img1",
                "owl",
                BoundingBox::new(50.0, 50.0, 60.0, 60.0),
            )],
            invalid_geometry: vec![],
            errors: vec![],
        }
    }

    #[test]
    fn test_summary_lines() {
        let text = TextReport::new().render_string(&result());
        assert!(text.contains("left (A) and right (B)"));
        assert!(text.contains("tie-break legacy"));
        assert!(text.contains("Matching bounding boxes"));
        assert!(text.contains("Unmatched bounding boxes in B"));
        assert!(!text.contains("B-side scan"));
        assert!(!text.contains("Invalid boxes"));
    }

    #[test]
    fn test_tables_present_only_when_non_empty() {
        let text = TextReport::new().render_string(&result());
        assert!(text.contains("Matching boxes with matching classes: 1"));
        assert!(text.contains("Matching boxes with different classes: 1"));
        assert!(text.contains("Unique detections in B: 1"));
        assert!(!text.contains("Unique detections in A:"));
        assert!(!text.contains("Images skipped"));
    }

    #[test]
    fn test_disagreeing_rows_are_numbered() {
        let text = TextReport::new().render_string(&result());
        let row = text
            .lines()
            .find(|l| l.contains("dog"))
            .expect("disagreeing row");
        assert!(row.trim_start().starts_with('0'));
        assert!(row.contains("cat"));
    }

    #[test]
    fn test_symmetric_and_errors_rendered() {
        let mut r = result();
        r.summary.symmetric_unmatched_count_b = Some(0);
        r.summary.invalid_geometry_b = 1;
        r.invalid_geometry = vec![(
            SourceSide::B,
            Annotation::new("img1", "bad", BoundingBox::new(5.0, 5.0, 5.0, 9.0)),
        )];
        r.errors = vec![ImageError {
            image_id: "img9".into(),
            side: SourceSide::A,
            message: "failed to parse img9.xml".into(),
        }];
        let text = TextReport::new().render_string(&r);
        assert!(text.contains("Unmatched in B (B-side scan)"));
        assert!(text.contains("Invalid boxes (A / B)"));
        assert!(text.contains("0 / 1"));
        assert!(text.contains("Images skipped: 1"));
        assert!(text.contains("failed to parse img9.xml"));
    }

    #[test]
    fn test_render_trait() {
        let text = TextReport::new().render(&result()).unwrap();
        assert!(!text.is_empty());
    }
}
