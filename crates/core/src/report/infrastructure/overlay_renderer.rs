use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use thiserror::Error;

use crate::comparison::comparison_result::ComparisonResult;
use crate::matching::domain::match_record::MatchRecord;
use crate::report::infrastructure::label_font::{glyph, text_width, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::shared::bounding_box::BoundingBox;

const COLOR_A: Rgb<u8> = Rgb([230, 40, 40]);
const COLOR_B: Rgb<u8> = Rgb([40, 90, 230]);
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const LINE_THICKNESS: u32 = 2;
const LABEL_HEIGHT: u32 = GLYPH_HEIGHT + 2;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("failed to open image {path}: {source}")]
    Open {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("failed to save overlay {path}: {source}")]
    Save {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("disagreement index {index} out of range ({count} disagreeing records)")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("no records to draw")]
    NoRecords,
}

/// Path of the image an annotation file describes: `<dir>/<image_id>.<ext>`.
pub fn image_path(image_dir: &Path, image_id: &str, extension: &str) -> PathBuf {
    image_dir.join(format!("{image_id}.{extension}"))
}

/// Draws disagreeing matches side by side: the image with source A boxes
/// and classes on the left, the same image with the overlapped source B
/// boxes and classes on the right.
pub struct OverlayRenderer {
    image_dir: PathBuf,
    image_extension: String,
}

impl OverlayRenderer {
    pub fn new(image_dir: impl Into<PathBuf>, image_extension: impl Into<String>) -> Self {
        Self {
            image_dir: image_dir.into(),
            image_extension: image_extension.into(),
        }
    }

    /// All records must belong to the same image; the first one decides which.
    pub fn render(&self, records: &[&MatchRecord]) -> Result<RgbImage, OverlayError> {
        let first = records.first().ok_or(OverlayError::NoRecords)?;
        let path = image_path(&self.image_dir, &first.image_id, &self.image_extension);
        let source = image::open(&path)
            .map_err(|source| OverlayError::Open {
                path: path.clone(),
                source,
            })?
            .to_rgb8();

        let (width, height) = source.dimensions();
        let mut canvas = RgbImage::new(width * 2, height);
        image::imageops::replace(&mut canvas, &source, 0, 0);
        image::imageops::replace(&mut canvas, &source, i64::from(width), 0);

        let same_image: Vec<&MatchRecord> = records
            .iter()
            .copied()
            .filter(|r| r.image_id == first.image_id)
            .collect();
        for record in &same_image {
            draw_rect(&mut canvas, &record.bbox, 0, width, COLOR_A);
            draw_rect(&mut canvas, &record.counterpart_bbox, width, width, COLOR_B);
        }
        // labels last so no outline crosses them
        for record in &same_image {
            draw_label(&mut canvas, &record.label_a, &record.bbox, 0, width, COLOR_A);
            draw_label(
                &mut canvas,
                &record.label_b,
                &record.counterpart_bbox,
                width,
                width,
                COLOR_B,
            );
        }
        Ok(canvas)
    }

    /// Renders the image of the `index`-th disagreeing record with every
    /// disagreement found on that image, and saves it under `out_dir`.
    pub fn render_disagreement(
        &self,
        result: &ComparisonResult,
        index: usize,
        out_dir: &Path,
    ) -> Result<PathBuf, OverlayError> {
        let records = result.disagreeing_for_image_of(index).ok_or_else(|| {
            OverlayError::IndexOutOfRange {
                index,
                count: result.disagreeing().count(),
            }
        })?;
        let canvas = self.render(&records)?;
        save(&canvas, out_dir, &records[0].image_id)
    }

    /// One overlay per image that has at least one disagreeing record.
    pub fn render_all(
        &self,
        result: &ComparisonResult,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, OverlayError> {
        let mut written = Vec::new();
        let mut current: Vec<&MatchRecord> = Vec::new();
        for record in result.disagreeing() {
            if current.first().is_some_and(|r| r.image_id != record.image_id) {
                written.push(save(&self.render(&current)?, out_dir, &current[0].image_id)?);
                current.clear();
            }
            current.push(record);
        }
        if let Some(first) = current.first() {
            written.push(save(&self.render(&current)?, out_dir, &first.image_id)?);
        }
        log::info!("Wrote {} overlay images to {}", written.len(), out_dir.display());
        Ok(written)
    }
}

fn save(canvas: &RgbImage, out_dir: &Path, image_id: &str) -> Result<PathBuf, OverlayError> {
    std::fs::create_dir_all(out_dir).map_err(|source| OverlayError::OutputDir {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let path = out_dir.join(format!("{image_id}_overlay.png"));
    canvas.save(&path).map_err(|source| OverlayError::Save {
        path: path.clone(),
        source,
    })?;
    log::debug!("Saved overlay {}", path.display());
    Ok(path)
}

/// Outlines `bbox` inside the panel starting at `x_offset` with width
/// `panel_width`. Coordinates are clamped to the panel.
fn draw_rect(
    canvas: &mut RgbImage,
    bbox: &BoundingBox,
    x_offset: u32,
    panel_width: u32,
    color: Rgb<u8>,
) {
    let height = canvas.height();
    if panel_width == 0 || height == 0 || !bbox.is_valid() {
        return;
    }
    let x0 = to_pixel(bbox.xmin, panel_width);
    let x1 = to_pixel(bbox.xmax, panel_width);
    let y0 = to_pixel(bbox.ymin, height);
    let y1 = to_pixel(bbox.ymax, height);

    for t in 0..LINE_THICKNESS {
        let top = (y0 + t).min(y1);
        let bottom = y1.saturating_sub(t).max(y0);
        for x in x0..=x1 {
            canvas.put_pixel(x_offset + x, top, color);
            canvas.put_pixel(x_offset + x, bottom, color);
        }
        let left = (x0 + t).min(x1);
        let right = x1.saturating_sub(t).max(x0);
        for y in y0..=y1 {
            canvas.put_pixel(x_offset + left, y, color);
            canvas.put_pixel(x_offset + right, y, color);
        }
    }
}

/// Writes `text` on a filled tag sitting on top of `bbox`, or along the top
/// edge of the panel when the box starts too high. Clipped to the panel.
fn draw_label(
    canvas: &mut RgbImage,
    text: &str,
    bbox: &BoundingBox,
    x_offset: u32,
    panel_width: u32,
    background: Rgb<u8>,
) {
    let height = canvas.height();
    if panel_width == 0 || height == 0 || !bbox.is_valid() {
        return;
    }
    let x = to_pixel(bbox.xmin, panel_width);
    let y = to_pixel(bbox.ymin, height).saturating_sub(LABEL_HEIGHT);

    let mut put = |px: u32, py: u32, color: Rgb<u8>| {
        if px < panel_width && py < height {
            canvas.put_pixel(x_offset + px, py, color);
        }
    };

    for dy in 0..LABEL_HEIGHT {
        for dx in 0..text_width(text) {
            put(x + dx, y + dy, background);
        }
    }
    for (i, ch) in text.chars().enumerate() {
        let glyph_x = x + 1 + i as u32 * (GLYPH_WIDTH + 1);
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if (bits >> (GLYPH_WIDTH - 1 - col)) & 1 == 1 {
                    put(glyph_x + col, y + 1 + row as u32, TEXT_COLOR);
                }
            }
        }
    }
}

fn to_pixel(v: f64, max: u32) -> u32 {
    v.round().clamp(0.0, f64::from(max - 1)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::comparison_result::CorpusSummary;
    use crate::shared::config::TieBreak;

    const GREY: Rgb<u8> = Rgb([128, 128, 128]);

    fn write_image(dir: &Path, id: &str) {
        RgbImage::from_pixel(40, 30, GREY)
            .save(dir.join(format!("{id}.png")))
            .unwrap();
    }

    fn record(image_id: &str, a: BoundingBox, b: BoundingBox) -> MatchRecord {
        MatchRecord {
            image_id: image_id.into(),
            bbox: a,
            label_a: "cat".into(),
            label_b: "dog".into(),
            counterpart_bbox: b,
            overlap: 80.0,
        }
    }

    fn result(records: Vec<MatchRecord>) -> ComparisonResult {
        ComparisonResult {
            source_a: "a".into(),
            source_b: "b".into(),
            threshold: 50.0,
            tie_break: TieBreak::default(),
            summary: CorpusSummary::default(),
            match_records: records,
            unmatched_records: vec![],
            unique_to_a: vec![],
            unique_to_b: vec![],
            invalid_geometry: vec![],
            errors: vec![],
        }
    }

    #[test]
    fn test_image_path() {
        assert_eq!(
            image_path(Path::new("/data/img"), "0001", "jpg"),
            PathBuf::from("/data/img/0001.jpg")
        );
    }

    #[test]
    fn test_render_draws_both_panels() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "img1");
        let r = record(
            "img1",
            BoundingBox::new(5.0, 5.0, 15.0, 15.0),
            BoundingBox::new(20.0, 10.0, 30.0, 20.0),
        );
        let canvas = OverlayRenderer::new(dir.path(), "png")
            .render(&[&r])
            .unwrap();

        assert_eq!(canvas.dimensions(), (80, 30));
        assert_eq!(*canvas.get_pixel(5, 5), COLOR_A);
        assert_eq!(*canvas.get_pixel(10, 10), GREY);
        assert_eq!(*canvas.get_pixel(40 + 20, 10), COLOR_B);
        assert_eq!(*canvas.get_pixel(40 + 25, 15), GREY);
        // A boxes stay on the left panel only
        assert_eq!(*canvas.get_pixel(40 + 5, 5), GREY);
    }

    #[test]
    fn test_boxes_outside_image_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "img1");
        let r = record(
            "img1",
            BoundingBox::new(30.0, 20.0, 500.0, 500.0),
            BoundingBox::new(-10.0, -10.0, 5.0, 5.0),
        );
        let canvas = OverlayRenderer::new(dir.path(), "png")
            .render(&[&r])
            .unwrap();
        assert_eq!(*canvas.get_pixel(39, 29), COLOR_A);
        assert_eq!(*canvas.get_pixel(40, 0), COLOR_B);
    }

    #[test]
    fn test_class_labels_drawn_above_boxes() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "img1");
        let bbox = BoundingBox::new(5.0, 15.0, 30.0, 25.0);
        let canvas = OverlayRenderer::new(dir.path(), "png")
            .render(&[&record("img1", bbox, bbox)])
            .unwrap();

        // tag occupies rows 6..15 from x = 5; glyphs start one pixel in
        assert_eq!(*canvas.get_pixel(5, 6), COLOR_A);
        // 'C' top row is .###.
        assert_eq!(*canvas.get_pixel(7, 7), TEXT_COLOR);
        assert_eq!(*canvas.get_pixel(6, 7), COLOR_A);
        // 'D' top row is ####.
        assert_eq!(*canvas.get_pixel(40 + 5, 6), COLOR_B);
        assert_eq!(*canvas.get_pixel(40 + 6, 7), TEXT_COLOR);
        // nothing above the tag
        assert_eq!(*canvas.get_pixel(7, 5), GREY);
    }

    #[test]
    fn test_label_clipped_to_its_panel() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "img1");
        let bbox = BoundingBox::new(35.0, 15.0, 39.0, 25.0);
        let mut r = record("img1", bbox, BoundingBox::new(0.0, 20.0, 2.0, 25.0));
        r.label_a = "elephant".into();
        let canvas = OverlayRenderer::new(dir.path(), "png")
            .render(&[&r])
            .unwrap();
        assert_eq!(*canvas.get_pixel(39, 6), COLOR_A);
        // right panel at the same row stays untouched by the A tag
        assert_eq!(*canvas.get_pixel(40 + 20, 6), GREY);
    }

    #[test]
    fn test_missing_image_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let r = record(
            "absent",
            BoundingBox::new(0.0, 0.0, 1.0, 1.0),
            BoundingBox::new(0.0, 0.0, 1.0, 1.0),
        );
        let err = OverlayRenderer::new(dir.path(), "png")
            .render(&[&r])
            .unwrap_err();
        assert!(matches!(err, OverlayError::Open { .. }));
    }

    #[test]
    fn test_empty_records() {
        let err = OverlayRenderer::new("/tmp", "png").render(&[]).unwrap_err();
        assert!(matches!(err, OverlayError::NoRecords));
    }

    #[test]
    fn test_render_disagreement_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let err = OverlayRenderer::new(dir.path(), "png")
            .render_disagreement(&result(vec![]), 3, dir.path())
            .unwrap_err();
        assert!(matches!(
            err,
            OverlayError::IndexOutOfRange { index: 3, count: 0 }
        ));
    }

    #[test]
    fn test_render_disagreement_saves_png() {
        let images = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_image(images.path(), "img1");
        let b = BoundingBox::new(1.0, 1.0, 9.0, 9.0);
        let path = OverlayRenderer::new(images.path(), "png")
            .render_disagreement(&result(vec![record("img1", b, b)]), 0, out.path())
            .unwrap();
        assert_eq!(path, out.path().join("img1_overlay.png"));
        assert_eq!(image::open(&path).unwrap().width(), 80);
    }

    #[test]
    fn test_render_all_one_file_per_image() {
        let images = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_image(images.path(), "img1");
        write_image(images.path(), "img2");
        let b = BoundingBox::new(1.0, 1.0, 9.0, 9.0);
        let records = vec![record("img1", b, b), record("img1", b, b), record("img2", b, b)];
        let written = OverlayRenderer::new(images.path(), "png")
            .render_all(&result(records), out.path())
            .unwrap();
        assert_eq!(
            written,
            vec![
                out.path().join("img1_overlay.png"),
                out.path().join("img2_overlay.png"),
            ]
        );
    }
}
