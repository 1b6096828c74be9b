use std::time::Instant;

use crate::comparison::comparison_result::ImageError;

/// Cross-cutting observer for comparison runs.
///
/// Decouples the comparison use case from where its progress goes
/// (log output, tests, a future UI).
pub trait ComparisonLogger: Send {
    /// Report per-image progress. `current` counts completed images.
    fn progress(&mut self, current: usize, total: usize);

    /// An image could not be loaded and was left out of the result.
    fn image_failed(&mut self, error: &ImageError);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullComparisonLogger;

impl ComparisonLogger for NullComparisonLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn image_failed(&mut self, _error: &ImageError) {}
    fn info(&mut self, _message: &str) {}
}

/// Logger backed by the `log` facade.
///
/// Progress is throttled to every `throttle_images` images.
pub struct LogComparisonLogger {
    throttle_images: usize,
    start_time: Instant,
    total_images: usize,
    completed: usize,
    failed: usize,
}

impl LogComparisonLogger {
    pub fn new(throttle_images: usize) -> Self {
        Self {
            throttle_images: throttle_images.max(1),
            start_time: Instant::now(),
            total_images: 0,
            completed: 0,
            failed: 0,
        }
    }

    /// Returns the formatted summary, or `None` if nothing was compared.
    pub fn summary_string(&self) -> Option<String> {
        if self.total_images == 0 && self.failed == 0 {
            return None;
        }
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let mut text = format!(
            "Compared {}/{} images in {elapsed:.2}s",
            self.completed, self.total_images
        );
        if self.failed > 0 {
            text.push_str(&format!(", {} failed to load", self.failed));
        }
        Some(text)
    }
}

impl Default for LogComparisonLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl ComparisonLogger for LogComparisonLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total_images = total;
        self.completed = self.completed.max(current);
        if total > 0 && (current % self.throttle_images == 0 || current == total) {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Comparing: {current}/{total} images ({pct:.1}%)");
        }
    }

    fn image_failed(&mut self, error: &ImageError) {
        log::warn!("Skipping image {error}");
        self.failed += 1;
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("{text}");
        }
    }
}
