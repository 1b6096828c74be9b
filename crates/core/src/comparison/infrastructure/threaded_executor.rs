use crate::comparison::comparison_accumulator::ImageOutcome;
use crate::comparison::comparison_executor::{ComparisonExecutor, ImageJob};

/// Distributes images over a fixed pool of scoped worker threads.
///
/// Layout: `queue → N workers → results`, then results are put back in
/// input order so the merge downstream stays deterministic.
pub struct ThreadedExecutor {
    workers: usize,
}

impl ThreadedExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl ComparisonExecutor for ThreadedExecutor {
    fn execute(&self, image_ids: &[String], job: &ImageJob<'_>) -> Vec<ImageOutcome> {
        if self.workers == 1 || image_ids.len() <= 1 {
            return image_ids.iter().map(|id| job(id.as_str())).collect();
        }

        let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, &str)>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, ImageOutcome)>();

        for (index, id) in image_ids.iter().enumerate() {
            // receiver is alive until the end of this function
            let _ = job_tx.send((index, id.as_str()));
        }
        drop(job_tx);

        let worker_count = self.workers.min(image_ids.len());
        std::thread::scope(|scope| {
            for _ in 0..worker_count {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for (index, id) in job_rx.iter() {
                        if result_tx.send((index, job(id))).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(result_tx);

        let mut indexed: Vec<(usize, ImageOutcome)> = result_rx.iter().collect();
        indexed.sort_by_key(|(index, _)| *index);
        log::debug!(
            "Compared {} images on {worker_count} workers",
            indexed.len()
        );
        indexed.into_iter().map(|(_, outcome)| outcome).collect()
    }
}
