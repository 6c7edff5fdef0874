// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Volume analyzer: runs panel detection over many pages in parallel.
//
// The detector is pure and holds only immutable options, so a single
// instance is shared by every blocking task through an `Arc`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use koma_core::error::{KomaError, Result};
use koma_core::{PanelDetectionOptions, PanelDetectionResult};
use koma_detect::PanelDetector;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Number of pages analysed at once unless configured otherwise.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Shared flag used to stop a volume analysis between pages.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Request cancellation. Pages already running finish normally.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Analyses every page of a volume with one shared [`PanelDetector`].
pub struct VolumeAnalyzer {
    detector: Arc<PanelDetector>,
    concurrency: usize,
    cancel: CancelHandle,
}

impl VolumeAnalyzer {
    pub fn new(options: PanelDetectionOptions) -> Self {
        Self {
            detector: Arc::new(PanelDetector::new(options)),
            concurrency: DEFAULT_CONCURRENCY,
            cancel: CancelHandle::default(),
        }
    }

    /// Limit how many pages are analysed at the same time (at least one).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// A handle that can cancel [`analyze`](Self::analyze) from another task.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Detect panels on every page, returning one result per page in page
    /// order.
    ///
    /// Each page is decoded and analysed on Tokio's blocking pool. A page
    /// that cannot be decoded, or whose task panics, yields a failed result
    /// for that page only.
    ///
    /// # Errors
    ///
    /// Returns [`KomaError::Cancelled`] when cancellation is requested before
    /// every page has started. Pages already running are allowed to finish
    /// first.
    #[instrument(skip(self, pages), fields(pages = pages.len(), concurrency = self.concurrency))]
    pub async fn analyze(&self, pages: Vec<Vec<u8>>) -> Result<Vec<PanelDetectionResult>> {
        info!("Starting volume analysis");

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles: Vec<JoinHandle<PanelDetectionResult>> = Vec::with_capacity(pages.len());
        let mut cancelled = false;

        for (index, page) in pages.into_iter().enumerate() {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|_| KomaError::Cancelled)?;

            if self.cancel.is_cancelled() {
                debug!(page = index, "Cancellation requested; not starting further pages");
                cancelled = true;
                break;
            }

            let detector = Arc::clone(&self.detector);
            handles.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                detector.detect(&page)
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (index, handle) in handles.into_iter().enumerate() {
            let result = match handle.await {
                Ok(result) => result,
                Err(err) => {
                    warn!(page = index, error = %err, "Page analysis task did not complete");
                    PanelDetectionResult::failed(format!("page {index} analysis aborted: {err}"))
                }
            };
            results.push(result);
        }

        if cancelled {
            info!(completed = results.len(), "Volume analysis cancelled");
            return Err(KomaError::Cancelled);
        }

        let summary = VolumeSummary::from_results(&results);
        info!(
            pages = summary.pages,
            failed = summary.failed_pages,
            full_page = summary.full_pages,
            panels = summary.total_panels,
            "Volume analysis complete"
        );
        Ok(results)
    }
}

/// Aggregate counts over a volume's detection results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSummary {
    pub pages: usize,
    /// Pages whose detection failed.
    pub failed_pages: usize,
    /// Successfully analysed pages with no panels (shown whole).
    pub full_pages: usize,
    pub total_panels: usize,
}

impl VolumeSummary {
    pub fn from_results(results: &[PanelDetectionResult]) -> Self {
        results.iter().fold(
            Self {
                pages: results.len(),
                ..Self::default()
            },
            |mut summary, result| {
                if !result.is_success() {
                    summary.failed_pages += 1;
                } else if result.is_full_page() {
                    summary.full_pages += 1;
                }
                summary.total_panels += result.panel_count();
                summary
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, ImageFormat, Luma};
    use koma_core::ReadingDirection;

    /// PNG bytes for a white page with black squares at the given origins.
    fn page_png(width: u32, height: u32, squares: &[(u32, u32, u32)]) -> Vec<u8> {
        let img = GrayImage::from_fn(width, height, |x, y| {
            let inside = squares
                .iter()
                .any(|&(sx, sy, size)| x >= sx && x < sx + size && y >= sy && y < sy + size);
            if inside { Luma([0u8]) } else { Luma([255u8]) }
        });
        let mut buffer = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .expect("PNG encoding");
        buffer.into_inner()
    }

    fn two_panel_page() -> Vec<u8> {
        page_png(400, 200, &[(20, 20, 160), (220, 20, 160)])
    }

    #[tokio::test]
    async fn results_follow_page_order() {
        let pages = vec![
            page_png(200, 200, &[]),
            two_panel_page(),
            vec![1, 2, 3, 4, 5],
            page_png(200, 200, &[(50, 50, 100)]),
        ];
        let analyzer = VolumeAnalyzer::new(PanelDetectionOptions::default());
        let results = analyzer.analyze(pages).await.expect("analysis");

        assert_eq!(results.len(), 4);
        assert!(results[0].is_success() && results[0].is_full_page());
        assert_eq!(results[1].panel_count(), 2);
        assert!(!results[2].is_success());
        assert_eq!(results[3].panel_count(), 1);
    }

    #[tokio::test]
    async fn single_worker_gives_same_results() {
        let pages = vec![two_panel_page(), two_panel_page(), page_png(200, 200, &[])];
        let parallel = VolumeAnalyzer::new(PanelDetectionOptions::manga())
            .analyze(pages.clone())
            .await
            .expect("parallel");
        let serial = VolumeAnalyzer::new(PanelDetectionOptions::manga())
            .with_concurrency(1)
            .analyze(pages)
            .await
            .expect("serial");
        assert_eq!(parallel, serial);
    }

    #[tokio::test]
    async fn manga_options_reach_every_page() {
        let analyzer = VolumeAnalyzer::new(
            PanelDetectionOptions::default().with_reading_direction(ReadingDirection::RightToLeft),
        );
        let results = analyzer
            .analyze(vec![two_panel_page(), two_panel_page()])
            .await
            .expect("analysis");
        for result in &results {
            let panels = result.panels();
            assert!(panels[0].x > panels[1].x);
        }
    }

    #[tokio::test]
    async fn cancelled_before_start_returns_error() {
        let analyzer = VolumeAnalyzer::new(PanelDetectionOptions::default());
        analyzer.cancel_handle().cancel();

        let outcome = analyzer.analyze(vec![two_panel_page()]).await;
        assert!(matches!(outcome, Err(KomaError::Cancelled)));
    }

    #[tokio::test]
    async fn empty_volume_is_empty() {
        let analyzer = VolumeAnalyzer::new(PanelDetectionOptions::default());
        assert!(analyzer.analyze(Vec::new()).await.expect("analysis").is_empty());
    }

    #[test]
    fn concurrency_is_at_least_one() {
        let analyzer = VolumeAnalyzer::new(PanelDetectionOptions::default()).with_concurrency(0);
        assert_eq!(analyzer.concurrency(), 1);
    }

    #[test]
    fn cancel_handles_share_state() {
        let analyzer = VolumeAnalyzer::new(PanelDetectionOptions::default());
        let handle = analyzer.cancel_handle();
        assert!(!analyzer.cancel_handle().is_cancelled());
        handle.cancel();
        assert!(analyzer.cancel_handle().is_cancelled());
    }

    #[test]
    fn summary_counts_outcomes() {
        let results = vec![
            PanelDetectionResult::succeeded(Vec::new(), 10, 10),
            PanelDetectionResult::failed("bad page"),
            PanelDetectionResult::succeeded(
                vec![
                    koma_core::Panel::new(0, 0, 5, 5),
                    koma_core::Panel::new(5, 0, 5, 5).with_order(1),
                ],
                10,
                10,
            ),
        ];
        let summary = VolumeSummary::from_results(&results);
        assert_eq!(
            summary,
            VolumeSummary {
                pages: 3,
                failed_pages: 1,
                full_pages: 1,
                total_panels: 2,
            }
        );
        let json = serde_json::to_string(&summary).expect("serialize");
        assert!(json.contains("\"total_panels\":2"));
    }
}
