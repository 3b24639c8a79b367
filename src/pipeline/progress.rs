// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for pipeline execution
// reference: uses indicatif for progress bars and tracks processing metrics

use crate::patch::DefectLabel;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    pub images_processed: usize,
    pub patches_written: usize,
    pub ok_patches: usize,
    pub ko_patches: usize,
    pub duration: Duration,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labeled_patches(&self) -> usize {
        self.ok_patches + self.ko_patches
    }

    /// Percentage of labeled patches classified KO.
    pub fn defect_rate(&self) -> f64 {
        let labeled = self.labeled_patches();
        if labeled == 0 {
            return 0.0;
        }
        (self.ko_patches as f64 / labeled as f64) * 100.0
    }

    pub fn patches_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.patches_written as f64 / secs
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    images_processed: AtomicUsize,
    patches_written: AtomicUsize,
    ok_patches: AtomicUsize,
    ko_patches: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn with_color(total_images: usize, colored: bool) -> Self {
        Self::build(MultiProgress::new(), total_images, colored)
    }

    pub fn hidden(total_images: usize) -> Self {
        Self::build(
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            total_images,
            false,
        )
    }

    fn build(multi_progress: MultiProgress, total_images: usize, colored: bool) -> Self {
        let main_bar = create_progress_bar(&multi_progress, total_images as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            images_processed: AtomicUsize::new(0),
            patches_written: AtomicUsize::new(0),
            ok_patches: AtomicUsize::new(0),
            ko_patches: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn inc_images_processed(&self) {
        self.images_processed.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn add_patch(&self, label: Option<DefectLabel>) {
        self.patches_written.fetch_add(1, Ordering::SeqCst);
        match label {
            Some(DefectLabel::Ok) => {
                self.ok_patches.fetch_add(1, Ordering::SeqCst);
            }
            Some(DefectLabel::Ko) => {
                self.ko_patches.fetch_add(1, Ordering::SeqCst);
            }
            None => {}
        }
    }

    pub fn set_message(&self, message: String) {
        self.main_bar.set_message(message);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Extraction complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            images_processed: self.images_processed.load(Ordering::SeqCst),
            patches_written: self.patches_written.load(Ordering::SeqCst),
            ok_patches: self.ok_patches.load(Ordering::SeqCst),
            ko_patches: self.ko_patches.load(Ordering::SeqCst),
            duration: self.start_time.elapsed(),
        }
    }

    fn update_detail_bar(&self) {
        let patches = self.patches_written.load(Ordering::SeqCst);
        let ok = self.ok_patches.load(Ordering::SeqCst);
        let ko = self.ko_patches.load(Ordering::SeqCst);

        let message = if ok + ko > 0 {
            format!("Patches: {} | OK: {} | KO: {}", patches, ok, ko)
        } else {
            format!("Patches: {}", patches)
        };

        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let template = if colored {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}"
    } else {
        "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta}) {msg}"
    };
    let chars = if colored { "█▓▒░" } else { "=>-" };

    match ProgressStyle::default_bar().template(template) {
        Ok(style) => bar.set_style(style.progress_chars(chars)),
        Err(e) => tracing::warn!("Invalid progress bar template: {}", e),
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_stats_calculations() {
        let stats = PipelineStats {
            images_processed: 3,
            patches_written: 100,
            ok_patches: 75,
            ko_patches: 25,
            duration: Duration::from_secs(10),
        };

        assert_eq!(stats.labeled_patches(), 100);
        assert_eq!(stats.defect_rate(), 25.0);
        assert_eq!(stats.patches_per_second(), 10.0);
    }

    #[test]
    fn test_pipeline_stats_zero_duration() {
        let stats = PipelineStats::new();
        assert_eq!(stats.patches_per_second(), 0.0);
        assert_eq!(stats.defect_rate(), 0.0);
    }

    #[test]
    fn test_progress_tracker_counts_labels() {
        let tracker = ProgressTracker::hidden(2);

        tracker.add_patch(Some(DefectLabel::Ok));
        tracker.add_patch(Some(DefectLabel::Ko));
        tracker.add_patch(Some(DefectLabel::Ko));
        tracker.inc_images_processed();

        let stats = tracker.get_stats();
        assert_eq!(stats.images_processed, 1);
        assert_eq!(stats.patches_written, 3);
        assert_eq!(stats.ok_patches, 1);
        assert_eq!(stats.ko_patches, 2);
    }

    #[test]
    fn test_progress_tracker_unlabeled() {
        let tracker = ProgressTracker::hidden(1);

        tracker.add_patch(None);
        tracker.add_patch(None);

        let stats = tracker.get_stats();
        assert_eq!(stats.patches_written, 2);
        assert_eq!(stats.labeled_patches(), 0);
    }
}
