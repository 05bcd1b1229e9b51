// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for indexing
// reference: uses indicatif for progress bars and tracks indexing metrics

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct IndexingStats {
    pub documents_loaded: usize,
    pub documents_indexed: usize,
    pub total_bytes_indexed: u64,
    pub duration_ms: u128,
}

impl IndexingStats {
    pub fn documents_per_second(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.documents_indexed as f64 * 1000.0 / self.duration_ms as f64
    }

    pub fn is_complete(&self) -> bool {
        self.documents_indexed == self.documents_loaded
    }
}

pub struct ProgressTracker {
    bar: ProgressBar,
    documents_loaded: usize,
    documents_indexed: AtomicUsize,
    bytes_indexed: AtomicU64,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn with_color(total_documents: usize, colored: bool) -> Self {
        Self {
            bar: create_progress_bar(total_documents as u64, colored),
            documents_loaded: total_documents,
            documents_indexed: AtomicUsize::new(0),
            bytes_indexed: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// A tracker that records stats without drawing anything.
    pub fn hidden(total_documents: usize) -> Self {
        let tracker = Self::with_color(total_documents, false);
        tracker.bar.set_draw_target(ProgressDrawTarget::hidden());
        tracker
    }

    pub fn inc_document(&self, identifier: &str, bytes: u64) {
        self.documents_indexed.fetch_add(1, Ordering::SeqCst);
        self.bytes_indexed.fetch_add(bytes, Ordering::SeqCst);
        self.bar.set_message(identifier.to_string());
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> IndexingStats {
        IndexingStats {
            documents_loaded: self.documents_loaded,
            documents_indexed: self.documents_indexed.load(Ordering::SeqCst),
            total_bytes_indexed: self.bytes_indexed.load(Ordering::SeqCst),
            duration_ms: self.start_time.elapsed().as_millis(),
        }
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(total: u64, colored: bool) -> ProgressBar {
    let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
    match ProgressStyle::default_bar().template(bar_template(colored)) {
        Ok(style) => bar.set_style(style.progress_chars(if colored { "█▓▒░" } else { "=>-" })),
        Err(_) => bar.set_style(ProgressStyle::default_bar()),
    }
    bar
}

fn bar_template(colored: bool) -> &'static str {
    if colored {
        "{spinner:.green} Indexing [{bar:40.cyan/blue}] {pos}/{len} {msg}"
    } else {
        "{spinner} Indexing [{bar:40}] {pos}/{len} {msg}"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexing_stats_rate() {
        let mut stats = IndexingStats::default();
        stats.documents_loaded = 10;
        stats.documents_indexed = 10;
        stats.duration_ms = 2000;

        assert_eq!(stats.documents_per_second(), 5.0);
        assert!(stats.is_complete());
    }

    #[test]
    fn test_indexing_stats_zero_duration() {
        let stats = IndexingStats::default();
        assert_eq!(stats.documents_per_second(), 0.0);
    }

    #[test]
    fn test_plain_template_has_no_styles() {
        assert!(!bar_template(false).contains(".green"));
        assert!(!bar_template(false).contains(".cyan"));
        assert!(bar_template(true).contains(".green"));
    }

    #[test]
    fn test_progress_tracker_increment() {
        let tracker = ProgressTracker::hidden(2);

        tracker.inc_document("a.txt", 1024);

        let stats = tracker.get_stats();
        assert_eq!(stats.documents_indexed, 1);
        assert_eq!(stats.total_bytes_indexed, 1024);
        assert!(!stats.is_complete());

        tracker.inc_document("b.txt", 1);
        assert!(tracker.get_stats().is_complete());
    }
}
