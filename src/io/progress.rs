//! Progress display for batch board generation

use std::sync::LazyLock;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::io::configuration::PROGRESS_BAR_WIDTH;

static ATTEMPT_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Boards: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Coordinates progress display for a batch of boards
///
/// One bar counts finished boards, a second one follows the attempts spent
/// on the board currently being drawn.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    attempt_bar: Option<ProgressBar>,
    discarded: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            attempt_bar: None,
            discarded: 0,
        }
    }

    /// Create the bars for `board_count` boards
    pub fn initialize(&mut self, board_count: usize) {
        let batch_bar = ProgressBar::new(board_count as u64);
        batch_bar.set_style(BATCH_STYLE.clone());
        self.batch_bar = Some(self.multi_progress.add(batch_bar));

        let attempt_bar = ProgressBar::new(0);
        attempt_bar.set_style(ATTEMPT_STYLE.clone());
        self.attempt_bar = Some(self.multi_progress.add(attempt_bar));
        self.discarded = 0;
    }

    /// Point the attempt bar at a new board
    pub fn start_board(&mut self, name: &str, attempts: usize) {
        if let Some(ref bar) = self.attempt_bar {
            bar.set_length(attempts as u64);
            bar.set_position(0);
            bar.set_prefix(name.to_string());
            bar.set_message(format!("0/{attempts}"));
        }
    }

    /// Report the attempts used so far on the current board
    pub fn update_attempt(&mut self, attempt: usize) {
        if let Some(ref bar) = self.attempt_bar {
            bar.set_position(attempt as u64);
            let total = bar.length().unwrap_or(0);
            bar.set_message(format!("{attempt}/{total}"));
        }
    }

    /// Count a finished board
    pub fn complete_board(&mut self, discarded: bool, elapsed: Duration) {
        if discarded {
            self.discarded += 1;
        }
        if let Some(ref bar) = self.batch_bar {
            bar.inc(1);
            bar.set_message(format!(
                "{} discarded, last {:.0?}",
                self.discarded, elapsed
            ));
        }
    }

    /// Boards reported as discarded since initialization
    pub const fn discarded(&self) -> usize {
        self.discarded
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref bar) = self.attempt_bar {
            bar.finish_and_clear();
        }
        if let Some(ref bar) = self.batch_bar {
            bar.finish_with_message("All boards processed");
        }
        let _ = self.multi_progress.clear();
    }
}
