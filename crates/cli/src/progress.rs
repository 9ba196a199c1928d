//! Progress indicators
//!
//! The batch coordinator reports whole percentages, so the bar is
//! always 100 units long.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Create a progress bar for a batch of `files` inputs.
pub fn batch_progress(files: usize) -> ProgressBar {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg} ({elapsed})")
            .unwrap()
            .progress_chars("█▓░"),
    );
    pb.set_message(format!(
        "{files} {}",
        if files == 1 { "image" } else { "images" }
    ));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// A bar that draws nothing, for machine-readable output.
pub fn hidden() -> ProgressBar {
    ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::hidden())
}

/// Move the bar to `percent`. Percentages only move forward.
pub fn set_percent(pb: &ProgressBar, percent: u8) {
    let percent = u64::from(percent.min(100));
    if percent > pb.position() {
        pb.set_position(percent);
    }
}

/// Finish a progress bar with a success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

/// Finish a progress bar with an error message
pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.abandon_with_message(format!("✗ {}", message));
}
