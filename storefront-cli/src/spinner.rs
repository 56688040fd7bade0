//! Progress spinner for long-running commands.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Create a spinner, or a hidden bar when `quiet` is set.
pub(crate) fn spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let style = ProgressStyle::with_template("  {spinner:.cyan} {msg}")
        .map(|s| s.tick_chars("/-\\|"))
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
