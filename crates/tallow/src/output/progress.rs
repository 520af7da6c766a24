//! Progress bar for file transfers

use indicatif::{ProgressBar, ProgressStyle};

/// Wraps an `indicatif` bar with the byte-count style used for sends and
/// receives.
#[derive(Debug)]
pub struct TransferProgressBar {
    bar: ProgressBar,
}

impl TransferProgressBar {
    /// Create a new progress bar sized to `total_bytes`.
    pub fn new(total_bytes: u64) -> Self {
        let bar = ProgressBar::new(total_bytes);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        Self { bar }
    }

    /// Set the absolute number of bytes transferred so far.
    pub fn update(&mut self, bytes_transferred: u64) {
        self.bar.set_position(bytes_transferred);
    }

    /// Mark the bar complete and leave its final state on screen.
    pub fn finish(&mut self) {
        self.bar.finish();
    }

    /// Abandon the bar with a message, for cancelled or failed transfers.
    pub fn abandon(&mut self, message: &str) {
        self.bar.abandon_with_message(message.to_string());
    }
}
