//! Progress reporting utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress display for a comparison run: one spinner per phase, one bar over row passes
#[derive(Debug)]
pub struct ProgressReporter {
    pub phase_pb: Option<ProgressBar>,
    pub rows_pb: Option<ProgressBar>,
    show_progress: bool,
}

impl ProgressReporter {
    /// Create progress reporter for a comparison, starting with table loading
    pub fn new_for_compare() -> Self {
        Self {
            phase_pb: Some(create_spinner("Loading tables...")),
            rows_pb: None,
            show_progress: true,
        }
    }

    /// Create minimal progress reporter (no progress bars)
    pub fn new_minimal() -> Self {
        Self {
            phase_pb: None,
            rows_pb: None,
            show_progress: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.show_progress
    }

    /// Show a new phase message, creating the spinner if the last phase finished
    pub fn begin_phase(&mut self, message: &str) {
        if !self.show_progress {
            return;
        }
        match &self.phase_pb {
            Some(pb) => pb.set_message(message.to_string()),
            None => self.phase_pb = Some(create_spinner(message)),
        }
    }

    pub fn finish_phase(&mut self, message: &str) {
        if let Some(pb) = self.phase_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }

    /// Start the bar for a pass over `total` rows
    pub fn begin_rows(&mut self, total: u64, message: &str) {
        if !self.show_progress {
            return;
        }
        if let Some(pb) = self.rows_pb.take() {
            pb.finish_and_clear();
        }
        self.rows_pb = Some(create_progress_bar(total, message));
    }

    pub fn inc_rows(&self, delta: u64) {
        if let Some(pb) = &self.rows_pb {
            pb.inc(delta);
        }
    }

    pub fn finish_rows(&mut self, message: &str) {
        if let Some(pb) = self.rows_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(pb) = self.phase_pb.take() {
            pb.finish_and_clear();
        }
        if let Some(pb) = self.rows_pb.take() {
            pb.finish_and_clear();
        }
    }
}

/// Create a spinner progress bar
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .expect("Invalid progress template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a progress bar with known total
fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} ({per_sec}) {eta} {msg}")
            .expect("Invalid progress template")
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}
