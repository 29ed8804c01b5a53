//! Progress bar helpers using indicatif

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::{PfaError, SweepObserver, SweepRecord};

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Create a progress bar for known-length operations
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("█▓▒░"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Finish a progress bar with a success message
pub fn finish_with_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✅ {}", message));
}

/// Finish a progress bar with a warning message
pub fn finish_with_warning(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("⚠️  {}", message));
}

/// Sweep observer that drives a progress bar and prints one line per sweep
pub struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    pub fn new(number_sweeps: usize) -> Self {
        Self {
            bar: create_progress_bar(number_sweeps as u64, "    Sweeps"),
        }
    }

    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }
}

impl SweepObserver for ProgressObserver {
    fn sweep_started(&self, sweep: usize, total: usize) {
        self.bar.set_message(format!("    Sweep {}/{}", sweep, total));
    }

    fn sweep_finished(&self, record: &SweepRecord) {
        self.bar.inc(1);
        self.bar.println(format!(
            "      {} Sweep {}: {} cluster(s), {} principal feature(s) ({} edges, {} data points)",
            style("✓").green(),
            record.sweep,
            record.pf.len(),
            record.principal_features().count(),
            record.edge_count,
            record.sample_size
        ));
    }

    fn sweep_failed(&self, sweep: usize, error: &PfaError) {
        self.bar.inc(1);
        self.bar.println(format!(
            "      {} Sweep {} failed: {}",
            style("✗").red(),
            sweep,
            error
        ));
    }

    fn mutual_information_started(&self, features: usize) {
        self.bar.set_message(format!(
            "    Scoring mutual information for {} feature(s)",
            features
        ));
    }
}
