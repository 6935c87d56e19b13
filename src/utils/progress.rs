// file: src/utils/progress.rs
// description: spinner shown while a backend request is in flight
// reference: uses indicatif for terminal progress feedback

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct RequestSpinner {
    bar: ProgressBar,
}

impl RequestSpinner {
    pub fn start(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// A spinner that draws nothing, for non-interactive output
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}
