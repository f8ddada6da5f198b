//! Terminal progress bar: one tick per completed file.

use hfdl_core::progress::ProgressSink;
use indicatif::{ProgressBar, ProgressStyle};

pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} files ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }
}

impl ProgressSink for BarProgress {
    fn tick(&self) {
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish();
    }
}
