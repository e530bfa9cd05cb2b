use indicatif::{ProgressBar, ProgressStyle};
use library_checker_core::{MatchDecision, ScanReporter, ScanSummary};
use std::sync::Mutex;

/// CLI progress reporter: one bar over the artist folders, with the
/// folder currently being looked up as its message.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                f(pb);
            }
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl ScanReporter for CliReporter {
    fn on_scan_start(&self, total_folders: usize) {
        let pb = ProgressBar::new(total_folders as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "  {spinner:.cyan} Checking [{bar:30.cyan/dim}] {pos}/{len} {msg}",
        ) {
            pb.set_style(style.progress_chars("━╸─").tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.replace(pb) {
                old.finish_and_clear();
            }
        }
    }

    fn on_folder_start(&self, _index: usize, name: &str) {
        let name = name.to_string();
        self.with_bar(|pb| pb.set_message(name));
    }

    fn on_folder_classified(&self, _index: usize, decision: &MatchDecision) {
        if let Some(candidate) = &decision.candidate {
            let line = format!(
                "  \x1b[32m✓\x1b[0m {} → {} ({:.1}%)",
                decision.folder.name,
                candidate.name,
                decision.similarity * 100.0
            );
            self.with_bar(|pb| pb.println(line));
        }
        self.with_bar(|pb| pb.inc(1));
    }

    fn on_scan_complete(&self, summary: &ScanSummary) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Scan complete: {} folders in {:.2}s",
            summary.folders,
            summary.duration.as_secs_f64()
        );
    }
}
