use crate::matcher::MatchDecision;
use crate::pipeline::ScanSummary;

/// Trait for reporting scan progress.
///
/// CLI implements with indicatif. All methods have default no-op implementations.
pub trait ScanReporter {
    fn on_scan_start(&self, _total_folders: usize) {}
    fn on_folder_start(&self, _index: usize, _name: &str) {}
    fn on_folder_classified(&self, _index: usize, _decision: &MatchDecision) {}
    fn on_scan_complete(&self, _summary: &ScanSummary) {}
}

/// No-op reporter for silent operation.
pub struct SilentReporter;

impl ScanReporter for SilentReporter {}
