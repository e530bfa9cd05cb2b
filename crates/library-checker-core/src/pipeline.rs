use crate::catalog::CatalogClient;
use crate::classification::ClassificationWriter;
use crate::config::{DEFAULT_MATCHES_FILE, DEFAULT_NO_MATCHES_FILE};
use crate::error::Error;
use crate::matcher::{CatalogMatcher, MatchDecision};
use crate::progress::ScanReporter;
use crate::scanner;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct ScanPipeline<'a, C: CatalogClient> {
    matcher: CatalogMatcher<'a, C>,
    matches_path: PathBuf,
    no_matches_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanSummary {
    pub folders: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Folders whose catalog query failed (counted within `unmatched`).
    pub lookup_failures: usize,
    pub duration: Duration,
}

impl<'a, C: CatalogClient> ScanPipeline<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self {
            matcher: CatalogMatcher::new(catalog),
            matches_path: PathBuf::from(DEFAULT_MATCHES_FILE),
            no_matches_path: PathBuf::from(DEFAULT_NO_MATCHES_FILE),
        }
    }

    pub fn with_log_paths(mut self, matches: impl Into<PathBuf>, no_matches: impl Into<PathBuf>) -> Self {
        self.matches_path = matches.into();
        self.no_matches_path = no_matches.into();
        self
    }

    /// Classify every artist folder under `root`:
    /// 1. List immediate subdirectories (fails on a bad root, before any query)
    /// 2. Look each one up in the catalog, one at a time, in listing order
    /// 3. Append the decision to the matched- or unmatched-log
    ///
    /// A failed lookup is recorded as "no match" and the scan moves on.
    pub fn run(&self, root: &Path, reporter: &dyn ScanReporter) -> Result<ScanSummary, Error> {
        let start = Instant::now();

        info!("Scanning music directory for artists...");
        let folders = scanner::scan_artist_folders(root)?;
        let total = folders.len();
        info!("Found {} artist folders", total);

        let mut writer = ClassificationWriter::create(&self.matches_path, &self.no_matches_path)?;
        let mut lookup_failures = 0;

        reporter.on_scan_start(total);
        for (index, folder) in folders.into_iter().enumerate() {
            debug!("Checking artist: {}", folder.name);
            reporter.on_folder_start(index, &folder.name);

            let result = self.matcher.match_artist(&folder.name);
            let decision = MatchDecision::new(folder, result);
            if decision.lookup_failed {
                lookup_failures += 1;
            }

            writer.record(&decision)?;
            reporter.on_folder_classified(index, &decision);
        }

        let summary = ScanSummary {
            folders: total,
            matched: writer.matched(),
            unmatched: writer.unmatched(),
            lookup_failures,
            duration: start.elapsed(),
        };
        writer.finish()?;

        debug!(
            "Scan completed in {:.2}s: {} matched, {} unmatched, {} lookup failures",
            summary.duration.as_secs_f64(),
            summary.matched,
            summary.unmatched,
            summary.lookup_failures,
        );
        reporter.on_scan_complete(&summary);

        Ok(summary)
    }
}
