use crate::classification::{self, MatchLogEntry};
use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{error, info, warn};

/// Asks the user a question and returns the raw answer line.
pub trait Prompt {
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

impl<F> Prompt for F
where
    F: FnMut(&str) -> io::Result<String>,
{
    fn ask(&mut self, question: &str) -> io::Result<String> {
        self(question)
    }
}

/// Recursively removes a confirmed folder.
pub trait FolderRemover {
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Removes folders from the local filesystem.
pub struct FsRemover;

impl FolderRemover for FsRemover {
    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}

/// Terminal state of one matched-log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// The folder was already gone; no prompt was shown.
    Missing,
    Declined,
    Deleted,
    DeleteFailed(String),
}

#[derive(Debug, Clone)]
pub struct DeletionRecord {
    pub entry: MatchLogEntry,
    pub outcome: DeletionOutcome,
}

/// Per-record outcomes, in matched-log order.
#[derive(Debug, Clone, Default)]
pub struct DeletionReport {
    pub records: Vec<DeletionRecord>,
}

impl DeletionReport {
    fn count(&self, pred: impl Fn(&DeletionOutcome) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn deleted(&self) -> usize {
        self.count(|o| *o == DeletionOutcome::Deleted)
    }

    pub fn declined(&self) -> usize {
        self.count(|o| *o == DeletionOutcome::Declined)
    }

    pub fn missing(&self) -> usize {
        self.count(|o| *o == DeletionOutcome::Missing)
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DeletionOutcome::DeleteFailed(_)))
    }
}

/// Only a case-insensitive `y` confirms.
pub fn is_affirmative(answer: &str) -> bool {
    answer
        .trim_end_matches(&['\r', '\n'][..])
        .eq_ignore_ascii_case("y")
}

pub fn confirmation_prompt(entry: &MatchLogEntry) -> String {
    let folder_name = entry
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| entry.path.display().to_string());
    format!(
        "Delete \"{}\" (Spotify match: {}, Similarity: {:.1}%)? [y/N] ",
        folder_name, entry.matched_name, entry.similarity_percent
    )
}

/// Walks the matched-log and deletes each still-present folder the user
/// confirms. One record's failure never stops the rest.
pub struct DeletionWorkflow<P: Prompt, R: FolderRemover = FsRemover> {
    prompt: P,
    remover: R,
}

impl<P: Prompt> DeletionWorkflow<P, FsRemover> {
    pub fn new(prompt: P) -> Self {
        Self::with_remover(prompt, FsRemover)
    }
}

impl<P: Prompt, R: FolderRemover> DeletionWorkflow<P, R> {
    pub fn with_remover(prompt: P, remover: R) -> Self {
        Self { prompt, remover }
    }

    /// Process every record of the matched-log at `matches_path`.
    /// Fails only if the log is missing or unreadable.
    pub fn run(&mut self, matches_path: &Path) -> Result<DeletionReport> {
        let entries = classification::read_match_log(matches_path)?;
        info!("Found {} folders to process.", entries.len());

        let mut report = DeletionReport::default();
        for entry in entries {
            let outcome = self.process(&entry);
            report.records.push(DeletionRecord { entry, outcome });
        }

        info!(
            "Deletion process complete: {} deleted, {} skipped, {} missing, {} failed",
            report.deleted(),
            report.declined(),
            report.missing(),
            report.failed()
        );
        Ok(report)
    }

    pub fn process(&mut self, entry: &MatchLogEntry) -> DeletionOutcome {
        let path = entry.path.as_path();
        if !path.exists() {
            warn!("Skipping \"{}\" - folder no longer exists", path.display());
            return DeletionOutcome::Missing;
        }

        let answer = match self.prompt.ask(&confirmation_prompt(entry)) {
            Ok(answer) => answer,
            Err(err) => {
                warn!("Could not read an answer for {}: {}", path.display(), err);
                String::new()
            }
        };
        if !is_affirmative(&answer) {
            info!("Skipped: {}", path.display());
            return DeletionOutcome::Declined;
        }

        match self.remover.remove(path) {
            Ok(()) => {
                info!("Deleted: {}", path.display());
                DeletionOutcome::Deleted
            }
            Err(source) => {
                let err = Error::FileAccess {
                    path: path.to_path_buf(),
                    source,
                };
                error!("{}", err);
                DeletionOutcome::DeleteFailed(err.to_string())
            }
        }
    }
}
