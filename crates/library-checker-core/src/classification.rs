//! The two classification logs written by a scan.
//!
//! Matched-log, one record per line:
//!
//! ```text
//! <folder path>\t<matched name>\t<spotify url>\t<similarity percent, 1 decimal>%
//! ```
//!
//! Unmatched-log: `<folder path>` per line. The matched-log is read back by
//! the deletion workflow, so [`MatchLogEntry::to_line`] and
//! [`MatchLogEntry::parse_line`] must stay in step.

use crate::error::{Error, Result};
use crate::matcher::MatchDecision;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const FIELD_SEPARATOR: char = '\t';
const MATCH_FIELD_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchLogEntry {
    pub path: PathBuf,
    pub matched_name: String,
    pub matched_ref: String,
    /// Similarity × 100, rounded to one decimal place.
    pub similarity_percent: f64,
}

impl MatchLogEntry {
    /// `None` for an unmatched decision.
    pub fn from_decision(decision: &MatchDecision) -> Option<Self> {
        let candidate = decision.candidate.as_ref()?;
        Some(Self {
            path: decision.folder.path.clone(),
            matched_name: candidate.name.clone(),
            matched_ref: candidate.external_ref.clone(),
            similarity_percent: to_percent(decision.similarity),
        })
    }

    pub fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{:.1}%\n",
            self.path.display(),
            self.matched_name,
            self.matched_ref,
            self.similarity_percent
        )
    }

    /// Parse one matched-log line. Trailing whitespace is ignored and the
    /// `%` suffix is optional.
    pub fn parse_line(line: &str) -> std::result::Result<Self, String> {
        let fields: Vec<&str> = line.trim_end().split(FIELD_SEPARATOR).collect();
        if fields.len() != MATCH_FIELD_COUNT {
            return Err(format!(
                "expected {} tab-separated fields, found {}",
                MATCH_FIELD_COUNT,
                fields.len()
            ));
        }

        let percent_field = fields[3].trim();
        let similarity_percent = percent_field
            .trim_end_matches('%')
            .parse::<f64>()
            .map_err(|e| format!("invalid similarity '{}': {}", percent_field, e))?;

        Ok(Self {
            path: PathBuf::from(fields[0]),
            matched_name: fields[1].to_string(),
            matched_ref: fields[2].to_string(),
            similarity_percent,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoMatchLogEntry {
    pub path: PathBuf,
}

impl NoMatchLogEntry {
    pub fn from_decision(decision: &MatchDecision) -> Self {
        Self {
            path: decision.folder.path.clone(),
        }
    }

    pub fn to_line(&self) -> String {
        format!("{}\n", self.path.display())
    }
}

fn to_percent(similarity: f64) -> f64 {
    (similarity * 1000.0).round() / 10.0
}

/// Parse a whole matched-log, skipping blank lines and logging malformed ones.
pub fn parse_match_log(content: &str) -> Vec<MatchLogEntry> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match MatchLogEntry::parse_line(line) {
            Ok(entry) => Some(entry),
            Err(reason) => {
                warn!("Skipping malformed line {}: {}", index + 1, reason);
                None
            }
        })
        .collect()
}

/// Read and parse the matched-log at `path`.
/// A missing file is [`Error::MatchesFileMissing`].
pub fn read_match_log(path: &Path) -> Result<Vec<MatchLogEntry>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(Error::MatchesFileMissing {
                path: path.to_path_buf(),
            })
        }
        Err(err) => return Err(err.into()),
    };
    Ok(parse_match_log(&content))
}

/// Holds both logs open for one scan and appends one line per decision,
/// flushing after each so partial progress survives an interrupted run.
pub struct ClassificationWriter {
    matches: BufWriter<File>,
    no_matches: BufWriter<File>,
    matched: usize,
    unmatched: usize,
}

impl ClassificationWriter {
    /// Create (truncating) both log files.
    pub fn create(matches_path: &Path, no_matches_path: &Path) -> Result<Self> {
        let matches = BufWriter::new(File::create(matches_path)?);
        let no_matches = BufWriter::new(File::create(no_matches_path)?);
        debug!(
            "Writing classification logs to {} and {}",
            matches_path.display(),
            no_matches_path.display()
        );
        Ok(Self {
            matches,
            no_matches,
            matched: 0,
            unmatched: 0,
        })
    }

    pub fn record(&mut self, decision: &MatchDecision) -> Result<()> {
        match MatchLogEntry::from_decision(decision) {
            Some(entry) => {
                self.matches.write_all(entry.to_line().as_bytes())?;
                self.matches.flush()?;
                self.matched += 1;
            }
            None => {
                let entry = NoMatchLogEntry::from_decision(decision);
                self.no_matches.write_all(entry.to_line().as_bytes())?;
                self.no_matches.flush()?;
                self.unmatched += 1;
            }
        }
        Ok(())
    }

    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn unmatched(&self) -> usize {
        self.unmatched
    }

    pub fn finish(mut self) -> Result<()> {
        self.matches.flush()?;
        self.no_matches.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogCandidate;
    use crate::scanner::ArtistFolder;
    use tempfile::tempdir;

    fn decision(path: &str, candidate: Option<(&str, &str)>, similarity: f64) -> MatchDecision {
        let path = PathBuf::from(path);
        MatchDecision {
            folder: ArtistFolder {
                name: path.file_name().unwrap().to_string_lossy().into_owned(),
                path,
            },
            candidate: candidate.map(|(name, url)| CatalogCandidate::new(name, url)),
            similarity,
            lookup_failed: false,
        }
    }

    #[test]
    fn test_match_line_format() {
        let d = decision(
            "/music/Beatle",
            Some(("Beatles", "https://open.spotify.com/artist/3WrFJ7ztbogyGnTHbHJFl2")),
            6.0 / 7.0,
        );
        let line = MatchLogEntry::from_decision(&d).unwrap().to_line();
        assert_eq!(
            line,
            "/music/Beatle\tBeatles\thttps://open.spotify.com/artist/3WrFJ7ztbogyGnTHbHJFl2\t85.7%\n"
        );
    }

    #[test]
    fn test_exact_match_formats_as_hundred_percent() {
        let d = decision("/m/Abba", Some(("ABBA", "u")), 1.0);
        assert!(MatchLogEntry::from_decision(&d)
            .unwrap()
            .to_line()
            .ends_with("\t100.0%\n"));
    }

    #[test]
    fn test_unmatched_decision_has_no_match_entry() {
        let d = decision("/m/Nobody", None, 0.3);
        assert!(MatchLogEntry::from_decision(&d).is_none());
        assert_eq!(NoMatchLogEntry::from_decision(&d).to_line(), "/m/Nobody\n");
    }

    #[test]
    fn test_written_entry_parses_back() {
        let d = decision("/music/Sigur Rós", Some(("Sigur Rós", "https://x/1")), 1.0);
        let written = MatchLogEntry::from_decision(&d).unwrap();
        let parsed = MatchLogEntry::parse_line(&written.to_line()).unwrap();
        assert_eq!(parsed, written);

        let d = decision("/music/Beatle", Some(("Beatles", "https://x/2")), 6.0 / 7.0);
        let written = MatchLogEntry::from_decision(&d).unwrap();
        let parsed = MatchLogEntry::parse_line(&written.to_line()).unwrap();
        assert_eq!(parsed.similarity_percent, 85.7);
        assert_eq!(parsed, written);
    }

    #[test]
    fn test_parser_tolerates_whitespace_and_blank_lines() {
        let content = "/a/One\tOne\tu1\t100.0%  \r\n\n   \n/a/Two\tTwo\tu2\t90.0\n\n";
        let entries = parse_match_log(content);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, PathBuf::from("/a/One"));
        assert_eq!(entries[0].similarity_percent, 100.0);
        assert_eq!(entries[1].matched_name, "Two");
        assert_eq!(entries[1].similarity_percent, 90.0);
    }

    #[test]
    fn test_parser_skips_malformed_lines() {
        let content = "/a/One\tOne\tu1\t100.0%\nonly-a-path\n/a/Bad\tBad\tu\tlots%\n/a/Two\tTwo\tu2\t80.0%\n";
        let entries = parse_match_log(content);
        let names: Vec<&str> = entries.iter().map(|e| e.matched_name.as_str()).collect();
        assert_eq!(names, vec!["One", "Two"]);
    }

    #[test]
    fn test_read_missing_log_is_matches_file_missing() {
        let tmp = tempdir().unwrap();
        let err = read_match_log(&tmp.path().join("spotify_matches.txt")).unwrap_err();
        assert!(matches!(err, Error::MatchesFileMissing { .. }));
    }

    #[test]
    fn test_writer_splits_decisions_and_truncates() {
        let tmp = tempdir().unwrap();
        let matches = tmp.path().join("matches.txt");
        let no_matches = tmp.path().join("no_matches.txt");
        fs::write(&matches, "stale line from last run\n").unwrap();

        let mut writer = ClassificationWriter::create(&matches, &no_matches).unwrap();
        writer
            .record(&decision("/m/Abba", Some(("ABBA", "u1")), 1.0))
            .unwrap();
        writer.record(&decision("/m/Zzz", None, 0.0)).unwrap();

        // flushed per record, visible before finish
        assert_eq!(fs::read_to_string(&no_matches).unwrap(), "/m/Zzz\n");
        assert_eq!(writer.matched(), 1);
        assert_eq!(writer.unmatched(), 1);
        writer.finish().unwrap();

        assert_eq!(
            fs::read_to_string(&matches).unwrap(),
            "/m/Abba\tABBA\tu1\t100.0%\n"
        );
    }
}
