use crate::catalog::{CatalogCandidate, CatalogClient, SEARCH_LIMIT};
use crate::scanner::ArtistFolder;
use crate::similarity;
use tracing::{debug, error};

/// Minimum similarity for a candidate to count as the same artist.
pub const MATCH_THRESHOLD: f64 = 0.8;

/// Outcome of looking one name up in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogMatch {
    /// Best candidate, present only when `similarity >= MATCH_THRESHOLD`.
    pub candidate: Option<CatalogCandidate>,
    /// Best score seen, even when it was too low to accept.
    pub similarity: f64,
    /// The catalog query itself failed; treated as zero candidates.
    pub lookup_failed: bool,
}

impl CatalogMatch {
    pub fn is_matched(&self) -> bool {
        self.candidate.is_some()
    }

    fn no_candidates(lookup_failed: bool) -> Self {
        Self {
            candidate: None,
            similarity: 0.0,
            lookup_failed,
        }
    }
}

/// The classification of one artist folder in a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchDecision {
    pub folder: ArtistFolder,
    pub candidate: Option<CatalogCandidate>,
    pub similarity: f64,
    pub lookup_failed: bool,
}

impl MatchDecision {
    pub fn new(folder: ArtistFolder, result: CatalogMatch) -> Self {
        Self {
            folder,
            candidate: result.candidate,
            similarity: result.similarity,
            lookup_failed: result.lookup_failed,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.candidate.is_some()
    }
}

pub struct CatalogMatcher<'a, C: CatalogClient> {
    catalog: &'a C,
}

impl<'a, C: CatalogClient> CatalogMatcher<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Look `local_name` up and decide whether the best candidate is close
    /// enough. Never fails: a query error is logged and reported as a
    /// lookup without candidates.
    pub fn match_artist(&self, local_name: &str) -> CatalogMatch {
        let candidates = match self.catalog.search_artists(local_name) {
            Ok(candidates) => candidates,
            Err(err) => {
                error!("Error searching Spotify for artist {}: {}", local_name, err);
                return CatalogMatch::no_candidates(true);
            }
        };

        let result = best_candidate(local_name, candidates);
        debug!(
            "'{}' best similarity {:.3} ({})",
            local_name,
            result.similarity,
            result
                .candidate
                .as_ref()
                .map(|c| c.name.as_str())
                .unwrap_or("no match")
        );
        result
    }
}

/// Arg-max over the first [`SEARCH_LIMIT`] candidates; the first-ranked
/// candidate wins ties.
fn best_candidate(local_name: &str, candidates: Vec<CatalogCandidate>) -> CatalogMatch {
    let mut best: Option<(CatalogCandidate, f64)> = None;

    for candidate in candidates.into_iter().take(SEARCH_LIMIT) {
        let score = similarity::score(&candidate.name, local_name);
        let better = match &best {
            Some((_, best_score)) => score > *best_score,
            None => true,
        };
        if better {
            best = Some((candidate, score));
        }
    }

    match best {
        Some((candidate, score)) if score >= MATCH_THRESHOLD => CatalogMatch {
            candidate: Some(candidate),
            similarity: score,
            lookup_failed: false,
        },
        Some((_, score)) => CatalogMatch {
            candidate: None,
            similarity: score,
            lookup_failed: false,
        },
        None => CatalogMatch::no_candidates(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};

    struct ScriptedCatalog {
        results: Vec<CatalogCandidate>,
        fail: bool,
    }

    impl ScriptedCatalog {
        fn returning(names: &[&str]) -> Self {
            Self {
                results: names
                    .iter()
                    .enumerate()
                    .map(|(i, n)| CatalogCandidate::new(*n, format!("https://open.spotify.com/artist/{i}")))
                    .collect(),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                results: Vec::new(),
                fail: true,
            }
        }
    }

    impl CatalogClient for ScriptedCatalog {
        fn search_artists(&self, _name: &str) -> Result<Vec<CatalogCandidate>> {
            if self.fail {
                return Err(Error::CatalogQuery("connection reset".into()));
            }
            Ok(self.results.clone())
        }
    }

    #[test]
    fn test_exact_match_is_accepted() {
        let catalog = ScriptedCatalog::returning(&["Radiohead", "Radiohead Tribute"]);
        let result = CatalogMatcher::new(&catalog).match_artist("radiohead");

        assert!(result.is_matched());
        assert_eq!(result.similarity, 1.0);
        let candidate = result.candidate.unwrap();
        assert_eq!(candidate.name, "Radiohead");
        assert_eq!(candidate.external_ref, "https://open.spotify.com/artist/0");
    }

    #[test]
    fn test_best_candidate_wins_regardless_of_rank() {
        let catalog = ScriptedCatalog::returning(&["Portishead Live", "Portishead"]);
        let result = CatalogMatcher::new(&catalog).match_artist("Portishead");

        assert_eq!(result.candidate.unwrap().name, "Portishead");
        assert_eq!(result.similarity, 1.0);
    }

    #[test]
    fn test_ties_keep_first_ranked_candidate() {
        let catalog = ScriptedCatalog::returning(&["BEATLES", "beatles", "Beatles"]);
        let result = CatalogMatcher::new(&catalog).match_artist("Beatles");

        let candidate = result.candidate.unwrap();
        assert_eq!(candidate.name, "BEATLES");
        assert_eq!(candidate.external_ref, "https://open.spotify.com/artist/0");
    }

    #[test]
    fn test_below_threshold_is_rejected_but_keeps_score() {
        // 7/11 for "Beatles" inside "The Beatles"
        let catalog = ScriptedCatalog::returning(&["The Beatles"]);
        let result = CatalogMatcher::new(&catalog).match_artist("Beatles");

        assert!(!result.is_matched());
        assert!(!result.lookup_failed);
        assert!((result.similarity - 7.0 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 4/5 == 0.8 exactly
        let catalog = ScriptedCatalog::returning(&["abcde"]);
        let result = CatalogMatcher::new(&catalog).match_artist("abcd");

        assert!(result.is_matched());
        assert!(result.similarity >= MATCH_THRESHOLD);
    }

    #[test]
    fn test_no_candidates_is_unmatched() {
        let catalog = ScriptedCatalog::returning(&[]);
        let result = CatalogMatcher::new(&catalog).match_artist("Nobody");

        assert_eq!(result, CatalogMatch::no_candidates(false));
    }

    #[test]
    fn test_query_failure_is_recovered_as_no_match() {
        let catalog = ScriptedCatalog::failing();
        let result = CatalogMatcher::new(&catalog).match_artist("Anyone");

        assert!(!result.is_matched());
        assert!(result.lookup_failed);
        assert_eq!(result.similarity, 0.0);
    }

    #[test]
    fn test_only_first_five_candidates_are_considered() {
        let catalog =
            ScriptedCatalog::returning(&["a1", "a2", "a3", "a4", "a5", "Massive Attack"]);
        let result = CatalogMatcher::new(&catalog).match_artist("Massive Attack");

        assert!(!result.is_matched());
        assert_eq!(result.similarity, 0.0);
    }
}
