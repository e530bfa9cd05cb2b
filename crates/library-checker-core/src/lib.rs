pub mod catalog;
pub mod classification;
pub mod config;
pub mod credentials;
pub mod deletion;
pub mod error;
pub mod matcher;
pub mod pipeline;
pub mod progress;
pub mod scanner;
pub mod similarity;

pub use catalog::{spotify::SpotifyClient, CatalogCandidate, CatalogClient};
pub use config::AppConfig;
pub use credentials::{CredentialStore, Credentials};
pub use deletion::{DeletionOutcome, DeletionReport, DeletionWorkflow, Prompt};
pub use error::Error;
pub use matcher::{CatalogMatch, CatalogMatcher, MatchDecision, MATCH_THRESHOLD};
pub use pipeline::{ScanPipeline, ScanSummary};
pub use progress::{ScanReporter, SilentReporter};
