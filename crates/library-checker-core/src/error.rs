use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Credentials are absent or unreadable.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Directory error: {}: {reason}", path.display())]
    Directory { path: PathBuf, reason: String },

    #[error("Catalog authentication failed: {0}")]
    CatalogAuth(String),

    #[error("Catalog query failed: {0}")]
    CatalogQuery(String),

    #[error("Error deleting {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} not found. Please run the scan first.", path.display())]
    MatchesFileMissing { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, Error>;
