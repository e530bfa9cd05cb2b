use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MATCHES_FILE: &str = "spotify_matches.txt";
pub const DEFAULT_NO_MATCHES_FILE: &str = "no_matches.txt";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com";
pub const DEFAULT_SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Settings file looked up in the working directory (any format the
/// `config` crate understands, e.g. `LibraryChecker.toml`).
const SETTINGS_FILE_NAME: &str = "LibraryChecker";
const ENV_PREFIX: &str = "LIBRARY_CHECKER";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Matched-log written by a scan and consumed by deletion.
    pub matches_file: String,
    /// Unmatched-log written by a scan.
    pub no_matches_file: String,
    pub spotify_api_url: String,
    pub spotify_accounts_url: String,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            matches_file: DEFAULT_MATCHES_FILE.to_string(),
            no_matches_file: DEFAULT_NO_MATCHES_FILE.to_string(),
            spotify_api_url: DEFAULT_SPOTIFY_API_URL.to_string(),
            spotify_accounts_url: DEFAULT_SPOTIFY_ACCOUNTS_URL.to_string(),
            request_timeout_secs: 30,
        }
    }
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    load_configuration_from(SETTINGS_FILE_NAME)
}

/// Layer defaults, then the optional settings file `name`, then
/// `LIBRARY_CHECKER_*` environment variables.
pub fn load_configuration_from(name: &str) -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig::default();
    let builder = Config::builder()
        .set_default("matches_file", defaults.matches_file)?
        .set_default("no_matches_file", defaults.no_matches_file)?
        .set_default("spotify_api_url", defaults.spotify_api_url)?
        .set_default("spotify_accounts_url", defaults.spotify_accounts_url)?
        .set_default("request_timeout_secs", defaults.request_timeout_secs)?
        .add_source(ConfigFile::with_name(name).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
