use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_DIR_NAME: &str = ".spotify-library-checker";
pub const CREDENTIALS_FILE_NAME: &str = "config.json";

pub const CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";

/// Spotify application credentials used for the client-credentials grant.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Keyed JSON file holding the credentials, by default
/// `~/.spotify-library-checker/config.json`.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("could not determine the home directory".to_string()))?;
        Ok(Self::new(
            home.join(CONFIG_DIR_NAME).join(CREDENTIALS_FILE_NAME),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// `Ok(None)` when no credentials file exists yet.
    pub fn load(&self) -> Result<Option<Credentials>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(Error::Config(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    err
                )))
            }
        };

        let credentials: Credentials = serde_json::from_str(&content).map_err(|err| {
            Error::Config(format!(
                "invalid credentials JSON in {}: {}",
                self.path.display(),
                err
            ))
        })?;

        if !credentials.is_complete() {
            return Err(Error::Config(format!(
                "{} is missing the client id or secret",
                self.path.display()
            )));
        }

        debug!("Loaded credentials from {}", self.path.display());
        Ok(Some(credentials))
    }

    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json = serde_json::to_string_pretty(credentials)
            .map_err(|err| Error::Config(format!("failed to serialize credentials: {}", err)))?;
        fs::write(&self.path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        debug!("Saved credentials to {}", self.path.display());
        Ok(())
    }
}

/// Credentials from `SPOTIFY_CLIENT_ID` / `SPOTIFY_CLIENT_SECRET` when both
/// are set, otherwise from the store.
pub fn resolve_credentials(store: &CredentialStore) -> Result<Credentials> {
    resolve(
        env::var(CLIENT_ID_ENV).ok(),
        env::var(CLIENT_SECRET_ENV).ok(),
        store,
    )
}

fn resolve(
    env_id: Option<String>,
    env_secret: Option<String>,
    store: &CredentialStore,
) -> Result<Credentials> {
    if let (Some(id), Some(secret)) = (env_id, env_secret) {
        let credentials = Credentials::new(id, secret);
        if credentials.is_complete() {
            debug!("Using credentials from the environment");
            return Ok(credentials);
        }
    }

    store.load()?.ok_or_else(|| {
        Error::Config(format!(
            "no Spotify credentials found at {}. Run `library-checker configure` first.",
            store.path().display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_then_load() {
        let tmp = tempdir().unwrap();
        let store = CredentialStore::new(tmp.path().join("nested").join(CREDENTIALS_FILE_NAME));
        assert!(!store.exists());

        let creds = Credentials::new("id-123", "secret-456");
        store.save(&creds).unwrap();

        assert!(store.exists());
        assert_eq!(store.load().unwrap(), Some(creds));
    }

    #[test]
    fn test_file_uses_camel_case_keys() {
        let tmp = tempdir().unwrap();
        let store = CredentialStore::new(tmp.path().join(CREDENTIALS_FILE_NAME));
        store.save(&Credentials::new("abc", "def")).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["clientId"], "abc");
        assert_eq!(value["clientSecret"], "def");
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let tmp = tempdir().unwrap();
        let store = CredentialStore::new(tmp.path().join("absent.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_load_malformed_file_is_config_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(CREDENTIALS_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let err = CredentialStore::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_incomplete_file_is_config_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(CREDENTIALS_FILE_NAME);
        fs::write(&path, r#"{"clientId": "abc", "clientSecret": ""}"#).unwrap();

        let err = CredentialStore::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_environment_takes_precedence() {
        let tmp = tempdir().unwrap();
        let store = CredentialStore::new(tmp.path().join(CREDENTIALS_FILE_NAME));
        store.save(&Credentials::new("stored", "stored-secret")).unwrap();

        let creds = resolve(Some("env".into()), Some("env-secret".into()), &store).unwrap();
        assert_eq!(creds.client_id, "env");

        // a half-set environment falls back to the store
        let creds = resolve(Some("env".into()), None, &store).unwrap();
        assert_eq!(creds.client_id, "stored");
    }

    #[test]
    fn test_no_credentials_anywhere_is_config_error() {
        let tmp = tempdir().unwrap();
        let store = CredentialStore::new(tmp.path().join(CREDENTIALS_FILE_NAME));

        let err = resolve(None, None, &store).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("configure"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let shown = format!("{:?}", Credentials::new("id", "hunter2"));
        assert!(!shown.contains("hunter2"));
    }
}
