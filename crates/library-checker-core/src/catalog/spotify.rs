//! Spotify Web API transport.
//!
//! Auth: client-credentials grant against the accounts service, HTTP Basic
//! with the application's id and secret.
//! Search: `GET /v1/search?type=artist`, bearer token.

use std::cell::RefCell;
use std::time::{Duration, Instant};

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{CatalogCandidate, CatalogClient, SEARCH_LIMIT};
use crate::config::AppConfig;
use crate::credentials::Credentials;
use crate::error::{Error, Result};

/// Tokens are renewed this long before Spotify says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    artists: ArtistPage,
}

#[derive(Debug, Deserialize)]
struct ArtistPage {
    #[serde(default)]
    items: Vec<ArtistItem>,
}

#[derive(Debug, Deserialize)]
struct ArtistItem {
    name: String,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

impl From<ArtistItem> for CatalogCandidate {
    fn from(item: ArtistItem) -> Self {
        let external_ref = item.external_urls.spotify.unwrap_or(item.uri);
        CatalogCandidate::new(item.name, external_ref)
    }
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

pub struct SpotifyClient {
    http: Client,
    credentials: Credentials,
    api_url: String,
    accounts_url: String,
    token: RefCell<AccessToken>,
}

impl SpotifyClient {
    /// Build the HTTP client and perform the one-time credential exchange.
    /// A failure here is [`Error::CatalogAuth`].
    pub fn connect(credentials: Credentials, config: &AppConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::CatalogAuth(format!("failed to build HTTP client: {}", e)))?;

        let accounts_url = config.spotify_accounts_url.trim_end_matches('/').to_string();
        let token = request_token(&http, &accounts_url, &credentials)?;
        info!("Authenticated with Spotify");

        Ok(Self {
            http,
            credentials,
            api_url: config.spotify_api_url.trim_end_matches('/').to_string(),
            accounts_url,
            token: RefCell::new(token),
        })
    }

    fn bearer_token(&self) -> Result<String> {
        let mut token = self.token.borrow_mut();
        if token.is_expired() {
            debug!("Access token expired, requesting a new one");
            *token = request_token(&self.http, &self.accounts_url, &self.credentials)
                .map_err(|e| Error::CatalogQuery(e.to_string()))?;
        }
        Ok(token.value.clone())
    }

    fn invalidate_token(&self) {
        self.token.borrow_mut().expires_at = Instant::now();
    }
}

impl CatalogClient for SpotifyClient {
    fn search_artists(&self, name: &str) -> Result<Vec<CatalogCandidate>> {
        let token = self.bearer_token()?;
        let url = format!("{}/v1/search", self.api_url);
        let limit = SEARCH_LIMIT.to_string();

        let resp = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("q", name), ("type", "artist"), ("limit", limit.as_str())])
            .send()
            .map_err(|e| Error::CatalogQuery(format!("search request for '{}' failed: {}", name, e)))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            // next query starts with a fresh token
            warn!("Spotify rejected the access token");
            self.invalidate_token();
        }
        if !status.is_success() {
            return Err(Error::CatalogQuery(format!(
                "search for '{}' returned {}: {}",
                name,
                status.as_u16(),
                error_message(resp)
            )));
        }

        let body: SearchResponse = resp.json().map_err(|e| {
            Error::CatalogQuery(format!("search response for '{}' invalid: {}", name, e))
        })?;

        Ok(body
            .artists
            .items
            .into_iter()
            .take(SEARCH_LIMIT)
            .map(CatalogCandidate::from)
            .collect())
    }
}

fn request_token(http: &Client, accounts_url: &str, credentials: &Credentials) -> Result<AccessToken> {
    let url = format!("{}/api/token", accounts_url);
    let resp = http
        .post(&url)
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .map_err(|e| Error::CatalogAuth(format!("token request failed: {}", e)))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::CatalogAuth(format!(
            "token request rejected ({}): {}",
            status.as_u16(),
            error_message(resp)
        )));
    }

    let body: TokenResponse = resp
        .json()
        .map_err(|e| Error::CatalogAuth(format!("token response invalid: {}", e)))?;

    let lifetime = Duration::from_secs(body.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS));
    Ok(AccessToken {
        value: body.access_token,
        expires_at: Instant::now() + lifetime.saturating_sub(TOKEN_EXPIRY_MARGIN),
    })
}

/// Pull a readable message out of either error shape Spotify uses:
/// `{"error": {"status": .., "message": ..}}` from the Web API or
/// `{"error": .., "error_description": ..}` from the accounts service.
fn error_message(resp: Response) -> String {
    let body: serde_json::Value = resp.json().unwrap_or(serde_json::Value::Null);
    body["error"]["message"]
        .as_str()
        .or_else(|| body["error_description"].as_str())
        .or_else(|| body["error"].as_str())
        .unwrap_or("unknown error")
        .to_string()
}
