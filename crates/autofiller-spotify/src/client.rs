// SPDX-License-Identifier: GPL-3.0-or-later

use crate::auth::{Credentials, TokenCache, TokenResponse};
use crate::error::{Result, SpotifyError};
use crate::models::{
    Artist, ArtistSearchResponse, Page, SearchKind, SearchQuery, Track, TrackSearchResponse,
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";
const SPOTIFY_AUTH_BASE: &str = "https://accounts.spotify.com";
const USER_AGENT: &str = concat!("autofiller/", env!("CARGO_PKG_VERSION"));

/// Spotify Web API client authenticated with the client-credentials grant.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    client: Client,
    api_base_url: String,
    auth_base_url: String,
    credentials: Credentials,
    tokens: TokenCache,
}

impl SpotifyClient {
    /// Create a client against the public Spotify endpoints.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    /// Create a client builder for custom configuration.
    pub fn builder(credentials: Credentials) -> SpotifyClientBuilder {
        SpotifyClientBuilder::new(credentials)
    }

    /// Search the catalog for tracks.
    ///
    /// # Example
    /// ```no_run
    /// # use autofiller_spotify::{Credentials, SearchQuery, SpotifyClient};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = SpotifyClient::new(Credentials::new("id", "secret"))?;
    /// let query = SearchQuery::new("artist:Queen track:Bohemian Rhapsody").limit(1);
    /// let page = client.search_tracks(query).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search_tracks(&self, query: SearchQuery) -> Result<Page<Track>> {
        let query = query.kind(SearchKind::Track);
        let response: TrackSearchResponse = self.search(&query).await?;
        Ok(response.tracks)
    }

    /// Search the catalog for artists.
    ///
    /// # Example
    /// ```no_run
    /// # use autofiller_spotify::{Credentials, SearchQuery, SpotifyClient};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = SpotifyClient::new(Credentials::new("id", "secret"))?;
    /// let page = client.search_artists(SearchQuery::new("artist:Queen").limit(1)).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search_artists(&self, query: SearchQuery) -> Result<Page<Artist>> {
        let query = query.kind(SearchKind::Artist);
        let response: ArtistSearchResponse = self.search(&query).await?;
        Ok(response.artists)
    }

    /// Download an image by absolute URL. No authentication is sent.
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        trace!(target: "spotify", "GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!(target: "spotify", "image response status: {}", status);

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SpotifyError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn search<T: DeserializeOwned>(&self, query: &SearchQuery) -> Result<T> {
        let mut url = Url::parse(&format!("{}/search", self.api_base_url))
            .map_err(|e| SpotifyError::InvalidResponse(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("q", &query.query)
            .append_pair("type", query.kind.as_str());

        if let Some(limit) = query.limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        }

        self.get(url.as_str()).await
    }

    /// Return a valid access token, exchanging credentials when the cache is empty or stale.
    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.tokens.get().await {
            return Ok(token);
        }

        let url = format!("{}/api/token", self.auth_base_url);
        debug!(target: "spotify", url = %url, "requesting access token");

        let response = self
            .client
            .post(&url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SpotifyError::AuthenticationFailed {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            SpotifyError::InvalidResponse(format!("Failed to parse token response: {}", e))
        })?;

        self.tokens.store(&token).await;
        Ok(token.access_token)
    }

    /// Internal method to perform authenticated GET requests.
    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let token = self.access_token().await?;

        trace!(target: "spotify", "GET {}", url);

        let response = self.client.get(url).bearer_auth(token).send().await?;

        let status = response.status();
        debug!(target: "spotify", "response status: {}", status);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            self.tokens.clear().await;
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SpotifyError::AuthenticationFailed {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SpotifyError::RateLimitExceeded);
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SpotifyError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        trace!(target: "spotify", "response body: {}", body);

        serde_json::from_str(&body).map_err(|e| {
            SpotifyError::InvalidResponse(format!("Failed to parse response: {}", e))
        })
    }
}

/// Builder for configuring a Spotify client.
#[derive(Debug)]
pub struct SpotifyClientBuilder {
    credentials: Credentials,
    api_base_url: String,
    auth_base_url: String,
    timeout: Duration,
}

impl SpotifyClientBuilder {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_base_url: SPOTIFY_API_BASE.to_string(),
            auth_base_url: SPOTIFY_AUTH_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set a custom Web API base URL (useful for testing with mock servers).
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set a custom accounts-service base URL (useful for testing).
    pub fn auth_base_url(mut self, url: impl Into<String>) -> Self {
        self.auth_base_url = url.into();
        self
    }

    /// Set request timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the Spotify client.
    pub fn build(self) -> Result<SpotifyClient> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(SpotifyClient {
            client,
            api_base_url: self.api_base_url.trim_end_matches('/').to_string(),
            auth_base_url: self.auth_base_url.trim_end_matches('/').to_string(),
            credentials: self.credentials,
            tokens: TokenCache::new(),
        })
    }
}
