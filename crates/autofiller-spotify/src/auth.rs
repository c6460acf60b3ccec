// SPDX-License-Identifier: GPL-3.0-or-later

use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Tokens are refreshed this long before Spotify says they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Client-credentials pair issued by the Spotify developer dashboard.
#[derive(Clone, PartialEq, Eq)]
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
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Body of a successful `POST /api/token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

/// In-memory cache for the current access token.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    current: Arc<Mutex<Option<CachedToken>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token still inside its validity window, if any.
    pub async fn get(&self) -> Option<String> {
        let current = self.current.lock().await;
        current
            .as_ref()
            .filter(|token| Instant::now() < token.refresh_at)
            .map(|token| token.access_token.clone())
    }

    pub async fn store(&self, response: &TokenResponse) {
        let lifetime = Duration::from_secs(response.expires_in).saturating_sub(EXPIRY_MARGIN);
        tracing::trace!(target: "spotify", "caching access token for {:?}", lifetime);

        *self.current.lock().await = Some(CachedToken {
            access_token: response.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });
    }

    pub async fn clear(&self) {
        *self.current.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_in: u64) -> TokenResponse {
        TokenResponse {
            access_token: "abc".to_string(),
            token_type: Some("Bearer".to_string()),
            expires_in,
        }
    }

    #[tokio::test]
    async fn test_cache_returns_fresh_token() {
        let cache = TokenCache::new();
        assert!(cache.get().await.is_none());

        cache.store(&token(3600)).await;
        assert_eq!(cache.get().await.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_token_inside_expiry_margin_is_stale() {
        let cache = TokenCache::new();
        cache.store(&token(30)).await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_clear_drops_token() {
        let cache = TokenCache::new();
        cache.store(&token(3600)).await;
        cache.clear().await;
        assert!(cache.get().await.is_none());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credentials = Credentials::new("id", "super-secret");
        let rendered = format!("{:?}", credentials);
        assert!(rendered.contains("id"));
        assert!(!rendered.contains("super-secret"));
    }
}
