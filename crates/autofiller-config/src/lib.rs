// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::Path;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Unprefixed credential variables, accepted alongside the AUTOFILLER_ form.
const LEGACY_CREDENTIAL_VARS: [&str; 2] = ["SPOTIFY_CLIENT_ID", "SPOTIFY_CLIENT_SECRET"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required configuration value: {0}")]
    MissingCredential(&'static str),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_base_url: String,
    pub auth_base_url: String,
    pub timeout_secs: u64,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_base_url: "https://api.spotify.com/v1".to_string(),
            auth_base_url: "https://accounts.spotify.com".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Client credentials for the catalog service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl SpotifyConfig {
    /// Resolve the credential pair, failing loudly when either half is absent or blank.
    pub fn credentials(&self) -> Result<SpotifyCredentials, ConfigError> {
        fn required(
            value: &Option<String>,
            name: &'static str,
        ) -> Result<String, ConfigError> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or(ConfigError::MissingCredential(name))
        }

        Ok(SpotifyCredentials {
            client_id: required(&self.client_id, "spotify.client_id")?,
            client_secret: required(&self.client_secret, "spotify.client_secret")?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggingConfig {
    /// Description stored alongside the embedded front cover.
    pub cover_description: String,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            cover_description: "Cover".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub spotify: SpotifyConfig,
    pub telemetry: TelemetryConfig,
    pub tagging: TaggingConfig,
}

/// Load configuration from defaults, optional TOML file, and environment overrides
/// (bare SPOTIFY_CLIENT_ID / SPOTIFY_CLIENT_SECRET, then prefix: AUTOFILLER_).
pub fn load(config_path: Option<&Path>) -> Result<AppConfig> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment
        .merge(Env::raw().only(&LEGACY_CREDENTIAL_VARS).map(|key| {
            key.as_str()
                .to_ascii_lowercase()
                .replacen("spotify_", "spotify.", 1)
                .into()
        }))
        .merge(Env::prefixed("AUTOFILLER_").split("__"));

    let config: AppConfig = figment.extract()?;
    info!(target: "config", "configuration loaded");
    Ok(config)
}
