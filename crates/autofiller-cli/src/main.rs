// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use autofiller_application::{
    report, BatchEvent, BatchRunner, FilenameParser, LoftyTagWriter, MetadataLookupService,
    ProgressSink, Selection,
};
use autofiller_config::{load as load_config, AppConfig};
use autofiller_spotify::{Credentials, SpotifyClient};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Fill in MP3/FLAC tags from Spotify for files named "Artist - Title".
#[derive(Debug, Parser)]
#[command(name = "autofiller", version, about)]
struct Args {
    /// Audio files to tag.
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// Optional TOML configuration file.
    #[arg(long, value_name = "PATH", env = "AUTOFILLER_CONFIG")]
    config: Option<PathBuf>,
}

/// Prints each batch event as a progress line.
struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn publish(&self, event: &BatchEvent) {
        println!("{}", report::render_event(event));
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).context("failed to load configuration")?;
    init_tracing(&config.telemetry.log_level);

    println!("{}", report::SELECTION_PROMPT);

    let selection = Selection::classify(&FilenameParser, args.files);
    let tracks = match selection.into_tracks() {
        Ok(tracks) => tracks,
        Err(failure) => {
            warn!(target: "cli", %failure, "selection rejected");
            print!("{}", report::render_validation_failure(&failure));
            return Ok(());
        }
    };

    let client = build_client(&config)?;
    let runner = BatchRunner::new(
        MetadataLookupService::new(client),
        LoftyTagWriter::new(config.tagging.cover_description.clone()),
    );

    info!(target: "cli", tracks = tracks.len(), "starting batch");
    let summary = runner.run(&tracks, &ConsoleProgress).await;

    print!("{}", report::render_summary(&summary));
    Ok(())
}

fn build_client(config: &AppConfig) -> Result<SpotifyClient> {
    let credentials = config
        .spotify
        .credentials()
        .context("Spotify credentials are not configured")?;

    SpotifyClient::builder(Credentials::new(
        credentials.client_id,
        credentials.client_secret,
    ))
    .api_base_url(config.spotify.api_base_url.clone())
    .auth_base_url(config.spotify.auth_base_url.clone())
    .timeout(Duration::from_secs(config.spotify.timeout_secs))
    .build()
    .context("failed to build Spotify client")
}

fn init_tracing(default_level: &str) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parses_files_and_config() {
        let args = Args::try_parse_from([
            "autofiller",
            "--config",
            "autofiller.toml",
            "Queen - Innuendo.mp3",
            "Muse - Uprising.flac",
        ])
        .unwrap();
        assert_eq!(args.files.len(), 2);
        assert_eq!(args.config, Some(PathBuf::from("autofiller.toml")));
    }

    #[test]
    fn test_requires_at_least_one_file() {
        assert!(Args::try_parse_from(["autofiller"]).is_err());
    }

    #[test]
    fn test_missing_credentials_fail_client_construction() {
        let mut config = AppConfig::default();
        config.spotify.client_id = Some("id".to_string());
        config.spotify.client_secret = None;

        let err = build_client(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("spotify.client_secret"));
    }

    #[test]
    fn test_client_builds_from_config() {
        let mut config = AppConfig::default();
        config.spotify.client_id = Some("id".to_string());
        config.spotify.client_secret = Some("secret".to_string());
        assert!(build_client(&config).is_ok());
    }
}
