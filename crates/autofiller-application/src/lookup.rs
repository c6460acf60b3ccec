// SPDX-License-Identifier: GPL-3.0-or-later

//! Catalog lookups for parsed tracks.
//!
//! Titles made only of ASCII letters, digits and whitespace are searched with
//! a field-scoped `artist:<a> track:<t>` query. Anything else (accents,
//! punctuation, symbols) confuses the field syntax, so those titles fall back
//! to a free-text search on the title alone. Either way exactly one track
//! search is issued, limited to one result.

use autofiller_domain::{CatalogTrack, TrackReference};
use autofiller_spotify::{SearchQuery, SpotifyClient, SpotifyError, Track};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Errors that can occur while talking to the catalog.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("catalog request failed: {0}")]
    Catalog(#[from] SpotifyError),
}

/// Result type for lookup operations.
pub type LookupResult<T> = Result<T, LookupError>;

/// How a track is searched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackQuery {
    /// `artist:<artist> track:<title>`
    Structured { artist: String, title: String },
    /// Free-text search on the title only.
    TitleOnly { title: String },
}

impl TrackQuery {
    pub fn for_track(track: &TrackReference) -> Self {
        if has_special_characters(&track.title) {
            TrackQuery::TitleOnly {
                title: track.title.clone(),
            }
        } else {
            TrackQuery::Structured {
                artist: track.artist.clone(),
                title: track.title.clone(),
            }
        }
    }

    pub fn is_title_only(&self) -> bool {
        matches!(self, TrackQuery::TitleOnly { .. })
    }

    pub fn query_string(&self) -> String {
        match self {
            TrackQuery::Structured { artist, title } => format!("artist:{} track:{}", artist, title),
            TrackQuery::TitleOnly { title } => title.clone(),
        }
    }
}

/// True when the title contains anything besides ASCII letters, digits and whitespace.
pub fn has_special_characters(title: &str) -> bool {
    !title.chars().all(|c| {
        c.is_ascii_alphanumeric() || matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
    })
}

/// Map the first search hit onto a catalog result.
///
/// A hit without an album artist cannot populate the album-artist field and is
/// treated as no hit at all.
pub fn catalog_track_from(track: Track) -> Option<CatalogTrack> {
    let album_artist = track.album.artists.first()?.name.clone();
    let release_year = track.album.release_year().to_string();

    Some(CatalogTrack {
        song_name: track.name,
        album_name: track.album.name,
        release_year,
        track_number: track.track_number,
        total_tracks: track.album.total_tracks,
        disc_number: track.disc_number,
        album_artist,
        artists: track.artists.into_iter().map(|a| a.name).collect(),
        cover_art_url: track.album.images.into_iter().next().map(|image| image.url),
    })
}

/// Resolves track metadata, album-artist genres and cover art from the catalog.
#[derive(Debug, Clone)]
pub struct MetadataLookupService {
    client: SpotifyClient,
}

impl MetadataLookupService {
    pub fn new(client: SpotifyClient) -> Self {
        Self { client }
    }

    /// Run the single track search for `query`.
    ///
    /// Returns `Ok(None)` when the catalog has no usable hit.
    #[instrument(skip(self, query), fields(query = %query.query_string()))]
    pub async fn find_track(&self, query: &TrackQuery) -> LookupResult<Option<CatalogTrack>> {
        let page = self
            .client
            .search_tracks(SearchQuery::new(query.query_string()).limit(1))
            .await?;

        let Some(hit) = page.into_first() else {
            debug!(target: "lookup", "no tracks returned");
            return Ok(None);
        };

        let catalog_track = catalog_track_from(hit);
        if catalog_track.is_none() {
            warn!(target: "lookup", "first hit has no album artist");
        }
        Ok(catalog_track)
    }

    /// Genres of the best-matching artist for `album_artist`; empty when unknown.
    #[instrument(skip(self))]
    pub async fn album_artist_genres(&self, album_artist: &str) -> LookupResult<Vec<String>> {
        let page = self
            .client
            .search_artists(SearchQuery::new(format!("artist:{}", album_artist)).limit(1))
            .await?;

        Ok(page
            .into_first()
            .map(|artist| artist.genres)
            .unwrap_or_default())
    }

    /// Download cover art bytes.
    pub async fn fetch_cover_art(&self, url: &str) -> LookupResult<Vec<u8>> {
        Ok(self.client.fetch_image(url).await?)
    }
}
