// SPDX-License-Identifier: GPL-3.0-or-later

use serde::{Deserialize, Serialize};

/// Artist reference as embedded in tracks and albums.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimplifiedArtist {
    /// Artist name.
    pub name: String,
    /// Spotify artist ID.
    #[serde(default)]
    pub id: Option<String>,
}

/// Full artist object returned by artist search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artist {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    /// Genres associated with the artist; frequently empty.
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Cover-art image reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Album a track belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Album {
    pub name: String,
    /// Release date (YYYY, YYYY-MM, or YYYY-MM-DD).
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub total_tracks: u32,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
    /// Images ordered widest first.
    #[serde(default)]
    pub images: Vec<Image>,
}

impl Album {
    /// Year portion of the release date.
    pub fn release_year(&self) -> &str {
        self.release_date
            .char_indices()
            .nth(4)
            .map(|(idx, _)| &self.release_date[..idx])
            .unwrap_or(&self.release_date)
    }
}

/// Track object from search results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub name: String,
    pub track_number: u32,
    #[serde(default = "default_disc_number")]
    pub disc_number: u32,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
    pub album: Album,
}

fn default_disc_number() -> u32 {
    1
}

/// Paging wrapper used by every search result list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u32>,
}

impl<T> Page<T> {
    pub fn into_first(self) -> Option<T> {
        self.items.into_iter().next()
    }
}

/// Response body of `/search?type=track`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSearchResponse {
    pub tracks: Page<Track>,
}

/// Response body of `/search?type=artist`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistSearchResponse {
    pub artists: Page<Artist>,
}

/// Item type to search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchKind {
    #[default]
    Track,
    Artist,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Track => "track",
            SearchKind::Artist => "artist",
        }
    }
}

/// Search query parameters.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Search query string, free text or field filters like `artist:Queen`.
    pub query: String,
    pub kind: SearchKind,
    /// Maximum number of results (API default 20, max 50).
    pub limit: Option<u32>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            kind: SearchKind::Track,
            limit: None,
        }
    }

    pub fn kind(mut self, kind: SearchKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album_with_date(date: &str) -> Album {
        Album {
            name: "A Night at the Opera".to_string(),
            release_date: date.to_string(),
            total_tracks: 12,
            artists: Vec::new(),
            images: Vec::new(),
        }
    }

    #[test]
    fn test_release_year_takes_first_four_characters() {
        assert_eq!(album_with_date("1975-11-21").release_year(), "1975");
        assert_eq!(album_with_date("1975").release_year(), "1975");
        assert_eq!(album_with_date("").release_year(), "");
    }

    #[test]
    fn test_track_deserializes_with_missing_optional_fields() {
        let track: Track = serde_json::from_value(serde_json::json!({
            "name": "Bohemian Rhapsody",
            "track_number": 11,
            "album": { "name": "A Night at the Opera" }
        }))
        .unwrap();

        assert_eq!(track.disc_number, 1);
        assert!(track.artists.is_empty());
        assert!(track.album.images.is_empty());
        assert_eq!(track.album.total_tracks, 0);
    }
}
