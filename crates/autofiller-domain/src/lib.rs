// SPDX-License-Identifier: GPL-3.0-or-later
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Audio Formats
// ============================================================================

/// Container formats the tagger knows how to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioFormat {
    Mp3,
    Flac,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 2] = [AudioFormat::Mp3, AudioFormat::Flac];

    /// Filename suffix, including the leading dot. Matching is case-sensitive.
    pub fn suffix(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => ".mp3",
            AudioFormat::Flac => ".flac",
        }
    }

    /// Detect the format from a file name by its exact suffix.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| file_name.ends_with(format.suffix()))
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioFormat::Mp3 => write!(f, "MP3"),
            AudioFormat::Flac => write!(f, "FLAC"),
        }
    }
}

// ============================================================================
// Track Reference
// ============================================================================

/// A selected audio file whose name parsed as "Artist - Title".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackReference {
    pub title: String,
    pub artist: String,
    pub path: PathBuf,
    pub format: AudioFormat,
}

impl TrackReference {
    pub fn new(
        artist: impl Into<String>,
        title: impl Into<String>,
        path: impl Into<PathBuf>,
        format: AudioFormat,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            path: path.into(),
            format,
        }
    }
}

impl std::fmt::Display for TrackReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

// ============================================================================
// Catalog Result
// ============================================================================

/// Metadata resolved from the remote catalog for one track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub song_name: String,
    pub album_name: String,
    /// First four characters of the album release date.
    pub release_year: String,
    pub track_number: u32,
    pub total_tracks: u32,
    pub disc_number: u32,
    pub album_artist: String,
    /// Performing artists, in catalog order.
    pub artists: Vec<String>,
    pub cover_art_url: Option<String>,
}

impl CatalogTrack {
    pub fn joined_artists(&self) -> String {
        self.artists.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection_is_case_sensitive() {
        assert_eq!(AudioFormat::from_file_name("a - b.mp3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_file_name("a - b.flac"), Some(AudioFormat::Flac));
        assert_eq!(AudioFormat::from_file_name("a - b.MP3"), None);
        assert_eq!(AudioFormat::from_file_name("a - b.wav"), None);
        assert_eq!(AudioFormat::from_file_name("mp3"), None);
    }

    #[test]
    fn test_track_reference_displays_as_artist_dash_title() {
        let track = TrackReference::new("Queen", "Bohemian Rhapsody", "/tmp/x.mp3", AudioFormat::Mp3);
        assert_eq!(track.to_string(), "Queen - Bohemian Rhapsody");
    }

    #[test]
    fn test_artists_join_with_comma() {
        let track = CatalogTrack {
            song_name: "Under Pressure".to_string(),
            album_name: "Hot Space".to_string(),
            release_year: "1982".to_string(),
            track_number: 11,
            total_tracks: 11,
            disc_number: 1,
            album_artist: "Queen".to_string(),
            artists: vec!["Queen".to_string(), "David Bowie".to_string()],
            cover_art_url: None,
        };
        assert_eq!(track.joined_artists(), "Queen, David Bowie");
    }
}
