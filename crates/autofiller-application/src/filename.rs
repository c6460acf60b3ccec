// SPDX-License-Identifier: GPL-3.0-or-later

//! Filename classification for selected audio files.
//!
//! A usable file is named `Artist - Title.mp3` or `Artist - Title.flac`.
//! The artist is everything before the first `-`, the title everything
//! between that `-` and the extension, both trimmed. Classification is
//! pure: the file system is never touched.

use autofiller_domain::{AudioFormat, TrackReference};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Reasons a selected file cannot be processed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilenameError {
    #[error("not an MP3 or FLAC file: {}", .0.display())]
    WrongExtension(PathBuf),

    #[error("filename is not in the \"Artist - Title\" format: {}", .0.display())]
    WrongNameFormat(PathBuf),
}

impl FilenameError {
    pub fn path(&self) -> &Path {
        match self {
            FilenameError::WrongExtension(path) | FilenameError::WrongNameFormat(path) => path,
        }
    }
}

/// Result type for filename classification.
pub type FilenameResult<T> = Result<T, FilenameError>;

/// Splits `Artist - Title.<ext>` filenames into track references.
#[derive(Debug, Default, Clone)]
pub struct FilenameParser;

impl FilenameParser {
    /// Classify a path as a valid track, a wrong extension, or a wrong name format.
    ///
    /// The extension check runs first, so a `.wav` file without a `-` is
    /// reported as a wrong extension. Empty artist or title portions count as
    /// a wrong name format.
    pub fn classify(&self, path: impl AsRef<Path>) -> FilenameResult<TrackReference> {
        let path = path.as_ref();

        let Some(file_name) = path.file_name() else {
            return Err(FilenameError::WrongExtension(path.to_path_buf()));
        };

        let Some(format) = AudioFormat::from_file_name(&file_name.to_string_lossy()) else {
            return Err(FilenameError::WrongExtension(path.to_path_buf()));
        };

        let Some(file_name) = file_name.to_str() else {
            return Err(FilenameError::WrongNameFormat(path.to_path_buf()));
        };

        let stem = &file_name[..file_name.len() - format.suffix().len()];

        let Some((artist, title)) = stem.split_once('-') else {
            debug!(target: "filename", file_name = %file_name, "no artist separator");
            return Err(FilenameError::WrongNameFormat(path.to_path_buf()));
        };

        let (artist, title) = (artist.trim(), title.trim());
        if artist.is_empty() || title.is_empty() {
            debug!(target: "filename", file_name = %file_name, "empty artist or title");
            return Err(FilenameError::WrongNameFormat(path.to_path_buf()));
        }

        Ok(TrackReference::new(artist, title, path, format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(path: &str) -> FilenameResult<TrackReference> {
        FilenameParser.classify(path)
    }

    #[test]
    fn test_parses_artist_and_title_for_mp3() {
        let track = classify("/music/Queen - Bohemian Rhapsody.mp3").unwrap();
        assert_eq!(track.artist, "Queen");
        assert_eq!(track.title, "Bohemian Rhapsody");
        assert_eq!(track.format, AudioFormat::Mp3);
        assert_eq!(track.path, PathBuf::from("/music/Queen - Bohemian Rhapsody.mp3"));
    }

    #[test]
    fn test_parses_flac_and_trims_whitespace() {
        let track = classify("  Radiohead   -   Airbag  .flac").unwrap();
        assert_eq!(track.artist, "Radiohead");
        assert_eq!(track.title, "Airbag");
        assert_eq!(track.format, AudioFormat::Flac);
    }

    #[test]
    fn test_splits_on_first_dash_only() {
        let track = classify("Jay-Z - 99 Problems.mp3").unwrap();
        assert_eq!(track.artist, "Jay");
        assert_eq!(track.title, "Z - 99 Problems");
    }

    #[test]
    fn test_directory_dashes_are_ignored() {
        let track = classify("/my-music/a-b/Muse - Uprising.flac").unwrap();
        assert_eq!(track.artist, "Muse");
        assert_eq!(track.title, "Uprising");
    }

    #[test]
    fn test_missing_dash_is_wrong_name_format() {
        assert_eq!(
            classify("Bohemian Rhapsody.mp3"),
            Err(FilenameError::WrongNameFormat(PathBuf::from("Bohemian Rhapsody.mp3")))
        );
        assert!(matches!(
            classify("NoSeparator.flac"),
            Err(FilenameError::WrongNameFormat(_))
        ));
    }

    #[test]
    fn test_unsupported_extension_wins_over_name_format() {
        assert!(matches!(
            classify("Queen - Bohemian Rhapsody.wav"),
            Err(FilenameError::WrongExtension(_))
        ));
        assert!(matches!(
            classify("NoSeparator.ogg"),
            Err(FilenameError::WrongExtension(_))
        ));
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        assert!(matches!(
            classify("Queen - Bohemian Rhapsody.MP3"),
            Err(FilenameError::WrongExtension(_))
        ));
    }

    #[test]
    fn test_empty_title_or_artist_is_wrong_name_format() {
        assert!(matches!(
            classify("Artist - .mp3"),
            Err(FilenameError::WrongNameFormat(_))
        ));
        assert!(matches!(
            classify(" - Title.flac"),
            Err(FilenameError::WrongNameFormat(_))
        ));
    }

    #[test]
    fn test_path_without_file_name_is_wrong_extension() {
        assert!(matches!(classify("/"), Err(FilenameError::WrongExtension(_))));
    }

    #[test]
    fn test_error_exposes_offending_path() {
        let err = classify("song.wav").unwrap_err();
        assert_eq!(err.path(), Path::new("song.wav"));
    }
}
