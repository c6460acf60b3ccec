// SPDX-License-Identifier: GPL-3.0-or-later

//! Batch orchestration: validate every selected file up front, then look up
//! and tag the valid tracks one at a time.

use crate::filename::{FilenameError, FilenameParser};
use crate::genres::format_genres;
use crate::lookup::{MetadataLookupService, TrackQuery};
use crate::progress::{BatchEvent, ProgressSink};
use crate::tagging::{TagWriter, TrackTags};
use autofiller_domain::TrackReference;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Files partitioned by filename classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub tracks: Vec<TrackReference>,
    pub wrong_extension: Vec<PathBuf>,
    pub wrong_name_format: Vec<PathBuf>,
}

impl Selection {
    pub fn classify<I, P>(parser: &FilenameParser, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut selection = Selection::default();
        for path in paths {
            match parser.classify(path.into()) {
                Ok(track) => selection.tracks.push(track),
                Err(FilenameError::WrongExtension(path)) => selection.wrong_extension.push(path),
                Err(FilenameError::WrongNameFormat(path)) => selection.wrong_name_format.push(path),
            }
        }
        selection
    }

    /// The valid tracks, or every offender when any file failed classification.
    ///
    /// One bad file rejects the whole selection.
    pub fn into_tracks(self) -> Result<Vec<TrackReference>, ValidationFailure> {
        if self.wrong_extension.is_empty() && self.wrong_name_format.is_empty() {
            Ok(self.tracks)
        } else {
            Err(ValidationFailure {
                wrong_extension: self.wrong_extension,
                wrong_name_format: self.wrong_name_format,
            })
        }
    }
}

/// Offending files from a rejected selection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error(
    "{} file(s) with an unsupported extension, {} with a malformed name",
    wrong_extension.len(),
    wrong_name_format.len()
)]
pub struct ValidationFailure {
    pub wrong_extension: Vec<PathBuf>,
    pub wrong_name_format: Vec<PathBuf>,
}

/// Why a track ended up in the failure list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    NotFound,
    Lookup(String),
    WriteFailed(String),
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub tagged: Vec<TrackReference>,
    pub failed: Vec<(TrackReference, FailureReason)>,
    pub no_genre: Vec<TrackReference>,
}

impl BatchReport {
    pub fn failed_tracks(&self) -> impl Iterator<Item = &TrackReference> {
        self.failed.iter().map(|(track, _)| track)
    }
}

/// Runs lookups and tag writes for validated tracks.
pub struct BatchRunner<W> {
    lookup: MetadataLookupService,
    writer: W,
}

impl<W: TagWriter> BatchRunner<W> {
    pub fn new(lookup: MetadataLookupService, writer: W) -> Self {
        Self { lookup, writer }
    }

    /// Process `tracks` strictly in order. Per-track failures are recorded and
    /// never stop the batch.
    #[instrument(skip_all, fields(tracks = tracks.len()))]
    pub async fn run(&self, tracks: &[TrackReference], progress: &dyn ProgressSink) -> BatchReport {
        let mut report = BatchReport::default();

        for track in tracks {
            self.process(track, progress, &mut report).await;
        }

        info!(
            target: "batch",
            tagged = report.tagged.len(),
            failed = report.failed.len(),
            no_genre = report.no_genre.len(),
            "batch complete"
        );
        report
    }

    async fn process(&self, track: &TrackReference, progress: &dyn ProgressSink, report: &mut BatchReport) {
        let query = TrackQuery::for_track(track);
        if query.is_title_only() {
            progress.publish(&BatchEvent::TitleOnlySearch { track: track.clone() });
        }

        let catalog = match self.lookup.find_track(&query).await {
            Ok(Some(catalog)) => catalog,
            Ok(None) => {
                progress.publish(&BatchEvent::NotFound { track: track.clone() });
                report.failed.push((track.clone(), FailureReason::NotFound));
                return;
            }
            Err(error) => {
                warn!(target: "batch", track = %track, error = %error, "track lookup failed");
                progress.publish(&BatchEvent::LookupFailed {
                    track: track.clone(),
                    error: error.to_string(),
                });
                report
                    .failed
                    .push((track.clone(), FailureReason::Lookup(error.to_string())));
                return;
            }
        };

        let genre = match self.lookup.album_artist_genres(&catalog.album_artist).await {
            Ok(genres) => format_genres(&genres),
            Err(error) => {
                warn!(target: "batch", track = %track, error = %error, "genre lookup failed");
                None
            }
        };
        if genre.is_none() {
            report.no_genre.push(track.clone());
        }

        let cover_art = match &catalog.cover_art_url {
            Some(url) => match self.lookup.fetch_cover_art(url).await {
                Ok(bytes) => Some(bytes),
                Err(error) => {
                    self.write_failed(track, error.to_string(), progress, report);
                    return;
                }
            },
            None => {
                warn!(target: "batch", track = %track, "no cover art available");
                None
            }
        };

        let tags = TrackTags {
            catalog,
            genre,
            cover_art,
        };

        match self.writer.write(track, &tags) {
            Ok(()) => {
                progress.publish(&BatchEvent::Tagged { track: track.clone() });
                report.tagged.push(track.clone());
            }
            Err(error) => self.write_failed(track, error.to_string(), progress, report),
        }
    }

    fn write_failed(
        &self,
        track: &TrackReference,
        error: String,
        progress: &dyn ProgressSink,
        report: &mut BatchReport,
    ) {
        warn!(target: "batch", track = %track, error = %error, "writing metadata failed");
        progress.publish(&BatchEvent::WriteFailed {
            track: track.clone(),
            error: error.clone(),
        });
        report
            .failed
            .push((track.clone(), FailureReason::WriteFailed(error)));
    }
}
