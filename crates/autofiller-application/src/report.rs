// SPDX-License-Identifier: GPL-3.0-or-later

//! Console text shown to the user. Logs go through `tracing`; these strings
//! are the program's actual output.

use crate::batch::{BatchReport, ValidationFailure};
use crate::progress::BatchEvent;
use std::fmt::Write;
use std::path::PathBuf;

pub const SELECTION_PROMPT: &str = "Please select the MP3 or FLAC file(s) you wish to get metadata for.\n\
Ensure that the name of each file is in the format: \"Artist Name - Track Name\"\n";

pub const CLOSING_LINE: &str = "Thank you for using the Metadata Autofiller.";

const WRONG_EXTENSION_HEADING: &str = "One or more files are not MP3 or FLAC. Offending files:";
const WRONG_NAME_FORMAT_HEADING: &str =
    "One or more filenames are not in the format \"Artist Name - Track Name\". Offending files:";
const NOT_FOUND_HEADING: &str = "Spotify could not find metadata for the following tracks:";
const NO_GENRE_HEADING: &str = "Spotify could not find genre data for the following tracks:";

fn push_section<I, T>(out: &mut String, heading: &str, entries: I)
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    let _ = writeln!(out, "{}\n", heading);
    for entry in entries {
        let _ = writeln!(out, "{}", entry);
    }
    out.push('\n');
}

fn displayed(paths: &[PathBuf]) -> impl Iterator<Item = std::path::Display<'_>> {
    paths.iter().map(|path| path.display())
}

/// Offender lists for a rejected selection; each non-empty list gets its own section.
pub fn render_validation_failure(failure: &ValidationFailure) -> String {
    let mut out = String::new();
    if !failure.wrong_extension.is_empty() {
        push_section(&mut out, WRONG_EXTENSION_HEADING, displayed(&failure.wrong_extension));
    }
    if !failure.wrong_name_format.is_empty() {
        push_section(&mut out, WRONG_NAME_FORMAT_HEADING, displayed(&failure.wrong_name_format));
    }
    out
}

/// One progress line for a batch event.
pub fn render_event(event: &BatchEvent) -> String {
    match event {
        BatchEvent::TitleOnlySearch { track } => {
            format!("\n{} has special characters. Searching by title only.", track)
        }
        BatchEvent::NotFound { track } | BatchEvent::LookupFailed { track, .. } => {
            format!("Failed to add metadata to {}!", track)
        }
        BatchEvent::WriteFailed { track, error } => {
            format!("Error writing metadata to {}: {}", track.path.display(), error)
        }
        BatchEvent::Tagged { track } => {
            format!("Added metadata to {} successfully!", track)
        }
    }
}

/// End-of-run summary, finishing with the closing line.
pub fn render_summary(report: &BatchReport) -> String {
    let mut out = String::from("\n");
    if !report.failed.is_empty() {
        push_section(&mut out, NOT_FOUND_HEADING, report.failed_tracks());
    }
    if !report.no_genre.is_empty() {
        push_section(&mut out, NO_GENRE_HEADING, report.no_genre.iter());
    }
    let _ = writeln!(out, "{}", CLOSING_LINE);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::FailureReason;
    use autofiller_domain::{AudioFormat, TrackReference};

    fn track(artist: &str, title: &str) -> TrackReference {
        TrackReference::new(
            artist,
            title,
            format!("/music/{} - {}.mp3", artist, title),
            AudioFormat::Mp3,
        )
    }

    #[test]
    fn test_validation_lists_only_non_empty_sections() {
        let failure = ValidationFailure {
            wrong_extension: vec![PathBuf::from("/music/song.wav")],
            wrong_name_format: vec![],
        };
        let text = render_validation_failure(&failure);
        assert!(text.starts_with(WRONG_EXTENSION_HEADING));
        assert!(text.contains("/music/song.wav\n"));
        assert!(!text.contains("Artist Name - Track Name"));
    }

    #[test]
    fn test_validation_lists_both_sections() {
        let failure = ValidationFailure {
            wrong_extension: vec![PathBuf::from("a.wav")],
            wrong_name_format: vec![PathBuf::from("b.mp3")],
        };
        let text = render_validation_failure(&failure);
        let ext = text.find(WRONG_EXTENSION_HEADING).unwrap();
        let name = text.find(WRONG_NAME_FORMAT_HEADING).unwrap();
        assert!(ext < name);
        assert!(text.contains("b.mp3"));
    }

    #[test]
    fn test_progress_lines() {
        let t = track("Queen", "Innuendo");
        assert_eq!(
            render_event(&BatchEvent::Tagged { track: t.clone() }),
            "Added metadata to Queen - Innuendo successfully!"
        );
        assert_eq!(
            render_event(&BatchEvent::NotFound { track: t.clone() }),
            "Failed to add metadata to Queen - Innuendo!"
        );
        assert_eq!(
            render_event(&BatchEvent::WriteFailed {
                track: t.clone(),
                error: "boom".to_string()
            }),
            "Error writing metadata to /music/Queen - Innuendo.mp3: boom"
        );
        assert!(render_event(&BatchEvent::TitleOnlySearch { track: t })
            .ends_with("Queen - Innuendo has special characters. Searching by title only."));
    }

    #[test]
    fn test_summary_lists_failures_and_missing_genres() {
        let report = BatchReport {
            tagged: vec![track("A", "One")],
            failed: vec![
                (track("B", "Two"), FailureReason::NotFound),
                (track("C", "Three"), FailureReason::WriteFailed("x".to_string())),
            ],
            no_genre: vec![track("A", "One")],
        };
        let text = render_summary(&report);
        assert!(text.contains(&format!("{}\n\nB - Two\nC - Three\n", NOT_FOUND_HEADING)));
        assert!(text.contains(&format!("{}\n\nA - One\n", NO_GENRE_HEADING)));
        assert!(text.trim_end().ends_with(CLOSING_LINE));
    }

    #[test]
    fn test_clean_run_prints_only_closing_line() {
        let text = render_summary(&BatchReport::default());
        assert_eq!(text.trim(), CLOSING_LINE);
    }
}
