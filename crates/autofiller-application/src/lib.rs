// SPDX-License-Identifier: GPL-3.0-or-later
pub mod batch;
pub mod filename;
pub mod genres;
pub mod lookup;
pub mod progress;
pub mod report;
pub mod tagging;

pub use batch::{BatchReport, BatchRunner, FailureReason, Selection, ValidationFailure};
pub use filename::{FilenameError, FilenameParser, FilenameResult};
pub use genres::format_genres;
pub use lookup::{LookupError, LookupResult, MetadataLookupService, TrackQuery};
pub use progress::{BatchEvent, InMemoryProgress, ProgressSink};
pub use tagging::{
    LoftyTagWriter, TagContainer, TagField, TagWriter, TaggingError, TaggingResult, TrackTags,
};
