// SPDX-License-Identifier: GPL-3.0-or-later

//! Writing catalog metadata into audio file tags.
//!
//! MP3 files get an ID3v2 tag and FLAC files get Vorbis comments. Both are
//! driven through [`TagContainer::set_field`] from one schema-aware field list,
//! so the only format-specific decisions live in [`field_values`] and the
//! per-variant setters below.

use autofiller_domain::{AudioFormat, CatalogTrack, TrackReference};
use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag, TagExt, TagType};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Errors that can occur while reading or writing tags.
#[derive(Debug, Error)]
pub enum TaggingError {
    #[error("failed to read tags from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: lofty::error::LoftyError,
    },

    #[error("failed to save tags to {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: lofty::error::LoftyError,
    },

    #[error("{path} cannot hold {format} tags")]
    Unsupported { path: PathBuf, format: AudioFormat },

    #[error("{format} tags saved to {path} could not be read back")]
    NotPersisted { path: PathBuf, format: AudioFormat },
}

/// Result type used throughout the tagging module.
pub type TaggingResult<T> = Result<T, TaggingError>;

/// Semantic fields written for every track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagField {
    Title,
    Artist,
    Album,
    AlbumArtist,
    TrackNumber,
    TrackTotal,
    Year,
    Genre,
    DiscNumber,
}

impl TagField {
    /// On-disk frame id (ID3v2) or comment name (Vorbis) for this field.
    pub fn key(&self, format: AudioFormat) -> &'static str {
        match format {
            AudioFormat::Mp3 => match self {
                TagField::Title => "TIT2",
                TagField::Artist => "TPE1",
                TagField::Album => "TALB",
                TagField::AlbumArtist => "TPE2",
                TagField::TrackNumber | TagField::TrackTotal => "TRCK",
                TagField::Year => "TDRC",
                TagField::Genre => "TCON",
                TagField::DiscNumber => "TPOS",
            },
            AudioFormat::Flac => match self {
                TagField::Title => "TITLE",
                TagField::Artist => "ARTIST",
                TagField::Album => "ALBUM",
                TagField::AlbumArtist => "ALBUMARTIST",
                TagField::TrackNumber => "TRACKNUMBER",
                TagField::TrackTotal => "TRACKTOTAL",
                TagField::Year => "DATE",
                TagField::Genre => "GENRE",
                TagField::DiscNumber => "DISCNUMBER",
            },
        }
    }
}

/// Everything written into one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTags {
    pub catalog: CatalogTrack,
    /// Formatted genre string; `None` leaves the genre field untouched.
    pub genre: Option<String>,
    /// JPEG bytes for the front cover.
    pub cover_art: Option<Vec<u8>>,
}

/// Field/value pairs for `format`, in write order.
///
/// ID3 carries the track position as one `n/total` value; Vorbis comments
/// split it into separate number and total fields.
pub fn field_values(format: AudioFormat, tags: &TrackTags) -> Vec<(TagField, String)> {
    let catalog = &tags.catalog;
    let mut values = vec![
        (TagField::Title, catalog.song_name.clone()),
        (TagField::Artist, catalog.joined_artists()),
        (TagField::Album, catalog.album_name.clone()),
        (TagField::AlbumArtist, catalog.album_artist.clone()),
    ];

    match format {
        AudioFormat::Mp3 => values.push((
            TagField::TrackNumber,
            format!("{}/{}", catalog.track_number, catalog.total_tracks),
        )),
        AudioFormat::Flac => {
            values.push((TagField::TrackNumber, catalog.track_number.to_string()));
            values.push((TagField::TrackTotal, catalog.total_tracks.to_string()));
        }
    }

    values.push((TagField::Year, catalog.release_year.clone()));
    if let Some(genre) = &tags.genre {
        values.push((TagField::Genre, genre.clone()));
    }
    values.push((TagField::DiscNumber, catalog.disc_number.to_string()));

    values
}

fn tag_type(format: AudioFormat) -> TagType {
    match format {
        AudioFormat::Mp3 => TagType::Id3v2,
        AudioFormat::Flac => TagType::VorbisComments,
    }
}

/// The tag block of one file, selected once by format.
#[derive(Clone)]
pub enum TagContainer {
    Id3(Tag),
    Vorbis(Tag),
}

impl std::fmt::Debug for TagContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (variant, tag) = match self {
            TagContainer::Id3(tag) => ("Id3", tag),
            TagContainer::Vorbis(tag) => ("Vorbis", tag),
        };
        f.debug_struct(variant)
            .field("tag_type", &tag.tag_type())
            .field("items", &tag.item_count())
            .field("pictures", &tag.picture_count())
            .finish()
    }
}

impl TagContainer {
    /// A fresh, empty tag for `format`.
    pub fn empty(format: AudioFormat) -> Self {
        Self::wrap(format, Tag::new(tag_type(format)))
    }

    /// Read the existing tag of `path`, or start an empty one when the file has none.
    pub fn read(path: &Path, format: AudioFormat) -> TaggingResult<Self> {
        let read_error = |source| TaggingError::Read {
            path: path.to_path_buf(),
            source,
        };

        let mut tagged_file = Probe::open(path)
            .map_err(read_error)?
            .read()
            .map_err(read_error)?;

        if !tagged_file.supports_tag_type(tag_type(format)) {
            return Err(TaggingError::Unsupported {
                path: path.to_path_buf(),
                format,
            });
        }

        let tag = match tagged_file.remove(tag_type(format)) {
            Some(tag) => tag,
            None => {
                debug!(target: "tagging", path = %path.display(), "no existing tag, creating one");
                Tag::new(tag_type(format))
            }
        };

        Ok(Self::wrap(format, tag))
    }

    fn wrap(format: AudioFormat, tag: Tag) -> Self {
        match format {
            AudioFormat::Mp3 => TagContainer::Id3(tag),
            AudioFormat::Flac => TagContainer::Vorbis(tag),
        }
    }

    pub fn tag(&self) -> &Tag {
        match self {
            TagContainer::Id3(tag) | TagContainer::Vorbis(tag) => tag,
        }
    }

    /// Set one field, replacing any existing value.
    pub fn set_field(&mut self, field: TagField, value: &str) {
        match self {
            TagContainer::Id3(tag) => set_id3_field(tag, field, value),
            TagContainer::Vorbis(tag) => set_vorbis_field(tag, field, value),
        }
    }

    /// Embed `data` as the JPEG front cover.
    ///
    /// ID3 only replaces an existing front cover; Vorbis drops every picture
    /// first so the file ends up with exactly one.
    pub fn set_front_cover(&mut self, data: Vec<u8>, description: &str) {
        let picture = Picture::new_unchecked(
            PictureType::CoverFront,
            Some(MimeType::Jpeg),
            Some(description.to_string()),
            data,
        );

        match self {
            TagContainer::Id3(tag) => {
                tag.remove_picture_type(PictureType::CoverFront);
                tag.push_picture(picture);
            }
            TagContainer::Vorbis(tag) => {
                let existing: Vec<PictureType> =
                    tag.pictures().iter().map(|p| p.pic_type()).collect();
                for pic_type in existing {
                    tag.remove_picture_type(pic_type);
                }
                tag.push_picture(picture);
            }
        }
    }

    /// Persist the tag to `path` immediately.
    pub fn save(&self, path: &Path) -> TaggingResult<()> {
        self.tag()
            .save_to_path(path, WriteOptions::default())
            .map_err(|source| TaggingError::Save {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Parse an ID3 `n` or `n/total` position string.
fn parse_position(value: &str) -> Option<(u32, Option<u32>)> {
    let mut parts = value.splitn(2, '/');
    let number = parts.next()?.trim().parse().ok()?;
    let total = match parts.next() {
        Some(total) => Some(total.trim().parse().ok()?),
        None => None,
    };
    Some((number, total))
}

fn set_id3_field(tag: &mut Tag, field: TagField, value: &str) {
    match field {
        TagField::Title => tag.set_title(value.to_string()),
        TagField::Artist => tag.set_artist(value.to_string()),
        TagField::Album => tag.set_album(value.to_string()),
        TagField::Genre => tag.set_genre(value.to_string()),
        TagField::AlbumArtist => {
            tag.insert_text(ItemKey::AlbumArtist, value.to_string());
        }
        TagField::TrackNumber => match parse_position(value) {
            Some((number, total)) => {
                tag.set_track(number);
                if let Some(total) = total {
                    tag.set_track_total(total);
                }
            }
            None => {
                tag.insert_text(ItemKey::TrackNumber, value.to_string());
            }
        },
        TagField::TrackTotal => match value.trim().parse() {
            Ok(total) => tag.set_track_total(total),
            Err(_) => {
                tag.insert_text(ItemKey::TrackTotal, value.to_string());
            }
        },
        TagField::DiscNumber => match parse_position(value) {
            Some((number, total)) => {
                tag.set_disk(number);
                if let Some(total) = total {
                    tag.set_disk_total(total);
                }
            }
            None => {
                tag.insert_text(ItemKey::DiscNumber, value.to_string());
            }
        },
        TagField::Year => match value.trim().parse() {
            Ok(year) => tag.set_year(year),
            Err(_) => {
                tag.insert_text(ItemKey::RecordingDate, value.to_string());
            }
        },
    }
}

fn set_vorbis_field(tag: &mut Tag, field: TagField, value: &str) {
    let key = match field {
        TagField::Title => ItemKey::TrackTitle,
        TagField::Artist => ItemKey::TrackArtist,
        TagField::Album => ItemKey::AlbumTitle,
        TagField::AlbumArtist => ItemKey::AlbumArtist,
        TagField::TrackNumber => ItemKey::TrackNumber,
        TagField::TrackTotal => ItemKey::TrackTotal,
        TagField::Year => ItemKey::RecordingDate,
        TagField::Genre => ItemKey::Genre,
        TagField::DiscNumber => ItemKey::DiscNumber,
    };
    tag.insert_text(key, value.to_string());
}

/// Writes a track's resolved metadata to its file.
pub trait TagWriter {
    fn write(&self, track: &TrackReference, tags: &TrackTags) -> TaggingResult<()>;
}

/// [`TagWriter`] backed by lofty, persisting each file as soon as it is mapped.
#[derive(Debug, Clone)]
pub struct LoftyTagWriter {
    cover_description: String,
}

impl LoftyTagWriter {
    pub fn new(cover_description: impl Into<String>) -> Self {
        Self {
            cover_description: cover_description.into(),
        }
    }
}

impl Default for LoftyTagWriter {
    fn default() -> Self {
        Self::new("Cover")
    }
}

impl TagWriter for LoftyTagWriter {
    #[instrument(skip(self, tags), fields(path = %track.path.display()))]
    fn write(&self, track: &TrackReference, tags: &TrackTags) -> TaggingResult<()> {
        let mut container = TagContainer::read(&track.path, track.format)?;

        for (field, value) in field_values(track.format, tags) {
            debug!(target: "tagging", key = field.key(track.format), value = %value, "set field");
            container.set_field(field, &value);
        }

        if let Some(cover) = &tags.cover_art {
            container.set_front_cover(cover.clone(), &self.cover_description);
        }

        container.save(&track.path)?;
        verify_persisted(&track.path, track.format)
    }
}

/// Re-read `path` and confirm the written tag block is visible.
///
/// Some FLAC layouts accept a save but leave the new comment block where
/// readers never reach it.
fn verify_persisted(path: &Path, format: AudioFormat) -> TaggingResult<()> {
    let tagged_file = Probe::open(path)
        .and_then(|probe| probe.read())
        .map_err(|source| TaggingError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    if tagged_file.tag(tag_type(format)).is_some() {
        Ok(())
    } else {
        warn!(target: "tagging", path = %path.display(), %format, "saved tags are not readable");
        Err(TaggingError::NotPersisted {
            path: path.to_path_buf(),
            format,
        })
    }
}
