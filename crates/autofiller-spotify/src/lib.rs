// SPDX-License-Identifier: GPL-3.0-or-later

//! Spotify Web API client for track and artist metadata.
//!
//! Covers the small read-only surface the autofiller needs: the
//! client-credentials token exchange, `/search` for tracks and artists,
//! and plain downloads of cover-art images.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;

pub use auth::Credentials;
pub use client::{SpotifyClient, SpotifyClientBuilder};
pub use error::{Result, SpotifyError};
pub use models::{
    Album, Artist, ArtistSearchResponse, Image, Page, SearchKind, SearchQuery, SimplifiedArtist,
    Track, TrackSearchResponse,
};
