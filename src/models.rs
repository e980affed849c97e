//! Data structures for moviefinder
//!
//! Contains the shared models used across the application:
//! - **Search**: OMDb search results and result pages
//! - **Detail**: the full record for a single title

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder OMDb uses for absent fields
pub const NOT_AVAILABLE: &str = "N/A";

// =============================================================================
// Search Models
// =============================================================================

/// Media type discriminator (OMDb `Type` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
    Episode,
    Game,
}

impl MediaType {
    /// Parse an OMDb type string, `None` for anything unrecognised
    pub fn from_omdb(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Some(MediaType::Movie),
            "series" => Some(MediaType::Series),
            "episode" => Some(MediaType::Episode),
            "game" => Some(MediaType::Game),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "Movie"),
            MediaType::Series => write!(f, "Series"),
            MediaType::Episode => write!(f, "Episode"),
            MediaType::Game => write!(f, "Game"),
        }
    }
}

/// One entry of a title search. Identity key is `imdb_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub title: String,
    /// Kept as text: OMDb reports ranges such as "2008–2013" for series
    pub year: String,
    pub imdb_id: String,
    pub poster: Option<String>,
    pub media_type: Option<MediaType>,
}

impl fmt::Display for SearchResultItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.year)?;
        if let Some(media_type) = self.media_type {
            write!(f, " [{}]", media_type)?;
        }
        Ok(())
    }
}

/// A page of search results as returned by the remote service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub items: Vec<SearchResultItem>,
    pub total_results: Option<u32>,
}

// =============================================================================
// Detail Models
// =============================================================================

/// Full record for a single title.
///
/// Only produced for a remote success, so there is no response flag here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub imdb_id: String,
    pub title: Option<String>,
    pub year: Option<String>,
    pub rated: Option<String>,
    pub released: Option<String>,
    pub runtime: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub awards: Option<String>,
    pub poster: Option<String>,
    pub imdb_rating: Option<String>,
}

impl DetailRecord {
    /// Display title, falling back to the IMDb id
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.imdb_id)
    }

    /// Labelled descriptive fields that are present, in display order
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Year", &self.year),
            ("Rated", &self.rated),
            ("Released", &self.released),
            ("Runtime", &self.runtime),
            ("Genre", &self.genre),
            ("Director", &self.director),
            ("Writer", &self.writer),
            ("Actors", &self.actors),
            ("Language", &self.language),
            ("Country", &self.country),
            ("Awards", &self.awards),
            ("IMDb rating", &self.imdb_rating),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
        .collect()
    }
}

impl fmt::Display for DetailRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_title())?;
        if let Some(ref year) = self.year {
            write!(f, " ({})", year)?;
        }
        if let Some(ref rating) = self.imdb_rating {
            write!(f, " - ⭐ {}", rating)?;
        }
        Ok(())
    }
}

/// Normalise an optional OMDb string: blank and "N/A" become `None`
pub fn available(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && v != NOT_AVAILABLE
    })
}
