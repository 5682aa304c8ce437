//! Media catalog descriptors
//!
//! Every server route is scoped by a media path segment (`/games/...`,
//! `/books/...`). The display strings here match what the server renders.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Catalog selected by the `{media}` path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Games,
    Books,
    Movies,
    Tv,
}

impl MediaType {
    /// All media types in navigation order
    pub const ALL: [MediaType; 4] = [
        MediaType::Games,
        MediaType::Books,
        MediaType::Movies,
        MediaType::Tv,
    ];

    /// Path segment used in server URLs
    pub fn as_path_segment(&self) -> &'static str {
        match self {
            MediaType::Games => "games",
            MediaType::Books => "books",
            MediaType::Movies => "movies",
            MediaType::Tv => "tv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaType::Games => "Games",
            MediaType::Books => "Books",
            MediaType::Movies => "Movies",
            MediaType::Tv => "TV Shows",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            MediaType::Games => "Game",
            MediaType::Books => "Book",
            MediaType::Movies => "Movie",
            MediaType::Tv => "TV Show",
        }
    }

    /// Glyph shown in place of a missing cover image
    pub fn emoji(&self) -> &'static str {
        match self {
            MediaType::Games => "🎮",
            MediaType::Books => "📚",
            MediaType::Movies => "🎬",
            MediaType::Tv => "📺",
        }
    }

    /// Placeholder text for the search box
    pub fn search_hint(&self) -> &'static str {
        match self {
            MediaType::Games => "Search for a video game...",
            MediaType::Books => "Search for a book...",
            MediaType::Movies => "Search for a movie...",
            MediaType::Tv => "Search for a TV show...",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path_segment())
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::ALL
            .into_iter()
            .find(|m| m.as_path_segment().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown media type: {}", s)))
    }
}
