//! stacks-common: shared types for the stacks project.
//!
//! Provides the field [`Limits`] every record is validated against, the
//! circulation [`Status`] of a record, the [`CatalogError`] taxonomy and a
//! couple of wall-clock helpers expressed in Unix seconds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of forward-link tiers in the skip list.
pub const MAX_LEVEL: usize = 16;

/// Seconds in one day, the unit decay is computed in.
pub const SECS_PER_DAY: u64 = 86_400;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Upper bounds on the owned string fields of a record.
///
/// All lengths are in bytes. A record that exceeds any bound is rejected
/// at insertion rather than truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub max_title_len: usize,
    pub max_author_len: usize,
    pub max_genre_len: usize,
    pub max_genres: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_title_len: 100,
            max_author_len: 50,
            max_genre_len: 30,
            max_genres: 10,
        }
    }
}

impl Limits {
    /// Check a candidate record's fields against these limits.
    pub fn check(&self, title: &str, author: &str, genres: &[String]) -> Result<(), CatalogError> {
        if title.is_empty() {
            return Err(CatalogError::MalformedInput("title must not be empty".into()));
        }
        if genres.is_empty() {
            return Err(CatalogError::MalformedInput(format!(
                "record '{}' has no genres",
                title
            )));
        }
        check_len(Field::Title, title.len(), self.max_title_len)?;
        check_len(Field::Author, author.len(), self.max_author_len)?;
        check_len(Field::Genres, genres.len(), self.max_genres)?;
        for genre in genres {
            check_len(Field::Genre, genre.len(), self.max_genre_len)?;
        }
        Ok(())
    }
}

fn check_len(field: Field, actual: usize, limit: usize) -> Result<(), CatalogError> {
    if actual > limit {
        return Err(CatalogError::CapacityExhausted {
            field,
            limit,
            actual,
        });
    }
    Ok(())
}

/// The bounded field that overflowed in a [`CatalogError::CapacityExhausted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Author,
    Genre,
    Genres,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Title => "title length",
            Field::Author => "author length",
            Field::Genre => "genre length",
            Field::Genres => "genre count",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Circulation state of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Available,
    Borrowed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Available => f.write_str("available"),
            Status::Borrowed => f.write_str("borrowed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("no record titled '{title}' in genre '{genre}'")]
    NotFound { title: String, genre: String },

    #[error("record '{title}' is {status}")]
    InvalidTransition { title: String, status: Status },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("{field} {actual} exceeds limit {limit}")]
    CapacityExhausted {
        field: Field,
        limit: usize,
        actual: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Current wall-clock time in whole seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Fractional days elapsed between `since` and `now`. Saturates at zero
/// when `now` is earlier than `since`.
pub fn elapsed_days(since: u64, now: u64) -> f64 {
    now.saturating_sub(since) as f64 / SECS_PER_DAY as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
