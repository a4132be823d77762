//! Book record format.

use serde::{Deserialize, Serialize};
use stacks_common::Status;
use std::fmt;

/// Stable handle of a record inside its catalog's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub(crate) usize);

impl RecordId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A book held by the catalog.
///
/// Circulation fields are public. The title and genres are fixed at
/// insertion and only readable from outside the crate:
///
/// ```compile_fail
/// let mut catalog = stacks_catalog::Catalog::new();
/// catalog.add_record("Alpha", "Anon", &["Fiction".to_string()], 0).unwrap();
/// catalog.find_record_mut("Alpha", "Fiction").unwrap().title = "Zulu".to_string();
/// ```
///
/// ```compile_fail
/// let mut catalog = stacks_catalog::Catalog::new();
/// catalog.add_record("Alpha", "Anon", &["Fiction".to_string()], 0).unwrap();
/// catalog.find_record_mut("Alpha", "Fiction").unwrap().genres.push("Extra".to_string());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// Ordering key. Compared byte-wise; fixed once spliced.
    pub(crate) title: String,
    pub author: String,
    /// Genre tags in insertion order; duplicates are kept. Validated
    /// against the catalog's limits at insertion and read-only after.
    pub(crate) genres: Vec<String>,
    /// Popularity score: +1 per borrow, decayed over time.
    pub borrow_count: u64,
    /// Seconds since the Unix epoch of the last successful borrow (0 = never).
    pub last_borrowed: u64,
    pub status: Status,
    /// Highest skip-list tier this record is linked into.
    #[serde(skip)]
    pub(crate) level: usize,
}

impl Record {
    /// Create an available, never-borrowed record. Its level is assigned
    /// when it is inserted into a catalog.
    pub fn new(title: String, author: String, genres: Vec<String>, borrow_count: u64) -> Self {
        Self {
            title,
            author,
            genres,
            borrow_count,
            last_borrowed: 0,
            status: Status::Available,
            level: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Whether any of this record's genres equals `genre` exactly.
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    pub fn is_available(&self) -> bool {
        self.status == Status::Available
    }
}

/// The fields a caller supplies to create a record: one line of the
/// bulk-load format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub title: String,
    pub author: String,
    pub genres: Vec<String>,
    pub borrow_count: u64,
}

impl NewRecord {
    pub fn new(title: &str, author: &str, genres: &[&str], borrow_count: u64) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            borrow_count,
        }
    }
}

/// Renders the bulk-load line `title,author,genre_1,...,genre_k,borrow_count`.
impl fmt::Display for NewRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.title, self.author)?;
        for genre in &self.genres {
            write!(f, ",{}", genre)?;
        }
        write!(f, ",{}", self.borrow_count)
    }
}

impl From<NewRecord> for Record {
    fn from(new: NewRecord) -> Self {
        Record::new(new.title, new.author, new.genres, new.borrow_count)
    }
}
