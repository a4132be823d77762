//! Title + genre search over the skip list.
//!
//! The descent narrows to the level-0 predecessor of `query`, then scans
//! forward to the end of the list. A candidate matches when it carries the
//! required genre and either
//!
//! 1. its title starts with the whole query, or
//! 2. the byte of its title at offset `query.len()` is a space, or the title
//!    ends exactly there.
//!
//! Rule 2 does not compare the prefix itself, so a title that merely has a
//! word break (or its end) at the query's length also matches. The scan
//! never stops early on titles past the query. The first match in forward
//! order wins.

use crate::record::{Record, RecordId};
use crate::skiplist::SkipList;

/// Exact, case-sensitive genre predicate.
#[derive(Debug, Clone, Copy)]
pub struct GenreFilter<'a> {
    genre: &'a str,
}

impl<'a> GenreFilter<'a> {
    pub fn new(genre: &'a str) -> Self {
        Self { genre }
    }

    pub fn genre(&self) -> &'a str {
        self.genre
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.has_genre(self.genre)
    }
}

/// The title half of the match rule.
pub fn title_matches(candidate: &str, query: &str) -> bool {
    if candidate.starts_with(query) {
        return true;
    }
    match candidate.as_bytes().get(query.len()) {
        Some(&b) => b == b' ',
        None => candidate.len() == query.len(),
    }
}

/// Find the first record matching `query` within `filter`'s genre.
pub fn find(list: &SkipList, query: &str, filter: GenreFilter<'_>) -> Option<RecordId> {
    let mut cursor = list.next(list.predecessor(query), 0);
    while let Some(idx) = cursor {
        let id = RecordId(idx);
        if let Some(record) = list.get(id) {
            if title_matches(&record.title, query) && filter.matches(record) {
                return Some(id);
            }
        }
        cursor = list.next(Some(idx), 0);
    }
    None
}
