//! Book catalog for stacks: a skip list ordered by title.
//!
//! Records are `{title, author, genres, borrow_count, last_borrowed, status}`.
//! The skip list gives expected O(log n) insert and search; the search
//! narrows by title then filters by genre with a prefix/word-gap rule.
//! Borrow/return transitions and the bulk-load text format live here too.

pub mod catalog;
pub mod lifecycle;
pub mod loader;
pub mod record;
pub mod search;
pub mod skiplist;
pub mod synth;

pub use catalog::Catalog;
pub use lifecycle::{borrow, return_item};
pub use loader::{load_file, load_reader, LoadReport};
pub use record::{NewRecord, Record, RecordId};
pub use search::GenreFilter;
pub use skiplist::SkipList;
pub use stacks_common::{CatalogError, Limits, Status, MAX_LEVEL};
