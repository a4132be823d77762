//! The catalog: a validated, instrumented front over the skip list.
//!
//! All mutation goes through `&mut self`; callers that share a catalog
//! across tasks wrap it in a lock (see `stacks-rank::service`).

use crate::lifecycle;
use crate::record::{NewRecord, Record, RecordId};
use crate::search::{self, GenreFilter};
use crate::skiplist::{Iter, SkipList};
use rand::rngs::StdRng;
use stacks_common::{CatalogError, Limits};
use stacks_metrics::metrics;
use std::io::Write;

#[derive(Debug, Default)]
pub struct Catalog {
    list: SkipList,
    limits: Limits,
}

impl Catalog {
    /// Empty catalog with default field limits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            list: SkipList::new(),
            limits,
        }
    }

    /// Catalog whose skip heights come from `rng`.
    pub fn with_rng(limits: Limits, rng: StdRng) -> Self {
        Self {
            list: SkipList::with_rng(rng),
            limits,
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn max_level(&self) -> usize {
        self.list.max_level()
    }

    /// The underlying index, for per-level inspection.
    pub fn index(&self) -> &SkipList {
        &self.list
    }

    /// Validate and insert a record. Fails only when a field is empty or
    /// exceeds the catalog's limits; the index is untouched in that case.
    pub fn add_record(
        &mut self,
        title: &str,
        author: &str,
        genres: &[String],
        initial_borrow_count: u64,
    ) -> Result<RecordId, CatalogError> {
        self.add(NewRecord {
            title: title.to_string(),
            author: author.to_string(),
            genres: genres.to_vec(),
            borrow_count: initial_borrow_count,
        })
    }

    /// Owned-input variant of [`Catalog::add_record`].
    pub fn add(&mut self, new: NewRecord) -> Result<RecordId, CatalogError> {
        let _timer = stacks_metrics::start_op_timer("insert");
        if let Err(e) = self.limits.check(&new.title, &new.author, &new.genres) {
            metrics().inserts_rejected.inc();
            tracing::debug!("rejected record '{}': {}", new.title, e);
            return Err(e);
        }
        let id = self.list.insert(new.into());
        metrics().records_inserted.inc();
        if let Some(record) = self.list.get(id) {
            tracing::debug!("inserted '{}' at level {}", record.title, record.level());
        }
        Ok(id)
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.list.get(id)
    }

    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        self.list.get_mut(id)
    }

    /// Locate a record by title within a genre.
    pub fn find_id(&self, title: &str, genre: &str) -> Option<RecordId> {
        let _timer = stacks_metrics::start_op_timer("search");
        metrics().searches.inc();
        let found = search::find(&self.list, title, GenreFilter::new(genre));
        if found.is_none() {
            metrics().search_misses.inc();
        }
        found
    }

    pub fn find_record(&self, title: &str, genre: &str) -> Option<&Record> {
        self.find_id(title, genre).and_then(|id| self.list.get(id))
    }

    pub fn find_record_mut(&mut self, title: &str, genre: &str) -> Option<&mut Record> {
        let id = self.find_id(title, genre)?;
        self.list.get_mut(id)
    }

    /// Borrow the record found by `title` in `genre` at `now`.
    pub fn borrow(&mut self, title: &str, genre: &str, now: u64) -> Result<&Record, CatalogError> {
        let record = match self.find_record_mut(title, genre) {
            Some(record) => record,
            None => {
                metrics()
                    .transitions_rejected
                    .with_label_values(&["borrow"])
                    .inc();
                return Err(not_found(title, genre));
            }
        };
        match lifecycle::borrow(record, now) {
            Ok(()) => {
                metrics().borrows.inc();
                tracing::debug!("borrowed '{}' (count {})", record.title, record.borrow_count);
                Ok(&*record)
            }
            Err(e) => {
                metrics()
                    .transitions_rejected
                    .with_label_values(&["borrow"])
                    .inc();
                Err(e)
            }
        }
    }

    /// Return the record found by `title` in `genre`.
    pub fn return_item(&mut self, title: &str, genre: &str) -> Result<&Record, CatalogError> {
        let record = match self.find_record_mut(title, genre) {
            Some(record) => record,
            None => {
                metrics()
                    .transitions_rejected
                    .with_label_values(&["return"])
                    .inc();
                return Err(not_found(title, genre));
            }
        };
        match lifecycle::return_item(record) {
            Ok(()) => {
                metrics().returns.inc();
                tracing::debug!("returned '{}'", record.title);
                Ok(&*record)
            }
            Err(e) => {
                metrics()
                    .transitions_rejected
                    .with_label_values(&["return"])
                    .inc();
                Err(e)
            }
        }
    }

    /// Level-0 traversal in title order.
    pub fn iter(&self) -> Iter<'_> {
        self.list.iter()
    }

    pub fn for_each_record<F: FnMut(&Record)>(&self, mut visit: F) {
        for (_, record) in self.list.iter() {
            visit(record);
        }
    }

    pub fn for_each_record_mut<F: FnMut(&mut Record)>(&mut self, visit: F) {
        self.list.for_each_mut(visit);
    }

    /// Write every record as one JSON object per line, in title order.
    pub fn export_json<W: Write>(&self, mut out: W) -> Result<usize, CatalogError> {
        let mut written = 0;
        for (_, record) in self.list.iter() {
            serde_json::to_writer(&mut out, record).map_err(std::io::Error::from)?;
            out.write_all(b"\n")?;
            written += 1;
        }
        out.flush()?;
        Ok(written)
    }
}

fn not_found(title: &str, genre: &str) -> CatalogError {
    CatalogError::NotFound {
        title: title.to_string(),
        genre: genre.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
