//! Per-genre recommendations ranked by borrow count.

use crate::topk::TopK;
use stacks_catalog::{Catalog, GenreFilter, Record};
use stacks_metrics::metrics;

/// Default storage bound of the selection heap.
pub const DEFAULT_HEAP_CAPACITY: usize = 100;

/// Up to `k` records of `genre` with the highest borrow counts, plus every
/// record tied with the last one, in descending borrow-count order.
pub fn recommend<'a>(catalog: &'a Catalog, genre: &str, k: usize) -> Vec<&'a Record> {
    recommend_with_capacity(catalog, genre, k, DEFAULT_HEAP_CAPACITY)
}

/// As [`recommend`], with an explicit heap storage bound. The bound used
/// is never below `k`.
pub fn recommend_with_capacity<'a>(
    catalog: &'a Catalog,
    genre: &str,
    k: usize,
    heap_capacity: usize,
) -> Vec<&'a Record> {
    let _timer = stacks_metrics::start_op_timer("recommend");
    metrics().recommendations.inc();

    let filter = GenreFilter::new(genre);
    let mut selector = TopK::with_capacity(heap_capacity.max(k));
    let mut candidates = 0usize;
    for (_, record) in catalog.iter() {
        if filter.matches(record) {
            candidates += 1;
            selector.offer(record.borrow_count, record);
        }
    }

    let picked: Vec<&Record> = selector
        .into_sorted(k)
        .into_iter()
        .map(|(_, record)| record)
        .collect();
    tracing::debug!(
        "recommend '{}': {} candidate(s), {} picked (k={})",
        genre,
        candidates,
        picked.len(),
        k
    );
    picked
}
