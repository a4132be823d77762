//! Shared catalog handle and the background decay task.
//!
//! The catalog itself is single-threaded. Sharing it means one
//! `RwLock`: insert, borrow, return and decay take the write lock because
//! splicing touches several tiers at once; search, recommend and export
//! take the read lock.

use crate::decay::{decay_all_with, DecayPolicy, DecayReport};
use crate::recommend::recommend_with_capacity;
use stacks_catalog::{Catalog, CatalogError, NewRecord, Record, RecordId};
use stacks_common::unix_now;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{interval, Duration};

pub type SharedCatalog = Arc<RwLock<Catalog>>;

pub fn shared(catalog: Catalog) -> SharedCatalog {
    Arc::new(RwLock::new(catalog))
}

/// Configuration for the background decay task.
#[derive(Debug, Clone)]
pub struct DecayTaskConfig {
    /// How often to run a decay pass.
    pub interval: Duration,
    pub policy: DecayPolicy,
    /// Source of "now" in Unix seconds.
    pub clock: fn() -> u64,
}

impl Default for DecayTaskConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(86_400),
            policy: DecayPolicy::default(),
            clock: unix_now,
        }
    }
}

/// Spawn the periodic decay task. The first pass runs immediately.
///
/// Returns a `JoinHandle`; abort it to stop decaying.
#[allow(clippy::needless_pass_by_value)] // config is moved into the spawned task
pub fn spawn_decay_task(
    catalog: SharedCatalog,
    config: DecayTaskConfig,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = interval(config.interval);
        loop {
            tick.tick().await;
            run_decay_pass(&catalog, &config.policy, (config.clock)()).await;
        }
    })
}

/// One decay pass under the write lock.
pub async fn run_decay_pass(
    catalog: &SharedCatalog,
    policy: &DecayPolicy,
    now: u64,
) -> DecayReport {
    let mut guard = catalog.write().await;
    decay_all_with(&mut guard, now, policy)
}

pub async fn add(catalog: &SharedCatalog, new: NewRecord) -> Result<RecordId, CatalogError> {
    catalog.write().await.add(new)
}

/// Borrow under the write lock; returns a snapshot of the updated record.
pub async fn borrow(
    catalog: &SharedCatalog,
    title: &str,
    genre: &str,
    now: u64,
) -> Result<Record, CatalogError> {
    let mut guard = catalog.write().await;
    guard.borrow(title, genre, now).cloned()
}

pub async fn return_item(
    catalog: &SharedCatalog,
    title: &str,
    genre: &str,
) -> Result<Record, CatalogError> {
    let mut guard = catalog.write().await;
    guard.return_item(title, genre).cloned()
}

pub async fn find(catalog: &SharedCatalog, title: &str, genre: &str) -> Option<Record> {
    catalog.read().await.find_record(title, genre).cloned()
}

/// Recommendation snapshot under the read lock.
pub async fn recommend(
    catalog: &SharedCatalog,
    genre: &str,
    k: usize,
    heap_capacity: usize,
) -> Vec<Record> {
    let guard = catalog.read().await;
    let picked: Vec<Record> = recommend_with_capacity(&guard, genre, k, heap_capacity)
        .into_iter()
        .cloned()
        .collect();
    picked
}
