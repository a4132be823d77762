//! stacks-node: entry point for a catalog process.
//!
//! Loads config, fills the catalog from the configured bulk-load file (or
//! a generated demo dataset), logs the top picks per genre, then keeps the
//! catalog decaying on an interval until Ctrl+C.

use rand::rngs::StdRng;
use rand::SeedableRng;
use stacks_catalog::{load_file, synth, Catalog};
use stacks_rank::service::{self, DecayTaskConfig};
use stacks_rank::DecayPolicy;
use tokio::time::Duration;

/// Records generated when no data file is configured.
const DEMO_DATASET_SIZE: usize = 100;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    stacks_metrics::init_tracing();

    // First CLI arg is the YAML config path
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "stacks.yaml".to_string());

    let config =
        stacks_config::load_from_file(std::path::Path::new(&config_path)).unwrap_or_else(|e| {
            tracing::warn!(
                "failed to load config from {}: {}, using defaults",
                config_path,
                e
            );
            stacks_config::NodeConfig::default()
        });

    let mut catalog = Catalog::with_limits(config.catalog.limits());
    match &config.data_file {
        Some(path) => {
            let report = load_file(&mut catalog, path)?;
            tracing::info!(
                "loaded {} record(s) from {:?} ({} skipped)",
                report.loaded,
                path,
                report.skipped
            );
        }
        None => {
            let mut rng = StdRng::from_entropy();
            for new in synth::generate(&mut rng, DEMO_DATASET_SIZE) {
                if let Err(e) = catalog.add(new) {
                    tracing::warn!("demo record rejected: {}", e);
                }
            }
            tracing::info!("no data_file configured, generated {} demo record(s)", catalog.len());
        }
    }
    tracing::info!(
        "catalog ready: {} record(s), max level {}",
        catalog.len(),
        catalog.max_level()
    );

    let catalog = service::shared(catalog);

    for genre in synth::GENRES {
        let picks = service::recommend(
            &catalog,
            genre,
            config.recommend.k,
            config.recommend.heap_capacity,
        )
        .await;
        if picks.is_empty() {
            continue;
        }
        let summary: Vec<String> = picks
            .iter()
            .map(|r| format!("{} ({})", r.title(), r.borrow_count))
            .collect();
        tracing::info!("top {}: {}", genre, summary.join(", "));
    }

    if let Some(metrics_addr) = config.metrics_addr {
        tokio::spawn(async move {
            if let Err(e) = stacks_metrics::serve_metrics(metrics_addr).await {
                tracing::warn!("metrics server failed: {}", e);
            }
        });
    }

    let decay_task = service::spawn_decay_task(
        catalog.clone(),
        DecayTaskConfig {
            interval: Duration::from_secs(config.decay.interval_secs),
            policy: DecayPolicy {
                rate: config.decay.rate,
                window_days: config.decay.window_days,
            },
            ..DecayTaskConfig::default()
        },
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("received Ctrl+C, shutting down");
    decay_task.abort();

    Ok(())
}
