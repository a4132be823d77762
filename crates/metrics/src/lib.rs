//! Metrics and tracing setup for stacks.
//!
//! Provides a global [`CatalogMetrics`] singleton backed by the `prometheus`
//! crate, plus an optional lightweight HTTP server for Prometheus scraping.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::net::SocketAddr;
use std::sync::OnceLock;

// ────────────────────────── Tracing ──────────────────────────

/// Initialize the tracing subscriber with env-filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

// ────────────────────────── Prometheus metrics ──────────────────────────

static METRICS: OnceLock<CatalogMetrics> = OnceLock::new();

/// Retrieve (or lazily create) the global metrics singleton.
pub fn metrics() -> &'static CatalogMetrics {
    METRICS.get_or_init(CatalogMetrics::new)
}

/// All Prometheus metrics for a stacks catalog.
pub struct CatalogMetrics {
    pub registry: Registry,

    // ── Catalog ──
    pub records_inserted: IntCounter,
    pub inserts_rejected: IntCounter,
    pub searches: IntCounter,
    pub search_misses: IntCounter,

    // ── Circulation ──
    pub borrows: IntCounter,
    pub returns: IntCounter,
    /// Rejected transitions, by attempted operation.
    pub transitions_rejected: IntCounterVec,

    // ── Ranking ──
    pub decay_passes: IntCounter,
    pub recommendations: IntCounter,

    /// Operation latency, by operation.
    pub op_latency_secs: HistogramVec,
}

impl std::fmt::Debug for CatalogMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogMetrics").finish_non_exhaustive()
    }
}

const LATENCY_BUCKETS: &[f64] = &[0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.1];

fn counter(name: &str, help: &str) -> IntCounter {
    IntCounter::with_opts(Opts::new(name, help)).expect("valid counter opts")
}

impl CatalogMetrics {
    fn new() -> Self {
        let registry = Registry::new();

        let records_inserted = counter("stacks_records_inserted_total", "Records spliced into the catalog");
        let inserts_rejected = counter(
            "stacks_inserts_rejected_total",
            "Records rejected for malformed or oversized fields",
        );
        let searches = counter("stacks_searches_total", "Title/genre searches");
        let search_misses = counter("stacks_search_misses_total", "Searches that found nothing");
        let borrows = counter("stacks_borrows_total", "Successful borrows");
        let returns = counter("stacks_returns_total", "Successful returns");
        let transitions_rejected = IntCounterVec::new(
            Opts::new(
                "stacks_transitions_rejected_total",
                "Borrow/return attempts rejected, by operation",
            ),
            &["op"],
        )
        .expect("transitions_rejected counter vec");
        let decay_passes = counter("stacks_decay_passes_total", "Full-catalog decay passes");
        let recommendations = counter("stacks_recommendations_total", "Recommendation requests");

        let op_latency_secs = HistogramVec::new(
            HistogramOpts::new("stacks_op_latency_seconds", "Catalog operation latency in seconds")
                .buckets(LATENCY_BUCKETS.to_vec()),
            &["op"],
        )
        .expect("op_latency_secs histogram");

        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(records_inserted.clone()),
            Box::new(inserts_rejected.clone()),
            Box::new(searches.clone()),
            Box::new(search_misses.clone()),
            Box::new(borrows.clone()),
            Box::new(returns.clone()),
            Box::new(transitions_rejected.clone()),
            Box::new(decay_passes.clone()),
            Box::new(recommendations.clone()),
            Box::new(op_latency_secs.clone()),
        ];
        for collector in collectors {
            registry.register(collector).expect("register collector");
        }

        Self {
            registry,
            records_inserted,
            inserts_rejected,
            searches,
            search_misses,
            borrows,
            returns,
            transitions_rejected,
            decay_passes,
            recommendations,
            op_latency_secs,
        }
    }
}

/// Encode all registered metrics in Prometheus text exposition format.
pub fn encode_metrics() -> String {
    let m = metrics();
    let encoder = TextEncoder::new();
    let mut buf = Vec::new();
    encoder
        .encode(&m.registry.gather(), &mut buf)
        .expect("prometheus text encoding");
    String::from_utf8(buf).expect("prometheus output is valid UTF-8")
}

/// Start a latency timer for a catalog operation. Records on drop.
pub fn start_op_timer(op: &str) -> prometheus::HistogramTimer {
    metrics()
        .op_latency_secs
        .with_label_values(&[op])
        .start_timer()
}

// ────────────────────────── Metrics HTTP server ──────────────────────────

use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

async fn metrics_handler(
    _req: Request<hyper::body::Incoming>,
) -> Result<Response<Full<Bytes>>, std::convert::Infallible> {
    let body = encode_metrics();
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "text/plain; version=0.0.4; charset=utf-8")
        .body(Full::new(Bytes::from(body)))
        .expect("valid HTTP response"))
}

/// Serve Prometheus metrics on the given address (`GET /metrics`).
///
/// Runs until the listener fails. Call from a `tokio::spawn`.
pub async fn serve_metrics(
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("metrics server listening on http://{}/metrics", addr);

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        tokio::spawn(async move {
            if let Err(e) = http1::Builder::new()
                .serve_connection(io, service_fn(metrics_handler))
                .await
            {
                tracing::debug!("metrics connection error: {}", e);
            }
        });
    }
}

// ────────────────────────── Tests ──────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Histogram;

    #[test]
    fn test_metrics_init_and_increment() {
        let m = metrics();

        let before = m.borrows.get();
        m.borrows.inc();
        m.borrows.inc();
        assert_eq!(m.borrows.get(), before + 2);

        let rejected = m.transitions_rejected.with_label_values(&["borrow"]);
        let before = rejected.get();
        rejected.inc();
        assert_eq!(rejected.get(), before + 1);
    }

    #[test]
    fn test_encode_metrics_format() {
        metrics().decay_passes.inc();

        let output = encode_metrics();
        assert!(output.contains("stacks_records_inserted_total"));
        assert!(output.contains("stacks_decay_passes_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_op_timer_records_sample() {
        {
            let _timer = start_op_timer("test_timer_op");
        }
        let h: Histogram = metrics()
            .op_latency_secs
            .with_label_values(&["test_timer_op"]);
        assert_eq!(h.get_sample_count(), 1);
    }
}
