use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::{Duration, Instant};

use guess_collect::{timed, Collector, Histogram};

// ─── Public types ────────────────────────────────────────────────

/// A simulated service whose response times are modelled, not measured.
pub struct Endpoint {
    /// Dotted metric name, e.g. `demo.store.store00`
    pub name: String,
    pub histogram: Option<Histogram>,
    /// Typical response time in nanoseconds
    pub base_ns: u64,
}

impl Endpoint {
    pub fn new(collector: &Collector, name: String, base_ns: u64) -> Self {
        Self {
            histogram: collector.new_histogram(&name),
            name,
            base_ns,
        }
    }
}

// ─── Public entry point ──────────────────────────────────────────

/// Spawns `concurrency` Tokio tasks that feed observations into
/// `endpoints` until the deadline.
pub async fn run(
    collector: &'static Collector,
    endpoints: Arc<Vec<Endpoint>>,
    loop_hist: Option<Histogram>,
    concurrency: u32,
    duration_secs: u64,
) {
    let deadline = Instant::now() + Duration::from_secs(duration_secs);
    collector.vars().gauge("workers_active", i64::from(concurrency));

    let mut handles = Vec::with_capacity(concurrency as usize);

    for worker_id in 0..concurrency {
        let endpoints = endpoints.clone();
        let loop_hist = loop_hist.clone();

        handles.push(tokio::spawn(async move {
            worker(worker_id, collector, endpoints, loop_hist, deadline).await;
        }));
    }

    // Wait for all workers to finish
    for h in handles {
        let _ = h.await;
    }

    collector.vars().gauge("workers_active", 0);
}

// ─── Worker loop ─────────────────────────────────────────────────

async fn worker(
    id: u32,
    collector: &'static Collector,
    endpoints: Arc<Vec<Endpoint>>,
    loop_hist: Option<Histogram>,
    deadline: Instant,
) {
    // Each worker gets its own deterministic RNG seeded uniquely.
    let mut rng = StdRng::seed_from_u64(1000 + id as u64);

    while Instant::now() < deadline && !endpoints.is_empty() {
        let ep = &endpoints[rng.gen_range(0..endpoints.len())];

        // The loop body itself is real work and is timed for real
        let latency = timed!(loop_hist.as_ref(), { simulated_latency(&mut rng, ep.base_ns) });
        collector.measure(ep.histogram.as_ref(), latency);
        collector.vars().counter("observations", 1);

        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}

/// Base time with up to 50 % jitter; one call in a hundred is a slow
/// outlier well past the histogram ceiling.
fn simulated_latency(rng: &mut StdRng, base_ns: u64) -> Duration {
    let jitter = 1.0 + rng.gen::<f64>() * 0.5;
    let mut ns = (base_ns as f64 * jitter) as u64;
    if rng.gen_bool(0.01) {
        ns *= 20;
    }
    Duration::from_nanos(ns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_latency_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let ns = simulated_latency(&mut rng, 100_000).as_nanos() as u64;
            assert!(ns >= 100_000);
            assert!(ns <= 150_000 * 20);
        }
    }
}
