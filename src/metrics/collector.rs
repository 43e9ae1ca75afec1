use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, error, info};

use super::histogram::{clamp, nanos};
use super::{Histogram, HistogramId, Reservoir};
use crate::config::CollectConfig;
use crate::error::{Error, Result};
use crate::export::{distribution, guesstimate, model, Guess};
use crate::names;
use crate::vars::Vars;

// ─── Public types ────────────────────────────────────────────────

/// Thread-safe collection engine.
/// Call sites `measure()` into handles, exports read a snapshot.
pub struct Collector {
    config: CollectConfig,
    vars: Arc<Vars>,
    inner: Mutex<Inner>,
}

// ─── Internal state ──────────────────────────────────────────────

struct Inner {
    // One raw sample buffer per handle, keyed by handle identity
    reservoirs: HashMap<HistogramId, Entry>,
}

struct Entry {
    histogram: Histogram,
    samples: Reservoir,
}

// ─── Collector impl ──────────────────────────────────────────────

impl Collector {
    pub fn new(config: CollectConfig) -> Self {
        Self::with_vars(config, Arc::new(Vars::new()))
    }

    /// Build a collector that publishes its histograms into `vars`.
    pub fn with_vars(config: CollectConfig, vars: Arc<Vars>) -> Self {
        Self {
            config,
            vars,
            inner: Mutex::new(Inner {
                reservoirs: HashMap::new(),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.collect
    }

    pub fn config(&self) -> &CollectConfig {
        &self.config
    }

    pub fn vars(&self) -> &Arc<Vars> {
        &self.vars
    }

    /// Create a histogram with its own sample reservoir.
    ///
    /// Returns `None` when collection is off or `name` is empty; every other
    /// operation accepts `None` and does nothing. Names are not deduplicated:
    /// each call yields an independent handle.
    pub fn new_histogram(&self, name: &str) -> Option<Histogram> {
        if name.is_empty() || !self.is_enabled() {
            return None;
        }
        let histogram = match Histogram::new(name) {
            Ok(h) => h,
            Err(e) => {
                error!(histogram = name, error = %e, "cannot create histogram");
                return None;
            }
        };

        self.inner.lock().reservoirs.insert(
            histogram.id(),
            Entry {
                histogram: histogram.clone(),
                samples: Reservoir::new(),
            },
        );
        self.vars.publish_histogram(&histogram);
        debug!(histogram = name, id = %histogram.id(), "histogram created");
        Some(histogram)
    }

    /// Record one observation. Never fails.
    ///
    /// The engine sees the duration capped at `MAX_OBSERVABLE`; the
    /// reservoir keeps the original nanoseconds until it is full.
    pub fn measure(&self, h: Option<&Histogram>, d: Duration) {
        let Some(h) = h else { return };
        if !self.is_enabled() {
            return;
        }
        let ns = nanos(d);
        h.observe(clamp(ns));

        let mut inner = self.inner.lock();
        if let Some(entry) = inner.reservoirs.get_mut(&h.id()) {
            entry.samples.offer(i64::try_from(ns).unwrap_or(i64::MAX));
        }
    }

    /// Copy of the raw samples retained for `h`, if this collector owns it.
    pub fn samples(&self, h: &Histogram) -> Option<Vec<i64>> {
        self.inner
            .lock()
            .reservoirs
            .get(&h.id())
            .map(|e| e.samples.as_slice().to_vec())
    }

    /// Number of histograms with a reservoir.
    pub fn histogram_count(&self) -> usize {
        self.inner.lock().reservoirs.len()
    }

    // ── Distribution export ─────────────────────────────────────

    /// `<csv_dir>/<arch>_<machine><suffix>.csv`
    pub fn distribution_path(&self, name: &str, suffix: &str) -> PathBuf {
        self.config.csv_dir.join(format!(
            "{}_{}{}.csv",
            names::arch(name),
            names::machine(name),
            suffix
        ))
    }

    /// Render `h` into its distribution file, returning the path written.
    pub fn write_distribution(&self, h: &Histogram, name: &str, suffix: &str) -> Result<PathBuf> {
        let path = self.distribution_path(name, suffix);
        let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
        let mut w = BufWriter::new(file);
        distribution::render(&mut w, h)
            .and_then(|()| w.flush())
            .map_err(|e| Error::io(&path, e))?;
        Ok(path)
    }

    /// Save `h`'s distribution. Failures are logged and otherwise ignored.
    pub fn save_distribution(&self, h: Option<&Histogram>, name: &str, suffix: &str) {
        let Some(h) = h else { return };
        if !self.is_enabled() {
            return;
        }
        if let Err(e) = self.write_distribution(h, name, suffix) {
            error!(histogram = name, error = %e, "cannot save distribution");
        }
    }

    // ── Model export ────────────────────────────────────────────

    /// Build the Guesstimate model from a snapshot of every reservoir.
    /// `None` when there is nothing to export.
    pub fn model(&self, name: &str) -> Option<Guess> {
        if !self.is_enabled() {
            return None;
        }
        // Copy under the lock so the document never sees a half-applied measure
        let series: Vec<(String, Vec<i64>)> = {
            let inner = self.inner.lock();
            if inner.reservoirs.is_empty() {
                return None;
            }
            inner
                .reservoirs
                .values()
                .map(|e| (e.histogram.name().to_owned(), e.samples.as_slice().to_vec()))
                .collect()
        };
        info!(count = series.len(), "saving histograms for Guesstimate");
        Some(model::build(names::arch(name), series))
    }

    /// Persist the model to `<json_dir>/<arch>.json`.
    /// `Ok(None)` when there was nothing to export.
    pub fn write_all_samples(&self, name: &str) -> Result<Option<PathBuf>> {
        let Some(doc) = self.model(name) else {
            return Ok(None);
        };
        let prefix = self.config.json_dir.join(names::arch(name));
        guesstimate::save(&doc, &prefix).map(Some)
    }

    /// Save the model. Failures are logged and otherwise ignored.
    pub fn save_all_samples(&self, name: &str) {
        if let Err(e) = self.write_all_samples(name) {
            error!(model = name, error = %e, "cannot save samples");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────
