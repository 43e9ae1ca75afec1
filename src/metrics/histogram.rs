use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::percentiles::PercentileSet;
use super::{HIST_LOW, HIST_SIGFIG, MAX_OBSERVABLE};
use crate::error::Result;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a histogram handle. Two handles created with
/// the same name have different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HistogramId(u64);

impl HistogramId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for HistogramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// Handle to one named statistics engine.
///
/// Clones share the same engine and identity. Handles are only minted by
/// `Collector::new_histogram`, which also gives them a sample reservoir.
#[derive(Clone)]
pub struct Histogram {
    inner: Arc<Inner>,
}

struct Inner {
    id: HistogramId,
    name: String,
    engine: Mutex<hdrhistogram::Histogram<u64>>,
}

impl Histogram {
    pub(crate) fn new(name: &str) -> Result<Self> {
        let engine =
            hdrhistogram::Histogram::<u64>::new_with_bounds(HIST_LOW, MAX_OBSERVABLE, HIST_SIGFIG)?;
        Ok(Self {
            inner: Arc::new(Inner {
                id: HistogramId::next(),
                name: name.to_owned(),
                engine: Mutex::new(engine),
            }),
        })
    }

    pub fn id(&self) -> HistogramId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Record a duration into the engine only. No raw sample is retained.
    pub fn measure(&self, d: Duration) {
        self.observe(clamp(nanos(d)));
    }

    pub(crate) fn observe(&self, value: u64) {
        // cannot fail: callers clamp to the engine's upper bound
        let _ = self.inner.engine.lock().record(value);
    }

    pub fn percentiles(&self) -> PercentileSet {
        PercentileSet::from_histogram(&self.inner.engine.lock())
    }

    /// Number of recorded values equivalent to `value` at the engine's
    /// precision.
    pub fn count_at(&self, value: u64) -> u64 {
        self.inner.engine.lock().count_at(value)
    }

    /// Run `f` against the engine while holding its lock.
    pub fn with_engine<R>(&self, f: impl FnOnce(&hdrhistogram::Histogram<u64>) -> R) -> R {
        f(&self.inner.engine.lock())
    }
}

impl fmt::Debug for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Histogram")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .finish()
    }
}

/// Duration in nanoseconds, saturating at `u64::MAX`.
pub(crate) fn nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

pub(crate) fn clamp(ns: u64) -> u64 {
    ns.min(MAX_OBSERVABLE)
}
