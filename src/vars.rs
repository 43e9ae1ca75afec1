//! Process-wide published variables, served on `/debug/vars`.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use serde::Serialize;

use crate::metrics::{Histogram, PercentileSet};

static GLOBAL: OnceLock<Arc<Vars>> = OnceLock::new();

/// The registry the debug listener serves unless told otherwise.
pub fn global() -> &'static Arc<Vars> {
    GLOBAL.get_or_init(|| Arc::new(Vars::new()))
}

/// Thread-safe counters, gauges and published histograms.
pub struct Vars {
    counters: RwLock<HashMap<String, Arc<AtomicU64>>>,
    gauges: RwLock<HashMap<String, Arc<AtomicI64>>>,
    histograms: RwLock<HashMap<String, Histogram>>,
}

/// Point-in-time view of every published variable.
#[derive(Debug, Clone, Serialize)]
pub struct VarsSnapshot {
    pub cmdline: Vec<String>,
    pub counters: BTreeMap<String, u64>,
    pub gauges: BTreeMap<String, i64>,
    pub histograms: BTreeMap<String, PercentileSet>,
}

impl Vars {
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
            gauges: RwLock::new(HashMap::new()),
            histograms: RwLock::new(HashMap::new()),
        }
    }

    /// Increment a counter, creating it on first use.
    pub fn counter(&self, name: &str, delta: u64) {
        let counters = self.counters.read();
        if let Some(c) = counters.get(name) {
            c.fetch_add(delta, Ordering::Relaxed);
            return;
        }
        drop(counters);

        let mut counters = self.counters.write();
        let c = counters
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(AtomicU64::new(0)));
        c.fetch_add(delta, Ordering::Relaxed);
    }

    /// Set a gauge, creating it on first use.
    pub fn gauge(&self, name: &str, value: i64) {
        let gauges = self.gauges.read();
        if let Some(g) = gauges.get(name) {
            g.store(value, Ordering::Relaxed);
            return;
        }
        drop(gauges);

        let mut gauges = self.gauges.write();
        let g = gauges
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(AtomicI64::new(0)));
        g.store(value, Ordering::Relaxed);
    }

    pub fn get_counter(&self, name: &str) -> Option<u64> {
        self.counters
            .read()
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
    }

    /// Expose a histogram's percentiles under its name. A later handle with
    /// the same name replaces the earlier one.
    pub fn publish_histogram(&self, h: &Histogram) {
        self.histograms
            .write()
            .insert(h.name().to_owned(), h.clone());
    }

    pub fn get_histogram(&self, name: &str) -> Option<PercentileSet> {
        self.histograms.read().get(name).map(Histogram::percentiles)
    }

    pub fn snapshot(&self) -> VarsSnapshot {
        VarsSnapshot {
            cmdline: std::env::args().collect(),
            counters: self
                .counters
                .read()
                .iter()
                .map(|(k, v)| (k.clone(), v.load(Ordering::Relaxed)))
                .collect(),
            gauges: self
                .gauges
                .read()
                .iter()
                .map(|(k, v)| (k.clone(), v.load(Ordering::Relaxed)))
                .collect(),
            histograms: self
                .histograms
                .read()
                .iter()
                .map(|(k, h)| (k.clone(), h.percentiles()))
                .collect(),
        }
    }
}

impl Default for Vars {
    fn default() -> Self {
        Self::new()
    }
}
