//! # guess-collect
//!
//! Latency histograms with raw-sample retention for Guesstimate models.
//!
//! - `Collector` creates histogram handles and records observations
//! - each handle keeps the first 1000 raw samples beside its HdrHistogram
//! - distributions export to CSV, samples export to a Guesstimate space
//! - `server::serve` exposes live percentiles on `/debug/vars`
//!
//! ```
//! use std::time::Duration;
//! use guess_collect::{CollectConfig, Collector};
//!
//! let c = Collector::new(CollectConfig::enabled());
//! let h = c.new_histogram("demo.frontend.frontend00");
//! c.measure(h.as_ref(), Duration::from_micros(250));
//! assert_eq!(c.samples(h.as_ref().unwrap()).unwrap(), vec![250_000]);
//! ```

use std::sync::OnceLock;
use std::time::Duration;

use tracing::warn;

pub mod config;
pub mod error;
pub mod export;
pub mod metrics;
pub mod names;
pub mod server;
pub mod vars;

pub use config::CollectConfig;
pub use error::{Error, Result};
pub use metrics::{Collector, Histogram, HistogramId, MAX_OBSERVABLE, SAMPLE_COUNT};

static COLLECTOR: OnceLock<Collector> = OnceLock::new();

/// Install the process-wide collector. Only the first call takes effect;
/// later calls keep the installed collector and ignore `config`.
pub fn init(config: CollectConfig) -> &'static Collector {
    let mut installed = false;
    let collector = COLLECTOR.get_or_init(|| {
        installed = true;
        Collector::with_vars(config, vars::global().clone())
    });
    if !installed {
        warn!("collector already initialized, keeping existing config");
    }
    collector
}

/// The process-wide collector, disabled unless `init` ran first.
pub fn global() -> &'static Collector {
    COLLECTOR.get_or_init(|| Collector::with_vars(CollectConfig::default(), vars::global().clone()))
}

pub fn new_histogram(name: &str) -> Option<Histogram> {
    global().new_histogram(name)
}

pub fn measure(h: Option<&Histogram>, d: Duration) {
    global().measure(h, d)
}

pub fn save_distribution(h: Option<&Histogram>, name: &str, suffix: &str) {
    global().save_distribution(h, name, suffix)
}

pub fn save_all_samples(name: &str) {
    global().save_all_samples(name)
}

/// Time a block and measure it into a histogram on the global collector.
///
/// ```
/// let h = guess_collect::new_histogram("demo.work");
/// let sum = guess_collect::timed!(h.as_ref(), { (1..=10).sum::<u32>() });
/// assert_eq!(sum, 55);
/// ```
#[macro_export]
macro_rules! timed {
    ($hist:expr, $block:block) => {{
        let start = std::time::Instant::now();
        let result = $block;
        $crate::measure($hist, start.elapsed());
        result
    }};
}
