pub mod collector;
pub mod histogram;
pub mod percentiles;
mod reservoir;

pub use collector::Collector;
pub use histogram::{Histogram, HistogramId};
pub use percentiles::PercentileSet;
pub(crate) use reservoir::Reservoir;

// ─── Configuration ───────────────────────────────────────────────

/// Ceiling applied before a value reaches the histogram engine: 1 ms in ns.
pub const MAX_OBSERVABLE: u64 = 1_000_000;

/// Raw observations retained per histogram for model export.
pub const SAMPLE_COUNT: usize = 1000;

/// HdrHistogram range: 1 ns → `MAX_OBSERVABLE`, 3 significant figures
/// (one part in 1000 resolution).
pub const HIST_LOW: u64 = 1;
pub const HIST_SIGFIG: u8 = 3;

/// Percentile markers tracked for every histogram.
pub const QUANTILES: [u8; 2] = [50, 99];
