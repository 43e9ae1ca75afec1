use hdrhistogram::Histogram;
use serde::Serialize;

/// Summary of one histogram: count, extremes, mean and the `QUANTILES`
/// markers. This is the shape each histogram takes in `/debug/vars`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileSet {
    pub count: u64,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub p50: u64,
    pub p99: u64,
}

impl PercentileSet {
    /// Summarise `hist`. Nothing recorded means every field is zero.
    pub fn from_histogram(hist: &Histogram<u64>) -> Self {
        if hist.len() == 0 {
            return Self::empty();
        }

        Self {
            count: hist.len(),
            min: hist.min(),
            max: hist.max(),
            mean: hist.mean(),
            p50: hist.value_at_percentile(50.0),
            p99: hist.value_at_percentile(99.0),
        }
    }

    pub fn empty() -> Self {
        Self {
            count: 0,
            min: 0,
            max: 0,
            mean: 0.0,
            p50: 0,
            p99: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_histogram_is_zeroed() {
        let hist = Histogram::<u64>::new_with_bounds(1, 1_000_000, 3).unwrap();
        let set = PercentileSet::from_histogram(&hist);
        assert_eq!(set, PercentileSet::empty());
        assert_eq!(set.count, 0);
    }

    #[test]
    fn test_small_values_are_exact() {
        let mut hist = Histogram::<u64>::new_with_bounds(1, 1_000_000, 3).unwrap();
        for v in 1..=100u64 {
            hist.record(v).unwrap();
        }
        let set = PercentileSet::from_histogram(&hist);
        assert_eq!(set.count, 100);
        assert_eq!(set.min, 1);
        assert_eq!(set.max, 100);
        assert_eq!(set.p50, 50);
        assert_eq!(set.p99, 99);
    }
}
