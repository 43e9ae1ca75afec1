use super::SAMPLE_COUNT;

/// The first `SAMPLE_COUNT` raw observations of one histogram, in arrival
/// order. Later observations are dropped.
#[derive(Debug, Clone, Default)]
pub(crate) struct Reservoir {
    samples: Vec<i64>,
}

impl Reservoir {
    pub(crate) fn new() -> Self {
        Self {
            samples: Vec::with_capacity(SAMPLE_COUNT),
        }
    }

    /// Append `value` unless the reservoir is full. Returns whether it was kept.
    pub(crate) fn offer(&mut self, value: i64) -> bool {
        if self.is_full() {
            return false;
        }
        self.samples.push(value);
        true
    }

    pub(crate) fn is_full(&self) -> bool {
        self.samples.len() >= SAMPLE_COUNT
    }

    pub(crate) fn as_slice(&self) -> &[i64] {
        &self.samples
    }
}
