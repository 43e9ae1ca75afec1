use tracing::debug;

use super::guesstimate::{
    Guess, GuessGraph, GuessMetric, GuessMetricLocation, GuessModel, Guesstimate,
};

/// Row and column symbols. Index 0 is unused so positions start at 1.
pub const GRID_SEQ: [&str; 25] = [
    "", "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "X",
];

/// Metrics that fit on the canvas; the rest are left out of the model.
pub const GRID_CAPACITY: usize = (GRID_SEQ.len() - 1) * (GRID_SEQ.len() - 1);

pub const DESCRIPTION: &str = "Guesstimate generated by guess-collect";

/// Walk over the canvas: rows 1..=24 of column 1, then
/// column 2, and so on until the last column is filled.
#[derive(Debug, Clone)]
pub struct GridWalk {
    row: usize,
    col: usize,
}

impl GridWalk {
    pub fn new() -> Self {
        Self { row: 1, col: 1 }
    }
}

impl Default for GridWalk {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for GridWalk {
    type Item = GuessMetricLocation;

    fn next(&mut self) -> Option<Self::Item> {
        if self.col >= GRID_SEQ.len() {
            return None;
        }
        let loc = GuessMetricLocation {
            row: self.row,
            col: self.col,
        };
        self.row += 1;
        if self.row >= GRID_SEQ.len() {
            self.row = 1;
            self.col += 1;
        }
        Some(loc)
    }
}

/// Two-letter node id, row symbol first.
pub fn grid_id(loc: GuessMetricLocation) -> String {
    format!("{}{}", GRID_SEQ[loc.row], GRID_SEQ[loc.col])
}

/// Lay out `series` (metric name, raw samples) on the grid in the order
/// given. Series beyond `GRID_CAPACITY` are dropped.
pub fn build<I>(name: &str, series: I) -> Guess
where
    I: IntoIterator<Item = (String, Vec<i64>)>,
{
    let series = series.into_iter();
    let hint = series.size_hint().0.min(GRID_CAPACITY);
    let mut graph = GuessGraph {
        metrics: Vec::with_capacity(hint),
        guesstimates: Vec::with_capacity(hint),
    };

    let mut dropped = 0usize;
    let mut grid = GridWalk::new();
    for (metric, data) in series {
        let Some(location) = grid.next() else {
            dropped += 1;
            continue;
        };
        let id = grid_id(location);
        graph.metrics.push(GuessMetric {
            id: id.clone(),
            readable_id: id.clone(),
            name: metric,
            location,
        });
        graph.guesstimates.push(Guesstimate {
            metric: id,
            input: String::new(),
            guesstimate_type: "DATA".into(),
            data,
        });
    }
    if dropped > 0 {
        debug!(dropped, capacity = GRID_CAPACITY, "model grid full");
    }

    Guess {
        space: GuessModel {
            name: name.to_owned(),
            description: DESCRIPTION.into(),
            is_private: "true".into(),
            graph,
        },
    }
}
