pub mod distribution;
pub mod guesstimate;
pub mod model;

pub use guesstimate::Guess;
pub use model::{GridWalk, GRID_CAPACITY, GRID_SEQ};
