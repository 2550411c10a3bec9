use serde::{Deserialize, Serialize};
use std::default::Default;

/// Configuration of [`CatchEnv`](super::CatchEnv).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CatchEnvConfig {
    /// Number of stacked frames, height and width of the observation.
    pub shape: [usize; 3],

    /// Number of rows and columns of the game grid.
    pub grid: [usize; 2],

    /// Number of balls in an episode.
    pub balls: usize,
}

impl Default for CatchEnvConfig {
    fn default() -> Self {
        Self {
            shape: [4, 84, 84],
            grid: [12, 7],
            balls: 10,
        }
    }
}

impl CatchEnvConfig {
    /// Sets the shape of observations.
    pub fn shape(mut self, v: [usize; 3]) -> Self {
        self.shape = v;
        self
    }

    /// Sets the number of rows and columns of the grid.
    ///
    /// Each cell covers `height / rows` by `width / cols` pixels.
    pub fn grid(mut self, v: [usize; 2]) -> Self {
        self.grid = v;
        self
    }

    /// Sets the number of balls in an episode.
    pub fn balls(mut self, v: usize) -> Self {
        self.balls = v;
        self
    }
}
