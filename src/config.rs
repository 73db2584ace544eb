use serde::{Deserialize, Serialize};

use crate::error::{Result, TrainError};

// Hyper-parameters
pub const MAX_MEMORY: usize = 100_000;
pub const BATCH_SIZE: usize = 1000;
pub const LR: f32 = 0.001;
pub const GAMMA: f32 = 0.9;
pub const HIDDEN: usize = 256;
/// Games after which epsilon reaches zero.
pub const EXPLORE_GAMES: i64 = 50;
/// Exclusive upper bound of the exploration draw.
pub const EPSILON_RANGE: u32 = 200;

/// Hyper-parameters for the agent and its network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub buffer_capacity: usize, // replay buffer capacity
    pub batch_size: usize,      // long-memory sample size
    pub hidden: usize,          // hidden layer width
    pub lr: f32,                // Adam learning rate
    pub gamma: f32,             // discount factor
    pub explore_games: i64,     // epsilon = explore_games - n_games
    pub epsilon_range: u32,     // draw is uniform over 0..epsilon_range
    pub seed: u64,              // weight init + replay sampling
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: MAX_MEMORY,
            batch_size: BATCH_SIZE,
            hidden: HIDDEN,
            lr: LR,
            gamma: GAMMA,
            explore_games: EXPLORE_GAMES,
            epsilon_range: EPSILON_RANGE,
            seed: 0x5EED_5A4E,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.buffer_capacity == 0 {
            return Err(TrainError::Config("buffer_capacity must be > 0".into()));
        }
        if self.batch_size == 0 {
            return Err(TrainError::Config("batch_size must be > 0".into()));
        }
        if self.hidden == 0 {
            return Err(TrainError::Config("hidden must be > 0".into()));
        }
        if !(self.lr > 0.0 && self.lr.is_finite()) {
            return Err(TrainError::Config(format!("lr must be > 0 (got {})", self.lr)));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(TrainError::Config(format!("gamma must be in [0, 1] (got {})", self.gamma)));
        }
        if self.epsilon_range == 0 {
            return Err(TrainError::Config("epsilon_range must be > 0".into()));
        }
        Ok(())
    }
}
