//! Agent: policy, replay memory and the short/long memory update cycle.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::AgentConfig;
use crate::error::Result;
use crate::featurizer::StateVector;
use crate::network::{QFunction, TrainBatch};
use crate::policy::{Dice, EpsilonGreedy, RngDice};
use crate::replay_buffer::{ReplayBuffer, Transition};
use crate::snake::Move;

pub struct Agent<Q: QFunction, D: Dice = RngDice<StdRng>> {
    cfg: AgentConfig,
    pub model: Q,
    memory: ReplayBuffer,
    policy: EpsilonGreedy,
    dice: D,          // exploration draws
    sample_rng: StdRng, // long-memory sampling
    n_games: u32,
}

impl<Q: QFunction> Agent<Q> {
    /// Agent with seeded `rand` generators for exploration and sampling.
    pub fn new(cfg: AgentConfig, model: Q) -> Result<Self> {
        let dice = RngDice(StdRng::seed_from_u64(cfg.seed ^ 0xA5A5_5A5A));
        Self::with_dice(cfg, model, dice)
    }
}

impl<Q: QFunction, D: Dice> Agent<Q, D> {
    pub fn with_dice(cfg: AgentConfig, model: Q, dice: D) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            memory: ReplayBuffer::new(cfg.buffer_capacity)?,
            policy: EpsilonGreedy::from_config(&cfg),
            sample_rng: StdRng::seed_from_u64(cfg.seed ^ 0xDEAD_BEEF),
            dice,
            model,
            n_games: 0,
            cfg,
        })
    }

    pub fn n_games(&self) -> u32 {
        self.n_games
    }

    /// Current exploration threshold, derived from games played.
    pub fn epsilon(&self) -> i64 {
        self.policy.epsilon(self.n_games)
    }

    pub fn memory(&self) -> &ReplayBuffer {
        &self.memory
    }

    /// Called once per finished episode.
    pub fn finish_game(&mut self) {
        self.n_games += 1;
    }

    pub fn get_action(&mut self, state: &StateVector) -> Move {
        self.policy.select_action(state, self.n_games, &self.model, &mut self.dice)
    }

    pub fn remember(&mut self, state: StateVector, action: Move, reward: f32, next_state: StateVector, done: bool) {
        self.memory.push(Transition { state, action, reward, next_state, done });
    }

    /// Online update on the latest step. Returns the loss.
    pub fn train_short_memory(
        &mut self,
        state: StateVector,
        action: Move,
        reward: f32,
        next_state: StateVector,
        done: bool,
    ) -> f32 {
        self.model.train_step(&TrainBatch::single(state, action, reward, next_state, done))
    }

    /// Batched update on up to `batch_size` transitions drawn from memory.
    /// Returns how many transitions went into the update and its loss.
    pub fn train_long_memory(&mut self) -> (usize, f32) {
        if self.memory.is_empty() {
            return (0, 0.0);
        }
        let sample = self.memory.sample(self.cfg.batch_size, &mut self.sample_rng);
        let batch = TrainBatch::from_transitions(&sample);
        let loss = self.model.train_step(&batch);
        (batch.len(), loss)
    }
}
