use rand::Rng;

use crate::config::AgentConfig;
use crate::featurizer::StateVector;
use crate::network::QFunction;
use crate::snake::Move;
use crate::utils::argmax;

/// Source of uniform integer draws.
pub trait Dice {
    /// Uniform over `0..upper`.
    fn roll(&mut self, upper: u32) -> u32;
}

/// [`Dice`] backed by any `rand` generator.
pub struct RngDice<R: Rng>(pub R);

impl<R: Rng> Dice for RngDice<R> {
    fn roll(&mut self, upper: u32) -> u32 {
        self.0.gen_range(0..upper)
    }
}

/// Epsilon-greedy over the three relative moves.
///
/// `epsilon = explore_games - games_played` and is compared against a draw
/// from `0..range`. Epsilon is allowed to go negative: from game
/// `explore_games` on, no draw is below it and play is fully greedy.
#[derive(Debug, Clone, Copy)]
pub struct EpsilonGreedy {
    explore_games: i64,
    range: u32,
}

impl EpsilonGreedy {
    pub fn new(explore_games: i64, range: u32) -> Self {
        Self { explore_games, range }
    }

    pub fn from_config(cfg: &AgentConfig) -> Self {
        Self::new(cfg.explore_games, cfg.epsilon_range)
    }

    pub fn epsilon(&self, games_played: u32) -> i64 {
        self.explore_games - i64::from(games_played)
    }

    pub fn select_action<Q, D>(&self, state: &StateVector, games_played: u32, model: &Q, dice: &mut D) -> Move
    where
        Q: QFunction + ?Sized,
        D: Dice + ?Sized,
    {
        let r = i64::from(dice.roll(self.range));
        if r < self.epsilon(games_played) {
            return Move::from_index(dice.roll(Move::COUNT as u32) as usize);
        }
        Move::from_index(argmax(&model.predict(state)))
    }
}
