use std::path::{Path, PathBuf};

use rand::rngs::StdRng;

use crate::agent::Agent;
use crate::config::AgentConfig;
use crate::error::Result;
use crate::featurizer::get_state;
use crate::game::{Environment, SnakeGame};
use crate::log;
use crate::metrics::{CsvPlot, EpisodeMetrics, MetricsSink};
use crate::network::{QFunction, QNet};
use crate::policy::{Dice, RngDice};

pub const MODEL_PATH: &str = "model/model.json";
pub const SCORES_PATH: &str = "scores.csv";

/// What happened at the end of one episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    pub game: u32,
    pub score: u32,
    pub record: u32,
    pub new_record: bool,
    pub samples: usize, // transitions used by the long-memory update
}

/// Drives one game and one agent through episodes, forever.
pub struct TrainingLoop<G, Q, D = RngDice<StdRng>, S = CsvPlot>
where
    G: Environment,
    Q: QFunction,
    D: Dice,
    S: MetricsSink,
{
    agent: Agent<Q, D>,
    game: G,
    metrics: EpisodeMetrics,
    sink: S,
    checkpoint: PathBuf,
}

impl<G, Q, D, S> TrainingLoop<G, Q, D, S>
where
    G: Environment,
    Q: QFunction,
    D: Dice,
    S: MetricsSink,
{
    pub fn new(agent: Agent<Q, D>, game: G, sink: S, checkpoint: impl Into<PathBuf>) -> Self {
        Self { agent, game, metrics: EpisodeMetrics::default(), sink, checkpoint: checkpoint.into() }
    }

    pub fn agent(&self) -> &Agent<Q, D> {
        &self.agent
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn metrics(&self) -> &EpisodeMetrics {
        &self.metrics
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn checkpoint_path(&self) -> &Path {
        &self.checkpoint
    }

    /// One environment step. Returns the summary when the step ended an episode.
    pub fn step(&mut self) -> Result<Option<EpisodeSummary>> {
        let state_old = get_state(&self.game);
        let mv = self.agent.get_action(&state_old);
        let out = self.game.play_step(mv);
        let state_new = get_state(&self.game);

        self.agent.train_short_memory(state_old, mv, out.reward, state_new, out.done);
        self.agent.remember(state_old, mv, out.reward, state_new, out.done);

        if !out.done {
            return Ok(None);
        }
        self.end_episode(out.score).map(Some)
    }

    fn end_episode(&mut self, score: u32) -> Result<EpisodeSummary> {
        self.game.reset();
        self.agent.finish_game();
        let game = self.agent.n_games();

        let (samples, loss) = self.agent.train_long_memory();
        log::scalar(u64::from(game), "loss", loss);

        let new_record = self.metrics.record_episode(score);
        if new_record {
            self.agent.model.save(&self.checkpoint)?;
            log::info(&format!("new record {score}, saved {}", self.checkpoint.display()));
        }
        log::episode(game, score, self.metrics.record);

        if let Err(e) = self.sink.plot(&self.metrics.scores, &self.metrics.mean_scores) {
            log::warn(&format!("metrics sink failed: {e}"));
        }

        Ok(EpisodeSummary { game, score, record: self.metrics.record, new_record, samples })
    }

    /// Runs until the process is interrupted or a fatal error occurs.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.step()?;
        }
    }
}

/// Zero-argument entry point: default hyper-parameters, default board.
pub fn train() -> Result<()> {
    let cfg = AgentConfig::default();
    log::info(&format!(
        "training: memory={} batch={} lr={} gamma={} hidden={}",
        cfg.buffer_capacity, cfg.batch_size, cfg.lr, cfg.gamma, cfg.hidden
    ));

    let model = QNet::new(&cfg);
    let agent = Agent::new(cfg, model)?;
    let game = SnakeGame::default();
    let mut trainer = TrainingLoop::new(agent, game, CsvPlot::new(SCORES_PATH), MODEL_PATH);
    trainer.run()
}
