pub mod agent;
pub mod config;
pub mod error;
pub mod featurizer;
pub mod food;
pub mod game;
pub mod log;
pub mod metrics;
pub mod network;
pub mod policy;
pub mod replay_buffer;
pub mod snake;
pub mod train;
pub mod utils;

pub use error::{Result, TrainError};
