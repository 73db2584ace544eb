//! Q-value approximator: a one-hidden-layer MLP trained with Adam on Q-learning targets.

use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::AgentConfig;
use crate::error::Result;
use crate::featurizer::{STATE_LEN, StateVector};
use crate::log;
use crate::replay_buffer::Transition;
use crate::snake::Move;
use crate::utils::{argmax, has_non_finite};

pub type QValues = [f32; Move::COUNT];

/// Five parallel sequences of equal length. A single step is a batch of one.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TrainBatch {
    pub states: Vec<StateVector>,
    pub actions: Vec<[f32; Move::COUNT]>,
    pub rewards: Vec<f32>,
    pub next_states: Vec<StateVector>,
    pub dones: Vec<bool>,
}

impl TrainBatch {
    pub fn single(state: StateVector, action: Move, reward: f32, next_state: StateVector, done: bool) -> Self {
        Self {
            states: vec![state],
            actions: vec![action.one_hot()],
            rewards: vec![reward],
            next_states: vec![next_state],
            dones: vec![done],
        }
    }

    /// Transposes a list of transitions into column form.
    pub fn from_transitions(transitions: &[Transition]) -> Self {
        let n = transitions.len();
        let mut batch = Self {
            states: Vec::with_capacity(n),
            actions: Vec::with_capacity(n),
            rewards: Vec::with_capacity(n),
            next_states: Vec::with_capacity(n),
            dones: Vec::with_capacity(n),
        };
        for t in transitions {
            batch.states.push(t.state);
            batch.actions.push(t.action.one_hot());
            batch.rewards.push(t.reward);
            batch.next_states.push(t.next_state);
            batch.dones.push(t.done);
        }
        batch
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// What the agent needs from its function approximator.
pub trait QFunction {
    /// Action-value estimates for one state.
    fn predict(&self, state: &StateVector) -> QValues;
    /// One optimizer step on the batch. Returns the batch loss.
    fn train_step(&mut self, batch: &TrainBatch) -> f32;
    /// Persist the weights.
    fn save(&self, path: &Path) -> Result<()>;
}

/// Adam first/second moment for one parameter tensor.
#[derive(Clone, Default)]
struct Moments {
    m: Vec<f32>,
    v: Vec<f32>,
}

impl Moments {
    fn zeros(n: usize) -> Self {
        Self { m: vec![0.0; n], v: vec![0.0; n] }
    }
}

/// Weights as written to disk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QNetWeights {
    pub input: usize,
    pub hidden: usize,
    pub output: usize,
    pub w1: Vec<f32>, // hidden x input, row-major
    pub b1: Vec<f32>,
    pub w2: Vec<f32>, // output x hidden, row-major
    pub b2: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
struct Checkpoint {
    config: AgentConfig,
    weights: QNetWeights,
}

pub struct QNet {
    cfg: AgentConfig,
    net: QNetWeights,
    adam: [Moments; 4], // w1, b1, w2, b2
    t: i32,             // Adam step counter
}

impl QNet {
    pub fn new(cfg: &AgentConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let (input, hidden, output) = (STATE_LEN, cfg.hidden, Move::COUNT);

        // U(-1/sqrt(fan_in), 1/sqrt(fan_in)) for weights and biases
        let mut uniform = |n: usize, fan_in: usize| -> Vec<f32> {
            let bound = 1.0 / (fan_in as f32).sqrt();
            (0..n).map(|_| rng.gen_range(-bound..bound)).collect()
        };
        let net = QNetWeights {
            input,
            hidden,
            output,
            w1: uniform(hidden * input, input),
            b1: uniform(hidden, input),
            w2: uniform(output * hidden, hidden),
            b2: uniform(output, hidden),
        };
        Self::from_weights(cfg.clone(), net)
    }

    fn from_weights(cfg: AgentConfig, net: QNetWeights) -> Self {
        let adam = [
            Moments::zeros(net.w1.len()),
            Moments::zeros(net.b1.len()),
            Moments::zeros(net.w2.len()),
            Moments::zeros(net.b2.len()),
        ];
        Self { cfg, net, adam, t: 0 }
    }

    #[cfg(test)]
    pub(crate) fn weights(&self) -> &QNetWeights {
        &self.net
    }

    /// Hidden pre-activations and output for one input.
    fn forward(&self, x: &StateVector) -> (Vec<f32>, QValues) {
        let n = &self.net;
        let z: Vec<f32> = (0..n.hidden)
            .map(|h| {
                let row = &n.w1[h * n.input..(h + 1) * n.input];
                n.b1[h] + row.iter().zip(x.iter()).map(|(w, xi)| w * xi).sum::<f32>()
            })
            .collect();

        let mut q = [0.0f32; Move::COUNT];
        for (o, q_o) in q.iter_mut().enumerate() {
            let row = &n.w2[o * n.hidden..(o + 1) * n.hidden];
            *q_o = n.b2[o] + row.iter().zip(&z).map(|(w, zh)| w * zh.max(0.0)).sum::<f32>();
        }
        (z, q)
    }

    fn step_adam(&mut self, grads: [&[f32]; 4]) {
        const BETA1: f32 = 0.9;
        const BETA2: f32 = 0.999;
        const EPS: f32 = 1e-8;

        self.t += 1;
        let bc1 = 1.0 - BETA1.powi(self.t);
        let bc2 = 1.0 - BETA2.powi(self.t);
        let lr = self.cfg.lr;

        let QNetWeights { w1, b1, w2, b2, .. } = &mut self.net;
        let params: [&mut Vec<f32>; 4] = [w1, b1, w2, b2];
        for ((param, mom), grad) in params.into_iter().zip(self.adam.iter_mut()).zip(grads) {
            for i in 0..param.len() {
                let g = grad[i];
                mom.m[i] = BETA1 * mom.m[i] + (1.0 - BETA1) * g;
                mom.v[i] = BETA2 * mom.v[i] + (1.0 - BETA2) * g * g;
                let m_hat = mom.m[i] / bc1;
                let v_hat = mom.v[i] / bc2;
                param[i] -= lr * m_hat / (v_hat.sqrt() + EPS);
            }
        }
    }
}

impl QFunction for QNet {
    fn predict(&self, state: &StateVector) -> QValues {
        self.forward(state).1
    }

    /// MSE between Q(s, ·) and the target that replaces the taken action's
    /// value with `r + gamma * max Q(s', ·)` (just `r` on terminal steps).
    fn train_step(&mut self, batch: &TrainBatch) -> f32 {
        let n = batch.len();
        if n == 0 {
            return 0.0;
        }
        let (input, hidden, output) = (self.net.input, self.net.hidden, self.net.output);
        let mut g_w1 = vec![0.0f32; hidden * input];
        let mut g_b1 = vec![0.0f32; hidden];
        let mut g_w2 = vec![0.0f32; output * hidden];
        let mut g_b2 = vec![0.0f32; output];
        let mut loss = 0.0f32;
        // torch-style mean over every output element
        let norm = (n * output) as f32;

        for i in 0..n {
            let x = &batch.states[i];
            let (z, q) = self.forward(x);

            let mut q_new = batch.rewards[i];
            if !batch.dones[i] {
                let q_next = self.predict(&batch.next_states[i]);
                q_new += self.cfg.gamma * q_next.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            }
            let mut target = q;
            target[argmax(&batch.actions[i])] = q_new;

            let mut d_q = [0.0f32; Move::COUNT];
            for o in 0..output {
                let e = q[o] - target[o];
                loss += e * e / norm;
                d_q[o] = 2.0 * e / norm;
            }

            for o in 0..output {
                if d_q[o] == 0.0 {
                    continue;
                }
                g_b2[o] += d_q[o];
                for h in 0..hidden {
                    g_w2[o * hidden + h] += d_q[o] * z[h].max(0.0);
                }
            }
            for h in 0..hidden {
                if z[h] <= 0.0 {
                    continue;
                }
                let d_h: f32 = (0..output).map(|o| self.net.w2[o * hidden + h] * d_q[o]).sum();
                g_b1[h] += d_h;
                for k in 0..input {
                    g_w1[h * input + k] += d_h * x[k];
                }
            }
        }

        if !loss.is_finite() || has_non_finite(&g_w1) || has_non_finite(&g_w2) {
            log::error(&format!("non-finite loss/grads (loss={loss}) on batch of {n}, skipping update"));
            return loss;
        }

        self.step_adam([&g_w1, &g_b1, &g_w2, &g_b2]);
        loss
    }

    /// Written to a temp file next to `path`, then renamed over it.
    fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let ckpt = Checkpoint { config: self.cfg.clone(), weights: self.net.clone() };
        let json = serde_json::to_string(&ckpt)?;

        let mut tmp: PathBuf = path.to_path_buf();
        tmp.as_mut_os_string().push(".tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}
