use rand::Rng;
use rand::seq::index;

use crate::error::{Result, TrainError};
use crate::featurizer::StateVector;
use crate::snake::Move;

/// A single experience tuple (s, a, r, s', done).
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: StateVector,
    pub action: Move,
    pub reward: f32,
    pub next_state: StateVector,
    pub done: bool,
}

/// Fixed-capacity ring of transitions. Once full, every push overwrites the oldest entry.
pub struct ReplayBuffer {
    buf: Vec<Transition>,
    cap: usize,
    idx: usize, // next overwrite position, also the oldest entry once full
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(TrainError::Config("replay buffer capacity must be > 0".into()));
        }
        Ok(Self { buf: Vec::new(), cap: capacity, idx: 0 })
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn push(&mut self, tr: Transition) {
        if self.buf.len() < self.cap {
            self.buf.push(tr);
        } else {
            self.buf[self.idx] = tr;
            self.idx = (self.idx + 1) % self.cap;
        }
    }

    /// Entry by age: 0 is the oldest stored transition.
    pub fn get(&self, i: usize) -> Option<&Transition> {
        if i >= self.buf.len() {
            return None;
        }
        let start = if self.buf.len() < self.cap { 0 } else { self.idx };
        self.buf.get((start + i) % self.cap)
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        (0..self.buf.len()).filter_map(move |i| self.get(i))
    }

    /// `k` distinct transitions drawn uniformly, or everything when `len <= k`.
    pub fn sample<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Vec<Transition> {
        if self.buf.len() <= k {
            return self.buf.clone();
        }
        index::sample(rng, self.buf.len(), k)
            .iter()
            .map(|i| self.buf[i].clone())
            .collect()
    }
}
