//! Uniform FIFO replay buffer.
use super::{SimpleReplayBufferConfig, Transition};
use crate::{error::CatDqnError, ExperienceBufferBase, ReplayBufferBase};
use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::VecDeque;

/// A bounded replay buffer of [`Transition`]s.
///
/// When the buffer is full, pushing a transition evicts the oldest one.
/// Batches are sampled uniformly with replacement and keep the order in
/// which indices were drawn.
pub struct SimpleReplayBuffer<O, A> {
    capacity: usize,
    buffer: VecDeque<Transition<O, A>>,
    rng: StdRng,
}

impl<O, A> SimpleReplayBuffer<O, A> {
    /// Iterates over the stored transitions from the oldest to the newest.
    pub fn iter(&self) -> impl Iterator<Item = &Transition<O, A>> {
        self.buffer.iter()
    }
}

impl<O, A> ExperienceBufferBase for SimpleReplayBuffer<O, A> {
    type Item = Transition<O, A>;

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        if self.capacity == 0 {
            return Ok(());
        }
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(tr);
        Ok(())
    }

    fn len(&self) -> usize {
        self.buffer.len()
    }
}

impl<O: Clone, A: Clone> ReplayBufferBase for SimpleReplayBuffer<O, A> {
    type Config = SimpleReplayBufferConfig;
    type Batch = Vec<Transition<O, A>>;

    fn build(config: &Self::Config) -> Self {
        Self {
            capacity: config.capacity,
            buffer: VecDeque::with_capacity(config.capacity),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        let n = self.buffer.len();
        if n == 0 {
            return Err(CatDqnError::EmptyReplayBuffer(size).into());
        }
        Ok((0..size)
            .map(|_| self.buffer[self.rng.gen_range(0..n)].clone())
            .collect())
    }
}
