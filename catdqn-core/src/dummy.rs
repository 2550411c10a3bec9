//! Small environment and agent used in tests.
use crate::{
    record::Record, replay_buffer::SimpleReplayBuffer, Act, Agent, Env, Obs, Policy,
    ReplayBufferBase, Step,
};
use anyhow::{bail, Result};
use std::path::Path;

impl Obs for u32 {}

impl Act for i64 {}

/// Counts down from the configured episode length, giving a reward of 1 per step.
pub struct CountdownEnv {
    len: u32,
    remaining: u32,
}

impl Env for CountdownEnv {
    type Config = u32;
    type Obs = u32;
    type Act = i64;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            len: *config,
            remaining: *config,
        })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        self.remaining = self.remaining.saturating_sub(1);
        let done = self.remaining == 0;
        let step = Step::new(self.remaining, *a, 1.0, done, false, (), None);
        Ok((step, Record::empty()))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.remaining = self.len;
        Ok(self.remaining)
    }
}

/// Always takes action 0 and counts optimization calls.
#[derive(Default)]
pub struct CountingAgent {
    pub n_opts: usize,
    pub max_batch_len: usize,
    pub fail_save: bool,
}

impl Policy<CountdownEnv> for CountingAgent {
    fn sample(&mut self, _obs: &u32) -> Result<i64> {
        Ok(0)
    }
}

impl Agent<CountdownEnv, SimpleReplayBuffer<u32, i64>> for CountingAgent {
    fn train(&mut self) {}

    fn eval(&mut self) {}

    fn is_train(&self) -> bool {
        true
    }

    fn opt(&mut self, buffer: &mut SimpleReplayBuffer<u32, i64>) -> Result<Record> {
        let batch = buffer.batch(4)?;
        self.max_batch_len = self.max_batch_len.max(batch.len());
        self.n_opts += 1;
        Ok(Record::from_scalar("loss", 0.0))
    }

    fn status(&self) -> Record {
        Record::from_scalar("epsilon", 0.5)
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        if self.fail_save {
            bail!("Cannot write to {:?}", path);
        }
        Ok(())
    }

    fn load_params(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}
