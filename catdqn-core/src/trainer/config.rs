//! Configuration of [`Trainer`](super::Trainer).
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// Stop after this many environment steps. `None` runs until solved.
    pub max_frames: Option<usize>,

    /// Number of transitions in the replay buffer before optimization starts.
    pub replay_start_size: usize,

    /// Training is finished when the mean return exceeds this value.
    pub mean_reward_bound: f32,

    /// Number of most recent episodes averaged for the mean return.
    pub reward_window: usize,

    /// Interval of writing optimization records in environment steps.
    pub record_interval: usize,

    /// Directory where the parameters of the agent are saved when training ends.
    pub model_dir: Option<String>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_frames: None,
            replay_start_size: 10000,
            mean_reward_bound: 19.5,
            reward_window: 100,
            record_interval: 100,
            model_dir: None,
        }
    }
}

impl TrainerConfig {
    /// Sets the maximum number of environment steps.
    pub fn max_frames(mut self, v: usize) -> Self {
        self.max_frames = Some(v);
        self
    }

    /// Sets the size of the replay buffer required before optimization.
    pub fn replay_start_size(mut self, v: usize) -> Self {
        self.replay_start_size = v;
        self
    }

    /// Sets the bound of the mean return.
    pub fn mean_reward_bound(mut self, v: f32) -> Self {
        self.mean_reward_bound = v;
        self
    }

    /// Sets the number of episodes averaged for the mean return.
    pub fn reward_window(mut self, v: usize) -> Self {
        self.reward_window = v;
        self
    }

    /// Sets the interval of writing optimization records.
    pub fn record_interval(mut self, v: usize) -> Self {
        self.record_interval = v;
        self
    }

    /// Sets the directory where the trained agent is saved.
    pub fn model_dir(mut self, v: impl Into<String>) -> Self {
        self.model_dir = Some(v.into());
        self
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of trainer from {}", path_.to_str().unwrap_or("?"));
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of trainer into {}", path_.to_str().unwrap_or("?"));
        Ok(())
    }
}
