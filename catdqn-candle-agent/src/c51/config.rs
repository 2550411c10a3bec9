//! Configuration of the categorical DQN agent.
use super::{CategoricalModelConfig, CategoricalNetConfig, EpsilonGreedy, SupportConfig};
use crate::Device;
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Constructs [`CategoricalDqn`](super::CategoricalDqn).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct CategoricalDqnConfig {
    /// Configuration of the online and target networks.
    pub model_config: CategoricalModelConfig,

    /// Support of the categorical distributions.
    pub support: SupportConfig,

    /// Number of transitions sampled per optimization step.
    pub batch_size: usize,

    /// Discount factor of the bootstrapped value.
    pub discount_factor: f64,

    /// The target network is synced every this many optimization steps.
    pub sync_interval: usize,

    /// Exploration strategy in training mode.
    pub explorer: EpsilonGreedy,

    /// Whether the agent starts in training mode.
    pub train: bool,

    /// Seed of the random number generator of the explorer.
    #[serde(default)]
    pub seed: u64,

    /// Device of the networks.
    pub device: Option<Device>,
}

impl Default for CategoricalDqnConfig {
    fn default() -> Self {
        Self {
            model_config: Default::default(),
            support: Default::default(),
            batch_size: 32,
            discount_factor: 0.99,
            sync_interval: 1000,
            explorer: Default::default(),
            train: false,
            seed: 42,
            device: None,
        }
    }
}

impl CategoricalDqnConfig {
    /// Sets the configuration of the model.
    pub fn model_config(mut self, v: CategoricalModelConfig) -> Self {
        self.model_config = v;
        self
    }

    /// Sets the configuration of the network.
    pub fn net_config(mut self, v: CategoricalNetConfig) -> Self {
        self.model_config = self.model_config.net_config(v);
        self
    }

    /// Sets the number of actions of the network.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.model_config = self.model_config.n_actions(v);
        self
    }

    /// Sets the support.
    pub fn support(mut self, v: SupportConfig) -> Self {
        self.support = v;
        self
    }

    /// Batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Interval of target network sync in optimization steps.
    pub fn sync_interval(mut self, v: usize) -> Self {
        self.sync_interval = v;
        self
    }

    /// Explorer.
    pub fn explorer(mut self, v: EpsilonGreedy) -> Self {
        self.explorer = v;
        self
    }

    /// Training mode at construction.
    pub fn train(mut self, v: bool) -> Self {
        self.train = v;
        self
    }

    /// Random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Device.
    pub fn device(mut self, device: Device) -> Self {
        self.device = Some(device);
        self
    }

    /// Loads [`CategoricalDqnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of categorical DQN agent from {}", path_.display());
        Ok(b)
    }

    /// Saves [`CategoricalDqnConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of categorical DQN agent into {}", path_.display());
        Ok(())
    }
}
