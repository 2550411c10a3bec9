//! Hyperparameters of the Atari games the categorical DQN was tuned on.
//!
//! Both presets share the agent and replay buffer settings and differ only in
//! the mean return at which training stops.
use anyhow::{anyhow, Result};
use catdqn_candle_agent::{
    c51::{
        CategoricalDqnConfig, CategoricalModelConfig, CategoricalNetConfig, EpsilonGreedy,
        SupportConfig,
    },
    opt::OptimizerConfig,
};
use catdqn_core::{replay_buffer::SimpleReplayBufferConfig, TrainerConfig};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

const IN_SHAPE: [usize; 3] = [4, 84, 84];
const LEARNING_RATE: f64 = 1e-4;
const GAMMA: f64 = 0.99;
const BATCH_SIZE: usize = 32;
const REPLAY_SIZE: usize = 10_000;
const REPLAY_START_SIZE: usize = 10_000;
const SYNC_TARGET_OPTS: usize = 1_000;
const EPSILON_DECAY_LAST_FRAME: usize = 100_000;
const EPSILON_START: f64 = 1.0;
const EPSILON_FINAL: f64 = 0.02;
const V_MIN: f32 = -10.0;
const V_MAX: f32 = 10.0;
const N_ATOMS: usize = 51;

/// A named set of hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Preset {
    /// `PongNoFrameskip-v4`.
    Pong,

    /// `SpaceInvadersNoFrameskip-v4`.
    Invaders,
}

impl Preset {
    /// Short name used for the directory of logs and parameters.
    pub fn run_name(&self) -> &'static str {
        match self {
            Self::Pong => "pong",
            Self::Invaders => "invaders",
        }
    }

    /// Training stops when the mean return of recent episodes exceeds this value.
    pub fn mean_reward_bound(&self) -> f32 {
        match self {
            Self::Pong => 19.5,
            Self::Invaders => 1000.0,
        }
    }

    /// Trainer configuration: optimization starts once the replay buffer holds
    /// 10000 transitions and the bound is checked against the last 100 episodes.
    ///
    /// `max_frames` and `model_dir` are left unset.
    pub fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig::default()
            .replay_start_size(REPLAY_START_SIZE)
            .mean_reward_bound(self.mean_reward_bound())
            .reward_window(100)
    }

    /// Agent configuration for a game with `n_actions` actions observed
    /// as four stacked 84x84 frames.
    ///
    /// The device is left unset.
    pub fn agent_config(&self, n_actions: usize) -> CategoricalDqnConfig {
        let explorer = EpsilonGreedy::default()
            .eps_start(EPSILON_START)
            .eps_final(EPSILON_FINAL)
            .final_step(EPSILON_DECAY_LAST_FRAME);
        let net_config = CategoricalNetConfig::default()
            .in_shape(IN_SHAPE)
            .n_actions(n_actions)
            .n_atoms(N_ATOMS);
        let model_config = CategoricalModelConfig::default()
            .net_config(net_config)
            .opt_config(OptimizerConfig::Adam { lr: LEARNING_RATE });
        CategoricalDqnConfig::default()
            .model_config(model_config)
            .support(SupportConfig::default().range(V_MIN, V_MAX).n_atoms(N_ATOMS))
            .batch_size(BATCH_SIZE)
            .discount_factor(GAMMA)
            .sync_interval(SYNC_TARGET_OPTS)
            .explorer(explorer)
            .train(true)
    }

    /// Replay buffer holding the most recent 10000 transitions.
    pub fn replay_buffer_config(&self) -> SimpleReplayBufferConfig {
        SimpleReplayBufferConfig::default().capacity(REPLAY_SIZE)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.run_name())
    }
}

impl FromStr for Preset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pong" => Ok(Self::Pong),
            "invaders" | "spaceinvaders" => Ok(Self::Invaders),
            _ => Err(anyhow!("Unknown preset: {}", s)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pong() {
        let preset = Preset::Pong;
        let trainer = preset.trainer_config();
        assert_eq!(trainer.mean_reward_bound, 19.5);
        assert_eq!(trainer.replay_start_size, 10_000);
        assert_eq!(trainer.reward_window, 100);
        assert!(trainer.max_frames.is_none());
        assert!(trainer.model_dir.is_none());
        assert_eq!(preset.run_name(), "pong");

        let agent = preset.agent_config(6);
        assert_eq!(agent.batch_size, 32);
        assert_eq!(agent.discount_factor, 0.99);
        assert_eq!(agent.sync_interval, 1000);
        assert_eq!(agent.support.n_atoms, 51);
        let net_config = agent.model_config.net_config.as_ref().unwrap();
        assert_eq!(net_config.in_shape, [4, 84, 84]);
        assert_eq!(net_config.n_actions, 6);
        assert_eq!(agent.model_config.opt_config, OptimizerConfig::Adam { lr: 1e-4 });
        assert_eq!(agent.explorer.eps_final, 0.02);
        assert_eq!(agent.explorer.final_step, 100_000);
        assert!(agent.train);
        assert_eq!(preset.replay_buffer_config().capacity, 10_000);
    }

    #[test]
    fn test_invaders_differs_only_in_bound() {
        let pong = Preset::Pong;
        let invaders = Preset::Invaders;
        assert_eq!(invaders.trainer_config().mean_reward_bound, 1000.0);
        assert_eq!(invaders.agent_config(6), pong.agent_config(6));
        assert_eq!(invaders.run_name(), "invaders");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Pong".parse::<Preset>().unwrap(), Preset::Pong);
        assert_eq!("invaders".parse::<Preset>().unwrap(), Preset::Invaders);
        assert!("breakout".parse::<Preset>().is_err());
    }
}
