//! Categorical DQN on stacked pixel frames.
//!
//! The workspace consists of the following crates:
//!
//! * [catdqn-core](catdqn_core) provides traits generic to environments and agents,
//!   the replay buffer, records of training metrics and the training loop.
//! * [catdqn-candle-agent](catdqn_candle_agent) implements the distributional value
//!   network, the expectation reducer, the loss and the agent with
//!   [candle](https://crates.io/crates/candle-core).
//! * [catdqn-tensorboard](catdqn_tensorboard) has `TensorboardRecorder` to write
//!   records which can be shown in Tensorboard.
//! * This crate collects them, and adds hyperparameter presets and [`catch::CatchEnv`],
//!   a small pixel game used by the `catch` example and the integration tests.
//!
//! # Training
//!
//! ```no_run
//! use catdqn::{
//!     catch::{CatchAct, CatchEnv, CatchEnvConfig, CatchObs},
//!     presets::Preset,
//! };
//! use catdqn_candle_agent::{c51::CategoricalDqn, Device};
//! use catdqn_core::{
//!     record::NullRecorder,
//!     replay_buffer::{SimpleReplayBuffer, SimpleStepProcessor},
//!     Trainer,
//! };
//!
//! type Env = CatchEnv;
//! type ReplayBuffer = SimpleReplayBuffer<CatchObs, CatchAct>;
//!
//! # fn main() -> anyhow::Result<()> {
//! let preset = Preset::Pong;
//! let agent_config = preset
//!     .agent_config(CatchEnv::N_ACTIONS)
//!     .device(Device::Cpu);
//! let mut agent = CategoricalDqn::<Env, ReplayBuffer>::build(agent_config)?;
//! let mut trainer = Trainer::<Env, SimpleStepProcessor<Env>, ReplayBuffer>::build(
//!     preset.trainer_config(),
//!     CatchEnvConfig::default(),
//!     Default::default(),
//!     preset.replay_buffer_config(),
//! );
//! let summary = trainer.train(&mut agent, &mut NullRecorder::new())?;
//! println!("solved: {}", summary.solved);
//! # Ok(())
//! # }
//! ```
pub mod catch;
pub mod presets;
