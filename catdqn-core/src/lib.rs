#![warn(missing_docs)]
//! Core components of catdqn.
//!
//! This crate is independent of any deep learning backend. It provides the
//! interfaces between an environment, an agent and a replay buffer, a FIFO
//! replay buffer of 1-step transitions, records for metrics and the
//! [`Trainer`] running the training loop.
pub mod error;
pub mod record;
pub mod replay_buffer;

#[cfg(test)]
mod dummy;

mod base;
pub use base::{
    Act, Agent, Env, ExperienceBufferBase, Info, Obs, Policy, ReplayBufferBase, Step,
    StepProcessor,
};

mod trainer;
pub use trainer::{Sampler, TrainSummary, Trainer, TrainerConfig};
