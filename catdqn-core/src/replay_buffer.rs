//! FIFO replay buffer of 1-step transitions.
//!
//! [`SimpleStepProcessor`] turns each environment [`Step`](crate::Step) into a
//! [`Transition`], [`SimpleReplayBuffer`] stores them with FIFO eviction and
//! samples batches uniformly with replacement.
mod base;
mod config;
mod step_proc;
mod transition;
pub use base::SimpleReplayBuffer;
pub use config::SimpleReplayBufferConfig;
pub use step_proc::{SimpleStepProcessor, SimpleStepProcessorConfig};
pub use transition::Transition;
