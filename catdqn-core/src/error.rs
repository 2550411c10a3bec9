//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum CatDqnError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// A batch was requested from a replay buffer holding no transitions.
    #[error("Cannot sample {0} transitions from an empty replay buffer")]
    EmptyReplayBuffer(usize),

    /// A step was processed before the step processor was given an initial observation.
    #[error("Step processor has no previous observation, reset() was not called")]
    StepProcessorNotReset,

    /// A step ended an episode but the environment did not provide the reset observation.
    #[error("Episode ended but the step has no initial observation of the next episode")]
    MissingInitObs,

    /// A required configuration value is missing.
    #[error("Configuration is missing: {0}")]
    MissingConfig(String),
}
