//! Categorical DQN agent.
mod base;
mod batch;
mod config;
mod explorer;
mod loss;
mod model;
mod net;
mod q_values;
mod support;
mod target;
pub use base::CategoricalDqn;
pub use batch::{unpack_batch, UnpackedBatch};
pub use config::CategoricalDqnConfig;
pub use explorer::EpsilonGreedy;
pub use loss::{calc_loss, td_target};
pub use model::{CategoricalModel, CategoricalModelConfig};
pub use net::{CategoricalNet, CategoricalNetConfig};
pub use q_values::CategoricalQValues;
pub use support::{Support, SupportConfig};
pub use target::TargetNet;
