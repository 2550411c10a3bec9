//! Expected action values from categorical distributions.
use super::{CategoricalNet, Support};
use crate::model::SubModel1;
use anyhow::Result;
use candle_core::{shape::D, Tensor};
use candle_nn::ops::softmax;
use std::sync::Arc;

/// Wraps [`CategoricalNet`] to output the expectation of the distribution of each action.
///
/// Used for greedy action selection and for the bootstrapped values in the loss.
pub struct CategoricalQValues {
    net: CategoricalNet,
    support: Arc<Support>,
}

impl CategoricalQValues {
    /// Constructs the reducer over the given support.
    pub fn new(net: CategoricalNet, support: Arc<Support>) -> Self {
        Self { net, support }
    }

    /// The wrapped network.
    pub fn net(&self) -> &CategoricalNet {
        &self.net
    }

    /// The support shared with other reducers.
    pub fn support(&self) -> &Arc<Support> {
        &self.support
    }

    /// Raw atom scores `[batch, n_actions, n_atoms]`.
    pub fn atoms(&self, obs: &Tensor) -> Result<Tensor> {
        self.net.forward(obs)
    }

    /// Probabilities of atoms `[batch, n_actions, n_atoms]`, normalized over atoms.
    pub fn probs(&self, obs: &Tensor) -> Result<Tensor> {
        Ok(softmax(&self.atoms(obs)?, D::Minus1)?)
    }

    /// Expected values `[batch, n_actions]`.
    pub fn forward(&self, obs: &Tensor) -> Result<Tensor> {
        Ok(self
            .probs(obs)?
            .broadcast_mul(self.support.as_tensor())?
            .sum(D::Minus1)?)
    }
}
