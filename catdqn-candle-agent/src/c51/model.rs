use super::{CategoricalNet, CategoricalNetConfig, CategoricalQValues, Support};
use crate::{
    model::SubModel1,
    opt::{Optimizer, OptimizerConfig},
};
use anyhow::Result;
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use catdqn_core::error::CatDqnError;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
    sync::Arc,
};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`CategoricalModel`].
pub struct CategoricalModelConfig {
    /// Configuration of the network. The number of atoms is taken from the support.
    pub net_config: Option<CategoricalNetConfig>,

    /// Configuration of the optimizer.
    pub opt_config: OptimizerConfig,
}

impl Default for CategoricalModelConfig {
    fn default() -> Self {
        Self {
            net_config: None,
            opt_config: OptimizerConfig::default(),
        }
    }
}

impl CategoricalModelConfig {
    /// Sets configurations of the network.
    pub fn net_config(mut self, v: CategoricalNetConfig) -> Self {
        self.net_config = Some(v);
        self
    }

    /// Sets the number of actions of the network.
    pub fn n_actions(mut self, v: usize) -> Self {
        if let Some(net_config) = self.net_config.take() {
            self.net_config = Some(net_config.n_actions(v));
        }
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Constructs [`CategoricalModelConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`CategoricalModelConfig`] to as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }

    /// Builds the parameters of a network in a fresh [`VarMap`].
    pub(super) fn build_q_values(
        &self,
        support: Arc<Support>,
        device: &Device,
    ) -> Result<(VarMap, CategoricalQValues)> {
        let net_config = self
            .net_config
            .clone()
            .ok_or_else(|| CatDqnError::MissingConfig("net_config".to_string()))?
            .n_atoms(support.n_atoms());
        let varmap = VarMap::new();
        let net = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
            CategoricalNet::build(vb, net_config)?
        };
        Ok((varmap, CategoricalQValues::new(net, support)))
    }
}

/// The online network with its parameters and optimizer.
pub struct CategoricalModel {
    varmap: VarMap,
    q_values: CategoricalQValues,
    opt: Optimizer,
}

impl CategoricalModel {
    /// Constructs [`CategoricalModel`].
    pub fn build(
        config: &CategoricalModelConfig,
        support: Arc<Support>,
        device: &Device,
    ) -> Result<Self> {
        let (varmap, q_values) = config.build_q_values(support, device)?;
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self {
            varmap,
            q_values,
            opt,
        })
    }

    /// Outputs the action values given observations.
    pub fn forward(&self, obs: &Tensor) -> Result<Tensor> {
        self.q_values.forward(obs)
    }

    /// The reducer wrapping the network.
    pub fn q_values(&self) -> &CategoricalQValues {
        &self.q_values
    }

    /// Computes gradients of `loss` and updates the parameters.
    pub fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        self.opt.backward_step(loss)
    }

    /// The parameters of the network.
    pub fn get_varmap(&self) -> &VarMap {
        &self.varmap
    }

    /// Saves the parameters as a safetensors file.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.varmap.save(&path)?;
        info!("Save categorical model to {:?}", path.as_ref());
        Ok(())
    }

    /// Loads the parameters from a safetensors file.
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.varmap.load(&path)?;
        info!("Load categorical model from {:?}", path.as_ref());
        Ok(())
    }
}
