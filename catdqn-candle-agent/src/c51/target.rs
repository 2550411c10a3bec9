use super::{CategoricalModel, CategoricalModelConfig, CategoricalQValues, Support};
use crate::util::copy_vars;
use anyhow::Result;
use candle_core::{Device, Tensor};
use candle_nn::VarMap;
use log::{debug, info};
use std::{path::Path, sync::Arc};

/// A delayed copy of the online network.
///
/// The parameters are owned separately from the online network and change only
/// through [`TargetNet::sync`], which overwrites all of them.
pub struct TargetNet {
    varmap: VarMap,
    q_values: CategoricalQValues,
    n_syncs: usize,
}

impl TargetNet {
    /// Builds a target network holding a copy of the parameters of `online`.
    pub fn build(
        config: &CategoricalModelConfig,
        support: Arc<Support>,
        device: &Device,
        online: &CategoricalModel,
    ) -> Result<Self> {
        let (varmap, q_values) = config.build_q_values(support, device)?;
        let mut target = Self {
            varmap,
            q_values,
            n_syncs: 0,
        };
        target.sync(online)?;
        Ok(target)
    }

    /// Overwrites the parameters with those of the online network.
    pub fn sync(&mut self, online: &CategoricalModel) -> Result<()> {
        copy_vars(&self.varmap, online.get_varmap())?;
        self.n_syncs += 1;
        debug!("Synced target network ({} times)", self.n_syncs);
        Ok(())
    }

    /// Number of synchronizations so far, including the one at construction.
    pub fn n_syncs(&self) -> usize {
        self.n_syncs
    }

    /// Outputs the action values given observations.
    pub fn forward(&self, obs: &Tensor) -> Result<Tensor> {
        self.q_values.forward(obs)
    }

    /// The reducer wrapping the network.
    pub fn q_values(&self) -> &CategoricalQValues {
        &self.q_values
    }

    /// Saves the parameters as a safetensors file.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.varmap.save(&path)?;
        info!("Save target network to {:?}", path.as_ref());
        Ok(())
    }

    /// Loads the parameters from a safetensors file.
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.varmap.load(&path)?;
        info!("Load target network from {:?}", path.as_ref());
        Ok(())
    }
}
