//! Convolutional network emitting atom scores for each action.
use crate::model::SubModel1;
use anyhow::{ensure, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::{
    conv::Conv2dConfig,
    conv2d, linear,
    sequential::{seq, Sequential},
    Module, VarBuilder,
};
use serde::{Deserialize, Serialize};

/// Configuration of [`CategoricalNet`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct CategoricalNetConfig {
    /// Shape of an observation, `[channels, height, width]`.
    pub in_shape: [usize; 3],

    /// Number of actions.
    pub n_actions: usize,

    /// Number of atoms per action.
    pub n_atoms: usize,
}

impl Default for CategoricalNetConfig {
    fn default() -> Self {
        Self {
            in_shape: [4, 84, 84],
            n_actions: 6,
            n_atoms: 51,
        }
    }
}

impl CategoricalNetConfig {
    /// Sets the shape of an observation.
    pub fn in_shape(mut self, v: [usize; 3]) -> Self {
        self.in_shape = v;
        self
    }

    /// Sets the number of actions.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = v;
        self
    }

    /// Sets the number of atoms.
    pub fn n_atoms(mut self, v: usize) -> Self {
        self.n_atoms = v;
        self
    }
}

/// The convolutional network of the DQN paper with a categorical head.
///
/// Input is a batch of `u8` pixel observations `[batch, c, h, w]`, scaled by `1/256`.
/// Output is the raw scores `[batch, n_actions, n_atoms]`.
pub struct CategoricalNet {
    conv: Sequential,
    fc: Sequential,
    conv_out_size: usize,
    n_actions: usize,
    n_atoms: usize,
    device: Device,
}

impl CategoricalNet {
    fn stride(s: usize) -> Conv2dConfig {
        Conv2dConfig {
            stride: s,
            ..Default::default()
        }
    }

    fn create_conv(vb: &VarBuilder, n_channels: usize) -> Result<Sequential> {
        let conv = seq()
            .add(conv2d(n_channels, 32, 8, Self::stride(4), vb.pp("c1"))?)
            .add_fn(|xs| xs.relu())
            .add(conv2d(32, 64, 4, Self::stride(2), vb.pp("c2"))?)
            .add_fn(|xs| xs.relu())
            .add(conv2d(64, 64, 3, Self::stride(1), vb.pp("c3"))?)
            .add_fn(|xs| xs.relu());

        Ok(conv)
    }

    fn create_fc(vb: &VarBuilder, in_dim: usize, out_dim: usize) -> Result<Sequential> {
        let fc = seq()
            .add(linear(in_dim, 512, vb.pp("l1"))?)
            .add_fn(|xs| xs.relu())
            .add(linear(512, out_dim, vb.pp("l2"))?);

        Ok(fc)
    }

    /// Number of features after the convolution stack.
    pub fn conv_out_size(&self) -> usize {
        self.conv_out_size
    }

    /// Number of actions.
    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    /// Number of atoms per action.
    pub fn n_atoms(&self) -> usize {
        self.n_atoms
    }

    /// Device of the parameters.
    pub fn device(&self) -> &Device {
        &self.device
    }
}

impl SubModel1 for CategoricalNet {
    type Config = CategoricalNetConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self> {
        let [c, h, w] = config.in_shape;
        ensure!(
            h >= 36 && w >= 36,
            "Observation of {}x{} is too small for the convolution stack",
            h,
            w
        );
        let device = vb.device().clone();
        let conv = Self::create_conv(&vb, c)?;
        let conv_out_size = conv
            .forward(&Tensor::zeros((1, c, h, w), DType::F32, &device)?)?
            .elem_count();
        let fc = Self::create_fc(&vb, conv_out_size, config.n_actions * config.n_atoms)?;

        Ok(Self {
            conv,
            fc,
            conv_out_size,
            n_actions: config.n_actions,
            n_atoms: config.n_atoms,
            device,
        })
    }

    fn forward(&self, x: &Self::Input) -> Result<Tensor> {
        let batch_size = x.dims()[0];
        let x = (x.to_device(&self.device)?.to_dtype(DType::F32)? / 256.0)?;
        let conv_out = self.conv.forward(&x)?.reshape((batch_size, ()))?;
        let fc_out = self.fc.forward(&conv_out)?;
        Ok(fc_out.reshape((batch_size, self.n_actions, self.n_atoms))?)
    }
}
