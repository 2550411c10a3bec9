//! Categorical DQN agent implemented with [candle](https://crates.io/crates/candle-core).
//!
//! The action-value function is represented by a categorical distribution over a
//! fixed support of returns for each action. [`c51::CategoricalNet`] outputs the
//! scores of the atoms, [`c51::CategoricalQValues`] reduces them to expected values
//! and [`c51::CategoricalDqn`] trains the network from sampled transitions.
pub mod c51;
pub mod model;
pub mod opt;
pub mod util;
use candle_core::{DeviceLocation, Tensor};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// The main GPU device.
    Cuda(usize),
}

impl From<&candle_core::Device> for Device {
    fn from(device: &candle_core::Device) -> Self {
        match device.location() {
            DeviceLocation::Cuda { gpu_id } => Self::Cuda(gpu_id),
            _ => Self::Cpu,
        }
    }
}

impl TryFrom<Device> for candle_core::Device {
    type Error = candle_core::Error;

    fn try_from(device: Device) -> Result<Self, Self::Error> {
        match device {
            Device::Cpu => Ok(candle_core::Device::Cpu),
            Device::Cuda(n) => candle_core::Device::new_cuda(n),
        }
    }
}

/// Observations that can be fed to the network.
///
/// The returned tensor has shape `[channels, height, width]` and dtype `u8`,
/// holding raw pixel intensities in `[0, 255]`.
pub trait TensorObs {
    /// Converts the observation into a tensor on CPU.
    fn to_tensor(&self) -> candle_core::Result<Tensor>;
}

impl TensorObs for Tensor {
    fn to_tensor(&self) -> candle_core::Result<Tensor> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_device_conversion() -> anyhow::Result<()> {
        let device = candle_core::Device::try_from(Device::Cpu)?;
        assert!(device.is_cpu());
        assert_eq!(Device::from(&device), Device::Cpu);
        Ok(())
    }

    #[test]
    fn test_serde_device() -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(&Device::Cuda(1))?;
        let device: Device = serde_yaml::from_str(&yaml)?;
        assert_eq!(device, Device::Cuda(1));
        Ok(())
    }
}
