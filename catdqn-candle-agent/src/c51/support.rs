//! Fixed support of the categorical distribution.
use anyhow::{ensure, Result};
use candle_core::{Device, Tensor};
use serde::{Deserialize, Serialize};

/// Configuration of [`Support`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SupportConfig {
    /// Lower end of the support.
    pub v_min: f32,

    /// Upper end of the support.
    pub v_max: f32,

    /// Number of atoms.
    pub n_atoms: usize,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            v_min: -10.0,
            v_max: 10.0,
            n_atoms: 51,
        }
    }
}

impl SupportConfig {
    /// Sets the range of the support.
    pub fn range(mut self, v_min: f32, v_max: f32) -> Self {
        self.v_min = v_min;
        self.v_max = v_max;
        self
    }

    /// Sets the number of atoms.
    pub fn n_atoms(mut self, v: usize) -> Self {
        self.n_atoms = v;
        self
    }
}

/// Evenly spaced return values the atoms are placed on.
///
/// The values start at `v_min` with step `(v_max - v_min) / n_atoms`, so the
/// last one is one step short of `v_max`. The values are computed once and
/// never change.
#[derive(Debug, Clone)]
pub struct Support {
    delta: f32,
    values: Vec<f32>,
    tensor: Tensor,
}

impl Support {
    /// Constructs the support on the given device.
    pub fn build(config: &SupportConfig, device: &Device) -> Result<Self> {
        ensure!(config.n_atoms >= 2, "Support needs at least two atoms");
        ensure!(
            config.v_max > config.v_min,
            "v_max ({}) must be greater than v_min ({})",
            config.v_max,
            config.v_min
        );
        let delta = (config.v_max - config.v_min) / config.n_atoms as f32;
        let values: Vec<f32> = (0..config.n_atoms)
            .map(|i| config.v_min + i as f32 * delta)
            .collect();
        let tensor = Tensor::from_slice(&values, (config.n_atoms,), device)?;

        Ok(Self {
            delta,
            values,
            tensor,
        })
    }

    /// Number of atoms.
    pub fn n_atoms(&self) -> usize {
        self.values.len()
    }

    /// Distance between neighboring atoms.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Values of the support.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Values of the support as a 1-dimensional tensor.
    pub fn as_tensor(&self) -> &Tensor {
        &self.tensor
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_support() -> Result<()> {
        let support = Support::build(&SupportConfig::default(), &Device::Cpu)?;
        let values = support.values();

        assert_eq!(support.n_atoms(), 51);
        assert_eq!(values.len(), 51);
        assert_eq!(values[0], -10.0);
        assert!(values.windows(2).all(|w| w[1] > w[0]));

        // The last value is one step short of v_max
        let last = values[50];
        assert!(last < 10.0);
        assert!((10.0 - last - support.delta()).abs() < 1e-5);
        assert!((support.delta() - 20.0 / 51.0).abs() < 1e-6);

        let t: Vec<f32> = support.as_tensor().to_vec1()?;
        assert_eq!(t, values);
        Ok(())
    }

    #[test]
    fn test_invalid_support() {
        let config = SupportConfig::default().range(1.0, -1.0);
        assert!(Support::build(&config, &Device::Cpu).is_err());
        let config = SupportConfig::default().n_atoms(1);
        assert!(Support::build(&config, &Device::Cpu).is_err());
    }
}
