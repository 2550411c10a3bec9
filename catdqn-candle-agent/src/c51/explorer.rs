//! Epsilon-greedy exploration.
use anyhow::Result;
use candle_core::{shape::D, DType, Tensor};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Epsilon-greedy explorer with a linearly decaying epsilon.
///
/// Epsilon starts at `eps_start` and decreases by `eps_start / final_step` for each
/// action taken, so the unclipped line hits zero at `final_step`. It stays at
/// `eps_final` once it gets there, i.e., after `(1 - eps_final / eps_start) * final_step`
/// actions.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    /// Number of actions taken so far.
    pub n_steps: usize,

    /// Epsilon at the first step.
    pub eps_start: f64,

    /// Lower bound of epsilon.
    pub eps_final: f64,

    /// Number of steps at which the unclipped epsilon reaches zero.
    pub final_step: usize,
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self {
            n_steps: 0,
            eps_start: 1.0,
            eps_final: 0.02,
            final_step: 100_000,
        }
    }
}

impl EpsilonGreedy {
    /// Set the epsilon value at the final step.
    pub fn eps_final(mut self, v: f64) -> Self {
        self.eps_final = v;
        self
    }

    /// Set the epsilon value at the start.
    pub fn eps_start(mut self, v: f64) -> Self {
        self.eps_start = v;
        self
    }

    /// Set the number of steps over which epsilon decays.
    pub fn final_step(mut self, v: usize) -> Self {
        self.final_step = v;
        self
    }

    /// Current epsilon.
    pub fn epsilon(&self) -> f64 {
        let d = self.eps_start / (self.final_step.max(1) as f64);
        (self.eps_start - d * self.n_steps as f64).max(self.eps_final)
    }

    /// Takes actions based on action values `[batch, n_actions]`, returns i64 tensor `[batch]`.
    pub fn action(&mut self, q: &Tensor, rng: &mut impl Rng) -> Result<Tensor> {
        let eps = self.epsilon();
        self.n_steps += 1;

        if rng.gen::<f64>() < eps {
            let (n_samples, n_actions) = q.dims2()?;
            let act = (0..n_samples)
                .map(|_| rng.gen_range(0..n_actions) as i64)
                .collect::<Vec<_>>();
            Ok(Tensor::from_vec(act, (n_samples,), q.device())?)
        } else {
            Ok(q.argmax(D::Minus1)?.to_dtype(DType::I64)?)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use candle_core::Device;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_epsilon_schedule() {
        let mut explorer = EpsilonGreedy::default();
        assert_eq!(explorer.epsilon(), 1.0);
        explorer.n_steps = 50_000;
        assert!((explorer.epsilon() - 0.5).abs() < 1e-9);
        explorer.n_steps = 97_000;
        assert!((explorer.epsilon() - 0.03).abs() < 1e-9);
        // Clipped from 98% of the decay onwards
        explorer.n_steps = 98_000;
        assert!((explorer.epsilon() - 0.02).abs() < 1e-9);
        explorer.n_steps = 99_000;
        assert_eq!(explorer.epsilon(), 0.02);
        explorer.n_steps = 1_000_000;
        assert_eq!(explorer.epsilon(), 0.02);
    }

    #[test]
    fn test_epsilon_schedule_scales_with_start() {
        let mut explorer = EpsilonGreedy::default()
            .eps_start(0.5)
            .eps_final(0.1)
            .final_step(100);
        explorer.n_steps = 40;
        assert!((explorer.epsilon() - 0.3).abs() < 1e-9);
        explorer.n_steps = 90;
        assert!((explorer.epsilon() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_greedy_when_epsilon_is_zero() -> Result<()> {
        let mut explorer = EpsilonGreedy::default().eps_start(0.0).eps_final(0.0);
        let mut rng = SmallRng::seed_from_u64(0);
        let q = Tensor::new(&[[0.1f32, 0.7, -0.3], [2.0, 1.0, 0.0]], &Device::Cpu)?;
        for _ in 0..10 {
            assert_eq!(explorer.action(&q, &mut rng)?.to_vec1::<i64>()?, vec![1, 0]);
        }
        assert_eq!(explorer.n_steps, 10);
        Ok(())
    }

    #[test]
    fn test_random_actions_are_valid() -> Result<()> {
        let mut explorer = EpsilonGreedy::default();
        let mut rng = SmallRng::seed_from_u64(0);
        let q = Tensor::zeros((4, 3), DType::F32, &Device::Cpu)?;
        let mut seen = [false; 3];
        for _ in 0..50 {
            for a in explorer.action(&q, &mut rng)?.to_vec1::<i64>()? {
                assert!((0..3).contains(&a));
                seen[a as usize] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
        Ok(())
    }
}
