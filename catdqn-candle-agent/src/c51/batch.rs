//! Conversion of sampled transitions into tensors.
use crate::TensorObs;
use anyhow::{ensure, Result};
use candle_core::{Device, Tensor};
use catdqn_core::replay_buffer::Transition;

/// Tensors of a batch of transitions, aligned along the first dimension.
pub struct UnpackedBatch {
    /// Observations `[batch, c, h, w]`, `u8`.
    pub states: Tensor,

    /// Actions `[batch]`, `i64`.
    pub actions: Tensor,

    /// Rewards `[batch]`, `f32`.
    pub rewards: Tensor,

    /// Done flags `[batch]`, `u8`.
    pub dones: Tensor,

    /// Next observations `[batch, c, h, w]`, `u8`. For a transition ending an episode
    /// this is its own observation, which is masked out in the loss.
    pub next_states: Tensor,
}

impl UnpackedBatch {
    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.rewards.dims()[0]
    }

    /// Returns `true` if the batch has no transition.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Converts transitions into [`UnpackedBatch`] on `device`, keeping their order.
///
/// A transition is done if it is flagged so or has no next state.
pub fn unpack_batch<O, A>(batch: &[Transition<O, A>], device: &Device) -> Result<UnpackedBatch>
where
    O: TensorObs,
    A: Clone + Into<i64>,
{
    ensure!(!batch.is_empty(), "Cannot unpack an empty batch");
    let n = batch.len();
    let mut states = Vec::with_capacity(n);
    let mut actions = Vec::with_capacity(n);
    let mut rewards = Vec::with_capacity(n);
    let mut dones = Vec::with_capacity(n);
    let mut next_states = Vec::with_capacity(n);

    for tr in batch.iter() {
        let state = tr.state.to_tensor()?;
        let next_state = match &tr.next_state {
            Some(obs) => obs.to_tensor()?,
            None => state.clone(),
        };
        states.push(state);
        actions.push(tr.action.clone().into());
        rewards.push(tr.reward);
        dones.push(tr.is_terminal() as u8);
        next_states.push(next_state);
    }

    Ok(UnpackedBatch {
        states: Tensor::stack(&states, 0)?.to_device(device)?,
        actions: Tensor::from_vec(actions, (n,), device)?,
        rewards: Tensor::from_vec(rewards, (n,), device)?,
        dones: Tensor::from_vec(dones, (n,), device)?,
        next_states: Tensor::stack(&next_states, 0)?.to_device(device)?,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use candle_core::DType;

    fn obs(v: u8) -> Result<Tensor> {
        Ok(Tensor::full(v, (1, 2, 2), &Device::Cpu)?)
    }

    fn transition(s: u8, a: i64, r: f32, next: Option<u8>) -> Result<Transition<Tensor, i64>> {
        Ok(Transition {
            state: obs(s)?,
            action: a,
            reward: r,
            is_done: next.is_none(),
            next_state: match next {
                Some(v) => Some(obs(v)?),
                None => None,
            },
        })
    }

    #[test]
    fn test_unpack_batch() -> Result<()> {
        let batch = vec![
            transition(1, 0, 0.5, Some(2))?,
            transition(2, 3, -1.0, None)?,
            transition(7, 1, 1.0, Some(8))?,
        ];
        let b = unpack_batch(&batch, &Device::Cpu)?;

        assert_eq!(b.len(), 3);
        assert_eq!(b.states.dims(), &[3, 1, 2, 2]);
        assert_eq!(b.next_states.dims(), &[3, 1, 2, 2]);
        assert_eq!(b.states.dtype(), DType::U8);
        assert_eq!(b.actions.to_vec1::<i64>()?, vec![0, 3, 1]);
        assert_eq!(b.rewards.to_vec1::<f32>()?, vec![0.5, -1.0, 1.0]);
        assert_eq!(b.dones.to_vec1::<u8>()?, vec![0, 1, 0]);

        // Terminal transition uses its own state as the placeholder
        let first_pixels = |t: &Tensor| -> Result<Vec<u8>> {
            Ok(t.flatten_from(1)?.narrow(1, 0, 1)?.squeeze(1)?.to_vec1()?)
        };
        assert_eq!(first_pixels(&b.states)?, vec![1, 2, 7]);
        assert_eq!(first_pixels(&b.next_states)?, vec![2, 2, 8]);
        Ok(())
    }

    #[test]
    fn test_missing_next_state_is_done() -> Result<()> {
        let mut tr = transition(1, 0, 0.0, None)?;
        tr.is_done = false;
        let b = unpack_batch(&[tr], &Device::Cpu)?;
        assert_eq!(b.dones.to_vec1::<u8>()?, vec![1]);
        Ok(())
    }

    #[test]
    fn test_empty_batch() {
        let batch: Vec<Transition<Tensor, i64>> = vec![];
        assert!(unpack_batch(&batch, &Device::Cpu).is_err());
    }
}
