//! Loss of the categorical DQN.
use super::{unpack_batch, CategoricalQValues};
use crate::TensorObs;
use anyhow::Result;
use candle_core::{shape::D, Tensor};
use candle_nn::loss::mse;
use catdqn_core::replay_buffer::Transition;

/// Bootstrapped targets `reward + gamma * max_a next_q[:, a]`.
///
/// `next_q` is `[batch, n_actions]` and is detached from the graph. Where `dones`
/// is nonzero the bootstrapped value is replaced by zero, so the target is the
/// reward alone whatever `next_q` holds.
pub fn td_target(next_q: &Tensor, rewards: &Tensor, dones: &Tensor, gamma: f64) -> Result<Tensor> {
    let next_value = next_q.max(D::Minus1)?.detach();
    let next_value = dones.where_cond(&next_value.zeros_like()?, &next_value)?;
    Ok((rewards + (next_value * gamma)?)?)
}

/// Mean squared error between the online values of the taken actions and
/// the bootstrapped targets from `tgt_net`.
///
/// Gradients flow only into `net`.
pub fn calc_loss<O, A>(
    batch: &[Transition<O, A>],
    net: &CategoricalQValues,
    tgt_net: &CategoricalQValues,
    gamma: f64,
) -> Result<Tensor>
where
    O: TensorObs,
    A: Clone + Into<i64>,
{
    let batch = unpack_batch(batch, net.net().device())?;
    let pred = net
        .forward(&batch.states)?
        .gather(&batch.actions.unsqueeze(1)?, 1)?
        .squeeze(1)?;
    let tgt = td_target(
        &tgt_net.forward(&batch.next_states)?,
        &batch.rewards,
        &batch.dones,
        gamma,
    )?;

    Ok(mse(&pred, &tgt)?)
}
