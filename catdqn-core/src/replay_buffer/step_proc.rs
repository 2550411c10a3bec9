//! Turns environment steps into 1-step transitions.
use super::Transition;
use crate::{error::CatDqnError, Env, Step, StepProcessor};
use anyhow::Result;
use std::marker::PhantomData;

/// Configuration of [`SimpleStepProcessor`].
#[derive(Clone, Debug, Default)]
pub struct SimpleStepProcessorConfig {}

/// Produces a [`Transition`] from the previous observation and a [`Step`].
///
/// When the step ends an episode, the transition has no next state and
/// the processor waits for [`StepProcessor::reset`] with the first
/// observation of the next episode.
pub struct SimpleStepProcessor<E: Env> {
    prev_obs: Option<E::Obs>,
    phantom: PhantomData<E>,
}

impl<E: Env> StepProcessor<E> for SimpleStepProcessor<E> {
    type Config = SimpleStepProcessorConfig;
    type Output = Transition<E::Obs, E::Act>;

    fn build(_config: &Self::Config) -> Self {
        Self {
            prev_obs: None,
            phantom: PhantomData,
        }
    }

    fn reset(&mut self, init_obs: E::Obs) {
        self.prev_obs = Some(init_obs);
    }

    fn process(&mut self, step: Step<E>) -> Result<Self::Output> {
        let state = self
            .prev_obs
            .take()
            .ok_or(CatDqnError::StepProcessorNotReset)?;
        let is_done = step.is_done();
        let next_state = match is_done {
            true => None,
            false => {
                self.prev_obs = Some(step.obs.clone());
                Some(step.obs)
            }
        };

        Ok(Transition {
            state,
            action: step.act,
            reward: step.reward,
            is_done,
            next_state,
        })
    }
}
