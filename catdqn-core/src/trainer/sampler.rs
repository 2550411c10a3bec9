//! Collects experiences from an environment into a replay buffer.
use crate::{
    error::CatDqnError, record::Record, Env, ExperienceBufferBase, Policy, StepProcessor,
};
use anyhow::Result;
use log::trace;

/// Runs an agent in an environment one step at a time.
///
/// Each step is turned into a transition by the step processor and pushed
/// into the given buffer. Returns of finished episodes are kept until
/// [`Sampler::pop_episode_returns`] is called.
pub struct Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    env: E,
    prev_obs: Option<E::Obs>,
    step_processor: P,
    episode_return: f32,
    episode_returns: Vec<f32>,
    n_steps: usize,
}

impl<E, P> Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    /// Creates a new sampler with the given environment and step processor.
    pub fn new(env: E, step_processor: P) -> Self {
        Self {
            env,
            prev_obs: None,
            step_processor,
            episode_return: 0.0,
            episode_returns: vec![],
            n_steps: 0,
        }
    }

    /// Number of environment steps taken so far.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Takes the returns of the episodes finished since the last call.
    pub fn pop_episode_returns(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.episode_returns)
    }

    /// Samples an action, steps the environment and pushes the transition into `buffer`.
    ///
    /// The environment is reset on the first call and whenever an episode ends.
    /// Returns the record emitted by the environment.
    pub fn sample_and_push<A, R>(&mut self, agent: &mut A, buffer: &mut R) -> Result<Record>
    where
        A: Policy<E>,
        R: ExperienceBufferBase<Item = P::Output>,
    {
        let obs = match self.prev_obs.take() {
            Some(obs) => obs,
            None => {
                let obs = self.env.reset()?;
                self.step_processor.reset(obs.clone());
                obs
            }
        };

        let act = agent.sample(&obs)?;
        let (step, record) = self.env.step_with_reset(&act)?;
        self.n_steps += 1;
        self.episode_return += step.reward;

        let is_done = step.is_done();
        let next_obs = match is_done {
            true => step.init_obs.clone().ok_or(CatDqnError::MissingInitObs)?,
            false => step.obs.clone(),
        };

        let transition = self.step_processor.process(step)?;
        buffer.push(transition)?;

        if is_done {
            trace!("Episode finished with return {}", self.episode_return);
            self.episode_returns.push(self.episode_return);
            self.episode_return = 0.0;
            self.step_processor.reset(next_obs.clone());
        }
        self.prev_obs = Some(next_obs);

        Ok(record)
    }
}
