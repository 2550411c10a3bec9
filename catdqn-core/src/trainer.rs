//! Train [`Agent`].
mod config;
mod sampler;
use crate::{
    record::{Record, RecordValue::Scalar, Recorder},
    Agent, Env, ExperienceBufferBase, ReplayBufferBase, StepProcessor,
};
use anyhow::{Context, Result};
pub use config::TrainerConfig;
use log::info;
pub use sampler::Sampler;
use std::{path::Path, time::Instant};

/// Outcome of [`Trainer::train`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainSummary {
    /// Number of environment steps taken.
    pub frames: usize,

    /// Number of finished episodes.
    pub episodes: usize,

    /// Number of optimization steps performed.
    pub opt_steps: usize,

    /// Whether the mean return exceeded the bound.
    pub solved: bool,

    /// Mean return over the most recent episodes, `None` if no episode has finished.
    pub mean_reward: Option<f32>,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop.
///
/// # Training loop
///
/// 0. Given an agent implementing [`Agent`] and a recorder implementing [`Recorder`].
/// 1. Build [`Env`], [`StepProcessor`] and the replay buffer, and wrap the first two
///    in a [`Sampler`]. Reset the frame counter `frame = 0`.
/// 2. `frame += 1`. Do an environment step and push the transition to the replay buffer.
/// 3. For each episode finished in the step:
///     1. Compute the speed in frames per second since the previous finished episode.
///     2. Compute the mean return over the last `reward_window` episodes.
///     3. Log a progress line and write `epsilon`, `speed`, `reward_100` and `reward`
///        to the recorder with the key `frame`.
///     4. If the mean return exceeds `mean_reward_bound`, finish the training loop.
/// 4. If `frame` reaches `max_frames`, finish the training loop.
/// 5. If the replay buffer holds fewer than `replay_start_size` transitions, back to step 2.
/// 6. Do an optimization step with [`Agent::opt`]. Every `record_interval` frames, write
///    its record to the recorder.
/// 7. Back to step 2.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|Env::Obs|A
///     B -->|"Step&lt;E: Env&gt;"|C[StepProcessor]
///     C -->|Transition|D[ReplayBufferBase]
///     D -->|"Vec&lt;Transition&gt;"|A
/// ```
pub struct Trainer<E, P, R>
where
    E: Env,
    P: StepProcessor<E>,
    R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
{
    config: TrainerConfig,

    /// Configuration of the environment for training.
    env_config: E::Config,

    /// Configuration of the transition producer.
    step_proc_config: P::Config,

    /// Configuration of the replay buffer.
    replay_buffer_config: R::Config,
}

impl<E, P, R> Trainer<E, P, R>
where
    E: Env,
    P: StepProcessor<E>,
    R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
{
    /// Constructs a trainer.
    pub fn build(
        config: TrainerConfig,
        env_config: E::Config,
        step_proc_config: P::Config,
        replay_buffer_config: R::Config,
    ) -> Self {
        Self {
            config,
            env_config,
            step_proc_config,
            replay_buffer_config,
        }
    }

    fn mean_reward(&self, total_rewards: &[f32]) -> f32 {
        let n = total_rewards.len().min(self.config.reward_window.max(1));
        let recent = &total_rewards[total_rewards.len() - n..];
        recent.iter().sum::<f32>() / n as f32
    }

    fn save_model<A: Agent<E, R>>(agent: &A, model_dir: &str) -> Result<()> {
        agent
            .save_params(Path::new(model_dir))
            .with_context(|| format!("Failed to save the model in {:?}", model_dir))?;
        info!("Saved the model in {:?}.", model_dir);
        Ok(())
    }

    /// Train the agent.
    ///
    /// When `model_dir` is set, the parameters are saved there after training
    /// and a failed save is returned as an error.
    pub fn train<A>(&mut self, agent: &mut A, recorder: &mut dyn Recorder) -> Result<TrainSummary>
    where
        A: Agent<E, R>,
    {
        let env = E::build(&self.env_config, 0)?;
        let step_proc = P::build(&self.step_proc_config);
        let mut buffer = R::build(&self.replay_buffer_config);
        let mut sampler = Sampler::new(env, step_proc);
        let mut total_rewards: Vec<f32> = vec![];
        let mut frame: usize = 0;
        let mut opt_steps: usize = 0;
        let mut ts_frame: usize = 0;
        let mut ts = Instant::now();
        let mut solved = false;
        agent.train();

        'training: loop {
            frame += 1;
            let _ = sampler.sample_and_push(agent, &mut buffer)?;

            for reward in sampler.pop_episode_returns() {
                total_rewards.push(reward);
                let elapsed = ts.elapsed().as_secs_f32().max(f32::EPSILON);
                let speed = (frame - ts_frame) as f32 / elapsed;
                ts_frame = frame;
                ts = Instant::now();
                let mean_reward = self.mean_reward(&total_rewards);
                let status = agent.status();
                let eps = status.get_scalar("epsilon").unwrap_or(0.0);
                info!(
                    "{}: done {} games, mean reward {:.3}, eps {:.2}, speed {:.2} f/s",
                    frame,
                    total_rewards.len(),
                    mean_reward,
                    eps,
                    speed
                );

                let mut record = Record::from_slice(&[
                    ("frame", Scalar(frame as _)),
                    ("speed", Scalar(speed)),
                    ("reward_100", Scalar(mean_reward)),
                    ("reward", Scalar(reward)),
                ]);
                record.merge_inplace(status);
                recorder.write(record);

                if mean_reward > self.config.mean_reward_bound {
                    info!("Solved in {} frames!", frame);
                    solved = true;
                    break 'training;
                }
            }

            if let Some(max_frames) = self.config.max_frames {
                if frame >= max_frames {
                    info!("Reached the maximum number of frames ({})", max_frames);
                    break;
                }
            }

            if buffer.len() < self.config.replay_start_size {
                continue;
            }

            let mut record = agent.opt(&mut buffer)?;
            opt_steps += 1;
            if frame % self.config.record_interval.max(1) == 0 && !record.is_empty() {
                record.insert("frame", Scalar(frame as _));
                recorder.write(record);
            }
        }
        recorder.flush();

        if let Some(model_dir) = self.config.model_dir.as_ref() {
            Self::save_model(agent, model_dir)?;
        }

        Ok(TrainSummary {
            frames: frame,
            episodes: total_rewards.len(),
            opt_steps,
            solved,
            mean_reward: match total_rewards.is_empty() {
                true => None,
                false => Some(self.mean_reward(&total_rewards)),
            },
        })
    }
}
