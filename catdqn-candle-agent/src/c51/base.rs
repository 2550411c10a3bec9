//! Categorical DQN agent implemented with candle.
use super::{
    calc_loss, config::CategoricalDqnConfig, explorer::EpsilonGreedy, model::CategoricalModel,
    support::Support, target::TargetNet,
};
use crate::TensorObs;
use anyhow::Result;
use candle_core::{shape::D, DType, Device, Tensor};
use catdqn_core::{
    error::CatDqnError,
    record::{Record, RecordValue},
    replay_buffer::Transition,
    Agent, Env, Policy, ReplayBufferBase,
};
use log::info;
use rand::{rngs::SmallRng, SeedableRng};
use std::convert::TryFrom;
use std::{fs, marker::PhantomData, path::Path, sync::Arc};

/// Categorical DQN agent.
///
/// Actions are chosen epsilon-greedily on the expected values of the online
/// network in training mode and greedily in evaluation mode. Each optimization
/// step samples a batch from the replay buffer and takes a gradient step on
/// the loss from [`calc_loss`]. The target network is synced every
/// `sync_interval` optimization steps.
pub struct CategoricalDqn<E, R>
where
    E: Env,
    E::Obs: TensorObs,
    E::Act: From<i64> + Into<i64>,
    R: ReplayBufferBase<Batch = Vec<Transition<E::Obs, E::Act>>>,
{
    qnet: CategoricalModel,
    qnet_tgt: TargetNet,
    support: Arc<Support>,
    batch_size: usize,
    discount_factor: f64,
    sync_interval: usize,
    explorer: EpsilonGreedy,
    train: bool,
    n_opts: usize,
    device: Device,
    rng: SmallRng,
    phantom: PhantomData<(E, R)>,
}

impl<E, R> CategoricalDqn<E, R>
where
    E: Env,
    E::Obs: TensorObs,
    E::Act: From<i64> + Into<i64>,
    R: ReplayBufferBase<Batch = Vec<Transition<E::Obs, E::Act>>>,
{
    /// Constructs the agent.
    pub fn build(config: CategoricalDqnConfig) -> Result<Self> {
        let device = config
            .device
            .ok_or_else(|| CatDqnError::MissingConfig("device".to_string()))?;
        let device = Device::try_from(device)?;
        let support = Arc::new(Support::build(&config.support, &device)?);
        let qnet = CategoricalModel::build(&config.model_config, support.clone(), &device)?;
        let qnet_tgt = TargetNet::build(&config.model_config, support.clone(), &device, &qnet)?;

        Ok(Self {
            qnet,
            qnet_tgt,
            support,
            batch_size: config.batch_size,
            discount_factor: config.discount_factor,
            sync_interval: config.sync_interval.max(1),
            explorer: config.explorer,
            train: config.train,
            n_opts: 0,
            device,
            rng: SmallRng::seed_from_u64(config.seed),
            phantom: PhantomData,
        })
    }

    /// The support shared by the online and target networks.
    pub fn support(&self) -> &Arc<Support> {
        &self.support
    }

    /// Number of optimization steps so far.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// Current epsilon of the explorer.
    pub fn epsilon(&self) -> f64 {
        self.explorer.epsilon()
    }

    /// The online network.
    pub fn qnet(&self) -> &CategoricalModel {
        &self.qnet
    }

    /// The target network.
    pub fn qnet_tgt(&self) -> &TargetNet {
        &self.qnet_tgt
    }

    /// Expected action values of the online network for a batch of observations.
    pub fn q_values(&self, obs: &Tensor) -> Result<Tensor> {
        self.qnet.forward(&obs.to_device(&self.device)?)
    }

    /// Overwrites the target network with the online network.
    pub fn sync_target(&mut self) -> Result<()> {
        self.qnet_tgt.sync(&self.qnet)
    }

    fn update_critic(&mut self, buffer: &mut R) -> Result<f32> {
        let batch = buffer.batch(self.batch_size)?;
        let loss = calc_loss(
            &batch,
            self.qnet.q_values(),
            self.qnet_tgt.q_values(),
            self.discount_factor,
        )?;
        self.qnet.backward_step(&loss)?;
        Ok(loss.to_scalar::<f32>()?)
    }

    fn opt_(&mut self, buffer: &mut R) -> Result<Record> {
        let loss = self.update_critic(buffer)?;
        self.n_opts += 1;

        if self.n_opts % self.sync_interval == 0 {
            self.sync_target()?;
            info!("Synced target network at {} optimization steps", self.n_opts);
        }

        Ok(Record::from_slice(&[("loss", RecordValue::Scalar(loss))]))
    }
}

impl<E, R> Policy<E> for CategoricalDqn<E, R>
where
    E: Env,
    E::Obs: TensorObs,
    E::Act: From<i64> + Into<i64>,
    R: ReplayBufferBase<Batch = Vec<Transition<E::Obs, E::Act>>>,
{
    fn sample(&mut self, obs: &E::Obs) -> Result<E::Act> {
        let obs = obs.to_tensor()?.unsqueeze(0)?.to_device(&self.device)?;
        let q = self.qnet.forward(&obs)?;
        let a = match self.train {
            true => self.explorer.action(&q, &mut self.rng)?,
            false => q.argmax(D::Minus1)?.to_dtype(DType::I64)?,
        };
        let a = a.squeeze(0)?.to_scalar::<i64>()?;
        Ok(a.into())
    }
}

impl<E, R> Agent<E, R> for CategoricalDqn<E, R>
where
    E: Env,
    E::Obs: TensorObs,
    E::Act: From<i64> + Into<i64>,
    R: ReplayBufferBase<Batch = Vec<Transition<E::Obs, E::Act>>>,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt(&mut self, buffer: &mut R) -> Result<Record> {
        self.opt_(buffer)
    }

    fn status(&self) -> Record {
        Record::from_slice(&[
            ("epsilon", RecordValue::Scalar(self.explorer.epsilon() as f32)),
            ("n_opts", RecordValue::Scalar(self.n_opts as f32)),
        ])
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        self.qnet.save(path.join("qnet.safetensors"))?;
        self.qnet_tgt.save(path.join("qnet_tgt.safetensors"))?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.qnet.load(path.join("qnet.safetensors"))?;
        self.qnet_tgt.load(path.join("qnet_tgt.safetensors"))?;
        Ok(())
    }
}
