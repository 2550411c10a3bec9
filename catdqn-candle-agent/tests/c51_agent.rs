use anyhow::Result;
use candle_core::{DType, Tensor};
use catdqn_candle_agent::{
    c51::{
        CategoricalDqn, CategoricalDqnConfig, CategoricalModelConfig, CategoricalNetConfig,
        EpsilonGreedy,
    },
    opt::OptimizerConfig,
    Device, TensorObs,
};
use catdqn_core::{
    error::CatDqnError,
    record::Record,
    replay_buffer::{SimpleReplayBuffer, SimpleReplayBufferConfig, Transition},
    Act, Agent, Env, ExperienceBufferBase, Obs, Policy, ReplayBufferBase, Step,
};
use tempdir::TempDir;

const SHAPE: [usize; 3] = [1, 36, 36];

#[derive(Clone, Debug)]
struct PixelObs(Vec<u8>);

impl Obs for PixelObs {}

impl TensorObs for PixelObs {
    fn to_tensor(&self) -> candle_core::Result<Tensor> {
        Tensor::from_slice(&self.0, (SHAPE[0], SHAPE[1], SHAPE[2]), &candle_core::Device::Cpu)
    }
}

impl PixelObs {
    fn filled(v: u8) -> Self {
        Self(vec![v; SHAPE.iter().product()])
    }
}

#[derive(Clone, Debug, PartialEq)]
struct PixelAct(i64);

impl Act for PixelAct {}

impl From<i64> for PixelAct {
    fn from(a: i64) -> Self {
        Self(a)
    }
}

impl From<PixelAct> for i64 {
    fn from(a: PixelAct) -> Self {
        a.0
    }
}

/// Action 0 gives reward 1, episodes last four steps.
struct PixelEnv {
    t: u8,
}

impl Env for PixelEnv {
    type Config = ();
    type Obs = PixelObs;
    type Act = PixelAct;
    type Info = ();

    fn build(_config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self { t: 0 })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        self.t += 1;
        let reward = if a.0 == 0 { 1.0 } else { 0.0 };
        let obs = PixelObs::filled(self.t * 50);
        let step = Step::new(obs, a.clone(), reward, self.t == 4, false, (), None);
        Ok((step, Record::empty()))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.t = 0;
        Ok(PixelObs::filled(0))
    }
}

type Buffer = SimpleReplayBuffer<PixelObs, PixelAct>;
type Dqn = CategoricalDqn<PixelEnv, Buffer>;

fn config(n_actions: usize) -> CategoricalDqnConfig {
    CategoricalDqnConfig::default()
        .net_config(CategoricalNetConfig::default().in_shape(SHAPE))
        .n_actions(n_actions)
        .batch_size(4)
        .sync_interval(2)
        .device(Device::Cpu)
}

fn filled_buffer() -> Result<Buffer> {
    let mut buffer = Buffer::build(&SimpleReplayBufferConfig::default().capacity(100));
    for i in 0..8u8 {
        buffer.push(Transition {
            state: PixelObs::filled(i * 30),
            action: PixelAct((i % 3) as i64),
            reward: if i % 2 == 0 { 1.0 } else { -1.0 },
            is_done: i == 7,
            next_state: if i == 7 {
                None
            } else {
                Some(PixelObs::filled(i * 30 + 30))
            },
        })?;
    }
    Ok(buffer)
}

fn fixed_obs() -> Result<Tensor> {
    let shape = (5, SHAPE[0], SHAPE[1], SHAPE[2]);
    let x = Tensor::rand(0f32, 255f32, shape, &candle_core::Device::Cpu)?;
    Ok(x.to_dtype(DType::U8)?)
}

fn max_abs_diff(a: &Tensor, b: &Tensor) -> Result<f32> {
    Ok((a - b)?.abs()?.flatten_all()?.max(0)?.to_scalar::<f32>()?)
}

#[test]
fn test_atari_sized_zero_batch() -> Result<()> {
    let config = CategoricalDqnConfig::default()
        .net_config(CategoricalNetConfig::default())
        .device(Device::Cpu);
    let agent = Dqn::build(config)?;
    let obs = Tensor::zeros((8, 4, 84, 84), DType::U8, &candle_core::Device::Cpu)?;

    let atoms = agent.qnet().q_values().atoms(&obs)?;
    assert_eq!(atoms.dims(), &[8, 6, 51]);
    let q = agent.q_values(&obs)?;
    assert_eq!(q.dims(), &[8, 6]);
    let q: Vec<f32> = q.flatten_all()?.to_vec1()?;
    assert!(q.iter().all(|v| v.is_finite()));
    assert_eq!(agent.support().n_atoms(), 51);
    Ok(())
}

#[test]
fn test_target_synced_every_interval() -> Result<()> {
    let model_config = CategoricalModelConfig::default()
        .net_config(CategoricalNetConfig::default().in_shape(SHAPE).n_actions(3))
        .opt_config(OptimizerConfig::Adam { lr: 1e-2 });
    let mut agent = Dqn::build(config(3).model_config(model_config))?;
    let mut buffer = filled_buffer()?;
    let obs = fixed_obs()?;

    // Online and target networks start from the same parameters
    let q_tgt = agent.qnet_tgt().forward(&obs)?;
    assert_eq!(max_abs_diff(&agent.q_values(&obs)?, &q_tgt)?, 0.0);

    let record = agent.opt(&mut buffer)?;
    assert!(record.get_scalar("loss")?.is_finite());
    assert_eq!(agent.n_opts(), 1);
    assert!(max_abs_diff(&agent.q_values(&obs)?, &agent.qnet_tgt().forward(&obs)?)? > 0.0);
    // Target is untouched between syncs
    assert_eq!(max_abs_diff(&agent.qnet_tgt().forward(&obs)?, &q_tgt)?, 0.0);

    agent.opt(&mut buffer)?;
    assert_eq!(agent.qnet_tgt().n_syncs(), 2);
    assert_eq!(max_abs_diff(&agent.q_values(&obs)?, &agent.qnet_tgt().forward(&obs)?)?, 0.0);
    Ok(())
}

#[test]
fn test_opt_on_empty_buffer_fails() -> Result<()> {
    let mut agent = Dqn::build(config(3))?;
    let mut buffer = Buffer::build(&SimpleReplayBufferConfig::default());
    assert!(agent.opt(&mut buffer).is_err());
    assert_eq!(agent.n_opts(), 0);
    Ok(())
}

#[test]
fn test_sample_actions() -> Result<()> {
    let mut agent = Dqn::build(config(3).train(true))?;
    assert!(agent.is_train());
    let obs = PixelObs::filled(100);
    for _ in 0..20 {
        let a = agent.sample(&obs)?;
        assert!((0..3).contains(&a.0));
    }
    let eps = agent.status().get_scalar("epsilon")?;
    assert!(eps < 1.0);

    // Greedy in evaluation mode
    agent.eval();
    let a = agent.sample(&obs)?;
    for _ in 0..5 {
        assert_eq!(agent.sample(&obs)?, a);
    }
    Ok(())
}

#[test]
fn test_explorer_decays_per_sample() -> Result<()> {
    let explorer = EpsilonGreedy::default().final_step(10).eps_final(0.1);
    let mut agent = Dqn::build(config(3).explorer(explorer).train(true))?;
    let obs = PixelObs::filled(0);
    for _ in 0..10 {
        agent.sample(&obs)?;
    }
    assert!((agent.epsilon() - 0.1).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_save_and_load_params() -> Result<()> {
    let mut agent = Dqn::build(config(3))?;
    let mut buffer = filled_buffer()?;
    agent.opt(&mut buffer)?;

    let dir = TempDir::new("categorical_dqn")?;
    agent.save_params(dir.path())?;
    assert!(dir.path().join("qnet.safetensors").exists());
    assert!(dir.path().join("qnet_tgt.safetensors").exists());

    let mut agent_ = Dqn::build(config(3))?;
    agent_.load_params(dir.path())?;
    let obs = fixed_obs()?;
    assert_eq!(max_abs_diff(&agent.q_values(&obs)?, &agent_.q_values(&obs)?)?, 0.0);
    assert_eq!(
        max_abs_diff(
            &agent.qnet_tgt().forward(&obs)?,
            &agent_.qnet_tgt().forward(&obs)?
        )?,
        0.0
    );
    Ok(())
}

#[test]
fn test_missing_device() {
    let config = config(3);
    let config = CategoricalDqnConfig {
        device: None,
        ..config
    };
    match Dqn::build(config) {
        Err(e) => match e.downcast_ref::<CatDqnError>() {
            Some(CatDqnError::MissingConfig(key)) => assert_eq!(key, "device"),
            _ => panic!("unexpected error: {}", e),
        },
        Ok(_) => panic!("expected a missing config error"),
    }
}
