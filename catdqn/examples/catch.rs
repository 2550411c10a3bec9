use anyhow::Result;
use catdqn::{
    catch::{CatchAct, CatchEnv, CatchEnvConfig, CatchObs},
    presets::Preset,
};
use catdqn_candle_agent::{
    c51::{CategoricalDqn, CategoricalDqnConfig},
    Device,
};
use catdqn_core::{
    record::{NullRecorder, Recorder},
    replay_buffer::{SimpleReplayBuffer, SimpleReplayBufferConfig, SimpleStepProcessor},
    Agent, Env as _, Policy, Trainer, TrainerConfig,
};
use catdqn_tensorboard::TensorboardRecorder;
use clap::Parser;
use log::info;
use std::path::{Path, PathBuf};

type Env = CatchEnv;
type StepProc = SimpleStepProcessor<Env>;
type ReplayBuffer = SimpleReplayBuffer<CatchObs, CatchAct>;
type Dqn = CategoricalDqn<Env, ReplayBuffer>;

/// Train a categorical DQN agent on the catch game.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Hyperparameter preset, pong or invaders
    #[arg(long, default_value = "pong")]
    preset: Preset,

    /// Directory where configurations, logs and parameters are stored
    #[arg(long, default_value = "./catdqn/examples/model/c51_catch")]
    model_dir: PathBuf,

    /// Load configurations from `agent.yaml`, `trainer.yaml` and `replay_buffer.yaml`
    /// in the model directory instead of the preset
    #[arg(long, default_value_t = false)]
    load_config: bool,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<usize>,

    /// Play greedily with the trained parameters for this many episodes
    #[arg(long)]
    play: Option<usize>,

    /// Run the networks on the first CUDA device
    #[arg(long, default_value_t = false)]
    cuda: bool,

    /// Do not write TensorBoard logs
    #[arg(long, default_value_t = false)]
    no_tensorboard: bool,

    /// Show configurations and exit
    #[arg(long, default_value_t = false)]
    show_config: bool,
}

struct Configs {
    agent: CategoricalDqnConfig,
    trainer: TrainerConfig,
    replay_buffer: SimpleReplayBufferConfig,
}

impl Configs {
    fn new(args: &Args) -> Result<Self> {
        let dir = &args.model_dir;
        let mut configs = match args.load_config {
            true => Self {
                agent: CategoricalDqnConfig::load(dir.join("agent.yaml"))?,
                trainer: TrainerConfig::load(dir.join("trainer.yaml"))?,
                replay_buffer: SimpleReplayBufferConfig::load(dir.join("replay_buffer.yaml"))?,
            },
            false => Self {
                agent: args.preset.agent_config(CatchEnv::N_ACTIONS),
                trainer: args.preset.trainer_config(),
                replay_buffer: args.preset.replay_buffer_config(),
            },
        };

        let device = match args.cuda {
            true => Device::Cuda(0),
            false => Device::Cpu,
        };
        configs.agent = configs.agent.device(device);
        configs.trainer = configs
            .trainer
            .model_dir(dir.to_string_lossy().to_string());
        if let Some(max_frames) = args.max_frames {
            configs.trainer = configs.trainer.max_frames(max_frames);
        }
        Ok(configs)
    }

    fn show(&self) -> Result<()> {
        println!("{}", serde_yaml::to_string(&self.agent)?);
        println!("{}", serde_yaml::to_string(&self.trainer)?);
        println!("{}", serde_yaml::to_string(&self.replay_buffer)?);
        Ok(())
    }

    fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        self.agent.save(dir.join("agent.yaml"))?;
        self.trainer.save(dir.join("trainer.yaml"))?;
        self.replay_buffer.save(dir.join("replay_buffer.yaml"))?;
        Ok(())
    }
}

fn create_recorder(args: &Args) -> Box<dyn Recorder> {
    match args.no_tensorboard {
        true => Box::new(NullRecorder::new()),
        false => Box::new(TensorboardRecorder::new(&args.model_dir)),
    }
}

fn train(args: &Args, configs: Configs) -> Result<()> {
    configs.save(&args.model_dir)?;
    let mut agent = Dqn::build(configs.agent)?;
    let mut recorder = create_recorder(args);
    let mut trainer = Trainer::<Env, StepProc, ReplayBuffer>::build(
        configs.trainer,
        CatchEnvConfig::default(),
        Default::default(),
        configs.replay_buffer,
    );
    let summary = trainer.train(&mut agent, recorder.as_mut())?;
    info!("{:?}", summary);
    Ok(())
}

fn play(args: &Args, configs: Configs, n_episodes: usize) -> Result<()> {
    let mut agent = Dqn::build(configs.agent)?;
    agent.load_params(&args.model_dir)?;
    agent.eval();

    let mut env = Env::build(&CatchEnvConfig::default(), 1)?;
    for ix in 0..n_episodes {
        let mut obs = env.reset()?;
        let mut ret = 0.0;
        loop {
            let act = agent.sample(&obs)?;
            let (step, _) = env.step(&act)?;
            ret += step.reward;
            if step.is_done() {
                break;
            }
            obs = step.obs;
        }
        info!("Episode {}: return {}", ix, ret);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let configs = Configs::new(&args)?;

    if args.show_config {
        configs.show()
    } else if let Some(n_episodes) = args.play {
        play(&args, configs, n_episodes)
    } else {
        train(&args, configs)
    }
}
