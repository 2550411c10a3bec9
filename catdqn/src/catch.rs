//! A falling ball game rendered as stacked pixel frames.
//!
//! A ball appears in a random column of the top row and falls one row per step.
//! The agent moves a paddle along the bottom row, earning `+1` when the ball lands
//! on the paddle and `-1` when it misses. An episode ends after a fixed number of
//! balls, so returns lie in `[-balls, balls]`.
//!
//! The grid is scaled up to the frame size, and the most recent frames are stacked
//! along the channel axis in the same layout as preprocessed Atari observations.
mod act;
mod config;
mod obs;
pub use act::CatchAct;
use anyhow::{ensure, Result};
pub use config::CatchEnvConfig;
use catdqn_core::{record::Record, Env, Step};
use log::trace;
pub use obs::CatchObs;
use rand::{rngs::StdRng, Rng, SeedableRng};

const FG: u8 = 255;

/// The catch game.
pub struct CatchEnv {
    config: CatchEnvConfig,
    rng: StdRng,

    /// Row and column of the ball.
    ball: (usize, usize),

    /// Column of the paddle.
    paddle: usize,

    /// Number of balls that reached the bottom row in the current episode.
    n_balls: usize,

    // Buffer for stacking frames
    frames: Vec<u8>,
}

impl CatchEnv {
    /// Stay, left and right.
    pub const N_ACTIONS: usize = 3;

    fn frame_len(&self) -> usize {
        self.config.shape[1] * self.config.shape[2]
    }

    fn spawn_ball(&mut self) {
        self.ball = (0, self.rng.gen_range(0..self.config.grid[1]));
    }

    fn fill_cell(&self, frame: &mut [u8], row: usize, col: usize) {
        let [_, h, w] = self.config.shape;
        let [rows, cols] = self.config.grid;
        let (ch, cw) = (h / rows, w / cols);
        for y in row * ch..(row + 1) * ch {
            let start = y * w + col * cw;
            frame[start..start + cw].iter_mut().for_each(|p| *p = FG);
        }
    }

    fn render(&self) -> Vec<u8> {
        let mut frame = vec![0; self.frame_len()];
        self.fill_cell(&mut frame, self.ball.0, self.ball.1);
        self.fill_cell(&mut frame, self.config.grid[0] - 1, self.paddle);
        frame
    }

    fn stack_frame(&mut self, frame: Vec<u8>) {
        let n = self.frame_len();
        let n_frames = self.config.shape[0];
        self.frames.copy_within(n.., 0);
        self.frames[(n_frames - 1) * n..].copy_from_slice(&frame);
    }

    fn obs(&self) -> CatchObs {
        CatchObs::new(self.frames.clone(), self.config.shape)
    }
}

impl Env for CatchEnv {
    type Config = CatchEnvConfig;
    type Obs = CatchObs;
    type Act = CatchAct;
    type Info = ();

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let [n_frames, h, w] = config.shape;
        let [rows, cols] = config.grid;
        ensure!(n_frames > 0, "At least one frame must be stacked");
        ensure!(rows >= 2 && cols >= 1, "Grid must have at least 2 rows and 1 column");
        ensure!(
            h >= rows && w >= cols,
            "Frame {}x{} is smaller than the grid {}x{}",
            h,
            w,
            rows,
            cols
        );
        ensure!(config.balls > 0, "An episode needs at least one ball");

        let mut env = Self {
            config: config.clone(),
            rng: StdRng::seed_from_u64(seed as u64),
            ball: (0, 0),
            paddle: cols / 2,
            n_balls: 0,
            frames: vec![0; n_frames * h * w],
        };
        env.spawn_ball();
        Ok(env)
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.paddle = self.config.grid[1] / 2;
        self.n_balls = 0;
        self.spawn_ball();

        let frame = self.render();
        let n = self.frame_len();
        for chunk in self.frames.chunks_mut(n) {
            chunk.copy_from_slice(&frame);
        }
        Ok(self.obs())
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        let cols = self.config.grid[1];
        self.paddle = match a.0 {
            1 => self.paddle.saturating_sub(1),
            2 => (self.paddle + 1).min(cols - 1),
            _ => self.paddle,
        };
        self.ball.0 += 1;

        let mut reward = 0.0;
        if self.ball.0 == self.config.grid[0] - 1 {
            reward = if self.ball.1 == self.paddle { 1.0 } else { -1.0 };
            self.n_balls += 1;
            trace!("Ball {} landed, reward {}", self.n_balls, reward);
            self.spawn_ball();
        }
        let is_terminated = self.n_balls >= self.config.balls;

        let frame = self.render();
        self.stack_frame(frame);
        let step = Step::new(self.obs(), *a, reward, is_terminated, false, (), None);
        Ok((step, Record::empty()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use candle_core::DType;
    use catdqn_candle_agent::TensorObs;

    fn small_config() -> CatchEnvConfig {
        CatchEnvConfig::default()
            .shape([2, 10, 5])
            .grid([5, 5])
            .balls(3)
    }

    /// Moves the paddle towards the column of the ball.
    fn follow(env: &CatchEnv) -> CatchAct {
        match env.ball.1 {
            c if c < env.paddle => CatchAct(1),
            c if c > env.paddle => CatchAct(2),
            _ => CatchAct(0),
        }
    }

    fn run_episode(
        env: &mut CatchEnv,
        policy: impl Fn(&CatchEnv) -> CatchAct,
    ) -> Result<(f32, usize)> {
        env.reset()?;
        let mut ret = 0.0;
        let mut len = 0;
        loop {
            let act = policy(&*env);
            let (step, _) = env.step(&act)?;
            ret += step.reward;
            len += 1;
            if step.is_done() {
                return Ok((ret, len));
            }
        }
    }

    #[test]
    fn test_reset_fills_every_frame() -> Result<()> {
        let mut env = CatchEnv::build(&small_config(), 0)?;
        let obs = env.reset()?;
        let (first, second) = obs.frames.split_at(50);
        assert_eq!(first, second);
        // Ball and paddle cells are 2x1 pixels
        assert_eq!(first.iter().filter(|&&p| p == FG).count(), 4);
        Ok(())
    }

    #[test]
    fn test_step_shifts_frames() -> Result<()> {
        let mut env = CatchEnv::build(&small_config(), 0)?;
        let obs0 = env.reset()?;
        let (step, _) = env.step(&CatchAct(0))?;
        assert_eq!(&step.obs.frames[..50], &obs0.frames[50..]);
        assert_ne!(&step.obs.frames[50..], &obs0.frames[50..]);
        Ok(())
    }

    #[test]
    fn test_following_the_ball_catches_everything() -> Result<()> {
        let mut env = CatchEnv::build(&small_config(), 7)?;
        let (ret, len) = run_episode(&mut env, follow)?;
        assert_eq!(ret, 3.0);
        assert_eq!(len, 3 * 4);
        Ok(())
    }

    #[test]
    fn test_moving_away_from_the_ball_misses() -> Result<()> {
        let mut env = CatchEnv::build(&small_config(), 7)?;
        let away = |env: &CatchEnv| match follow(env).0 {
            1 => CatchAct(2),
            2 => CatchAct(1),
            _ if env.paddle == 0 => CatchAct(2),
            _ => CatchAct(1),
        };
        let (ret, _) = run_episode(&mut env, away)?;
        assert_eq!(ret, -3.0);
        Ok(())
    }

    #[test]
    fn test_paddle_stays_on_the_grid() -> Result<()> {
        let mut env = CatchEnv::build(&small_config(), 0)?;
        env.reset()?;
        for _ in 0..3 {
            env.step(&CatchAct(1))?;
        }
        assert_eq!(env.paddle, 0);
        Ok(())
    }

    #[test]
    fn test_same_seed_same_balls() -> Result<()> {
        let mut env1 = CatchEnv::build(&small_config(), 3)?;
        let mut env2 = CatchEnv::build(&small_config(), 3)?;
        for _ in 0..2 {
            let (ret1, _) = run_episode(&mut env1, |_| CatchAct(0))?;
            let (ret2, _) = run_episode(&mut env2, |_| CatchAct(0))?;
            assert_eq!(ret1, ret2);
        }
        Ok(())
    }

    #[test]
    fn test_invalid_config() {
        let config = CatchEnvConfig::default().shape([4, 4, 4]).grid([5, 5]);
        assert!(CatchEnv::build(&config, 0).is_err());
        let config = CatchEnvConfig::default().shape([0, 84, 84]);
        assert!(CatchEnv::build(&config, 0).is_err());
    }

    #[test]
    fn test_default_obs_tensor() -> Result<()> {
        let mut env = CatchEnv::build(&CatchEnvConfig::default(), 0)?;
        let obs = env.reset()?.to_tensor()?;
        assert_eq!(obs.dims(), &[4, 84, 84]);
        assert_eq!(obs.dtype(), DType::U8);
        Ok(())
    }
}
