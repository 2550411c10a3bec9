use candle_core::{Device, Tensor};
use catdqn_candle_agent::TensorObs;
use catdqn_core::Obs;

/// Stacked frames of [`CatchEnv`](super::CatchEnv).
#[derive(Debug, Clone)]
pub struct CatchObs {
    /// Pixels in `[frames, height, width]` order, the most recent frame last.
    pub frames: Vec<u8>,
    shape: [usize; 3],
}

impl CatchObs {
    pub(super) fn new(frames: Vec<u8>, shape: [usize; 3]) -> Self {
        Self { frames, shape }
    }
}

impl Obs for CatchObs {}

impl TensorObs for CatchObs {
    fn to_tensor(&self) -> candle_core::Result<Tensor> {
        let [c, h, w] = self.shape;
        Tensor::from_slice(&self.frames, (c, h, w), &Device::Cpu)
    }
}
