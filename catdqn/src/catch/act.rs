use catdqn_core::Act;

/// Action of [`CatchEnv`](super::CatchEnv).
///
/// `0` keeps the paddle still, `1` moves it left and `2` moves it right.
/// Other values keep it still as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatchAct(pub i64);

impl Act for CatchAct {}

impl From<i64> for CatchAct {
    fn from(act: i64) -> Self {
        Self(act)
    }
}

impl From<CatchAct> for i64 {
    fn from(act: CatchAct) -> Self {
        act.0
    }
}
