/// A 1-step transition `(s, a, r, done, s')`.
///
/// `next_state` is `None` when the episode terminated on this step. The value
/// of such a state is zero whatever placeholder a consumer substitutes for it.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<O, A> {
    /// Observation the action was taken in.
    pub state: O,

    /// Action taken.
    pub action: A,

    /// Reward received for the action.
    pub reward: f32,

    /// Whether the episode ended on this step.
    pub is_done: bool,

    /// Observation after the action, `None` at the end of an episode.
    pub next_state: Option<O>,
}

impl<O, A> Transition<O, A> {
    /// Returns `true` if the next state must not be bootstrapped from.
    pub fn is_terminal(&self) -> bool {
        self.is_done || self.next_state.is_none()
    }
}
