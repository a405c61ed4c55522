use crate::env::{Move, Pos};

/// Represents a single learning iteration taken by a [`LearningAgent`](super::LearningAgent)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    /// The state the action was taken in
    pub state: Pos,
    /// The action taken in the given state
    pub action: Move,
    /// The reward of the state being left
    pub reward: f32,
    /// The state after the action is taken
    pub next_state: Pos,
    /// Whether the agent was respawned off a terminal cell before acting
    pub respawned: bool,
}

impl Step {
    /// The move was blocked by a wall or the edge of the grid
    pub fn bumped(&self) -> bool {
        self.state == self.next_state
    }
}
