use crate::gym::{Dir, GridWorld, StateVector};

/// Represents a single experience or transition in the world
#[derive(Clone, Debug, PartialEq)]
pub struct Exp {
    /// Snapshot of the world before taking the action
    pub state: GridWorld,
    /// The action taken in the given state
    pub action: Dir,
    /// Snapshot of the world after the action is taken
    pub next_state: GridWorld,
    /// The reward received after taking the action
    pub reward: f32,
}

/// A zipped batch of [experiences](Exp), reduced to what the value model consumes
#[derive(Clone, Debug, PartialEq)]
pub struct ExpBatch {
    /// State vectors of the worlds before taking the action
    pub states: Vec<StateVector>,
    /// Indices of the actions taken
    pub actions: Vec<usize>,
    /// State vectors of the worlds after the action is taken
    pub next_states: Vec<StateVector>,
    /// The reward received after taking the action
    pub rewards: Vec<f32>,
}

impl ExpBatch {
    /// Construct an `ExpBatch` from an iterator of [experience](Exp) references and a specified batch size
    pub fn from_iter<'a>(iter: impl IntoIterator<Item = &'a Exp>, batch_size: usize) -> Self {
        let batch = Self {
            states: Vec::with_capacity(batch_size),
            actions: Vec::with_capacity(batch_size),
            next_states: Vec::with_capacity(batch_size),
            rewards: Vec::with_capacity(batch_size),
        };

        iter.into_iter().fold(batch, |mut b, e| {
            b.states.push(e.state.state_vector());
            b.actions.push(e.action.index());
            b.next_states.push(e.next_state.state_vector());
            b.rewards.push(e.reward);
            b
        })
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
