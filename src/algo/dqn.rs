use log::debug;
use rand::{rngs::StdRng, Rng};
use strum::VariantArray;

use crate::{
    exploration::{Choice, EpsilonGreedy},
    gym::{Dir, GridWorld, StateVector},
    memory::{Exp, ExpBatch, ReplayMemory},
};

/// Number of actions, one predicted value each
pub const NUM_ACTIONS: usize = Dir::VARIANTS.len();

/// Predicted return of each action, indexed by [`Dir::index`]
pub type ActionValues = [f32; NUM_ACTIONS];

/// An action-value approximator used by a [`DQNAgent`]
pub trait ValueModel {
    /// Predict the action values of every state in the batch
    fn predict(&self, states: &[StateVector]) -> Vec<ActionValues>;

    /// Index of the action with the highest predicted value in `state`
    fn best_action(&self, state: &StateVector) -> usize;

    /// Take one gradient step towards `targets` and return the loss before the step
    fn train_step(&mut self, states: &[StateVector], targets: &[ActionValues]) -> f32;

    /// Weights of the first layer as `[inputs][units]`, for diagnostics only
    fn first_layer_weights(&self) -> Vec<Vec<f32>> {
        Vec::new()
    }
}

/// Configuration for the [`DQNAgent`]
#[derive(Debug, Clone)]
pub struct DQNAgentConfig {
    /// Capacity of the agent's [`ReplayMemory`]
    ///
    /// Each stored [`Exp`] holds two full world snapshots, a little under 1 KB,
    /// so the default of one million reaches roughly 0.9 GB once full.
    pub memory_capacity: usize,
    /// Number of experiences replayed per learning step, also the minimum stored before learning starts
    pub batch_size: usize,
    /// The exploration policy
    pub exploration: EpsilonGreedy,
    /// The discount factor
    pub gamma: f32,
    /// Number of consecutive train steps per learning step
    pub train_repeats: usize,
}

impl Default for DQNAgentConfig {
    fn default() -> Self {
        Self {
            memory_capacity: 1_000_000,
            batch_size: 500,
            exploration: EpsilonGreedy::new(1.0 / 75.0),
            gamma: 0.75,
            train_repeats: 5,
        }
    }
}

/// A Deep Q Network agent learning online from replayed experiences
///
/// ### Generics
/// - `M`: The [`ValueModel`] producing one value per [`Dir`]
pub struct DQNAgent<M: ValueModel> {
    model: M,
    memory: ReplayMemory,
    exploration: EpsilonGreedy,
    gamma: f32,
    batch_size: usize,
    train_repeats: usize,
    score: i64,
    is_learning: bool,
    rng: StdRng,
}

impl<M: ValueModel> DQNAgent<M> {
    /// Initialize a new `DQNAgent`
    ///
    /// ### Arguments
    /// - `model` The [`ValueModel`] to act with and train
    /// - `config` A [`DQNAgentConfig`] containing components and hyperparameters for the agent
    /// - `rng` Random source for exploration and replay sampling
    pub fn new(model: M, config: DQNAgentConfig, rng: StdRng) -> Self {
        Self {
            model,
            memory: ReplayMemory::new(config.memory_capacity),
            exploration: config.exploration,
            gamma: config.gamma,
            batch_size: config.batch_size,
            train_repeats: config.train_repeats,
            score: 0,
            is_learning: true,
            rng,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }

    /// Sum of every reward received so far
    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn is_learning(&self) -> bool {
        self.is_learning
    }

    /// Keep acting and scoring, but stop storing experiences and training
    pub fn stop_learning(&mut self) {
        self.is_learning = false;
    }

    /// Invoke the agent's policy along with the exploration strategy to choose an action in `world`
    pub fn act(&mut self, world: &GridWorld) -> Dir {
        match self.exploration.choose(&mut self.rng) {
            Choice::Explore => Dir::VARIANTS[self.rng.gen_range(0..NUM_ACTIONS)],
            Choice::Exploit => {
                let ix = self.model.best_action(&world.state_vector());
                Dir::from_repr(ix).expect("model predicts one value per direction")
            }
        }
    }

    /// Credit the agent for a transition, remember it and learn from a replayed batch
    ///
    /// **Returns** the loss of the last train step, or `None` if no training happened
    pub fn reward(
        &mut self,
        reward: i32,
        action: Dir,
        state: &GridWorld,
        next_state: &GridWorld,
    ) -> Option<f32> {
        self.score += i64::from(reward);

        if !self.is_learning {
            return None;
        }

        self.memory.push(
            Exp {
                state: state.clone(),
                action,
                next_state: next_state.clone(),
                reward: reward as f32,
            },
            &mut self.rng,
        );

        self.learn()
    }

    /// Perform one DQN learning step
    fn learn(&mut self) -> Option<f32> {
        if self.memory.len() < self.batch_size {
            return None;
        }
        let batch = self
            .memory
            .sample_zipped(self.batch_size, &mut self.rng)
            .expect("memory holds a full batch");

        let predicted = self.model.predict(&batch.states);
        let next_predicted = self.model.predict(&batch.next_states);
        let targets = q_targets(predicted, &next_predicted, &batch, self.gamma);

        let mut loss = None;
        for _ in 0..self.train_repeats {
            loss = Some(self.model.train_step(&batch.states, &targets));
        }

        if let Some(loss) = loss {
            debug!("trained on {} experiences, loss {loss}", batch.len());
        }
        loss
    }
}

/// Build one-step Q-learning targets from the current predictions
///
/// Only the value of the action taken is replaced, by
/// `reward + gamma * max(next values)`; every other slot keeps its prediction
/// so it contributes no error.
pub fn q_targets(
    mut predicted: Vec<ActionValues>,
    next_predicted: &[ActionValues],
    batch: &ExpBatch,
    gamma: f32,
) -> Vec<ActionValues> {
    let rows = predicted
        .iter_mut()
        .zip(next_predicted)
        .zip(batch.actions.iter().zip(&batch.rewards));

    for ((values, next), (&action, &reward)) in rows {
        let max_next = next.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        values[action] = reward + gamma * max_next;
    }

    predicted
}
