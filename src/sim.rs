use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    algo::{DQNAgent, DQNAgentConfig, ValueModel},
    gym::{Dir, GridWorld},
};

/// Number of steps between two diagnostic reports
pub const REPORT_EVERY: u64 = 1000;

/// What happened during one [`Simulation::step`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub action: Dir,
    /// `false` if the agent bumped into a wall
    pub moved: bool,
    /// The agent reached the food, which has since been relocated
    pub food_eaten: bool,
    pub reward: i32,
    /// Loss of the last train step, if the agent trained
    pub loss: Option<f32>,
}

/// Periodic training diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub iteration: u64,
    /// Score before the reported step
    pub score: i64,
    /// Score change since the previous report
    pub score_gained: i64,
    /// First layer weights before the reported step
    pub weights: Vec<Vec<f32>>,
    /// Change of the first layer weights over the reported step
    pub delta: Vec<Vec<f32>>,
}

/// The agent living in its world, advanced one transition at a time
pub struct Simulation<M: ValueModel> {
    world: GridWorld,
    agent: DQNAgent<M>,
    rng: StdRng,
    iteration: u64,
    reported_score: i64,
    last_report: Option<Report>,
}

impl<M: ValueModel> Simulation<M> {
    /// Create a random world and an agent driven by `model`, all randomness derived from `seed`
    pub fn new(model: M, config: DQNAgentConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let world = GridWorld::new(&mut rng);
        let agent = DQNAgent::new(model, config, StdRng::seed_from_u64(rng.gen()));

        Self {
            world,
            agent,
            rng,
            iteration: 0,
            reported_score: 0,
            last_report: None,
        }
    }

    /// Replace the live world
    pub fn with_world(mut self, world: GridWorld) -> Self {
        self.world = world;
        self
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    pub fn agent(&self) -> &DQNAgent<M> {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut DQNAgent<M> {
        &mut self.agent
    }

    /// Number of steps taken so far
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn last_report(&self) -> Option<&Report> {
        self.last_report.as_ref()
    }

    /// Let the agent pick an action and apply it
    pub fn step(&mut self) -> StepOutcome {
        let action = self.agent.act(&self.world);
        self.apply(action)
    }

    /// Apply `action` to a copy of the world, reward the agent and commit the copy
    ///
    /// Rewards are `+1` for eating the food or getting strictly closer to it and
    /// `-1` for moving away, staying as far, or hitting a wall.
    pub fn apply(&mut self, action: Dir) -> StepOutcome {
        let snapshot = (self.iteration % REPORT_EVERY == 0)
            .then(|| (self.agent.score(), self.agent.model().first_layer_weights()));

        let mut next = self.world.clone();
        let moved = next.attempt_move(action);
        let food_eaten = moved && next.is_food_eaten();

        let reward = if food_eaten {
            next.move_food(&mut self.rng);
            1
        } else if moved && next.distance_to_food() < self.world.distance_to_food() {
            1
        } else {
            -1
        };

        let loss = self.agent.reward(reward, action, &self.world, &next);
        self.world = next;

        if let Some((score, weights)) = snapshot {
            self.report(score, weights);
        }
        self.iteration += 1;

        StepOutcome {
            action,
            moved,
            food_eaten,
            reward,
            loss,
        }
    }

    fn report(&mut self, score: i64, weights: Vec<Vec<f32>>) {
        let current = self.agent.model().first_layer_weights();
        let delta = current
            .iter()
            .zip(&weights)
            .map(|(now, then)| now.iter().zip(then).map(|(a, b)| a - b).collect())
            .collect();

        let report = Report {
            iteration: self.iteration,
            score,
            score_gained: score - self.reported_score,
            weights,
            delta,
        };
        self.reported_score = score;

        info!(
            "iteration {} score {} gained {}",
            report.iteration, report.score, report.score_gained
        );
        info!("first layer weights {:?}", report.weights);
        info!("first layer weight delta {:?}", report.delta);

        self.last_report = Some(report);
    }
}
