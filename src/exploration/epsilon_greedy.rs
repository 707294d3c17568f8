use rand::Rng;

use crate::assert_interval;

use super::Choice;

/// Epsilon greedy exploration policy with a constant epsilon threshold
#[derive(Debug, Clone, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f64,
}

impl EpsilonGreedy {
    /// Initialize epsilon greedy policy with the probability of exploring
    ///
    /// **Panics** if `epsilon` is not in the interval `[0,1]`
    pub fn new(epsilon: f64) -> Self {
        assert_interval!(epsilon, 0.0, 1.0);
        Self { epsilon }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Invoke epsilon greedy policy
    pub fn choose(&self, rng: &mut impl Rng) -> Choice {
        if rng.gen::<f64>() >= self.epsilon {
            Choice::Exploit
        } else {
            Choice::Explore
        }
    }
}
