use rand::{seq::SliceRandom, Rng};

use crate::ds::OverwriteBuffer;

use super::{Exp, ExpBatch, MemoryError};

/// A fixed-size memory storage for reinforcement learning experiences
///
/// Experiences are appended until the memory reaches its capacity. From then on
/// each new experience replaces a uniformly random stored one.
///
/// ### Fields:
/// - `memory`: An `OverwriteBuffer` that stores the experiences
#[derive(Debug, Clone)]
pub struct ReplayMemory {
    memory: OverwriteBuffer<Exp>,
}

impl ReplayMemory {
    /// **Panics** if `capacity` is zero
    pub fn new(capacity: usize) -> Self {
        Self {
            memory: OverwriteBuffer::new(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.memory.capacity()
    }

    /// Add a new experience to the memory
    pub fn push(&mut self, exp: Exp, rng: &mut impl Rng) {
        self.memory.push(exp, rng);
    }

    /// Sample `batch_size` distinct experiences uniformly from the memory
    ///
    /// ### Errors
    /// [`MemoryError::InsufficientReplayData`] if fewer than `batch_size` experiences are stored
    pub fn sample(&self, batch_size: usize, rng: &mut impl Rng) -> Result<Vec<&Exp>, MemoryError> {
        self.check(batch_size)?;
        Ok(self.memory.view().choose_multiple(rng, batch_size).collect())
    }

    /// Sample a random batch of experiences from the memory and zip the vector of tuples into a tuple of vectors
    ///
    /// ### Errors
    /// [`MemoryError::InsufficientReplayData`] if fewer than `batch_size` experiences are stored
    pub fn sample_zipped(
        &self,
        batch_size: usize,
        rng: &mut impl Rng,
    ) -> Result<ExpBatch, MemoryError> {
        self.check(batch_size)?;
        let experiences = self.memory.view().choose_multiple(rng, batch_size);
        Ok(ExpBatch::from_iter(experiences, batch_size))
    }

    fn check(&self, batch_size: usize) -> Result<(), MemoryError> {
        if batch_size <= self.memory.len() {
            Ok(())
        } else {
            Err(MemoryError::InsufficientReplayData {
                requested: batch_size,
                available: self.memory.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use crate::gym::{Dir, GridWorld, Pos};

    use super::*;

    const MEMORY_CAP: usize = 4;
    const BATCH_SIZE: usize = 2;

    fn create_mock_exp(i: usize) -> Exp {
        let state = GridWorld::with_positions(Pos::new(1 + i % 10, 1), Pos::new(10, 10));
        let mut next_state = state.clone();
        next_state.attempt_move(Dir::Down);
        Exp {
            state,
            action: Dir::Down,
            next_state,
            reward: i as f32,
        }
    }

    #[test]
    fn replay_memory_functional() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut memory = ReplayMemory::new(MEMORY_CAP);

        assert_eq!(
            memory.sample(BATCH_SIZE, &mut rng).unwrap_err(),
            MemoryError::InsufficientReplayData {
                requested: BATCH_SIZE,
                available: 0
            },
            "sample errors when too few experiences"
        );

        memory.push(create_mock_exp(0), &mut rng);
        assert!(
            memory.sample_zipped(BATCH_SIZE, &mut rng).is_err(),
            "sample_zipped errors when too few experiences"
        );

        memory.push(create_mock_exp(1), &mut rng);
        assert!(
            memory.sample(BATCH_SIZE, &mut rng).is_ok_and(|b| b.len() == 2),
            "sample works"
        );
        assert!(
            memory
                .sample_zipped(BATCH_SIZE, &mut rng)
                .is_ok_and(|b| b.states.len() == 2),
            "sample_zipped works"
        );
    }

    #[test]
    fn capacity_is_never_exceeded() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut memory = ReplayMemory::new(MEMORY_CAP);
        for i in 0..=MEMORY_CAP {
            memory.push(create_mock_exp(i), &mut rng);
            assert!(memory.len() <= MEMORY_CAP, "size bounded by capacity");
        }
        assert_eq!(memory.len(), MEMORY_CAP, "full after capacity + 1 inserts");

        let rewards = memory
            .sample(MEMORY_CAP, &mut rng)
            .unwrap()
            .iter()
            .map(|e| e.reward)
            .collect::<Vec<_>>();
        assert!(rewards.contains(&(MEMORY_CAP as f32)), "newest experience stored");
    }

    #[test]
    fn sample_returns_distinct_slots() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut memory = ReplayMemory::new(16);
        for i in 0..10 {
            memory.push(create_mock_exp(i), &mut rng);
        }

        for k in [1, 5, 10] {
            let batch = memory.sample(k, &mut rng).unwrap();
            assert_eq!(batch.len(), k, "exactly k experiences");
            for (i, a) in batch.iter().enumerate() {
                for b in &batch[i + 1..] {
                    assert!(!std::ptr::eq(*a, *b), "no slot sampled twice");
                }
            }
        }

        assert!(
            memory.sample(11, &mut rng).is_err(),
            "more than stored is an error"
        );
    }
}
