#![allow(clippy::len_without_is_empty)]
use std::ops::Index;

use rand::Rng;

/// A bounded buffer that, once full, overwrites a uniformly random slot
///
/// Unlike a ring buffer it keeps no notion of age: every stored item is equally
/// likely to be evicted by the next insert.
#[derive(Debug, Clone)]
pub struct OverwriteBuffer<T> {
    buffer: Vec<T>,
    capacity: usize,
}

impl<T> OverwriteBuffer<T> {
    /// **Panics** if `capacity` is zero
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Buffer capacity must be positive.");
        Self {
            buffer: Vec::new(),
            capacity,
        }
    }

    /// Returns the number of stored items
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.capacity
    }

    /// Append an item, or overwrite a random slot when full, and return the write index
    pub fn push(&mut self, item: T, rng: &mut impl Rng) -> usize {
        if self.is_full() {
            let ix = rng.gen_range(0..self.capacity);
            self.buffer[ix] = item;
            ix
        } else {
            self.buffer.push(item);
            self.buffer.len() - 1
        }
    }

    /// Get a slice view of the internal buffer
    pub fn view(&self) -> &[T] {
        &self.buffer
    }
}

impl<T> Index<usize> for OverwriteBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.buffer[index]
    }
}
