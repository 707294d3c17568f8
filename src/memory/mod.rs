mod base;
mod exp;

pub use base::ReplayMemory;
pub use exp::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("not enough experiences to sample: requested {requested}, stored {available}")]
    InsufficientReplayData { requested: usize, available: usize },
}
