/// Implemented RL algorithms
pub mod algo;

/// Data structures
pub mod ds;

/// Exploration policies
pub mod exploration;

/// The grid world the agent lives in
pub mod gym;

/// Experience replay
pub mod memory;

/// Terminal drawing of the world
pub mod render;

/// The step-by-step agent/world loop
pub mod sim;

/// Conversions into burn tensors
pub mod traits;

mod util;
