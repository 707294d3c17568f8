pub mod grid_world;

pub use grid_world::{Cell, Dir, GridWorld, Pos, StateVector, WORLD_SIZE};
