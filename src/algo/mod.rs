pub mod dqn;
pub mod q_network;

pub use dqn::{DQNAgent, DQNAgentConfig, ValueModel};
pub use q_network::{QNetwork, QNetworkConfig};
