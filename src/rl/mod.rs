//! Reinforcement learning for the maze
//!
//! Provides:
//! - An environment wrapper around the maze engine
//! - The [`Agent`] contract shared by all learners
//! - Tabular Monte Carlo control and Q-learning
//! - A two-head actor-critic network and its agent
//! - Hyperparameter settings and model persistence

pub mod actor_critic;
pub mod agent;
pub mod backend;
pub mod environment;
pub mod monte_carlo;
pub mod network;
pub mod observation;
pub mod persistence;
pub mod q_learning;
pub mod q_table;
pub mod settings;

pub use actor_critic::ActorCriticAgent;
pub use agent::{Agent, Algorithm, LossReport, Transition};
pub use backend::{InferenceBackend, TrainingBackend, default_device};
pub use environment::MazeEnvironment;
pub use monte_carlo::MonteCarloAgent;
pub use network::{ActorCriticConfig, ActorCriticNetwork};
pub use observation::create_observation;
pub use persistence::{ModelMetadata, load_agent, load_network, save_model};
pub use q_learning::QLearningAgent;
pub use q_table::ActionValues;
pub use settings::AlgorithmSettings;
