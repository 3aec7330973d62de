pub mod config;
pub mod error;
pub mod execution;
pub mod intent;
pub mod market;
pub mod markov;
pub mod message;
pub mod model;
pub mod orchestrator;
pub mod portfolio;
pub mod scorer;
pub mod transport;
pub mod worker;
