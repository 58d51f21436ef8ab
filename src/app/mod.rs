//! Application layer: configuration and dependency wiring.

pub mod config;
pub mod container;

pub use config::{AgentConfig, PretrainConfig};
pub use container::{App, AppBuilder};
