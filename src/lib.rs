// lib.rs
pub mod communication;
pub mod config;
pub mod control_system;
pub mod error;
pub mod global_variables;
pub mod input;
pub mod simulation_engine;
pub mod sync;

pub use config::SimulationConfig;
pub use error::{Error, Result};
pub use simulation_engine::simulation::{launch, run_simulation, SimulationSummary};
