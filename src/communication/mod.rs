// communication/mod.rs
pub mod messages;
pub mod observer;

pub use messages::SimulationEvent;
pub use observer::{Observer, OutputFormat};
