// control_system/mod.rs
pub mod traffic_light_controller;

pub use traffic_light_controller::{ControllerHandle, Phase, TrafficLightController};
