// messages.rs
use crate::simulation_engine::intersections::{Axis, Direction, LightState};
use serde::{Deserialize, Serialize};

/// Observation emitted by the controller, the vehicles and the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimulationEvent {
    LightChanged {
        axis: Axis,
        light: LightState,
    },
    VehicleApproaching {
        vehicle_id: u64,
        direction: Direction,
    },
    VehiclePassing {
        vehicle_id: u64,
        direction: Direction,
    },
    VehicleCleared {
        vehicle_id: u64,
        direction: Direction,
    },
    SimulationComplete {
        vehicles: u64,
    },
}
