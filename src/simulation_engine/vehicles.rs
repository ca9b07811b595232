use crate::communication::{Observer, SimulationEvent};
use crate::simulation_engine::intersections::{Direction, GateSet};
use std::sync::Arc;
use tokio::time::{sleep, Duration, Instant};

/// A vehicle arriving at the intersection.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: u64,
    pub direction: Direction,
    /// How long the vehicle occupies the intersection once its gate lets it in.
    pub crossing_time: Duration,
    gates: Arc<GateSet>,
}

/// What a finished vehicle reports back to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleReport {
    pub id: u64,
    pub direction: Direction,
    /// Time spent at the gate before entering.
    pub waited: Duration,
}

impl Vehicle {
    pub fn new(id: u64, direction: Direction, crossing_time: Duration, gates: Arc<GateSet>) -> Self {
        Self {
            id,
            direction,
            crossing_time,
            gates,
        }
    }

    /// Approaches, waits for the gate of its direction, crosses and releases the gate.
    pub async fn journey(self, observer: Observer) -> VehicleReport {
        let gate = self.gates.gate(self.direction);

        observer.emit(SimulationEvent::VehicleApproaching {
            vehicle_id: self.id,
            direction: self.direction,
        });
        let arrived = Instant::now();
        gate.wait().await;
        let waited = arrived.elapsed();

        observer.emit(SimulationEvent::VehiclePassing {
            vehicle_id: self.id,
            direction: self.direction,
        });
        sleep(self.crossing_time).await;
        gate.post();

        observer.emit(SimulationEvent::VehicleCleared {
            vehicle_id: self.id,
            direction: self.direction,
        });
        log::debug!(
            "vehicle {} from {} waited {:?} at the gate",
            self.id,
            self.direction,
            waited
        );

        VehicleReport {
            id: self.id,
            direction: self.direction,
            waited,
        }
    }
}
