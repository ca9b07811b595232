// simulation.rs
use crate::communication::{Observer, SimulationEvent};
use crate::config::SimulationConfig;
use crate::control_system::TrafficLightController;
use crate::error::{Error, Result};
use crate::input::parse_vehicle_count;
use crate::simulation_engine::intersections::{Direction, GateSet};
use crate::simulation_engine::vehicles::{Vehicle, VehicleReport};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{sleep, Duration};

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationSummary {
    pub vehicles: u64,
    /// Vehicles that passed, indexed by `Direction::index`.
    pub per_direction: [u64; 4],
    pub controller_cycles: u64,
    pub longest_wait: Duration,
    /// Capacity left on each gate once the controller has stopped.
    pub residual_capacity: [usize; 4],
}

impl SimulationSummary {
    pub fn passed(&self, direction: Direction) -> u64 {
        self.per_direction[direction.index()]
    }
}

/// Crossing time: the configured base plus uniform jitter in `[0, crossing_jitter_ms)`.
pub fn crossing_time<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Duration {
    let jitter = if config.crossing_jitter_ms == 0 {
        Duration::ZERO
    } else {
        let bound = config.crossing_jitter_ms.saturating_mul(1_000);
        Duration::from_micros(rng.random_range(0..bound))
    };
    config.crossing_base() + jitter
}

/// Runs the whole intersection: starts the light controller, sends `vehicle_count`
/// vehicles from random directions one arrival interval apart, waits for all of
/// them to pass and stops the controller.
///
/// `vehicle_count` is expected to be validated already; an invalid `config` is
/// rejected before anything is spawned. A `seed` makes the sequence of directions
/// and crossing times reproducible.
pub async fn run_simulation(
    vehicle_count: u32,
    config: &SimulationConfig,
    seed: Option<u64>,
    observer: Observer,
) -> Result<SimulationSummary> {
    config.validate()?;
    let gates = Arc::new(GateSet::new());
    let controller =
        TrafficLightController::new(Arc::clone(&gates), config, observer.clone()).spawn();

    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    let total = u64::from(vehicle_count);
    let mut vehicles = JoinSet::new();
    for id in 1..=total {
        let direction: Direction = rng.random();
        let vehicle = Vehicle::new(
            id,
            direction,
            crossing_time(config, &mut rng),
            Arc::clone(&gates),
        );
        log::debug!("spawning vehicle {} from {}", id, direction);
        vehicles.spawn(vehicle.journey(observer.clone()));

        if id < total {
            sleep(config.arrival_interval()).await;
        }
    }

    let mut reports: Vec<VehicleReport> = Vec::with_capacity(vehicle_count as usize);
    let mut failure = None;
    while let Some(joined) = vehicles.join_next().await {
        match joined {
            Ok(report) => reports.push(report),
            Err(err) => {
                log::error!("vehicle task failed: {}", err);
                failure.get_or_insert(err);
            }
        }
    }

    if let Some(err) = failure {
        // A failed vehicle may still own a gate unit, so the controller could never
        // finish closing its axis.
        controller.abort();
        return Err(Error::VehicleTask(err));
    }

    let controller_cycles = controller.stop().await?;

    let mut per_direction = [0u64; 4];
    for report in &reports {
        per_direction[report.direction.index()] += 1;
    }
    let summary = SimulationSummary {
        vehicles: reports.len() as u64,
        per_direction,
        controller_cycles,
        longest_wait: reports
            .iter()
            .map(|report| report.waited)
            .max()
            .unwrap_or_default(),
        residual_capacity: gates.capacities(),
    };
    log::info!(
        "{} vehicles passed in {} light cycles, longest wait {:?}",
        summary.vehicles,
        summary.controller_cycles,
        summary.longest_wait
    );
    if summary.residual_capacity != [0; 4] {
        log::warn!(
            "gates left with capacity {:?} after shutdown",
            summary.residual_capacity
        );
    }

    observer.emit(SimulationEvent::SimulationComplete {
        vehicles: summary.vehicles,
    });
    Ok(summary)
}

/// Validates `config` and the raw vehicle count, then runs the simulation with its
/// observations going to the sink built by `start_sink`.
///
/// Rejected input returns before the sink, the controller or any vehicle is started.
/// The sink receives the validated count and is awaited after the run, even a
/// failed one, so it can finish writing what was emitted.
pub async fn launch<F>(
    raw_count: &str,
    config: &SimulationConfig,
    seed: Option<u64>,
    start_sink: F,
) -> Result<SimulationSummary>
where
    F: FnOnce(u32, UnboundedReceiver<SimulationEvent>) -> JoinHandle<usize>,
{
    config.validate()?;
    let vehicle_count = parse_vehicle_count(raw_count, config)?;

    let (observer, rx) = Observer::channel();
    let sink = start_sink(vehicle_count, rx);
    let outcome = run_simulation(vehicle_count, config, seed, observer).await;

    match sink.await {
        Ok(written) => log::debug!("sink took {} observations", written),
        Err(err) => log::warn!("observation sink failed: {}", err),
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_time_stays_in_jitter_window() {
        let config = SimulationConfig::default();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..200 {
            let t = crossing_time(&config, &mut rng);
            assert!(t >= Duration::from_secs(1));
            assert!(t < Duration::from_millis(1_005));
        }
    }

    #[test]
    fn zero_jitter_gives_base_time() {
        let config = SimulationConfig {
            crossing_jitter_ms: 0,
            ..SimulationConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(crossing_time(&config, &mut rng), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_jitter_is_rejected_before_spawning() {
        let config = SimulationConfig {
            crossing_jitter_ms: u64::MAX / 100,
            ..SimulationConfig::default()
        };
        let (observer, mut rx) = Observer::channel();
        let result = run_simulation(10, &config, Some(3), observer).await;
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
        // No controller ever announced a light.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn small_run_reports_every_vehicle() {
        let (observer, _rx) = Observer::channel();
        let summary = run_simulation(12, &SimulationConfig::default(), Some(5), observer)
            .await
            .unwrap();
        assert_eq!(summary.vehicles, 12);
        assert_eq!(summary.per_direction.iter().sum::<u64>(), 12);
        assert_eq!(summary.residual_capacity, [0; 4]);
        // Arrivals span 22s and a cycle takes 10s.
        assert!(summary.controller_cycles >= 1);
    }
}
