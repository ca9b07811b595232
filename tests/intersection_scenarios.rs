//! Hand-driven scenarios combining the controller with individual vehicles.

use four_way_signal::communication::{Observer, SimulationEvent};
use four_way_signal::control_system::TrafficLightController;
use four_way_signal::simulation_engine::intersections::{Axis, Direction, GateSet, LightState};
use four_way_signal::simulation_engine::vehicles::Vehicle;
use four_way_signal::SimulationConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::sleep;

fn drain(rx: &mut UnboundedReceiver<SimulationEvent>) -> Vec<SimulationEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn light(axis: Axis, light: LightState) -> SimulationEvent {
    SimulationEvent::LightChanged { axis, light }
}

#[tokio::test(start_paused = true)]
async fn lone_northbound_vehicle() {
    let gates = Arc::new(GateSet::new());
    let (observer, mut rx) = Observer::channel();

    // Vehicle arrives first, with every gate still closed.
    let vehicle = Vehicle::new(
        1,
        Direction::North,
        Duration::from_secs(1),
        Arc::clone(&gates),
    );
    let journey = tokio::spawn(vehicle.journey(observer.clone()));
    while gates.gate(Direction::North).waiters() == 0 {
        tokio::task::yield_now().await;
    }
    assert_eq!(
        drain(&mut rx),
        vec![SimulationEvent::VehicleApproaching {
            vehicle_id: 1,
            direction: Direction::North
        }]
    );

    let controller =
        TrafficLightController::new(Arc::clone(&gates), &SimulationConfig::default(), observer)
            .spawn();
    let report = journey.await.unwrap();
    assert_eq!(report.direction, Direction::North);

    let events = drain(&mut rx);
    assert_eq!(
        events,
        vec![
            light(Axis::NorthSouth, LightState::Green),
            SimulationEvent::VehiclePassing {
                vehicle_id: 1,
                direction: Direction::North
            },
            SimulationEvent::VehicleCleared {
                vehicle_id: 1,
                direction: Direction::North
            },
        ]
    );
    // Released unit is back; the controller's own posted unit is the only capacity.
    assert_eq!(gates.capacities(), [1, 0, 1, 0]);

    // After red the controller has drained exactly what it posted.
    sleep(Duration::from_millis(5_500)).await;
    assert_eq!(gates.capacities(), [0, 1, 0, 1]);

    assert_eq!(controller.stop().await.unwrap(), 0);
    assert_eq!(gates.capacities(), [0, 0, 0, 0]);
}

#[tokio::test(start_paused = true)]
async fn cross_traffic_queues_during_north_south_green() {
    let gates = Arc::new(GateSet::new());
    let (observer, mut rx) = Observer::channel();
    let controller = TrafficLightController::new(
        Arc::clone(&gates),
        &SimulationConfig::default(),
        observer.clone(),
    )
    .spawn();

    sleep(Duration::from_millis(100)).await;
    let westbound = tokio::spawn(
        Vehicle::new(
            7,
            Direction::West,
            Duration::from_secs(1),
            Arc::clone(&gates),
        )
        .journey(observer.clone()),
    );

    // Still North-South green: the westbound vehicle must be queued.
    sleep(Duration::from_secs(2)).await;
    assert!(!westbound.is_finished());
    assert_eq!(gates.gate(Direction::West).waiters(), 1);

    let report = westbound.await.unwrap();
    // Opened at the 5s East-West green, arrived at 0.1s.
    assert_eq!(report.waited, Duration::from_millis(4_900));

    let events = drain(&mut rx);
    let east_west_green = events
        .iter()
        .position(|e| *e == light(Axis::EastWest, LightState::Green))
        .unwrap();
    let passing = events
        .iter()
        .position(|e| matches!(e, SimulationEvent::VehiclePassing { vehicle_id: 7, .. }))
        .unwrap();
    assert!(east_west_green < passing);

    controller.stop().await.unwrap();
    assert_eq!(gates.capacities(), [0, 0, 0, 0]);
}

#[tokio::test(start_paused = true)]
async fn same_direction_vehicles_share_one_unit() {
    let gates = Arc::new(GateSet::new());
    let (observer, _rx) = Observer::channel();

    let mut journeys = Vec::new();
    for id in 0..3 {
        let vehicle = Vehicle::new(
            id,
            Direction::South,
            Duration::from_secs(1),
            Arc::clone(&gates),
        );
        journeys.push(tokio::spawn(vehicle.journey(observer.clone())));
    }
    while gates.gate(Direction::South).waiters() < 3 {
        tokio::task::yield_now().await;
    }

    let controller =
        TrafficLightController::new(Arc::clone(&gates), &SimulationConfig::default(), observer)
            .spawn();

    let mut waits = Vec::new();
    for journey in journeys {
        waits.push(journey.await.unwrap().waited);
    }
    waits.sort();
    // One posted unit per gate, so southbound vehicles cross one after another.
    assert_eq!(
        waits,
        vec![
            Duration::ZERO,
            Duration::from_secs(1),
            Duration::from_secs(2)
        ]
    );

    controller.stop().await.unwrap();
    assert_eq!(gates.capacities(), [0, 0, 0, 0]);
}
