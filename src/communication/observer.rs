// observer.rs
use crate::communication::messages::SimulationEvent;
use crate::simulation_engine::intersections::LightState;
use clap::ValueEnum;
use std::io::{self, Write};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

const GREEN: &str = "\x1b[0;92m";
const YELLOW: &str = "\x1b[0;93m";
const RED: &str = "\x1b[0;31m";
const RESET: &str = "\x1b[0m";

/// How observations are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Cloneable handle actors use to publish observations.
#[derive(Debug, Clone)]
pub struct Observer {
    tx: UnboundedSender<SimulationEvent>,
}

impl Observer {
    pub fn channel() -> (Self, UnboundedReceiver<SimulationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: SimulationEvent) {
        if let Err(err) = self.tx.send(event) {
            log::debug!("observation dropped, no receiver: {:?}", err.0);
        }
    }
}

pub fn render_text(event: &SimulationEvent) -> String {
    match event {
        SimulationEvent::LightChanged { axis, light } => {
            let (color, name) = match light {
                LightState::Green => (GREEN, "Green"),
                LightState::Yellow => (YELLOW, "Yellow"),
                LightState::Red => (RED, "Red"),
            };
            format!("{color}{name} light for {axis}{RESET}")
        }
        SimulationEvent::VehicleApproaching {
            vehicle_id,
            direction,
        } => format!("↕ Vehicle {vehicle_id} approaching from {direction}."),
        SimulationEvent::VehiclePassing {
            vehicle_id,
            direction,
        } => format!("↔ Vehicle {vehicle_id} passing through from {direction}."),
        SimulationEvent::VehicleCleared {
            vehicle_id,
            direction,
        } => format!("  Vehicle {vehicle_id} from {direction} cleared the intersection."),
        SimulationEvent::SimulationComplete { vehicles } => {
            format!("\nAll {vehicles} vehicles successfully passed through the intersection.")
        }
    }
}

pub fn render(event: &SimulationEvent, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(event),
        OutputFormat::Json => match serde_json::to_string(event) {
            Ok(line) => line,
            Err(err) => {
                log::error!("cannot serialize {:?}: {}", event, err);
                format!("{event:?}")
            }
        },
    }
}

/// Drains the observation stream to stdout until every `Observer` is dropped.
/// Resolves to the number of events written.
pub fn spawn_printer(
    mut rx: UnboundedReceiver<SimulationEvent>,
    format: OutputFormat,
) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut printed = 0;
        while let Some(event) = rx.recv().await {
            let line = render(&event, format);
            let written = {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{line}")
            };
            if let Err(err) = written {
                log::warn!("stdout closed, stopping printer: {}", err);
                break;
            }
            printed += 1;
        }
        printed
    })
}
