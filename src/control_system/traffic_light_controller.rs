use crate::communication::{Observer, SimulationEvent};
use crate::config::SimulationConfig;
use crate::error::{Error, Result};
use crate::simulation_engine::intersections::{Axis, GateSet, LightState};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

/// One step of the light cycle: which axis is being served and what it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub axis: Axis,
    pub light: LightState,
}

impl Phase {
    pub const START: Phase = Phase {
        axis: Axis::NorthSouth,
        light: LightState::Green,
    };

    // Green -> Yellow -> Red, then the opposite axis turns green.
    pub fn next(self) -> Phase {
        match self.light {
            LightState::Green => Phase {
                light: LightState::Yellow,
                ..self
            },
            LightState::Yellow => Phase {
                light: LightState::Red,
                ..self
            },
            LightState::Red => Phase {
                axis: self.axis.opposite(),
                light: LightState::Green,
            },
        }
    }

    fn closing(axis: Axis) -> Phase {
        Phase {
            axis,
            light: LightState::Red,
        }
    }
}

/// Cycles the four gates: an axis is opened by posting its two gates, held through
/// green and yellow, then closed by draining one unit from each gate before the
/// opposite axis opens.
pub struct TrafficLightController {
    gates: Arc<GateSet>,
    observer: Observer,
    green: Duration,
    yellow: Duration,
    phase: Phase,
    cycles: u64,
}

impl TrafficLightController {
    pub fn new(gates: Arc<GateSet>, config: &SimulationConfig, observer: Observer) -> Self {
        Self {
            gates,
            observer,
            green: config.green(),
            yellow: config.yellow(),
            phase: Phase::START,
            cycles: 0,
        }
    }

    /// Spawns the light cycle as its own task.
    pub fn spawn(self) -> ControllerHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(stop_rx));
        ControllerHandle { stop_tx, task }
    }

    /// Runs the light cycle until `stop` flips to true or its sender is dropped.
    ///
    /// The stop signal is honoured between steps and cuts green/yellow holds short,
    /// but an axis that has been opened is always closed again before returning.
    /// Resolves to the number of completed North-South/East-West cycles. A cycle
    /// whose East-West window was cut short by the stop does not count.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) -> u64 {
        let mut cut_short = false;
        loop {
            let Phase { axis, light } = self.phase;
            match light {
                LightState::Green => {
                    if *stop.borrow() {
                        break;
                    }
                    cut_short = false;
                    self.announce();
                    self.gates.open(axis);
                    if !hold(self.green, &mut stop).await {
                        cut_short = true;
                        self.phase = Phase::closing(axis);
                        continue;
                    }
                }
                LightState::Yellow => {
                    self.announce();
                    if !hold(self.yellow, &mut stop).await {
                        cut_short = true;
                        self.phase = Phase::closing(axis);
                        continue;
                    }
                }
                LightState::Red => {
                    self.announce();
                    self.gates.close(axis).await;
                    if axis == Axis::EastWest && !cut_short {
                        self.cycles += 1;
                        log::debug!("light cycle {} complete", self.cycles);
                    }
                }
            }
            self.phase = self.phase.next();
        }

        log::info!(
            "traffic light controller stopped after {} cycles",
            self.cycles
        );
        self.cycles
    }

    fn announce(&self) {
        self.observer.emit(SimulationEvent::LightChanged {
            axis: self.phase.axis,
            light: self.phase.light,
        });
    }
}

// Sleeps for `duration`. Returns false if a stop was requested first.
async fn hold(duration: Duration, stop: &mut watch::Receiver<bool>) -> bool {
    if *stop.borrow() {
        return false;
    }
    tokio::select! {
        _ = sleep(duration) => true,
        // A dropped sender counts as a stop request.
        _ = stop.changed() => false,
    }
}

/// Owner side of a running controller task.
pub struct ControllerHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<u64>,
}

impl ControllerHandle {
    /// Requests a stop and waits for the controller to close its open axis and exit.
    /// Returns the number of completed light cycles.
    pub async fn stop(self) -> Result<u64> {
        if self.stop_tx.send(true).is_err() {
            log::debug!("controller already exited before stop request");
        }
        self.task.await.map_err(Error::ControllerTask)
    }

    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancels the controller task without letting it close its open axis.
    /// Only for fatal paths where the gates are being thrown away anyway.
    pub fn abort(self) {
        self.task.abort();
    }
}
