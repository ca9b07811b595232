// intersections.rs
use crate::sync::Semaphore;
use rand::distr::{Distribution, StandardUniform};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compass direction a vehicle approaches the intersection from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::North | Direction::South => Axis::NorthSouth,
            Direction::East | Direction::West => Axis::EastWest,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Direction::North => "North",
            Direction::East => "East",
            Direction::South => "South",
            Direction::West => "West",
        };
        f.write_str(name)
    }
}

/// Uniform choice among the four approaches.
impl Distribution<Direction> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        Direction::ALL[rng.random_range(0..Direction::ALL.len())]
    }
}

/// Pair of opposite approaches that share a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    NorthSouth,
    EastWest,
}

impl Axis {
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Axis::NorthSouth => [Direction::North, Direction::South],
            Axis::EastWest => [Direction::East, Direction::West],
        }
    }

    pub fn opposite(self) -> Axis {
        match self {
            Axis::NorthSouth => Axis::EastWest,
            Axis::EastWest => Axis::NorthSouth,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Axis::NorthSouth => f.write_str("North-South"),
            Axis::EastWest => f.write_str("East-West"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightState {
    Green,
    Yellow,
    Red,
}

/// The four approach gates of the intersection, one semaphore per direction.
///
/// Every gate starts closed (capacity 0). The controller opens an axis by posting
/// both of its gates; vehicles take a unit from their own gate while crossing.
#[derive(Debug, Default)]
pub struct GateSet {
    gates: [Semaphore; 4],
}

impl GateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gate(&self, direction: Direction) -> &Semaphore {
        &self.gates[direction.index()]
    }

    /// Adds one unit of capacity to both gates of `axis`.
    pub fn open(&self, axis: Axis) {
        for direction in axis.directions() {
            self.gate(direction).post();
        }
    }

    /// Takes back one unit from each gate of `axis`, one gate after the other.
    pub async fn close(&self, axis: Axis) {
        for direction in axis.directions() {
            self.gate(direction).wait().await;
        }
    }

    /// Available capacity per gate, in `Direction::ALL` order.
    pub fn capacities(&self) -> [usize; 4] {
        Direction::ALL.map(|direction| self.gate(direction).available())
    }
}
