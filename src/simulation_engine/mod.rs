// simulation_engine/mod.rs
pub mod intersections;
pub mod simulation;
pub mod vehicles;
