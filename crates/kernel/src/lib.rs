//! Simulation kernel: authoritative body state and gravitational stepping.
//!
//! # Invariants
//! - Every body has finite, strictly positive mass.
//! - Body count never changes during a step.
//! - Each unordered body pair contributes exactly once per step, with equal
//!   and opposite forces.
//! - The simulator borrows bodies per call and holds no world state.

pub mod body;
pub mod diagnostics;
pub mod force;
pub mod scenario;
pub mod scene;
pub mod simulator;
pub mod timestep;
pub mod world;

pub use body::{Body, BodyError};
pub use force::{DirectSummation, ForceAccumulator, ParallelDirectSummation};
pub use scenario::{Scenario, ScenarioError};
pub use scene::{Camera, MAX_SPHERE_SEGMENTS, Mesh, Triangle, Vertex};
pub use simulator::{GRAVITATIONAL_CONSTANT, Simulator, SimulatorConfig, SimulatorError};
pub use timestep::{DEFAULT_MAX_STEPS, FixedTimestep, TimestepError};
pub use world::{World, WorldError, WorldEvent};

pub fn crate_info() -> &'static str {
    "orrery-kernel v0.1.0"
}
