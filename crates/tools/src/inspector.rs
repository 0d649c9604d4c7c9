use orrery_common::Vector3;
use orrery_kernel::World;
use orrery_kernel::diagnostics::{total_energy, total_mass, total_momentum};
use serde::Serialize;

/// World inspector for developer tooling.
///
/// Provides read-only queries against the world state for debugging,
/// profiling, and the body panels of the UI.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state. `g` is the gravitational
    /// constant used for the energy figure.
    pub fn summary(world: &World, g: f64) -> WorldSummary {
        let bodies = world.bodies();
        WorldSummary {
            tick: world.tick(),
            elapsed: world.elapsed(),
            body_count: bodies.len(),
            mesh_count: world.mesh_count(),
            pending_events: world.events().len(),
            total_mass: total_mass(bodies),
            momentum: total_momentum(bodies),
            total_energy: total_energy(bodies, g),
        }
    }

    /// Snapshot of a single body, if the index exists.
    pub fn inspect_body(world: &World, index: usize) -> Option<BodyInfo> {
        world.body(index).map(|body| BodyInfo {
            index,
            mass: body.mass(),
            position: body.position(),
            velocity: body.velocity(),
            acceleration: body.acceleration(),
        })
    }

    /// Snapshot of every body in index order.
    pub fn list_bodies(world: &World) -> Vec<BodyInfo> {
        (0..world.body_count())
            .filter_map(|i| Self::inspect_body(world, i))
            .collect()
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSummary {
    pub tick: u64,
    pub elapsed: f64,
    pub body_count: usize,
    pub mesh_count: usize,
    pub pending_events: usize,
    pub total_mass: f64,
    pub momentum: Vector3,
    pub total_energy: f64,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: tick={} t={:.1}s bodies={} meshes={} pending_events={} mass={:.4e} |p|={:.6e} E={:.6e}",
            self.tick,
            self.elapsed,
            self.body_count,
            self.mesh_count,
            self.pending_events,
            self.total_mass,
            self.momentum.magnitude(),
            self.total_energy,
        )
    }
}

/// Detailed info about a single body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyInfo {
    pub index: usize,
    pub mass: f64,
    pub position: Vector3,
    pub velocity: Vector3,
    pub acceleration: Vector3,
}

impl std::fmt::Display for BodyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (p, v) = (self.position, self.velocity);
        write!(
            f,
            "Body [{}] m={:.4e} pos=({:.4e}, {:.4e}, {:.4e}) vel=({:.3}, {:.3}, {:.3})",
            self.index, self.mass, p.x, p.y, p.z, v.x, v.y, v.z,
        )
    }
}
