//! Built-in starting configurations.

use crate::body::{Body, BodyError};
use crate::world::{World, WorldError};
use orrery_common::Vector3;

pub const EARTH_MASS: f64 = 5.972e24;
pub const MOON_MASS: f64 = 7.342e22;
/// Mean Earth-Moon distance in metres.
pub const MOON_DISTANCE: f64 = 3.844e8;
/// Moon orbital speed relative to Earth in m/s.
pub const MOON_SPEED: f64 = 1022.0;

/// Errors from populating a world with a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("invalid body: {0}")]
    Body(#[from] BodyError),
    #[error(transparent)]
    World(#[from] WorldError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scenario {
    /// Earth at rest at the origin, Moon on +x moving along +y.
    EarthMoon,
    /// `count` bodies scattered deterministically from `seed`.
    Cluster { count: usize, seed: u64 },
}

impl Scenario {
    pub fn name(&self) -> &'static str {
        match self {
            Self::EarthMoon => "earth-moon",
            Self::Cluster { .. } => "cluster",
        }
    }

    /// Append this scenario's bodies to `world`.
    pub fn populate(&self, world: &mut World) -> Result<(), ScenarioError> {
        match *self {
            Self::EarthMoon => {
                world.add_body(Body::new(EARTH_MASS, Vector3::ZERO, Vector3::ZERO)?)?;
                world.add_body(Body::new(
                    MOON_MASS,
                    Vector3::new(MOON_DISTANCE, 0.0, 0.0),
                    Vector3::new(0.0, MOON_SPEED, 0.0),
                )?)?;
            }
            Self::Cluster { count, seed } => {
                let mut rng = SplitMix64(seed);
                for _ in 0..count {
                    let mass = 1e22 * (1.0 + 99.0 * rng.unit());
                    let position = Vector3::new(rng.signed(), rng.signed(), rng.signed()) * 1e9;
                    let velocity = Vector3::new(rng.signed(), rng.signed(), rng.signed()) * 100.0;
                    world.add_body(Body::new(mass, position, velocity)?)?;
                }
            }
        }
        tracing::debug!(scenario = self.name(), bodies = world.body_count(), "scenario loaded");
        Ok(())
    }

    /// Fresh world holding only this scenario.
    pub fn build(&self) -> Result<World, ScenarioError> {
        let mut world = World::new();
        self.populate(&mut world)?;
        Ok(world)
    }
}

/// Deterministic generator stepping a 64-bit state with splitmix64.
struct SplitMix64(u64);

impl SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.0 = splitmix64(self.0);
        self.0
    }

    /// Uniform in [0, 1).
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in [-1, 1).
    fn signed(&mut self) -> f64 {
        self.unit() * 2.0 - 1.0
    }
}

fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earth_moon_layout() {
        let world = Scenario::EarthMoon.build().unwrap();
        assert_eq!(world.body_count(), 2);
        let earth = world.body(0).unwrap();
        let moon = world.body(1).unwrap();
        assert_eq!(earth.mass(), 5.972e24);
        assert_eq!(earth.velocity(), Vector3::ZERO);
        assert_eq!(moon.position(), Vector3::new(3.844e8, 0.0, 0.0));
        assert_eq!(moon.velocity(), Vector3::new(0.0, 1022.0, 0.0));
    }

    #[test]
    fn cluster_is_deterministic() {
        let a = Scenario::Cluster { count: 50, seed: 7 }.build().unwrap();
        let b = Scenario::Cluster { count: 50, seed: 7 }.build().unwrap();
        let c = Scenario::Cluster { count: 50, seed: 8 }.build().unwrap();
        assert_eq!(a.body_count(), 50);
        assert_eq!(a.state_hash(), b.state_hash());
        assert_ne!(a.state_hash(), c.state_hash());
    }

    #[test]
    fn cluster_values_in_range() {
        let world = Scenario::Cluster { count: 200, seed: 1 }.build().unwrap();
        for b in world.bodies() {
            assert!(b.mass() >= 1e22 && b.mass() < 1e24);
            let p = b.position();
            assert!(p.x.abs() <= 1e9 && p.y.abs() <= 1e9 && p.z.abs() <= 1e9);
            assert!(b.velocity().magnitude() <= 100.0 * 3f64.sqrt());
        }
    }

    #[test]
    fn populate_respects_body_limit() {
        let mut world = World::with_body_limit(1);
        let err = Scenario::EarthMoon.populate(&mut world).unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::World(WorldError::BodyLimitReached { limit: 1 })
        ));
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn splitmix_unit_range() {
        let mut rng = SplitMix64(0);
        for _ in 0..1000 {
            let u = rng.unit();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
