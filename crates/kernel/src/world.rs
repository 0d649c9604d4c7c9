use crate::body::Body;
use crate::scene::{Camera, Mesh};
use serde::Serialize;
use std::collections::BTreeMap;

/// An event record produced by every structural mutation to the world.
///
/// Editing a body in place (position, velocity, mass) and stepping are not
/// logged; `tick` and `elapsed` carry the clock. The log tracks what the
/// inspector and the UI need to refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WorldEvent {
    /// Body was appended at the given index.
    BodyAdded { index: usize },
    /// Body was removed. Carries the removed data.
    BodyRemoved { index: usize, body: Body },
    /// All bodies and meshes were removed.
    Cleared { bodies: usize, meshes: usize },
}

/// Errors from world mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("body limit of {limit} reached")]
    BodyLimitReached { limit: usize },
}

/// The authoritative simulation state.
///
/// Bodies are kept in insertion order and addressed by index. Indices are
/// stable for the duration of a step; removing a body shifts every later
/// index down by one. The camera and meshes ride along for the renderer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct World {
    bodies: Vec<Body>,
    camera: Camera,
    meshes: BTreeMap<String, Mesh>,
    body_limit: Option<usize>,
    tick: u64,
    /// Simulated seconds, the running sum of every step's `dt`.
    elapsed: f64,
    #[serde(skip)]
    event_log: Vec<WorldEvent>,
}

impl World {
    /// Create an empty world at tick 0 with no body limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a world that refuses bodies beyond `limit`.
    pub fn with_body_limit(limit: usize) -> Self {
        Self {
            body_limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn body_limit(&self) -> Option<usize> {
        self.body_limit
    }

    /// Number of completed simulation steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Total simulated time in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Append a body and return its index.
    pub fn add_body(&mut self, body: Body) -> Result<usize, WorldError> {
        if let Some(limit) = self.body_limit {
            if self.bodies.len() >= limit {
                tracing::warn!(limit, "rejecting body, world is full");
                return Err(WorldError::BodyLimitReached { limit });
            }
        }
        let index = self.bodies.len();
        tracing::debug!(index, mass = body.mass(), "body added");
        self.bodies.push(body);
        self.event_log.push(WorldEvent::BodyAdded { index });
        Ok(index)
    }

    /// Remove the body at `index`, shifting later bodies down.
    pub fn remove_body(&mut self, index: usize) -> Option<Body> {
        if index >= self.bodies.len() {
            return None;
        }
        let body = self.bodies.remove(index);
        tracing::debug!(index, "body removed");
        self.event_log.push(WorldEvent::BodyRemoved {
            index,
            body: body.clone(),
        });
        Some(body)
    }

    pub fn body(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    pub fn body_mut(&mut self, index: usize) -> Option<&mut Body> {
        self.bodies.get_mut(index)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Mutable view over the bodies. The slice cannot grow or shrink, so the
    /// body count stays fixed while it is borrowed.
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn main_camera(&self) -> &Camera {
        &self.camera
    }

    pub fn main_camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn set_main_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// Insert or replace the mesh registered under `name`.
    pub fn add_mesh(&mut self, name: impl Into<String>, mesh: Mesh) {
        self.meshes.insert(name.into(), mesh);
    }

    pub fn mesh(&self, name: &str) -> Option<&Mesh> {
        self.meshes.get(name)
    }

    pub fn mesh_mut(&mut self, name: &str) -> Option<&mut Mesh> {
        self.meshes.get_mut(name)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Remove every body and mesh. The camera, tick and clock are kept.
    pub fn clear(&mut self) {
        let bodies = self.bodies.len();
        let meshes = self.meshes.len();
        self.bodies.clear();
        self.meshes.clear();
        tracing::debug!(bodies, meshes, "world cleared");
        self.event_log.push(WorldEvent::Cleared { bodies, meshes });
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Advance the clock after the simulator has integrated every body.
    pub(crate) fn record_step(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed += dt;
    }

    /// FNV-1a hash over the tick and every body's mass, position and
    /// velocity bit patterns, in index order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        for body in &self.bodies {
            mix(&mut h, &body.mass().to_le_bytes());
            for v in [body.position(), body.velocity()] {
                mix(&mut h, &v.x.to_le_bytes());
                mix(&mut h, &v.y.to_le_bytes());
                mix(&mut h, &v.z.to_le_bytes());
            }
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_common::Vector3;

    fn body_at(x: f64) -> Body {
        Body::new(1.0, Vector3::new(x, 0.0, 0.0), Vector3::ZERO).unwrap()
    }

    #[test]
    fn world_starts_empty() {
        let w = World::new();
        assert_eq!(w.tick(), 0);
        assert_eq!(w.elapsed(), 0.0);
        assert_eq!(w.body_count(), 0);
        assert!(w.is_empty());
    }

    #[test]
    fn add_preserves_insertion_order() {
        let mut w = World::new();
        for i in 0..5 {
            assert_eq!(w.add_body(body_at(i as f64)).unwrap(), i);
        }
        let xs: Vec<f64> = w.bodies().iter().map(|b| b.position().x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn indexed_access() {
        let mut w = World::new();
        w.add_body(body_at(3.0)).unwrap();
        assert_eq!(w.body(0).unwrap().position().x, 3.0);
        assert!(w.body(1).is_none());

        w.body_mut(0)
            .unwrap()
            .set_velocity(Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(w.body(0).unwrap().velocity().y, 2.0);
    }

    #[test]
    fn remove_shifts_indices() {
        let mut w = World::new();
        for i in 0..3 {
            w.add_body(body_at(i as f64)).unwrap();
        }
        let removed = w.remove_body(1).unwrap();
        assert_eq!(removed.position().x, 1.0);
        assert_eq!(w.body_count(), 2);
        assert_eq!(w.body(1).unwrap().position().x, 2.0);
        assert!(w.remove_body(5).is_none());
    }

    #[test]
    fn body_limit_enforced() {
        let mut w = World::with_body_limit(2);
        w.add_body(body_at(0.0)).unwrap();
        w.add_body(body_at(1.0)).unwrap();
        assert_eq!(
            w.add_body(body_at(2.0)),
            Err(WorldError::BodyLimitReached { limit: 2 })
        );
        assert_eq!(w.body_count(), 2);
    }

    #[test]
    fn clear_removes_bodies_and_meshes_but_keeps_camera() {
        let mut w = World::new();
        w.add_body(body_at(0.0)).unwrap();
        w.add_mesh("moon", Mesh::sphere(1.0, 4));
        let mut cam = Camera::default();
        cam.look_at(Vector3::new(1.0, 0.0, 0.0));
        w.set_main_camera(cam.clone());

        w.clear();
        assert_eq!(w.body_count(), 0);
        assert_eq!(w.mesh_count(), 0);
        assert_eq!(w.main_camera(), &cam);
    }

    #[test]
    fn meshes_by_name() {
        let mut w = World::new();
        w.add_mesh("planet", Mesh::sphere(1.0, 4));
        assert!(w.mesh("planet").is_some());
        assert!(w.mesh("missing").is_none());
        w.mesh_mut("planet").unwrap().color = [0.0, 0.0, 1.0];
        assert_eq!(w.mesh("planet").unwrap().color, [0.0, 0.0, 1.0]);

        w.add_mesh("planet", Mesh::cube(1.0));
        assert_eq!(w.mesh_count(), 1);
        assert_eq!(w.mesh("planet").unwrap().name, "cube");
    }

    #[test]
    fn events_are_recorded() {
        let mut w = World::new();
        w.add_body(body_at(0.0)).unwrap();
        w.add_body(body_at(1.0)).unwrap();
        w.record_step(0.5);
        w.remove_body(0);
        w.clear();
        let events = w.events();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], WorldEvent::BodyAdded { index: 0 });
        assert_eq!(events[1], WorldEvent::BodyAdded { index: 1 });
        assert!(matches!(events[2], WorldEvent::BodyRemoved { index: 0, .. }));
        assert_eq!(
            events[3],
            WorldEvent::Cleared {
                bodies: 1,
                meshes: 0
            }
        );
    }

    #[test]
    fn drain_events_clears_log() {
        let mut w = World::new();
        w.add_body(Body::default()).unwrap();
        let events = w.drain_events();
        assert_eq!(events.len(), 1);
        assert!(w.events().is_empty());
    }

    #[test]
    fn record_step_advances_clock() {
        let mut w = World::new();
        w.record_step(0.25);
        w.record_step(0.25);
        assert_eq!(w.tick(), 2);
        assert_eq!(w.elapsed(), 0.5);
        assert!(w.events().is_empty());
    }

    #[test]
    fn state_hash_tracks_body_state() {
        let mut w1 = World::new();
        let mut w2 = World::new();
        w1.add_body(body_at(1.0)).unwrap();
        w2.add_body(body_at(1.0)).unwrap();
        assert_eq!(w1.state_hash(), w2.state_hash());

        w2.body_mut(0)
            .unwrap()
            .set_position(Vector3::new(1.0, 1e-12, 0.0));
        assert_ne!(w1.state_hash(), w2.state_hash());
    }
}
