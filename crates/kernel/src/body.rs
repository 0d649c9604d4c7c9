use orrery_common::Vector3;
use serde::Serialize;

/// Errors from constructing or editing a body.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BodyError {
    #[error("body mass must be strictly positive, got {0}")]
    NonPositiveMass(f64),
    #[error("body mass must be finite, got {0}")]
    NonFiniteMass(f64),
}

/// A point mass under simulation.
///
/// Mass is always finite and strictly positive; the simulator divides by it
/// every step. Acceleration is derived state, overwritten by the simulator
/// and read-only everywhere else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Body {
    mass: f64,
    position: Vector3,
    velocity: Vector3,
    acceleration: Vector3,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            mass: 1.0,
            position: Vector3::ZERO,
            velocity: Vector3::ZERO,
            acceleration: Vector3::ZERO,
        }
    }
}

impl Body {
    /// Create a body with zero acceleration. Fails if `mass` is not a
    /// finite, strictly positive number.
    pub fn new(mass: f64, position: Vector3, velocity: Vector3) -> Result<Self, BodyError> {
        validate_mass(mass)?;
        Ok(Self {
            mass,
            position,
            velocity,
            acceleration: Vector3::ZERO,
        })
    }

    /// Body at the origin with no velocity and the given mass.
    pub fn with_mass(mass: f64) -> Result<Self, BodyError> {
        Self::new(mass, Vector3::ZERO, Vector3::ZERO)
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vector3 {
        self.acceleration
    }

    /// Linear momentum `m * v`.
    pub fn momentum(&self) -> Vector3 {
        self.velocity * self.mass
    }

    pub fn set_mass(&mut self, mass: f64) -> Result<(), BodyError> {
        validate_mass(mass)?;
        self.mass = mass;
        Ok(())
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: Vector3) {
        self.velocity = velocity;
    }

    pub(crate) fn set_acceleration(&mut self, acceleration: Vector3) {
        self.acceleration = acceleration;
    }

    /// Symplectic Euler update: velocity from the current acceleration,
    /// then position from the new velocity.
    pub(crate) fn integrate(&mut self, dt: f64) {
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
    }
}

fn validate_mass(mass: f64) -> Result<(), BodyError> {
    if !mass.is_finite() {
        return Err(BodyError::NonFiniteMass(mass));
    }
    if mass <= 0.0 {
        return Err(BodyError::NonPositiveMass(mass));
    }
    Ok(())
}
