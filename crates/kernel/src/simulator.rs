use crate::body::Body;
use crate::force::{DirectSummation, ForceAccumulator, ParallelDirectSummation};
use crate::world::World;
use orrery_common::Vector3;

/// Newtonian gravitational constant in SI units (m³ kg⁻¹ s⁻²).
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67430e-11;

/// Errors from building a simulator.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    #[error("failed to build physics thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Physical parameters for the simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatorConfig {
    pub gravitational_constant: f64,
    /// When false the force phase is skipped and bodies drift.
    pub gravity_enabled: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: GRAVITATIONAL_CONSTANT,
            gravity_enabled: true,
        }
    }
}

/// Advances bodies under mutual gravity.
///
/// The simulator keeps no per-step state: everything lives in the bodies it
/// is handed. Each step runs three phases in order:
///
/// 1. reset every acceleration to zero,
/// 2. accumulate pairwise gravity through the configured [`ForceAccumulator`],
/// 3. integrate with symplectic Euler (`v += a dt`, then `p += v dt`).
///
/// `dt` is not validated. Masses are guaranteed positive by [`Body`].
#[derive(Debug)]
pub struct Simulator {
    config: SimulatorConfig,
    strategy: Box<dyn ForceAccumulator>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

impl Simulator {
    /// Simulator using sequential direct summation.
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            config,
            strategy: Box::new(DirectSummation),
        }
    }

    /// Simulator using direct summation spread over `threads` workers.
    pub fn parallel(config: SimulatorConfig, threads: usize) -> Result<Self, SimulatorError> {
        Ok(Self::new(config).with_strategy(ParallelDirectSummation::new(threads)?))
    }

    /// Replace the force accumulation strategy.
    pub fn with_strategy(mut self, strategy: impl ForceAccumulator + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Advance every body in `world` by `dt` seconds and tick its clock.
    pub fn step(&self, world: &mut World, dt: f64) {
        self.step_bodies(world.bodies_mut(), dt);
        world.record_step(dt);
    }

    /// Run `steps` consecutive steps of `dt`.
    pub fn run(&self, world: &mut World, dt: f64, steps: u64) {
        for _ in 0..steps {
            self.step(world, dt);
        }
    }

    /// Advance a bare body slice by `dt` seconds.
    pub fn step_bodies(&self, bodies: &mut [Body], dt: f64) {
        let _span =
            tracing::trace_span!("simulator_step", bodies = bodies.len(), dt).entered();

        for body in bodies.iter_mut() {
            body.set_acceleration(Vector3::ZERO);
        }

        let accelerations = self.compute_accelerations(bodies);
        for (body, a) in bodies.iter_mut().zip(accelerations) {
            body.set_acceleration(a);
        }

        self.strategy.integrate(bodies, dt);
    }

    /// Accelerations the next step would apply, without mutating anything.
    pub fn compute_accelerations(&self, bodies: &[Body]) -> Vec<Vector3> {
        let mut out = vec![Vector3::ZERO; bodies.len()];
        if self.config.gravity_enabled {
            self.strategy
                .accumulate(self.config.gravitational_constant, bodies, &mut out);
        }
        out
    }

    /// Reset every body's acceleration. Bodies themselves are untouched.
    pub fn clear(&self, world: &mut World) {
        for body in world.bodies_mut() {
            body.set_acceleration(Vector3::ZERO);
        }
    }
}
