//! Force accumulation strategies.
//!
//! A strategy turns the current body positions and masses into one
//! acceleration per body. The [`Simulator`](crate::Simulator) owns exactly one
//! strategy and calls it once per step, so alternative algorithms plug in
//! behind the same `step` contract.

use crate::body::Body;
use crate::simulator::SimulatorError;
use orrery_common::Vector3;
use rayon::prelude::*;

/// Computes gravitational accelerations for a set of bodies.
pub trait ForceAccumulator: Send + Sync + std::fmt::Debug {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Add the acceleration of every body into `out`.
    ///
    /// `out` has one entry per body and arrives zeroed. Implementations must
    /// visit each unordered pair exactly once and apply equal and opposite
    /// forces to both members.
    fn accumulate(&self, g: f64, bodies: &[Body], out: &mut [Vector3]);

    /// Symplectic Euler update of every body from its stored acceleration.
    fn integrate(&self, bodies: &mut [Body], dt: f64) {
        for body in bodies.iter_mut() {
            body.integrate(dt);
        }
    }
}

/// Apply the gravitational pull between bodies `i` and `j` (with `i < j`).
///
/// Coincident bodies are skipped entirely.
#[inline]
fn accumulate_pair(g: f64, bodies: &[Body], i: usize, j: usize, out: &mut [Vector3]) {
    let (bi, bj) = (&bodies[i], &bodies[j]);
    let r = bj.position() - bi.position();
    let r_mag = r.magnitude();
    if r_mag == 0.0 {
        tracing::trace!(i, j, "skipping coincident pair");
        return;
    }
    let force_mag = g * bi.mass() * bj.mass() / (r_mag * r_mag);
    let force = r.normalize() * force_mag;
    out[i] += force / bi.mass();
    out[j] -= force / bj.mass();
}

/// Sequential all-pairs summation, O(N²).
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectSummation;

impl ForceAccumulator for DirectSummation {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn accumulate(&self, g: f64, bodies: &[Body], out: &mut [Vector3]) {
        let n = bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                accumulate_pair(g, bodies, i, j, out);
            }
        }
    }
}

/// All-pairs summation spread over a dedicated rayon pool.
///
/// The outer index is split across workers. Each worker folds its pairs into
/// a private buffer and the buffers are summed once the phase ends, so no
/// two workers ever write the same acceleration. Results match
/// [`DirectSummation`] up to floating-point reassociation.
#[derive(Debug)]
pub struct ParallelDirectSummation {
    pool: rayon::ThreadPool,
}

impl ParallelDirectSummation {
    pub fn new(threads: usize) -> Result<Self, SimulatorError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("orrery-physics-{i}"))
            .build()?;
        tracing::debug!(threads = pool.current_num_threads(), "physics pool ready");
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl ForceAccumulator for ParallelDirectSummation {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn accumulate(&self, g: f64, bodies: &[Body], out: &mut [Vector3]) {
        let n = bodies.len();
        if n < 2 {
            return;
        }
        let total = self.pool.install(|| {
            (0..n)
                .into_par_iter()
                .fold(
                    || vec![Vector3::ZERO; n],
                    |mut partial, i| {
                        for j in (i + 1)..n {
                            accumulate_pair(g, bodies, i, j, &mut partial);
                        }
                        partial
                    },
                )
                .reduce(
                    || vec![Vector3::ZERO; n],
                    |mut a, b| {
                        for (x, y) in a.iter_mut().zip(b) {
                            *x += y;
                        }
                        a
                    },
                )
        });
        for (o, t) in out.iter_mut().zip(total) {
            *o += t;
        }
    }

    fn integrate(&self, bodies: &mut [Body], dt: f64) {
        self.pool.install(|| {
            bodies.par_iter_mut().for_each(|body| body.integrate(dt));
        });
    }
}
