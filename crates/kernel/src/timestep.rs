use crate::simulator::Simulator;
use crate::world::World;

/// Steps paid out by a single `accumulate` call unless configured otherwise.
pub const DEFAULT_MAX_STEPS: u32 = 1024;

/// Errors from configuring a [`FixedTimestep`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimestepError {
    #[error("fixed step must be finite and > 0, got {0}")]
    InvalidFixedDt(f64),
    #[error("max frame delta must be >= 0, got {0}")]
    InvalidMaxFrameDt(f64),
    #[error("time scale must be finite and >= 0, got {0}")]
    InvalidTimeScale(f64),
}

/// Fixed-step driver between a variable frame clock and the simulator.
///
/// The simulator itself never clamps `dt`. This driver clamps each real
/// frame delta to `max_frame_dt`, scales it by `time_scale`, banks it, and
/// pays it out in whole `fixed_dt` steps. At most `max_steps` are paid out
/// per call; anything beyond that stays banked for later calls.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedTimestep {
    fixed_dt: f64,
    max_frame_dt: f64,
    time_scale: f64,
    max_steps: u32,
    accumulator: f64,
}

impl FixedTimestep {
    /// `max_frame_dt` may be infinite to disable clamping.
    pub fn new(fixed_dt: f64, max_frame_dt: f64, time_scale: f64) -> Result<Self, TimestepError> {
        if !(fixed_dt.is_finite() && fixed_dt > 0.0) {
            return Err(TimestepError::InvalidFixedDt(fixed_dt));
        }
        if max_frame_dt.is_nan() || max_frame_dt < 0.0 {
            return Err(TimestepError::InvalidMaxFrameDt(max_frame_dt));
        }
        validate_time_scale(time_scale)?;
        Ok(Self {
            fixed_dt,
            max_frame_dt,
            time_scale,
            max_steps: DEFAULT_MAX_STEPS,
            accumulator: 0.0,
        })
    }

    /// Cap the steps paid out per call. Zero is treated as one.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Change the time scale. On error the previous scale is kept.
    pub fn set_time_scale(&mut self, time_scale: f64) -> Result<(), TimestepError> {
        validate_time_scale(time_scale)?;
        self.time_scale = time_scale;
        Ok(())
    }

    /// Bank one frame's worth of time and return how many fixed steps are due,
    /// up to `max_steps`.
    ///
    /// Negative or NaN frame deltas count as zero.
    pub fn accumulate(&mut self, frame_dt: f64) -> u32 {
        let frame_dt = frame_dt.max(0.0).min(self.max_frame_dt);
        self.accumulator += frame_dt * self.time_scale;
        let due = (self.accumulator / self.fixed_dt).floor().max(0.0);
        let steps = due.min(f64::from(self.max_steps));
        if steps < due {
            tracing::debug!(due, paid = steps, "step cap reached, keeping backlog banked");
        }
        self.accumulator -= steps * self.fixed_dt;
        steps as u32
    }

    /// Bank `frame_dt` and run every step that became due. Returns the number
    /// of steps taken.
    pub fn advance(&mut self, simulator: &Simulator, world: &mut World, frame_dt: f64) -> u32 {
        let steps = self.accumulate(frame_dt);
        for _ in 0..steps {
            simulator.step(world, self.fixed_dt);
        }
        if steps > 0 {
            tracing::trace!(steps, tick = world.tick(), "fixed steps taken");
        }
        steps
    }

    /// Banked time in units of `fixed_dt`, for render interpolation. Exceeds
    /// one only while a backlog from the step cap is pending.
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.fixed_dt
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

fn validate_time_scale(time_scale: f64) -> Result<(), TimestepError> {
    if time_scale.is_finite() && time_scale >= 0.0 {
        Ok(())
    } else {
        Err(TimestepError::InvalidTimeScale(time_scale))
    }
}
