use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Ring buffer of recent durations for rolling min/max/average.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    history: Vec<Duration>,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    /// A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            history: vec![Duration::ZERO; capacity.max(1)],
            index: 0,
            filled: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.history.len()
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.history.len();
        if self.index == 0 {
            self.filled = true;
        }
    }

    fn window(&self) -> &[Duration] {
        if self.filled {
            &self.history
        } else {
            &self.history[..self.index]
        }
    }

    pub fn count(&self) -> usize {
        self.window().len()
    }

    pub fn average(&self) -> Duration {
        let window = self.window();
        if window.is_empty() {
            return Duration::ZERO;
        }
        window.iter().sum::<Duration>() / window.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.window().iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.window().iter().copied().min().unwrap_or(Duration::ZERO)
    }

    pub fn reset(&mut self) {
        self.history.fill(Duration::ZERO);
        self.index = 0;
        self.filled = false;
    }
}

/// Rolling timing for one named operation, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationStats {
    pub name: String,
    pub samples: usize,
    pub average_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl std::fmt::Display for OperationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: avg={:.3}ms min={:.3}ms max={:.3}ms ({} samples)",
            self.name, self.average_ms, self.min_ms, self.max_ms, self.samples
        )
    }
}

/// Named operation timings, each kept in its own [`FrameTimer`].
///
/// A disabled monitor still runs measured closures but records nothing.
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    enabled: bool,
    sample_window: usize,
    timers: BTreeMap<String, FrameTimer>,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new(120)
    }
}

impl PerformanceMonitor {
    pub fn new(sample_window: usize) -> Self {
        Self {
            enabled: true,
            sample_window,
            timers: BTreeMap::new(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Run `f`, recording its wall time under `name`.
    pub fn measure<T>(&mut self, name: &str, f: impl FnOnce() -> T) -> T {
        if !self.enabled {
            return f();
        }
        let start = Instant::now();
        let out = f();
        self.record(name, start.elapsed());
        out
    }

    pub fn record(&mut self, name: &str, dt: Duration) {
        if !self.enabled {
            return;
        }
        let window = self.sample_window;
        self.timers
            .entry(name.to_owned())
            .or_insert_with(|| FrameTimer::new(window))
            .record(dt);
    }

    /// Rolling average for `name`, or `None` if it was never recorded.
    pub fn average(&self, name: &str) -> Option<Duration> {
        self.timers.get(name).map(FrameTimer::average)
    }

    pub fn timer(&self, name: &str) -> Option<&FrameTimer> {
        self.timers.get(name)
    }

    /// Stats for every recorded operation, sorted by name.
    pub fn report(&self) -> Vec<OperationStats> {
        self.timers
            .iter()
            .map(|(name, timer)| OperationStats {
                name: name.clone(),
                samples: timer.count(),
                average_ms: timer.average().as_secs_f64() * 1e3,
                min_ms: timer.min().as_secs_f64() * 1e3,
                max_ms: timer.max().as_secs_f64() * 1e3,
            })
            .collect()
    }

    /// Emit the report through `tracing` at debug level.
    pub fn log_report(&self) {
        for stats in self.report() {
            tracing::debug!(
                operation = %stats.name,
                samples = stats.samples,
                average_ms = stats.average_ms,
                max_ms = stats.max_ms,
                "timing"
            );
        }
    }

    pub fn reset(&mut self) {
        self.timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_timer_basic() {
        let mut timer = FrameTimer::new(3);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));

        assert_eq!(timer.count(), 3);
        assert_eq!(timer.average(), Duration::from_millis(20));
        assert_eq!(timer.max(), Duration::from_millis(30));
        assert_eq!(timer.min(), Duration::from_millis(10));
    }

    #[test]
    fn frame_timer_wraps_around() {
        let mut timer = FrameTimer::new(2);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));

        assert_eq!(timer.count(), 2);
        assert_eq!(timer.average(), Duration::from_millis(25));
        assert_eq!(timer.min(), Duration::from_millis(20));
    }

    #[test]
    fn frame_timer_empty_and_zero_capacity() {
        let mut timer = FrameTimer::new(0);
        assert_eq!(timer.capacity(), 1);
        assert_eq!(timer.average(), Duration::ZERO);
        assert_eq!(timer.max(), Duration::ZERO);
        timer.record(Duration::from_millis(5));
        timer.record(Duration::from_millis(7));
        assert_eq!(timer.count(), 1);
        assert_eq!(timer.average(), Duration::from_millis(7));
        timer.reset();
        assert_eq!(timer.count(), 0);
    }

    #[test]
    fn monitor_records_per_operation() {
        let mut monitor = PerformanceMonitor::new(4);
        monitor.record("step", Duration::from_millis(2));
        monitor.record("step", Duration::from_millis(4));
        monitor.record("hash", Duration::from_millis(1));

        assert_eq!(monitor.average("step"), Some(Duration::from_millis(3)));
        assert_eq!(monitor.average("missing"), None);

        let report = monitor.report();
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].name, "hash");
        assert_eq!(report[1].samples, 2);
        assert!((report[1].average_ms - 3.0).abs() < 1e-9);
    }

    #[test]
    fn measure_returns_closure_value() {
        let mut monitor = PerformanceMonitor::default();
        let value = monitor.measure("sum", || (1..=10).sum::<u32>());
        assert_eq!(value, 55);
        assert_eq!(monitor.timer("sum").map(FrameTimer::count), Some(1));
    }

    #[test]
    fn disabled_monitor_records_nothing() {
        let mut monitor = PerformanceMonitor::disabled();
        let value = monitor.measure("op", || 7);
        monitor.record("op", Duration::from_millis(1));
        assert_eq!(value, 7);
        assert!(monitor.report().is_empty());

        monitor.set_enabled(true);
        monitor.measure("op", || ());
        assert_eq!(monitor.report().len(), 1);
    }

    #[test]
    fn reset_clears_operations() {
        let mut monitor = PerformanceMonitor::new(8);
        monitor.record("step", Duration::from_millis(1));
        monitor.reset();
        assert!(monitor.report().is_empty());
        assert!(monitor.is_enabled());
    }
}
