//! Developer tooling: world inspector and performance monitor.
//!
//! # Invariants
//! - Tools only read world state; they never mutate bodies.

mod inspector;
mod profiler;

pub use inspector::{BodyInfo, WorldInspector, WorldSummary};
pub use profiler::{FrameTimer, OperationStats, PerformanceMonitor};

pub fn crate_info() -> &'static str {
    "orrery-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
