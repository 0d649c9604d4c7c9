//! Shared value types for the orrery workspace.
//!
//! # Invariants
//! - Vector math is pure; no operation mutates its inputs.

mod vector;

pub use vector::Vector3;

pub fn crate_info() -> &'static str {
    "orrery-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
