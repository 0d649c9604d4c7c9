//! Conserved-quantity diagnostics over a body slice.

use crate::body::Body;
use orrery_common::Vector3;

pub fn total_mass(bodies: &[Body]) -> f64 {
    bodies.iter().map(Body::mass).sum()
}

/// Σ m v.
pub fn total_momentum(bodies: &[Body]) -> Vector3 {
    bodies.iter().map(Body::momentum).sum()
}

/// Mass-weighted mean position, or the origin when there are no bodies.
pub fn center_of_mass(bodies: &[Body]) -> Vector3 {
    let mass = total_mass(bodies);
    if mass == 0.0 {
        return Vector3::ZERO;
    }
    bodies
        .iter()
        .map(|b| b.position() * b.mass())
        .sum::<Vector3>()
        / mass
}

pub fn kinetic_energy(bodies: &[Body]) -> f64 {
    bodies
        .iter()
        .map(|b| 0.5 * b.mass() * b.velocity().magnitude_squared())
        .sum()
}

/// Gravitational potential energy over unique pairs. Coincident pairs are
/// skipped, matching the force phase.
pub fn potential_energy(bodies: &[Body], g: f64) -> f64 {
    let mut energy = 0.0;
    for (i, bi) in bodies.iter().enumerate() {
        for bj in &bodies[i + 1..] {
            let r = (bj.position() - bi.position()).magnitude();
            if r > 0.0 {
                energy -= g * bi.mass() * bj.mass() / r;
            }
        }
    }
    energy
}

pub fn total_energy(bodies: &[Body], g: f64) -> f64 {
    kinetic_energy(bodies) + potential_energy(bodies, g)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(mass: f64, p: [f64; 3], v: [f64; 3]) -> Body {
        Body::new(mass, p.into(), v.into()).unwrap()
    }

    #[test]
    fn empty_slice() {
        assert_eq!(total_mass(&[]), 0.0);
        assert_eq!(total_momentum(&[]), Vector3::ZERO);
        assert_eq!(center_of_mass(&[]), Vector3::ZERO);
        assert_eq!(total_energy(&[], 1.0), 0.0);
    }

    #[test]
    fn momentum_and_center_of_mass() {
        let bodies = [
            body(1.0, [0.0, 0.0, 0.0], [2.0, 0.0, 0.0]),
            body(3.0, [4.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        assert_eq!(total_mass(&bodies), 4.0);
        assert_eq!(total_momentum(&bodies), Vector3::new(2.0, 3.0, 0.0));
        assert_eq!(center_of_mass(&bodies), Vector3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn energies() {
        let bodies = [
            body(2.0, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
            body(4.0, [0.0, 2.0, 0.0], [0.0, 0.0, 0.5]),
        ];
        // KE = 0.5*2*1 + 0.5*4*0.25 = 1.5
        assert_eq!(kinetic_energy(&bodies), 1.5);
        // PE = -G*2*4/2 = -4
        assert_eq!(potential_energy(&bodies, 1.0), -4.0);
        assert_eq!(total_energy(&bodies, 1.0), -2.5);
    }

    #[test]
    fn coincident_pair_has_no_potential() {
        let bodies = [body(1.0, [1.0; 3], [0.0; 3]), body(1.0, [1.0; 3], [0.0; 3])];
        assert_eq!(potential_energy(&bodies, 1.0), 0.0);
    }
}
