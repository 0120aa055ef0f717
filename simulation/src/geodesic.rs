//! Equations of motion for a test particle in the equatorial plane.
//!
//! The motion is written in effective-potential form. The specific angular
//! momentum `L` is a constant of motion, so it enters the field as a
//! parameter rather than as a component of the integrated state.

/// The integrated part of a particle's state, or its time derivative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseState {
    /// Radial coordinate
    pub r: f64,
    /// Azimuthal angle in radians, not wrapped
    pub phi: f64,
    /// Radial momentum, dr/dτ
    pub p: f64,
}

impl PhaseState {
    /// Create a new phase state.
    pub fn new(r: f64, phi: f64, p: f64) -> Self {
        Self { r, phi, p }
    }

    /// `self + h * derivative`
    pub fn offset(&self, derivative: &PhaseState, h: f64) -> PhaseState {
        PhaseState {
            r: self.r + h * derivative.r,
            phi: self.phi + h * derivative.phi,
            p: self.p + h * derivative.p,
        }
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.phi.is_finite() && self.p.is_finite()
    }
}

/// Time derivatives of a massive particle around a Schwarzschild mass.
///
/// ```text
/// dr/dτ   = p
/// dφ/dτ   = L / r²
/// dp/dτ   = -M / r² + L² (1 / r³ - 3M / r⁴)
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GeodesicField {
    pub mass: f64,
}

impl GeodesicField {
    /// Create the field of a black hole of the given mass.
    pub fn new(mass: f64) -> Self {
        Self { mass }
    }

    /// Evaluate the derivatives at `state` for angular momentum `l`.
    pub fn derivatives(&self, state: &PhaseState, l: f64) -> PhaseState {
        let r = state.r;
        let r2 = r * r;
        let r3 = r2 * r;
        let r4 = r3 * r;

        PhaseState {
            r: state.p,
            phi: l / r2,
            p: -self.mass / r2 + l * l * (1.0 / r3 - 3.0 * self.mass / r4),
        }
    }
}
