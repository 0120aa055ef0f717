//! Classical fixed-step Runge-Kutta integration.

use crate::geodesic::{GeodesicField, PhaseState};

/// Advance `y` by one RK4 step of size `h` for the derivative function `f`.
///
/// `f` must be pure: the step is a deterministic function of `y` and `h`.
pub fn rk4_step<F>(f: F, y: PhaseState, h: f64) -> PhaseState
where
    F: Fn(&PhaseState) -> PhaseState,
{
    let half_h = 0.5 * h;

    let k1 = f(&y);
    let k2 = f(&y.offset(&k1, half_h));
    let k3 = f(&y.offset(&k2, half_h));
    let k4 = f(&y.offset(&k3, h));

    let sixth_h = h / 6.0;
    PhaseState {
        r: y.r + sixth_h * (k1.r + 2.0 * k2.r + 2.0 * k3.r + k4.r),
        phi: y.phi + sixth_h * (k1.phi + 2.0 * k2.phi + 2.0 * k3.phi + k4.phi),
        p: y.p + sixth_h * (k1.p + 2.0 * k2.p + 2.0 * k3.p + k4.p),
    }
}

/// One RK4 step of a particle with angular momentum `l` through `field`.
pub fn geodesic_step(field: &GeodesicField, y: PhaseState, l: f64, h: f64) -> PhaseState {
    rk4_step(|state| field.derivatives(state, l), y, h)
}
