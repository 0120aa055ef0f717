//! Characteristic radii of the Schwarzschild metric in geometric units
//! (G = c = 1), where distances are measured in units of the mass `M`.

/// Event horizon radius, r_s = 2M
pub fn horizon_radius(mass: f64) -> f64 {
    2.0 * mass
}

/// Photon sphere radius, 3M. Circular orbits need `r > 3M`.
pub fn photon_sphere_radius(mass: f64) -> f64 {
    3.0 * mass
}

/// Check if a radius lies strictly inside the event horizon
pub fn is_inside_event_horizon(mass: f64, r: f64) -> bool {
    r < horizon_radius(mass)
}

/// Relative distance from the photon sphere inside which the angular
/// momentum formulas are treated as singular.
pub const PHOTON_SPHERE_TOLERANCE: f64 = 1e-9;

/// Whether `r` lies within [`PHOTON_SPHERE_TOLERANCE`] of `3M`.
pub fn is_near_photon_sphere(mass: f64, r: f64) -> bool {
    let r_ph = photon_sphere_radius(mass);
    (r - r_ph).abs() <= PHOTON_SPHERE_TOLERANCE * r_ph
}

/// Specific angular momentum used for the stream layout, `sqrt(M r^2 / (r - 3M)) - 1`.
///
/// Returns `None` when the radicand is negative or the result is not
/// finite, i.e. at or inside the photon sphere, or when `r` is close
/// enough to `3M` for the division to blow up.
pub fn stream_angular_momentum(mass: f64, r: f64) -> Option<f64> {
    if is_near_photon_sphere(mass, r) {
        return None;
    }
    let radicand = mass * r * r / (r - photon_sphere_radius(mass));
    if radicand.is_finite() && radicand >= 0.0 {
        Some(radicand.sqrt() - 1.0)
    } else {
        None
    }
}

/// Specific angular momentum used for the star layout, `sqrt(|M r^2 / (r - 3M)|) - 1`.
///
/// The absolute value keeps radii inside the photon sphere usable; only
/// radii within [`PHOTON_SPHERE_TOLERANCE`] of `3M` (or a non-finite input)
/// yield `None`.
pub fn star_angular_momentum(mass: f64, r: f64) -> Option<f64> {
    if is_near_photon_sphere(mass, r) {
        return None;
    }
    let radicand = (mass * r * r / (r - photon_sphere_radius(mass))).abs();
    let l = radicand.sqrt() - 1.0;
    l.is_finite().then_some(l)
}
