//! Arithmetic on the degree circle.
//!
//! Token orientations are kept in degrees in `[0, 360)`. Upstream inputs
//! are not trusted to stay in range, so every consumer normalizes at the
//! boundary through these helpers.

/// Wrap an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a < 0.0 {
        a += 360.0;
    }
    // Adding 360 to a tiny negative remainder rounds to exactly 360.0
    // in f32, which would escape the half-open range.
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Smallest angular distance between two angles in degrees.
///
/// Both inputs are wrapped first; the result is in `[0, 180]` and is
/// invariant under adding multiples of 360 to either argument.
pub fn cyclic_distance_deg(a: f32, b: f32) -> f32 {
    let d = (wrap_degrees(a) - wrap_degrees(b)).abs();
    if d < 180.0 {
        d
    } else {
        360.0 - d
    }
}
