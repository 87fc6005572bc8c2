//! Compass and azimuth wrapping.
//!
//! Nacelle yaw is tracked as an unbounded accumulator; these helpers fold it
//! back into the ranges the controllers reason about.

use std::f64::consts::TAU;

/// Wrap degrees into `[0, 360)`.
#[inline]
pub fn wrap_360(deg: f64) -> f64 {
    let w = deg.rem_euclid(360.0);
    // rem_euclid may round up to exactly 360 for tiny negative inputs
    if w >= 360.0 { 0.0 } else { w }
}

/// Wrap degrees into `[-180, 180)`.
#[inline]
pub fn wrap_180(deg: f64) -> f64 {
    let w = (deg + 180.0).rem_euclid(360.0) - 180.0;
    if w >= 180.0 { w - 360.0 } else { w }
}

/// Wrap radians into `[0, 2π)`.
#[inline]
pub fn wrap_tau(rad: f64) -> f64 {
    let w = rad.rem_euclid(TAU);
    if w >= TAU { 0.0 } else { w }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn wrapped_ranges_hold(deg in -1.0e5_f64..1.0e5_f64) {
            let a = wrap_360(deg);
            prop_assert!((0.0..360.0).contains(&a));
            let b = wrap_180(deg);
            prop_assert!((-180.0..180.0).contains(&b));
        }

        #[test]
        fn wrap_180_preserves_heading(deg in -1.0e5_f64..1.0e5_f64) {
            let back = wrap_360(wrap_180(deg));
            let err = (back - wrap_360(deg)).abs();
            prop_assert!(err < 1e-6 || (360.0 - err) < 1e-6);
        }
    }
}
