use crate::{WtError, WtResult};

pub fn ensure_finite(v: f64, what: &'static str) -> WtResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(WtError::NonFinite { what, value: v })
    }
}

/// Finite and strictly positive, for physical parameters (inertia, radius, ...).
pub fn ensure_positive(v: f64, what: &'static str) -> WtResult<f64> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(WtError::InvalidArg { what })
    }
}

/// Finite and non-negative.
pub fn ensure_non_negative(v: f64, what: &'static str) -> WtResult<f64> {
    let v = ensure_finite(v, what)?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(WtError::InvalidArg { what })
    }
}

/// Replace NaN/inf with `fallback`.
#[inline]
pub fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

/// Clamp into `[lo, hi]`; non-finite input maps to `fallback` (which is clamped too).
#[inline]
pub fn clamp_finite(v: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    finite_or(v, fallback).clamp(lo, hi)
}

/// Magnitude floor that keeps the sign of `v`. Zero is treated as positive.
#[inline]
pub fn signed_floor(v: f64, floor: f64) -> f64 {
    if v.abs() >= floor {
        v
    } else if v < 0.0 {
        -floor
    } else {
        floor
    }
}
