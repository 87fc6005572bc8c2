//! wt-core: stable foundation for windsim.
//!
//! Contains:
//! - units (uom SI types + constructors, numeric floors)
//! - numeric (finite checks, clamps and floors)
//! - angle (compass and azimuth wrapping)
//! - error (shared error types)

pub mod angle;
pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use angle::*;
pub use error::{WtError, WtResult};
pub use numeric::*;
pub use units::*;
