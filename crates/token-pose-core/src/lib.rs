//! Core types and utilities for tangible-token pose tracking.
//!
//! This crate is intentionally small and purely geometric: detection
//! records, angle arithmetic on the degree circle, and the calibration
//! seam to the sensing hardware. It does *not* depend on any concrete
//! detector or image type.
//!
//! All positions live in a unit square: the sensing surface is
//! interpreted as having width = height = 1, with the origin at the
//! top-left and +y pointing *down*. The coordinate system is therefore
//! left-handed; rotation helpers downstream account for this.

mod angle;
mod calibration;
mod detection;
mod logger;

pub use angle::{cyclic_distance_deg, wrap_degrees};
pub use calibration::{IdentityCalibration, SurfaceCalibration};
pub use detection::Detection;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;
pub use logger::init_with_level;
