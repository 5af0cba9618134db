//! Per-token rigid-body pose filter.
//!
//! Converts noisy per-frame detections (center, size, rotation angle,
//! optional fiducial marker) into a stable pose: center, width/height,
//! angle in `[0, 360)`, and four corner points. The filter
//!
//! 1. normalizes the raw detection into the unit square and applies a
//!    half reprojection through the surface calibration,
//! 2. resolves the 4-fold rotational ambiguity of a rectangle using the
//!    marker, smoothed by a temporal hysteresis over recent angles,
//! 3. gates the resulting candidate against the committed pose so that
//!    sub-threshold jitter never reaches downstream consumers.
//!
//! Corner numbering at angle 0, with +y pointing down (the coordinate
//! system is left-handed):
//!
//! ```text
//!           w
//!   0+-------------+1
//!    |             |        0: (-w/2, -h/2)
//!  h |      +      |        1: ( w/2, -h/2)
//!    |    center   |        2: ( w/2,  h/2)
//!   3+-------------+2       3: (-w/2,  h/2)
//! ```
//!
//! With a marker, corner 0 is re-indexed to the marker-indicated front
//! corner and the angle shifts by the matching multiple of 90°.

mod candidate;
mod history;
mod manager;
mod params;
mod pose;
mod tracker;

pub use manager::ManagerState;
pub use params::TrackerParams;
pub use pose::{Bounds, Pose};
pub use tracker::{ChildCapacityError, TokenTracker, MAX_CHILD_POSES};
