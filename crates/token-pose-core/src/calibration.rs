use nalgebra::Point2;

/// Calibration seam between the tracker and the sensing hardware.
///
/// The camera observes a raised token from an angle, so a point seen at
/// some 2D position does not sit where it would if the token lay flat on
/// the surface. Implementations map an observed position to the true
/// ground-plane position; the mapping comes from an external calibration
/// step and is opaque to this crate.
pub trait SurfaceCalibration {
    /// Reproject an observed point onto the ground plane.
    fn ground_point(&self, observed: Point2<f32>) -> Point2<f32>;
}

/// No-op calibration for flat sensors and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityCalibration;

impl SurfaceCalibration for IdentityCalibration {
    fn ground_point(&self, observed: Point2<f32>) -> Point2<f32> {
        observed
    }
}
