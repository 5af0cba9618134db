use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// One sensor-derived observation of a token for a single frame.
///
/// This is a plain value: the tracker copies everything it needs out of
/// the detection when it is staged, so no lifetime coupling to the
/// upstream detector survives the call.
///
/// Upstream conventions, preserved as delivered:
/// - `center` and `size` are in detector pixel units; dividing by
///   `scale` brings them into the unit square.
/// - `size` is transposed relative to this crate's axis convention
///   (its `y` component is the token width). The tracker undoes the
///   swap during normalization.
/// - `angle_deg` is the detector's bounding-rect angle in `[0, 90)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Stable identifier assigned by the upstream correspondence stage.
    pub id: i32,
    /// Bounding-rect center in detector pixel units.
    pub center: Point2<f32>,
    /// Bounding-rect extent in detector pixel units (transposed, see above).
    pub size: Vector2<f32>,
    /// Bounding-rect rotation in degrees, `[0, 90)`.
    pub angle_deg: f32,
    /// Per-axis pixel scale of the frame the detection came from.
    pub scale: Vector2<f32>,
}

impl Detection {
    /// Per-axis factor that maps detector pixel units into the unit square.
    pub fn normalization(&self) -> Vector2<f32> {
        Vector2::new(1.0 / self.scale.x, 1.0 / self.scale.y)
    }
}
