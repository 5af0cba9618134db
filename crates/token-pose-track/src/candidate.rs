//! Candidate geometry derived from a single staged detection.
//!
//! Everything here is pure arithmetic: normalization into the unit
//! square, the half reprojection of the center, raw corner offsets, and
//! the marker-based resolution of the 4-fold rotational ambiguity. The
//! temporal part (angle hysteresis) lives in the tracker, which owns the
//! history.

use nalgebra::{Point2, Vector2};

use token_pose_core::{wrap_degrees, Detection, SurfaceCalibration};

/// Geometry computed from one detection, before hysteresis.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CandidateGeometry {
    pub width: f32,
    pub height: f32,
    pub center: Point2<f32>,
    /// Marker offset relative to the normalized center; zero without a marker.
    pub marker: Vector2<f32>,
    pub raw_corners: [Vector2<f32>; 4],
    /// Marker-adjusted angle candidate in `[0, 360)`, pre-hysteresis.
    pub theta_candidate_deg: f32,
    /// Index of the marker-indicated front corner in `raw_corners`.
    pub front_corner: usize,
}

impl CandidateGeometry {
    /// Final center-relative corners: the raw rectangle re-indexed so
    /// that corner 0 is the front corner.
    pub fn corners(&self) -> [Vector2<f32>; 4] {
        std::array::from_fn(|i| self.raw_corners[(i + self.front_corner) % 4])
    }
}

/// Full candidate pose, ready for the significance gate.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CandidatePose {
    pub detection_id: i32,
    pub has_marker: bool,
    pub width: f32,
    pub height: f32,
    pub center: Point2<f32>,
    pub marker: Vector2<f32>,
    pub theta_deg: f32,
    pub theta_rad: f32,
    pub corners: [Vector2<f32>; 4],
}

pub(crate) fn compute_geometry(
    det: &Detection,
    raw_marker: Option<Point2<f32>>,
    calibration: &dyn SurfaceCalibration,
) -> CandidateGeometry {
    let norm = det.normalization();

    // The upstream bounding rect reports width and height transposed
    // relative to this crate's axes; undo the swap while normalizing.
    let width = det.size.y * norm.x;
    let height = det.size.x * norm.y;
    let mut center = Point2::new(det.center.x * norm.x, det.center.y * norm.y);

    // Marker offset relative to the *raw* normalized center. Computed
    // before reprojection: the marker sits on top of the token and gets
    // the same perspective error as the corners it disambiguates.
    let marker = raw_marker
        .map(|m| Vector2::new(m.x * norm.x - center.x, m.y * norm.y - center.y))
        .unwrap_or_else(Vector2::zeros);

    // The camera sees a token's front corners on the surface and its
    // rear corners in the air, so the raw center is already an average
    // of a grounded half and a half that needs reprojection. Averaging
    // with the fully reprojected center applies the missing 50%.
    let grounded = calibration.ground_point(center);
    center = Point2::from((center.coords + grounded.coords) * 0.5);

    // Raw angle ignores orientation entirely; range (-90, 0].
    let raw_theta_deg = -det.angle_deg;
    let raw_theta = raw_theta_deg.to_radians();
    let (sin, cos) = raw_theta.sin_cos();

    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let corner0 = Vector2::new(-half_w * cos - half_h * sin, half_w * sin - half_h * cos);
    let corner1 = Vector2::new(half_w * cos - half_h * sin, -half_w * sin - half_h * cos);
    let raw_corners = [corner0, corner1, -corner0, -corner1];

    let front_corner = raw_marker
        .map(|_| front_corner_from_marker(&marker, &raw_corners))
        .unwrap_or(0);

    // Each step around the rectangle is worth 90° of orientation.
    let theta_candidate_deg = wrap_degrees(raw_theta_deg - 90.0 * front_corner as f32);

    CandidateGeometry {
        width,
        height,
        center,
        marker,
        raw_corners,
        theta_candidate_deg,
        front_corner,
    }
}

/// Pick the front corner: the marker sits nearest to the two corners
/// flanking the token's front edge.
fn front_corner_from_marker(marker: &Vector2<f32>, raw_corners: &[Vector2<f32>; 4]) -> usize {
    let mut distances: Vec<(f32, usize)> = raw_corners
        .iter()
        .enumerate()
        .map(|(i, corner)| ((marker - corner).norm_squared(), i))
        .collect();
    distances.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let corner_a = distances[0].1.min(distances[1].1);
    let corner_b = distances[0].1.max(distances[1].1);

    // Corners 3 and 0 are adjacent across the index wrap; the front of
    // that pair is corner 3, not corner 0.
    if corner_a == 0 && corner_b == 3 {
        3
    } else {
        corner_a
    }
}
