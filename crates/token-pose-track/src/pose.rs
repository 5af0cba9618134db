use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Axis-aligned extent of a committed pose, in absolute coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Bounds {
    /// Read bounds off the fixed corner ordering: corners 0 and 2 are
    /// horizontally opposite, corners 1 and 3 vertically opposite.
    pub(crate) fn from_abs_corners(abs_corners: &[Point2<f32>; 4]) -> Self {
        Self {
            min_x: abs_corners[0].x,
            max_x: abs_corners[2].x,
            min_y: abs_corners[1].y,
            max_y: abs_corners[3].y,
        }
    }
}

/// The committed, externally visible pose of a tracked token.
///
/// All fields update together on a commit; corners, absolute corners and
/// bounds are never partially stale. Positions are unit-square fractions
/// with +y pointing down.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Identifier of the detection that produced the last commit, if any.
    pub detection_id: Option<i32>,
    /// Whether a marker contributed to the last commit.
    pub has_marker: bool,
    /// Token center after the half reprojection.
    pub center: Point2<f32>,
    pub width: f32,
    pub height: f32,
    /// Orientation in degrees, always in `[0, 360)` after a commit.
    pub theta_deg: f32,
    pub theta_rad: f32,
    /// Corner offsets relative to `center`; corner 0 is the front corner.
    pub corners: [Vector2<f32>; 4],
    /// `center + corners[i]`, rederived on every commit.
    pub abs_corners: [Point2<f32>; 4],
    pub bounds: Bounds,
    /// Marker offset relative to `center`; meaningful only if `has_marker`.
    pub marker: Vector2<f32>,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            detection_id: None,
            has_marker: false,
            center: Point2::origin(),
            width: 0.0,
            height: 0.0,
            theta_deg: 0.0,
            theta_rad: 0.0,
            corners: [Vector2::zeros(); 4],
            abs_corners: [Point2::origin(); 4],
            bounds: Bounds::default(),
            marker: Vector2::zeros(),
        }
    }
}

impl Pose {
    /// Rederive `abs_corners` and `bounds` from `center` and `corners`.
    pub(crate) fn rederive_absolute(&mut self) {
        for (abs, corner) in self.abs_corners.iter_mut().zip(self.corners.iter()) {
            *abs = self.center + corner;
        }
        self.bounds = Bounds::from_abs_corners(&self.abs_corners);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_follow_the_corner_ordering() {
        let mut pose = Pose {
            center: Point2::new(0.5, 0.5),
            corners: [
                Vector2::new(-0.2, -0.1),
                Vector2::new(0.2, -0.1),
                Vector2::new(0.2, 0.1),
                Vector2::new(-0.2, 0.1),
            ],
            ..Pose::default()
        };
        pose.rederive_absolute();

        assert_eq!(Point2::new(0.3, 0.4), pose.abs_corners[0]);
        assert_eq!(Point2::new(0.7, 0.6), pose.abs_corners[2]);
        assert_eq!(
            Bounds {
                min_x: 0.3,
                max_x: 0.7,
                min_y: 0.4,
                max_y: 0.6,
            },
            pose.bounds
        );
    }
}
