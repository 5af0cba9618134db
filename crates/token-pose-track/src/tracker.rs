use std::time::Instant;

use log::debug;
use nalgebra::{Point2, Rotation2};

use token_pose_core::{wrap_degrees, Detection, SurfaceCalibration};

use crate::candidate::{compute_geometry, CandidatePose};
use crate::history::AngleHistory;
use crate::manager::ManagerState;
use crate::params::TrackerParams;
use crate::pose::Pose;

/// Maximum number of child poses a tracker keeps.
pub const MAX_CHILD_POSES: usize = 10;

/// Attachment rejected because the child-pose list is full.
#[derive(thiserror::Error, Debug)]
#[error("child pose list at capacity ({capacity})")]
pub struct ChildCapacityError {
    pub capacity: usize,
}

/// Pose-tracking filter for one physical token.
///
/// Detections are *staged* into a candidate buffer and only reach the
/// committed [`Pose`] through [`update`](Self::update), which recomputes
/// the candidate geometry and commits it only when the change is
/// significant. Staging copies the detection by value; no reference to
/// upstream detector state is retained.
pub struct TokenTracker {
    params: TrackerParams,
    staged_detection: Option<Detection>,
    staged_marker: Option<Point2<f32>>,
    history: AngleHistory,
    pose: Pose,
    created: Instant,
    is_child: bool,
    children: Vec<TokenTracker>,
    /// Lifecycle fields written by an external manager; read-only here.
    pub manager: ManagerState,
}

impl TokenTracker {
    pub fn new(params: TrackerParams) -> Self {
        Self {
            params,
            staged_detection: None,
            staged_marker: None,
            history: AngleHistory::default(),
            pose: Pose::default(),
            created: Instant::now(),
            is_child: false,
            children: Vec::new(),
            manager: ManagerState::default(),
        }
    }

    /// Create a tracker seeded with a first detection.
    pub fn with_detection(
        params: TrackerParams,
        detection: Detection,
        calibration: &dyn SurfaceCalibration,
    ) -> Self {
        let mut tracker = Self::new(params);
        tracker.set_detection(detection);
        tracker.update(calibration);
        tracker
    }

    /// Create a tracker seeded with a first detection and marker.
    pub fn with_detection_and_marker(
        params: TrackerParams,
        detection: Detection,
        marker: Point2<f32>,
        calibration: &dyn SurfaceCalibration,
    ) -> Self {
        let mut tracker = Self::new(params);
        tracker.set_detection_and_marker(detection, marker);
        tracker.update(calibration);
        tracker
    }

    /// A tracker only has committed geometry once it has received a
    /// detection.
    pub fn is_valid(&self) -> bool {
        self.staged_detection.is_some()
    }

    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn created(&self) -> Instant {
        self.created
    }

    /// Whether this pose is expressed in a parent token's frame.
    pub fn is_child_pose(&self) -> bool {
        self.is_child
    }

    pub fn children(&self) -> &[TokenTracker] {
        &self.children
    }

    /// The currently staged detection, if any.
    pub fn staged_detection(&self) -> Option<&Detection> {
        self.staged_detection.as_ref()
    }

    // Staging. None of these touch the committed pose; call `update` (or
    // use `observe`) to attempt a commit.

    pub fn set_detection(&mut self, detection: Detection) {
        self.staged_detection = Some(detection);
    }

    pub fn set_marker(&mut self, marker: Point2<f32>) {
        self.staged_marker = Some(marker);
    }

    pub fn set_detection_and_marker(&mut self, detection: Detection, marker: Point2<f32>) {
        self.staged_detection = Some(detection);
        self.staged_marker = Some(marker);
    }

    pub fn clear_marker(&mut self) {
        self.staged_marker = None;
    }

    /// Stage a frame's detection (and marker, when present) and attempt
    /// a commit immediately. A `None` marker leaves any previously
    /// staged marker in place; use [`clear_marker`](Self::clear_marker)
    /// to drop it. Returns whether a commit happened.
    pub fn observe(
        &mut self,
        detection: Detection,
        marker: Option<Point2<f32>>,
        calibration: &dyn SurfaceCalibration,
    ) -> bool {
        self.set_detection(detection);
        if let Some(marker) = marker {
            self.set_marker(marker);
        }
        self.update(calibration)
    }

    /// Recompute the candidate pose and commit it if significant.
    ///
    /// A tracker with no staged detection is a silent no-op. Returns
    /// whether the committed pose changed.
    pub fn update(&mut self, calibration: &dyn SurfaceCalibration) -> bool {
        let Some(detection) = self.staged_detection else {
            return false;
        };

        let geometry = compute_geometry(&detection, self.staged_marker, calibration);
        let theta_deg = self.history.filter(
            geometry.theta_candidate_deg,
            self.pose.theta_deg,
            self.params.hysteresis_accept_deg,
        );

        let candidate = CandidatePose {
            detection_id: detection.id,
            has_marker: self.staged_marker.is_some(),
            width: geometry.width,
            height: geometry.height,
            center: geometry.center,
            marker: geometry.marker,
            theta_deg,
            theta_rad: theta_deg.to_radians(),
            corners: geometry.corners(),
        };

        if !self.candidate_is_significant(&candidate) {
            return false;
        }

        self.commit(candidate);
        true
    }

    /// Significance gate: detector jitter below these thresholds never
    /// reaches the committed pose.
    fn candidate_is_significant(&self, candidate: &CandidatePose) -> bool {
        if self.pose.has_marker != candidate.has_marker
            || self.pose.detection_id != Some(candidate.detection_id)
        {
            return true;
        }
        let center_gate = self.params.center_gate_grid_units * self.params.grid_unit();
        if (candidate.center - self.pose.center).norm() > center_gate {
            return true;
        }
        // Plain absolute difference, not cyclic; see TrackerParams.
        (self.pose.theta_deg - candidate.theta_deg).abs() > self.params.angle_gate_deg
    }

    fn commit(&mut self, candidate: CandidatePose) {
        self.pose.detection_id = Some(candidate.detection_id);
        self.pose.has_marker = candidate.has_marker;
        self.pose.width = candidate.width;
        self.pose.height = candidate.height;
        self.pose.center = candidate.center;
        self.pose.marker = candidate.marker;
        self.pose.theta_deg = candidate.theta_deg;
        self.pose.theta_rad = candidate.theta_rad;
        self.pose.corners = candidate.corners;
        self.pose.rederive_absolute();
    }

    // Reference-frame transforms.

    /// Transform a point from absolute coordinates into this token's
    /// frame. `length_scale` sets the scale of the absolute system
    /// (pass 1.0 for unit-square coordinates).
    ///
    /// Rotation is by `+theta`, not `-theta`: with +y pointing down the
    /// coordinate system is left-handed, and the positive rotation is
    /// the one that undoes the token's orientation.
    pub fn point_to_local(&self, point: Point2<f32>, length_scale: f32) -> Point2<f32> {
        let translated = point - self.pose.center.coords * length_scale;
        Rotation2::new(self.pose.theta_rad) * translated
    }

    /// Transform a point from this token's frame back into absolute
    /// coordinates. Inverse of [`point_to_local`](Self::point_to_local).
    pub fn point_from_local(&self, point: Point2<f32>, length_scale: f32) -> Point2<f32> {
        let rotated = Rotation2::new(-self.pose.theta_rad) * point;
        rotated + self.pose.center.coords * length_scale
    }

    /// Re-express `child`'s pose in this token's reference frame.
    ///
    /// The child's center moves into the local frame; its center-relative
    /// corners are kept as-is and its absolute corners and bounds are
    /// rederived from the new center. The child's angle and its angle
    /// history both become parent-relative, so later hysteresis votes
    /// stay consistent with the stored orientation.
    pub fn transform_pose_to_local(&self, child: &mut TokenTracker) {
        child.pose.center = self.point_to_local(child.pose.center, 1.0);
        child.pose.rederive_absolute();

        child.pose.theta_deg = wrap_degrees(child.pose.theta_deg - self.pose.theta_deg);
        child.pose.theta_rad = child.pose.theta_deg.to_radians();
        child.history.shift_by(self.pose.theta_deg);
    }

    /// Attach a deep copy of `source`, re-expressed in this token's
    /// frame, as a child pose. Rejected (and logged) when the child list
    /// is at capacity.
    pub fn add_child_pose(&mut self, source: &TokenTracker) -> Result<(), ChildCapacityError> {
        if self.children.len() >= MAX_CHILD_POSES {
            debug!(
                "dropping child pose for token {:?}: list at capacity",
                self.pose.detection_id
            );
            return Err(ChildCapacityError {
                capacity: MAX_CHILD_POSES,
            });
        }

        let mut child = source.clone();
        self.transform_pose_to_local(&mut child);
        child.is_child = true;
        self.children.push(child);
        Ok(())
    }
}

impl Clone for TokenTracker {
    /// Deep copy of the committed state.
    ///
    /// The staged candidate and manager state are reset: a clone is not
    /// `is_valid` until it receives its own detection, and lifecycle
    /// fields belong to whoever manages the copy. Children are copied
    /// recursively and every copied child is marked as a child pose.
    fn clone(&self) -> Self {
        let mut children: Vec<TokenTracker> = self.children.iter().map(Self::clone).collect();
        for child in &mut children {
            child.is_child = true;
        }
        Self {
            params: self.params,
            staged_detection: None,
            staged_marker: None,
            history: self.history,
            pose: self.pose,
            created: self.created,
            is_child: false,
            children,
            manager: ManagerState::default(),
        }
    }
}
