use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};

use token_pose_core::{Detection, IdentityCalibration};
use token_pose_track::{TokenTracker, TrackerParams};

fn detection(id: i32, center: (f32, f32), size: (f32, f32), angle_deg: f32) -> Detection {
    Detection {
        id,
        center: Point2::new(center.0, center.1),
        size: Vector2::new(size.0, size.1),
        angle_deg,
        scale: Vector2::new(1.0, 1.0),
    }
}

/// Drive the tracker to a committed angle of `-angle_deg` degrees
/// (wrapped). Observing the same detection twice lets far-from-zero
/// angles survive the hysteresis: the first pass seeds the history, the
/// second wins the vote.
fn tracker_at_angle(angle_deg: f32) -> TokenTracker {
    let mut tracker = TokenTracker::new(TrackerParams::default());
    let det = detection(1, (0.4, 0.6), (0.1, 0.2), angle_deg);
    tracker.observe(det, None, &IdentityCalibration);
    tracker.observe(det, None, &IdentityCalibration);
    tracker
}

#[test]
fn repeated_identical_detections_are_idempotent() {
    let mut tracker = TokenTracker::new(TrackerParams::default());
    let det = detection(3, (0.5, 0.5), (0.2, 0.1), 30.0);

    assert!(tracker.observe(det, None, &IdentityCalibration));
    let committed = *tracker.pose();

    for _ in 0..10 {
        assert!(!tracker.observe(det, None, &IdentityCalibration));
        assert_eq!(committed, *tracker.pose());
    }
}

#[test]
fn staged_detection_defers_until_update() {
    let mut tracker = TokenTracker::new(TrackerParams::default());
    tracker.set_detection(detection(9, (0.5, 0.5), (0.2, 0.1), 10.0));

    assert!(tracker.is_valid());
    assert_eq!(None, tracker.pose().detection_id);

    assert!(tracker.update(&IdentityCalibration));
    assert_eq!(Some(9), tracker.pose().detection_id);
}

#[test]
fn corners_and_bounds_stay_consistent_after_commits() {
    // Wide token (post-swap width 0.2, height 0.1) over detector angles
    // where the long side stays horizontally dominant.
    for (id, angle) in [0.0f32, 10.0, 30.0, 44.0].into_iter().enumerate() {
        let mut tracker = TokenTracker::new(TrackerParams::default());
        tracker.observe(
            detection(id as i32, (0.5, 0.5), (0.1, 0.2), angle),
            None,
            &IdentityCalibration,
        );

        let pose = tracker.pose();
        assert!(pose.width > 0.0 && pose.height > 0.0);
        assert!(pose.bounds.max_x > pose.bounds.min_x, "angle {angle}");
        assert!(pose.bounds.max_y > pose.bounds.min_y, "angle {angle}");
        for i in 0..4 {
            let expected = pose.center + pose.corners[i];
            assert_eq!(expected, pose.abs_corners[i], "angle {angle} corner {i}");
        }
    }
}

#[test]
fn local_frame_round_trips_across_angles_and_scales() {
    for angle in [0.0f32, 37.5, 90.0, 180.0, 270.3] {
        // Detector angles are negated into committed angles; feeding the
        // negative drives the committed angle to `angle` itself.
        let tracker = tracker_at_angle(-angle);
        assert_relative_eq!(tracker.pose().theta_deg, angle, epsilon = 1e-3);

        for scale in [1.0f32, 0.001, 1000.0] {
            let p = Point2::new(0.3 * scale, 0.8 * scale);
            let round = tracker.point_from_local(tracker.point_to_local(p, scale), scale);
            assert_relative_eq!(round.x, p.x, epsilon = 2e-3 * scale.max(1.0));
            assert_relative_eq!(round.y, p.y, epsilon = 2e-3 * scale.max(1.0));
        }
    }
}

#[test]
fn child_pose_composition_under_a_rotated_parent() {
    let mut parent = TokenTracker::new(TrackerParams::default());
    let det = detection(1, (0.5, 0.5), (0.1, 0.2), -90.0);
    parent.observe(det, None, &IdentityCalibration);
    parent.observe(det, None, &IdentityCalibration);
    assert_relative_eq!(parent.pose().theta_deg, 90.0, epsilon = 1e-3);

    let mut child = TokenTracker::new(TrackerParams::default());
    child.observe(
        detection(2, (0.7, 0.5), (0.1, 0.2), 0.0),
        None,
        &IdentityCalibration,
    );

    let parent_bounds_before = parent.pose().bounds;
    parent.add_child_pose(&child).unwrap();
    let attached = &parent.children()[0];

    // Parent frame: rotate the (0.2, 0) offset by +90°.
    assert_relative_eq!(attached.pose().center.x, 0.0, epsilon = 1e-5);
    assert_relative_eq!(attached.pose().center.y, 0.2, epsilon = 1e-5);
    // Child angle becomes parent-relative: 0 - 90, wrapped.
    assert_relative_eq!(attached.pose().theta_deg, 270.0, epsilon = 1e-3);
    assert!(attached.is_child_pose());

    // The attached pose's bounds were rederived from its own transformed
    // corners; the parent's bounds are untouched by the attachment.
    assert_eq!(parent_bounds_before, parent.pose().bounds);
    for i in 0..4 {
        let abs = attached.pose().abs_corners[i];
        let derived = attached.pose().center + attached.pose().corners[i];
        assert_relative_eq!(abs.x, derived.x, epsilon = 1e-6);
        assert_relative_eq!(abs.y, derived.y, epsilon = 1e-6);
    }
}

#[test]
fn marker_flicker_keeps_the_committed_angle_stable() {
    let mut tracker = TokenTracker::new(TrackerParams::default());
    let det = detection(1, (0.5, 0.5), (0.2, 0.4), 0.0);

    // Marker on the right edge: front corner 1, committed angle 270°
    // after the history warms up.
    let marker = Point2::new(0.7, 0.51);
    tracker.observe(det, Some(marker), &IdentityCalibration);
    tracker.observe(det, Some(marker), &IdentityCalibration);
    assert_relative_eq!(tracker.pose().theta_deg, 270.0, epsilon = 1e-3);

    // Flicker: the marker misdetects near the opposite edge on some
    // frames. The committed angle must not budge.
    let bad_marker = Point2::new(0.3, 0.49);
    for frame in 0..8 {
        let m = if frame % 2 == 0 { bad_marker } else { marker };
        tracker.observe(det, Some(m), &IdentityCalibration);
        assert_relative_eq!(tracker.pose().theta_deg, 270.0, epsilon = 1e-3);
    }
}
