//! Temporal hysteresis over recent angle candidates.
//!
//! Marker misdetections flip the raw angle candidate by a multiple of
//! 90°. Genuine 90/180/270° rotations within one update interval are
//! rare, so a candidate far from the committed angle is only believed if
//! it agrees with recent history better than the committed angle does;
//! otherwise it is snapped back by whole 90° steps.

use token_pose_core::{cyclic_distance_deg, wrap_degrees};

pub(crate) const HISTORY_LEN: usize = 5;

/// Most-recent-first ring of raw (pre-snap) angle candidates.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct AngleHistory {
    recent: [Option<f32>; HISTORY_LEN],
}

impl AngleHistory {
    /// Select an angle for `candidate_deg` given the committed angle.
    ///
    /// The raw candidate is always pushed into the history, even when
    /// the returned value is a snapped correction, so future votes see
    /// what the marker actually reported.
    pub fn filter(&mut self, candidate_deg: f32, committed_deg: f32, accept_deg: f32) -> f32 {
        let candidate = wrap_degrees(candidate_deg);

        let selected = if cyclic_distance_deg(candidate, committed_deg) < accept_deg {
            // No misdetection risk this close to the committed angle.
            candidate
        } else {
            let mut rating = 0i32;
            for h in self.recent.into_iter().flatten() {
                if cyclic_distance_deg(candidate, h) < cyclic_distance_deg(committed_deg, h) {
                    rating += 1;
                } else {
                    rating -= 1;
                }
            }

            if rating > 0 {
                candidate
            } else if candidate < committed_deg {
                let steps = ((committed_deg - candidate) as i32 + 45) / 90;
                wrap_degrees(candidate + 90.0 * steps as f32)
            } else {
                let steps = ((candidate - committed_deg) as i32 + 45) / 90;
                wrap_degrees(candidate - 90.0 * steps as f32)
            }
        };

        self.recent.rotate_right(1);
        self.recent[0] = Some(candidate);

        selected
    }

    /// Shift every stored candidate by `-delta_deg` (used when a pose is
    /// re-expressed in a parent frame). Entries driven below zero are
    /// discarded rather than wrapped: the parent-relative history only
    /// keeps candidates that stay meaningful in the new frame.
    pub fn shift_by(&mut self, delta_deg: f32) {
        for slot in &mut self.recent {
            *slot = slot.and_then(|h| {
                let shifted = h - delta_deg;
                (shifted >= 0.0).then_some(shifted)
            });
        }
    }

    #[cfg(test)]
    pub fn entries(&self) -> [Option<f32>; HISTORY_LEN] {
        self.recent
    }
}
