use serde::{Deserialize, Serialize};

/// Configuration for the pose filter.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TrackerParams {
    /// Sensing-grid units across the unit square. One grid unit
    /// (`1 / grid_resolution`) is the minimum meaningful spatial
    /// resolution of the surface.
    #[serde(default = "default_grid_resolution")]
    pub grid_resolution: u32,
    /// Center movement needed to commit a candidate, in grid units.
    #[serde(default = "default_center_gate")]
    pub center_gate_grid_units: f32,
    /// Angle change needed to commit a candidate, in degrees.
    ///
    /// Compared as a plain absolute difference, not a cyclic one: near
    /// the 0/360 wrap two visually identical angles can register as
    /// significantly different. Kept for compatibility with existing
    /// consumers; see the gate tests for the pinned behavior.
    #[serde(default = "default_angle_gate")]
    pub angle_gate_deg: f32,
    /// Candidates within this cyclic distance of the committed angle are
    /// accepted without consulting the angle history.
    #[serde(default = "default_hysteresis_accept")]
    pub hysteresis_accept_deg: f32,
}

fn default_grid_resolution() -> u32 {
    30
}

fn default_center_gate() -> f32 {
    0.5
}

fn default_angle_gate() -> f32 {
    10.0
}

fn default_hysteresis_accept() -> f32 {
    70.0
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            grid_resolution: default_grid_resolution(),
            center_gate_grid_units: default_center_gate(),
            angle_gate_deg: default_angle_gate(),
            hysteresis_accept_deg: default_hysteresis_accept(),
        }
    }
}

impl TrackerParams {
    /// Side length of one sensing-grid cell in unit-square fractions.
    pub fn grid_unit(&self) -> f32 {
        1.0 / self.grid_resolution as f32
    }
}
