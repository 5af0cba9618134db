use std::time::Instant;

/// Lifecycle state owned by an external tracking manager.
///
/// The tracker never writes these fields; a manager that correlates
/// touch input and assigns stable ids across appearing/disappearing
/// detections is their sole writer.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManagerState {
    /// Whether someone is currently touching this token.
    pub touched: bool,
    /// When the token last became touched.
    pub touched_at: Option<Instant>,
    /// When the token last became untouched.
    pub untouched_at: Option<Instant>,
    /// Manager-assigned id; `None` means unassigned.
    pub tracking_id: Option<u32>,
    /// A disabled token keeps tracking but should be ignored downstream.
    pub disabled: bool,
}
