use super::types::{GestureStateId, IgnoreReason, ScrollAxis};

/// Recognizer snapshot taken after every processed sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GestureTraceSample {
    pub t_ms: u64,
    pub state_id: GestureStateId,
    pub scroll_axis: ScrollAxis,
    pub active_points: u8,
    pub ignored: Option<IgnoreReason>,
    pub event_count: u8,
}
