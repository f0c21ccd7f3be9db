use core::fmt;

/// Number of simultaneously tracked touch slots.
pub const MAX_POINTS: usize = 2;

/// Upper bound on events synthesized from a single touch sample.
pub const MAX_EVENTS_PER_SAMPLE: usize = 4;

pub type GestureEvents = heapless::Vec<GestureEvent, MAX_EVENTS_PER_SAMPLE>;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// `(other - self)` per axis.
    pub fn delta_to(self, other: TouchPoint) -> (f32, f32) {
        (other.x - self.x, other.y - self.y)
    }

    pub fn manhattan_distance(self, other: TouchPoint) -> f32 {
        let (dx, dy) = self.delta_to(other);
        dx.abs() + dy.abs()
    }

    pub fn distance(self, other: TouchPoint) -> f32 {
        let (dx, dy) = self.delta_to(other);
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(self, other: TouchPoint) -> TouchPoint {
        TouchPoint {
            x: (self.x + other.x) * 0.5,
            y: (self.y + other.y) * 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Pressed,
    Moved,
    Stationary,
    Released,
    Cancelled,
}

impl TouchPhase {
    pub const fn is_lift(self) -> bool {
        matches!(self, TouchPhase::Released | TouchPhase::Cancelled)
    }
}

/// Modifier bitmask carried from the input sample onto synthesized gestures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(pub u32);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }
}

/// One raw touch sample as delivered by the windowing layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchSample {
    pub slot: u32,
    pub phase: TouchPhase,
    pub position: TouchPoint,
    pub t_ms: u64,
    pub modifiers: Modifiers,
    /// Set when another handler already claimed this touch.
    pub consumed: bool,
}

impl TouchSample {
    pub fn new(slot: u32, phase: TouchPhase, x: f32, y: f32, t_ms: u64) -> Self {
        Self {
            slot,
            phase,
            position: TouchPoint::new(x, y),
            t_ms,
            modifiers: Modifiers::NONE,
            consumed: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn consumed(mut self) -> Self {
        self.consumed = true;
        self
    }
}

/// Touch slot index, valid by construction (`< MAX_POINTS`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotId(u8);

impl SlotId {
    pub fn new(raw: u32) -> Option<SlotId> {
        if (raw as usize) < MAX_POINTS {
            Some(SlotId(raw as u8))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other slot of the two-point model.
    pub const fn other(self) -> SlotId {
        SlotId(1 - self.0)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotRole {
    Primary,
    Secondary,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollAxis {
    #[default]
    Free,
    Horizontal,
    Vertical,
}

impl ScrollAxis {
    pub const fn label(self) -> &'static str {
        match self {
            ScrollAxis::Free => "free",
            ScrollAxis::Horizontal => "horizontal",
            ScrollAxis::Vertical => "vertical",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum GestureStateId {
    #[default]
    NoGesture = 0,
    PendingTap = 1,
    Scroll = 2,
    Pinch = 3,
}

impl GestureStateId {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            GestureStateId::NoGesture => "no_gesture",
            GestureStateId::PendingTap => "pending_tap",
            GestureStateId::Scroll => "scroll",
            GestureStateId::Pinch => "pinch",
        }
    }
}

/// Why `process()` dropped a sample without touching any state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum IgnoreReason {
    Consumed = 1,
    SlotOutOfRange = 2,
    AlreadyPressed = 3,
    InactiveSlot = 4,
}

impl IgnoreReason {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            IgnoreReason::Consumed => "consumed",
            IgnoreReason::SlotOutOfRange => "slot_out_of_range",
            IgnoreReason::AlreadyPressed => "already_pressed",
            IgnoreReason::InactiveSlot => "inactive_slot",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEventKind {
    TapDown,
    Tap,
    DoubleTap,
    ScrollBegin,
    ScrollUpdate { dx: f32, dy: f32 },
    ScrollEnd { vx: f32, vy: f32 },
    PinchBegin,
    PinchUpdate { scale: f32 },
    PinchEnd { scale: f32 },
}

impl GestureEventKind {
    pub const fn label(self) -> &'static str {
        match self {
            GestureEventKind::TapDown => "tap_down",
            GestureEventKind::Tap => "tap",
            GestureEventKind::DoubleTap => "double_tap",
            GestureEventKind::ScrollBegin => "scroll_begin",
            GestureEventKind::ScrollUpdate { .. } => "scroll_update",
            GestureEventKind::ScrollEnd { .. } => "scroll_end",
            GestureEventKind::PinchBegin => "pinch_begin",
            GestureEventKind::PinchUpdate { .. } => "pinch_update",
            GestureEventKind::PinchEnd { .. } => "pinch_end",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureEvent {
    pub kind: GestureEventKind,
    pub position: TouchPoint,
    pub t_ms: u64,
    pub modifiers: Modifiers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_ids_are_range_checked() {
        assert_eq!(SlotId::new(0).map(SlotId::index), Some(0));
        assert_eq!(SlotId::new(1).map(SlotId::index), Some(1));
        assert!(SlotId::new(2).is_none());
        assert!(SlotId::new(u32::MAX).is_none());
    }

    #[test]
    fn point_metrics() {
        let a = TouchPoint::new(10.0, 10.0);
        let b = TouchPoint::new(13.0, 14.0);
        assert_eq!(a.manhattan_distance(b), 7.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.midpoint(b), TouchPoint::new(11.5, 12.0));
    }
}
