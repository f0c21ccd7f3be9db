//! Multi-touch gesture recognition for pointer-driven UIs.
//!
//! Raw per-finger samples go in, high-level gesture events come out. See
//! [`GestureRecognizer`].

pub mod gesture;

pub use gesture::{
    load_config, parse_config_str, validate_config, ConfigError, GestureConfig, GestureEvent,
    GestureEventKind, GestureEvents, GestureRecognizer, GestureStateId, GestureTraceSample,
    IgnoreReason, Modifiers, ScrollAxis, SlotId, TouchPhase, TouchPoint, TouchPointTracker,
    TouchSample, MAX_EVENTS_PER_SAMPLE, MAX_POINTS,
};
