//! Touch gesture recognition.
//!
//! [`GestureRecognizer`] consumes per-finger [`TouchSample`]s and emits
//! [`GestureEvent`]s for taps, double taps, rail-locked scrolls with flick
//! velocity, and two-finger pinch/scroll. Time is whatever the caller stamps
//! on samples; the recognizer never reads a clock and runs no timers.

use statig::blocking::IntoStateMachineExt as _;

pub mod config;
mod hsm;
pub mod trace;
pub mod tracker;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::{load_config, parse_config_str, validate_config, ConfigError, GestureConfig};
pub use trace::GestureTraceSample;
pub use tracker::TouchPointTracker;
pub use types::{
    GestureEvent, GestureEventKind, GestureEvents, GestureStateId, IgnoreReason, Modifiers,
    ScrollAxis, SlotId, TouchPhase, TouchPoint, TouchSample, MAX_EVENTS_PER_SAMPLE, MAX_POINTS,
};

use hsm::{GestureHsm, GestureHsmEvent};

#[derive(Debug, Default)]
struct DispatchContext {
    events: GestureEvents,
}

impl DispatchContext {
    fn emit(&mut self, event: GestureEvent) {
        if self.events.push(event).is_err() {
            log::warn!("gesture event buffer full, dropping {}", event.kind.label());
        }
    }

    fn finish(self) -> GestureEvents {
        self.events
    }
}

pub struct GestureRecognizer {
    machine: statig::blocking::StateMachine<GestureHsm>,
    last_trace: GestureTraceSample,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureRecognizer {
    /// `config` is taken as-is; run it through [`validate_config`] first if
    /// it did not come from [`load_config`] or [`parse_config_str`].
    pub fn new(config: GestureConfig) -> Self {
        Self {
            machine: GestureHsm::new(config).state_machine(),
            last_trace: GestureTraceSample::default(),
        }
    }

    /// Feeds one sample and returns the events it produced, in emission order.
    ///
    /// Samples for a slot must arrive in causal order (press, moves, one
    /// lift). Reordered or dropped samples are not detected. Samples that
    /// fail admission produce no events and leave all state untouched; the
    /// reason is recorded in [`GestureRecognizer::trace`].
    pub fn process(&mut self, sample: TouchSample) -> GestureEvents {
        let admitted = match self.machine.inner().admit(&sample) {
            Ok(admitted) => admitted,
            Err(reason) => {
                log::trace!(
                    "ignoring {:?} on slot {} at {}ms: {:?}",
                    sample.phase,
                    sample.slot,
                    sample.t_ms,
                    reason
                );
                self.last_trace = self.capture_trace(sample.t_ms, Some(reason), 0);
                return GestureEvents::new();
            }
        };

        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&GestureHsmEvent::Sample(admitted), &mut context);
        let events = context.finish();
        self.last_trace = self.capture_trace(sample.t_ms, None, events.len());
        events
    }

    /// Returns to `NoGesture` and forgets every tracker, including the
    /// double-tap anchor. No events are emitted.
    pub fn reset(&mut self) {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&GestureHsmEvent::Reset, &mut context);
        self.last_trace = GestureTraceSample::default();
    }

    pub fn config(&self) -> &GestureConfig {
        self.machine.inner().config()
    }

    pub fn state(&self) -> GestureStateId {
        self.machine.inner().state_id()
    }

    /// Meaningful only while scrolling.
    pub fn scroll_axis(&self) -> ScrollAxis {
        self.machine.inner().scroll_axis()
    }

    pub fn active_point_count(&self) -> usize {
        self.machine.inner().active_point_count()
    }

    pub fn tracker(&self, slot: SlotId) -> &TouchPointTracker {
        self.machine.inner().tracker(slot)
    }

    pub fn trace(&self) -> GestureTraceSample {
        self.last_trace
    }

    fn capture_trace(
        &self,
        t_ms: u64,
        ignored: Option<IgnoreReason>,
        event_count: usize,
    ) -> GestureTraceSample {
        let inner = self.machine.inner();
        GestureTraceSample {
            t_ms,
            state_id: inner.state_id(),
            scroll_axis: inner.scroll_axis(),
            active_points: inner.active_point_count() as u8,
            ignored,
            event_count: event_count as u8,
        }
    }
}
