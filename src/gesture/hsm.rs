use statig::prelude::*;

use super::config::GestureConfig;
use super::tracker::TouchPointTracker;
use super::types::{
    GestureEventKind, GestureStateId, IgnoreReason, Modifiers, ScrollAxis, SlotId, SlotRole,
    TouchPhase, TouchPoint, TouchSample, MAX_POINTS,
};
use super::DispatchContext;

mod actions;

/// A sample that passed admission, with its slot range-checked and its role
/// resolved.
#[derive(Clone, Copy, Debug)]
pub(super) struct AdmittedSample {
    pub(super) slot: SlotId,
    pub(super) role: SlotRole,
    pub(super) phase: TouchPhase,
    pub(super) position: TouchPoint,
    pub(super) t_ms: u64,
    pub(super) modifiers: Modifiers,
}

#[derive(Clone, Copy, Debug)]
pub(super) enum GestureHsmEvent {
    Sample(AdmittedSample),
    Reset,
}

pub(super) struct GestureHsm {
    config: GestureConfig,
    trackers: [TouchPointTracker; MAX_POINTS],
    primary: Option<SlotId>,
    state_id: GestureStateId,
    scroll_axis: ScrollAxis,
    pinch_distance_start: f32,
    pinch_distance_current: f32,
    last_modifiers: Modifiers,
}

impl GestureHsm {
    pub(super) fn new(config: GestureConfig) -> Self {
        Self {
            config,
            trackers: core::array::from_fn(|_| TouchPointTracker::new()),
            primary: None,
            state_id: GestureStateId::NoGesture,
            scroll_axis: ScrollAxis::Free,
            pinch_distance_start: 0.0,
            pinch_distance_current: 0.0,
            last_modifiers: Modifiers::NONE,
        }
    }

    pub(super) fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub(super) fn state_id(&self) -> GestureStateId {
        self.state_id
    }

    pub(super) fn scroll_axis(&self) -> ScrollAxis {
        self.scroll_axis
    }

    pub(super) fn tracker(&self, slot: SlotId) -> &TouchPointTracker {
        &self.trackers[slot.index()]
    }

    pub(super) fn active_point_count(&self) -> usize {
        self.trackers.iter().filter(|t| t.is_active()).count()
    }

    /// Boundary check for raw samples. Nothing is mutated here; a rejected
    /// sample leaves the machine exactly as it was.
    pub(super) fn admit(&self, sample: &TouchSample) -> Result<AdmittedSample, IgnoreReason> {
        if sample.consumed {
            return Err(IgnoreReason::Consumed);
        }
        let slot = SlotId::new(sample.slot).ok_or(IgnoreReason::SlotOutOfRange)?;
        let active = self.trackers[slot.index()].is_active();
        match (sample.phase, active) {
            (TouchPhase::Pressed, true) => return Err(IgnoreReason::AlreadyPressed),
            (TouchPhase::Pressed, false) => {}
            (_, false) => return Err(IgnoreReason::InactiveSlot),
            (_, true) => {}
        }

        let role = match self.primary {
            None => SlotRole::Primary,
            Some(primary) if primary == slot => SlotRole::Primary,
            Some(_) => SlotRole::Secondary,
        };

        Ok(AdmittedSample {
            slot,
            role,
            phase: sample.phase,
            position: sample.position,
            t_ms: sample.t_ms,
            modifiers: sample.modifiers,
        })
    }
}

#[state_machine(initial = "State::no_gesture()")]
impl GestureHsm {
    #[state(superstate = "tracking")]
    fn no_gesture(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        match event {
            GestureHsmEvent::Sample(sample) => {
                self.observe(sample);
                let outcome = match (sample.role, sample.phase) {
                    (SlotRole::Primary, TouchPhase::Pressed) => {
                        self.emit(
                            context,
                            GestureEventKind::TapDown,
                            sample.position,
                            sample.t_ms,
                        );
                        self.enter(GestureStateId::PendingTap)
                    }
                    _ => Handled,
                };
                self.settle(sample);
                outcome
            }
            GestureHsmEvent::Reset => Super,
        }
    }

    #[state(superstate = "tracking")]
    fn pending_tap(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        match event {
            GestureHsmEvent::Sample(sample) => {
                self.observe(sample);
                let outcome = match (sample.role, sample.phase) {
                    (SlotRole::Primary, TouchPhase::Released) => {
                        self.finish_tap(context, sample);
                        self.enter(GestureStateId::NoGesture)
                    }
                    (SlotRole::Primary, TouchPhase::Moved | TouchPhase::Stationary) => {
                        if self.try_begin_scroll(context, sample) {
                            self.enter(GestureStateId::Scroll)
                        } else {
                            Handled
                        }
                    }
                    (SlotRole::Primary, TouchPhase::Cancelled) => {
                        self.clear_all();
                        self.enter(GestureStateId::NoGesture)
                    }
                    (SlotRole::Secondary, TouchPhase::Pressed) => {
                        self.begin_pinch(context, sample, true);
                        self.enter(GestureStateId::Pinch)
                    }
                    _ => Handled,
                };
                self.settle(sample);
                outcome
            }
            GestureHsmEvent::Reset => Super,
        }
    }

    #[state(superstate = "tracking")]
    fn scroll(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        match event {
            GestureHsmEvent::Sample(sample) => {
                self.observe(sample);
                let outcome = match (sample.role, sample.phase) {
                    (_, TouchPhase::Moved) => {
                        self.update_scroll(context, sample);
                        Handled
                    }
                    (_, TouchPhase::Released | TouchPhase::Cancelled) => {
                        self.end_scroll(context, sample);
                        self.enter(GestureStateId::NoGesture)
                    }
                    (SlotRole::Secondary, TouchPhase::Pressed) => {
                        self.begin_pinch(context, sample, false);
                        self.enter(GestureStateId::Pinch)
                    }
                    _ => Handled,
                };
                self.settle(sample);
                outcome
            }
            GestureHsmEvent::Reset => Super,
        }
    }

    #[state(superstate = "tracking")]
    fn pinch(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        match event {
            GestureHsmEvent::Sample(sample) => {
                self.observe(sample);
                let outcome = match (sample.role, sample.phase) {
                    (_, TouchPhase::Moved) => {
                        self.update_pinch(context, sample);
                        Handled
                    }
                    (_, TouchPhase::Released | TouchPhase::Cancelled) => {
                        self.end_pinch(context, sample);
                        self.enter(GestureStateId::Scroll)
                    }
                    _ => Handled,
                };
                self.settle(sample);
                outcome
            }
            GestureHsmEvent::Reset => Super,
        }
    }

    #[superstate]
    fn tracking(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        let _ = context;
        match event {
            GestureHsmEvent::Reset => {
                self.clear_all();
                self.enter(GestureStateId::NoGesture)
            }
            GestureHsmEvent::Sample(_) => Handled,
        }
    }
}
