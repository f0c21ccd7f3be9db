use super::*;

use crate::gesture::types::GestureEvent;

impl GestureHsm {
    /// Bookkeeping shared by every state before it looks at a sample.
    pub(super) fn observe(&mut self, sample: &AdmittedSample) {
        self.last_modifiers = sample.modifiers;
        if sample.phase == TouchPhase::Pressed && self.primary.is_none() {
            self.primary = Some(sample.slot);
        }
        self.trackers[sample.slot.index()].update(sample.phase, sample.position, sample.t_ms);
    }

    /// Retires a lifted finger once the state has reacted to it. When the
    /// primary finger lifts, the remaining finger (if any) takes over.
    pub(super) fn settle(&mut self, sample: &AdmittedSample) {
        if !sample.phase.is_lift() {
            return;
        }
        self.trackers[sample.slot.index()].reset();
        if self.primary == Some(sample.slot) {
            let other = sample.slot.other();
            self.primary = self.trackers[other.index()].is_active().then_some(other);
            if let Some(slot) = self.primary {
                log::debug!("gesture primary handed over to slot {slot}");
            }
        }
    }

    pub(super) fn clear_all(&mut self) {
        for tracker in &mut self.trackers {
            tracker.clear();
        }
        self.primary = None;
        self.scroll_axis = ScrollAxis::Free;
        self.pinch_distance_start = 0.0;
        self.pinch_distance_current = 0.0;
        self.last_modifiers = Modifiers::NONE;
    }

    pub(super) fn enter(&mut self, to: GestureStateId) -> Outcome<State> {
        if self.state_id != to {
            log::debug!("gesture state {} -> {}", self.state_id.label(), to.label());
        }
        self.state_id = to;
        Transition(match to {
            GestureStateId::NoGesture => State::no_gesture(),
            GestureStateId::PendingTap => State::pending_tap(),
            GestureStateId::Scroll => State::scroll(),
            GestureStateId::Pinch => State::pinch(),
        })
    }

    pub(super) fn emit(
        &self,
        context: &mut DispatchContext,
        kind: GestureEventKind,
        position: TouchPoint,
        t_ms: u64,
    ) {
        context.emit(GestureEvent {
            kind,
            position,
            t_ms,
            modifiers: self.last_modifiers,
        });
    }

    pub(super) fn finish_tap(&mut self, context: &mut DispatchContext, sample: &AdmittedSample) {
        let config = self.config;
        let tracker = &self.trackers[sample.slot.index()];
        if !tracker.in_click_window(&config) {
            return;
        }
        let at = tracker.first_position();
        let double = tracker.in_double_click_window(&config);

        self.emit(context, GestureEventKind::Tap, at, sample.t_ms);
        if double {
            self.emit(context, GestureEventKind::DoubleTap, at, sample.t_ms);
        }
        self.trackers[sample.slot.index()].mark_tap();
    }

    /// Returns `true` once the primary finger has moved far enough to start
    /// scrolling. The axis is fixed from the delta that crossed the threshold.
    pub(super) fn try_begin_scroll(
        &mut self,
        context: &mut DispatchContext,
        sample: &AdmittedSample,
    ) -> bool {
        let config = self.config;
        let idx = sample.slot.index();
        let tracker = &self.trackers[idx];
        if !tracker.in_scroll_window(sample.phase, &config)
            || !tracker.has_enough_data_for_rail(&config)
        {
            return false;
        }

        let axis = if tracker.is_horizontal_rail(&config) {
            ScrollAxis::Horizontal
        } else if tracker.is_vertical_rail(&config) {
            ScrollAxis::Vertical
        } else {
            ScrollAxis::Free
        };
        self.scroll_axis = axis;
        log::debug!("scroll rail classified as {axis:?}");

        let anchor = tracker.first_position();
        self.emit(context, GestureEventKind::ScrollBegin, anchor, sample.t_ms);
        if tracker.did_scroll(0.0) {
            let (dx, dy) = self.rail_constrained(tracker.delta());
            self.emit(
                context,
                GestureEventKind::ScrollUpdate { dx, dy },
                tracker.last_position(),
                sample.t_ms,
            );
        }
        self.trackers[idx].mark_scroll_restart();
        true
    }

    pub(super) fn update_scroll(&mut self, context: &mut DispatchContext, sample: &AdmittedSample) {
        let config = self.config;
        let idx = sample.slot.index();
        let tracker = &self.trackers[idx];

        let axis = self.scroll_axis;
        let broken = match axis {
            ScrollAxis::Horizontal => tracker.breaks_horizontal_rail(&config),
            ScrollAxis::Vertical => tracker.breaks_vertical_rail(&config),
            ScrollAxis::Free => false,
        };
        if broken {
            log::debug!("{axis:?} scroll rail broken");
            self.scroll_axis = ScrollAxis::Free;
        }

        if !tracker.did_scroll(0.0) {
            return;
        }
        let (dx, dy) = self.rail_constrained(tracker.delta());
        self.emit(
            context,
            GestureEventKind::ScrollUpdate { dx, dy },
            tracker.last_position(),
            sample.t_ms,
        );
        self.trackers[idx].mark_scroll_restart();
    }

    pub(super) fn end_scroll(&mut self, context: &mut DispatchContext, sample: &AdmittedSample) {
        let config = self.config;
        let tracker = &self.trackers[sample.slot.index()];
        let (vx, vy) = if tracker.is_over_flick_speed(&config) {
            tracker.velocity()
        } else {
            (0.0, 0.0)
        };
        self.emit(
            context,
            GestureEventKind::ScrollEnd { vx, vy },
            tracker.last_position(),
            sample.t_ms,
        );
        self.scroll_axis = ScrollAxis::Free;
    }

    /// A second finger landed. `from_pending_tap` also opens the scroll
    /// sequence that a two-finger drag reports through.
    pub(super) fn begin_pinch(
        &mut self,
        context: &mut DispatchContext,
        sample: &AdmittedSample,
        from_pending_tap: bool,
    ) {
        self.emit(
            context,
            GestureEventKind::TapDown,
            sample.position,
            sample.t_ms,
        );

        let distance = self.point_distance();
        self.pinch_distance_start = distance;
        self.pinch_distance_current = distance;
        let center = self.centroid();
        self.emit(context, GestureEventKind::PinchBegin, center, sample.t_ms);
        if from_pending_tap {
            self.emit(context, GestureEventKind::ScrollBegin, center, sample.t_ms);
        }
        self.scroll_axis = ScrollAxis::Free;
    }

    pub(super) fn update_pinch(&mut self, context: &mut DispatchContext, sample: &AdmittedSample) {
        let config = self.config;
        let distance = self.point_distance();
        let center = self.centroid();

        if (distance - self.pinch_distance_current).abs() < config.pinch.min_update_distance_px {
            let min_px = config.pinch.min_scroll_distance_px;
            if !self.trackers.iter().all(|t| t.did_scroll(min_px)) {
                return;
            }
            let (dx, dy) = self.trackers[sample.slot.index()].delta();
            self.emit(
                context,
                GestureEventKind::ScrollUpdate { dx, dy },
                center,
                sample.t_ms,
            );
        } else if self.pinch_distance_current > 0.0 {
            let scale = distance / self.pinch_distance_current;
            self.emit(
                context,
                GestureEventKind::PinchUpdate { scale },
                center,
                sample.t_ms,
            );
            self.pinch_distance_current = distance;
        } else {
            // Coincident fingers: no ratio exists yet, so the new separation
            // becomes the baseline.
            log::debug!("pinch distance was zero, adopting {distance}");
            self.pinch_distance_current = distance;
            if self.pinch_distance_start <= 0.0 {
                self.pinch_distance_start = distance;
            }
        }

        for tracker in &mut self.trackers {
            tracker.mark_scroll_restart();
        }
    }

    pub(super) fn end_pinch(&mut self, context: &mut DispatchContext, sample: &AdmittedSample) {
        let distance = self.point_distance();
        let scale = if self.pinch_distance_start > 0.0 {
            distance / self.pinch_distance_start
        } else {
            1.0
        };
        let center = self.centroid();
        self.emit(
            context,
            GestureEventKind::PinchEnd { scale },
            center,
            sample.t_ms,
        );
        self.pinch_distance_start = 0.0;
        self.pinch_distance_current = 0.0;
        self.scroll_axis = ScrollAxis::Free;
    }

    fn rail_constrained(&self, (dx, dy): (f32, f32)) -> (f32, f32) {
        match self.scroll_axis {
            ScrollAxis::Horizontal => (dx, 0.0),
            ScrollAxis::Vertical => (0.0, dy),
            ScrollAxis::Free => (dx, dy),
        }
    }

    fn point_distance(&self) -> f32 {
        let [a, b] = &self.trackers;
        a.distance_to(b)
    }

    fn centroid(&self) -> TouchPoint {
        let [a, b] = &self.trackers;
        a.last_position().midpoint(b.last_position())
    }
}
