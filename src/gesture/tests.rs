use super::*;

fn press(slot: u32, x: f32, y: f32, t_ms: u64) -> TouchSample {
    TouchSample::new(slot, TouchPhase::Pressed, x, y, t_ms)
}

fn moved(slot: u32, x: f32, y: f32, t_ms: u64) -> TouchSample {
    TouchSample::new(slot, TouchPhase::Moved, x, y, t_ms)
}

fn release(slot: u32, x: f32, y: f32, t_ms: u64) -> TouchSample {
    TouchSample::new(slot, TouchPhase::Released, x, y, t_ms)
}

fn cancel(slot: u32, x: f32, y: f32, t_ms: u64) -> TouchSample {
    TouchSample::new(slot, TouchPhase::Cancelled, x, y, t_ms)
}

fn run(recognizer: &mut GestureRecognizer, samples: &[TouchSample]) -> Vec<GestureEvent> {
    samples
        .iter()
        .flat_map(|sample| recognizer.process(*sample))
        .collect()
}

fn kinds(events: &[GestureEvent]) -> Vec<GestureEventKind> {
    events.iter().map(|event| event.kind).collect()
}

fn scroll_deltas(events: &[GestureEvent]) -> Vec<(f32, f32)> {
    events
        .iter()
        .filter_map(|event| match event.kind {
            GestureEventKind::ScrollUpdate { dx, dy } => Some((dx, dy)),
            _ => None,
        })
        .collect()
}

fn slot(raw: u32) -> SlotId {
    SlotId::new(raw).expect("test slot in range")
}

#[test]
fn tap_roundtrip() {
    let mut recognizer = GestureRecognizer::default();

    let down = run(&mut recognizer, &[press(0, 100.0, 100.0, 0)]);
    assert_eq!(kinds(&down), vec![GestureEventKind::TapDown]);
    assert_eq!(down[0].position, TouchPoint::new(100.0, 100.0));
    assert_eq!(recognizer.state(), GestureStateId::PendingTap);

    let up = run(&mut recognizer, &[release(0, 100.0, 100.0, 50)]);
    assert_eq!(kinds(&up), vec![GestureEventKind::Tap]);
    assert_eq!(up[0].position, TouchPoint::new(100.0, 100.0));
    assert_eq!(up[0].t_ms, 50);
    assert_eq!(recognizer.state(), GestureStateId::NoGesture);
    assert_eq!(recognizer.active_point_count(), 0);
}

#[test]
fn second_nearby_tap_is_a_double_tap() {
    let mut recognizer = GestureRecognizer::default();
    run(
        &mut recognizer,
        &[press(0, 100.0, 100.0, 0), release(0, 100.0, 100.0, 50)],
    );

    let events = run(
        &mut recognizer,
        &[press(0, 105.0, 100.0, 200), release(0, 105.0, 100.0, 250)],
    );
    assert_eq!(
        kinds(&events),
        vec![
            GestureEventKind::TapDown,
            GestureEventKind::Tap,
            GestureEventKind::DoubleTap
        ]
    );
    assert_eq!(events[2].position, TouchPoint::new(105.0, 100.0));
}

#[test]
fn distant_or_late_second_tap_is_single() {
    let mut recognizer = GestureRecognizer::default();
    run(
        &mut recognizer,
        &[press(0, 100.0, 100.0, 0), release(0, 100.0, 100.0, 50)],
    );
    let far = run(
        &mut recognizer,
        &[press(0, 300.0, 100.0, 200), release(0, 300.0, 100.0, 250)],
    );
    assert_eq!(
        kinds(&far),
        vec![GestureEventKind::TapDown, GestureEventKind::Tap]
    );

    let late = run(
        &mut recognizer,
        &[
            press(0, 300.0, 100.0, 2_000),
            release(0, 300.0, 100.0, 2_050),
        ],
    );
    assert_eq!(
        kinds(&late),
        vec![GestureEventKind::TapDown, GestureEventKind::Tap]
    );
}

#[test]
fn press_outside_click_window_is_not_a_tap() {
    let mut recognizer = GestureRecognizer::default();
    let quick = run(
        &mut recognizer,
        &[press(0, 10.0, 10.0, 0), release(0, 10.0, 10.0, 5)],
    );
    assert_eq!(kinds(&quick), vec![GestureEventKind::TapDown]);
    assert_eq!(recognizer.state(), GestureStateId::NoGesture);

    let held = run(
        &mut recognizer,
        &[press(0, 10.0, 10.0, 1_000), release(0, 10.0, 10.0, 1_800)],
    );
    assert_eq!(kinds(&held), vec![GestureEventKind::TapDown]);
    assert_eq!(recognizer.state(), GestureStateId::NoGesture);
}

#[test]
fn scroll_updates_follow_each_incremental_delta() {
    let mut recognizer = GestureRecognizer::default();
    let events = run(
        &mut recognizer,
        &[
            press(0, 101.0, 201.0, 0),
            moved(0, 130.0, 230.0, 10),
            moved(0, 110.0, 211.0, 20),
            moved(0, 140.0, 215.0, 30),
            release(0, 140.0, 215.0, 40),
        ],
    );

    assert_eq!(events[0].kind, GestureEventKind::TapDown);
    assert_eq!(events[1].kind, GestureEventKind::ScrollBegin);
    assert_eq!(events[1].position, TouchPoint::new(101.0, 201.0));
    assert_eq!(
        scroll_deltas(&events),
        vec![(29.0, 29.0), (-20.0, -19.0), (30.0, 4.0)]
    );
    assert_eq!(events[2].position, TouchPoint::new(130.0, 230.0));

    let GestureEventKind::ScrollEnd { vx, vy } = events[events.len() - 1].kind else {
        panic!(
            "expected ScrollEnd, got {:?}",
            events[events.len() - 1].kind
        );
    };
    // Least-squares fit over the four buffered samples.
    assert!((vx - 970.0).abs() < 1.0, "vx = {vx}");
    assert!((vy - 230.0).abs() < 1.0, "vy = {vy}");
    assert_eq!(recognizer.state(), GestureStateId::NoGesture);
}

#[test]
fn slow_release_ends_scroll_without_velocity() {
    let mut recognizer = GestureRecognizer::default();
    let events = run(
        &mut recognizer,
        &[
            press(0, 0.0, 0.0, 0),
            moved(0, 30.0, 0.0, 100),
            release(0, 30.0, 0.0, 200),
        ],
    );
    assert_eq!(
        kinds(&events),
        vec![
            GestureEventKind::TapDown,
            GestureEventKind::ScrollBegin,
            GestureEventKind::ScrollUpdate { dx: 30.0, dy: 0.0 },
            GestureEventKind::ScrollEnd { vx: 0.0, vy: 0.0 },
        ]
    );
    assert_eq!(events[3].position, TouchPoint::new(30.0, 0.0));
}

#[test]
fn horizontal_rail_holds_until_broken() {
    let mut recognizer = GestureRecognizer::default();
    let start = run(
        &mut recognizer,
        &[press(0, 0.0, 0.0, 0), moved(0, 20.0, 1.0, 10)],
    );
    assert_eq!(
        kinds(&start),
        vec![
            GestureEventKind::TapDown,
            GestureEventKind::ScrollBegin,
            GestureEventKind::ScrollUpdate { dx: 20.0, dy: 0.0 },
        ]
    );
    assert_eq!(recognizer.scroll_axis(), ScrollAxis::Horizontal);

    let nudge = run(&mut recognizer, &[moved(0, 25.0, 6.0, 20)]);
    assert_eq!(scroll_deltas(&nudge), vec![(5.0, 0.0)]);

    let climb: Vec<TouchSample> = (1..=10u64)
        .map(|i| moved(0, 25.0 + i as f32, 6.0 + 100.0 * i as f32, 20 + i))
        .collect();
    let deltas = scroll_deltas(&run(&mut recognizer, &climb));
    assert_eq!(deltas.len(), 10);
    assert_eq!(deltas[0], (1.0, 0.0));
    assert_eq!(deltas[9], (1.0, 100.0));
    let first_free = deltas
        .iter()
        .position(|&(_, dy)| dy != 0.0)
        .expect("rail should break");
    assert!(deltas[first_free..].iter().all(|&(_, dy)| dy == 100.0));
    assert_eq!(recognizer.scroll_axis(), ScrollAxis::Free);
}

#[test]
fn vertical_rail_holds_until_broken() {
    let mut recognizer = GestureRecognizer::default();
    let start = run(
        &mut recognizer,
        &[press(0, 0.0, 0.0, 0), moved(0, 1.0, 20.0, 10)],
    );
    assert_eq!(scroll_deltas(&start), vec![(0.0, 20.0)]);
    assert_eq!(recognizer.scroll_axis(), ScrollAxis::Vertical);

    let sweep: Vec<TouchSample> = (1..=10u64)
        .map(|i| moved(0, 1.0 + 100.0 * i as f32, 20.0 + i as f32, 10 + i))
        .collect();
    let deltas = scroll_deltas(&run(&mut recognizer, &sweep));
    assert_eq!(deltas[0], (0.0, 1.0));
    assert_eq!(deltas[9], (100.0, 1.0));
    assert_eq!(recognizer.scroll_axis(), ScrollAxis::Free);
}

#[test]
fn stationary_samples_do_not_start_scroll() {
    let mut recognizer = GestureRecognizer::default();
    let events = run(
        &mut recognizer,
        &[
            press(0, 0.0, 0.0, 0),
            TouchSample::new(0, TouchPhase::Stationary, 30.0, 0.0, 10),
        ],
    );
    assert_eq!(kinds(&events), vec![GestureEventKind::TapDown]);
    assert_eq!(recognizer.state(), GestureStateId::PendingTap);

    let events = run(&mut recognizer, &[moved(0, 30.0, 0.0, 20)]);
    assert_eq!(
        kinds(&events),
        vec![
            GestureEventKind::ScrollBegin,
            GestureEventKind::ScrollUpdate { dx: 30.0, dy: 0.0 },
        ]
    );
}

#[test]
fn pinch_then_single_finger_continuation() {
    let mut recognizer = GestureRecognizer::default();
    run(
        &mut recognizer,
        &[press(0, 100.0, 100.0, 0), moved(0, 140.0, 100.0, 10)],
    );
    assert_eq!(recognizer.state(), GestureStateId::Scroll);

    let begin = run(&mut recognizer, &[press(1, 200.0, 100.0, 20)]);
    assert_eq!(
        kinds(&begin),
        vec![GestureEventKind::TapDown, GestureEventKind::PinchBegin]
    );
    assert_eq!(begin[0].position, TouchPoint::new(200.0, 100.0));
    assert_eq!(begin[1].position, TouchPoint::new(170.0, 100.0));
    assert_eq!(recognizer.state(), GestureStateId::Pinch);

    let spread = run(
        &mut recognizer,
        &[moved(0, 100.0, 100.0, 30), moved(1, 260.0, 100.0, 40)],
    );
    assert_eq!(
        kinds(&spread),
        vec![
            GestureEventKind::PinchUpdate {
                scale: 100.0f32 / 60.0
            },
            GestureEventKind::PinchUpdate {
                scale: 160.0f32 / 100.0
            },
        ]
    );
    assert_eq!(spread[1].position, TouchPoint::new(180.0, 100.0));

    let end = run(&mut recognizer, &[release(0, 100.0, 100.0, 50)]);
    assert_eq!(
        kinds(&end),
        vec![GestureEventKind::PinchEnd {
            scale: 160.0f32 / 60.0
        }]
    );
    assert_eq!(recognizer.state(), GestureStateId::Scroll);
    assert_eq!(recognizer.scroll_axis(), ScrollAxis::Free);
    assert_eq!(recognizer.active_point_count(), 1);

    let after = run(&mut recognizer, &[moved(1, 280.0, 110.0, 60)]);
    assert_eq!(
        kinds(&after),
        vec![GestureEventKind::ScrollUpdate { dx: 20.0, dy: 10.0 }]
    );
    assert_eq!(after[0].position, TouchPoint::new(280.0, 110.0));

    let done = run(&mut recognizer, &[release(1, 280.0, 110.0, 70)]);
    assert!(matches!(done[0].kind, GestureEventKind::ScrollEnd { .. }));
    assert_eq!(recognizer.state(), GestureStateId::NoGesture);
    assert_eq!(recognizer.active_point_count(), 0);
}

#[test]
fn freed_slot_pressing_again_reenters_pinch() {
    let mut recognizer = GestureRecognizer::default();
    run(
        &mut recognizer,
        &[
            press(0, 100.0, 100.0, 0),
            press(1, 200.0, 100.0, 10),
            release(0, 100.0, 100.0, 20),
        ],
    );
    assert_eq!(recognizer.state(), GestureStateId::Scroll);

    let events = run(&mut recognizer, &[press(0, 120.0, 100.0, 30)]);
    assert_eq!(
        kinds(&events),
        vec![GestureEventKind::TapDown, GestureEventKind::PinchBegin]
    );
    assert_eq!(recognizer.state(), GestureStateId::Pinch);
}

#[test]
fn second_press_while_pending_opens_pinch_and_scroll() {
    let mut recognizer = GestureRecognizer::default();
    let events = run(
        &mut recognizer,
        &[press(0, 100.0, 100.0, 0), press(1, 200.0, 100.0, 10)],
    );
    assert_eq!(
        kinds(&events),
        vec![
            GestureEventKind::TapDown,
            GestureEventKind::TapDown,
            GestureEventKind::PinchBegin,
            GestureEventKind::ScrollBegin,
        ]
    );
    assert_eq!(events[3].position, TouchPoint::new(150.0, 100.0));
}

#[test]
fn parallel_fingers_scroll_instead_of_pinching() {
    let mut recognizer = GestureRecognizer::default();
    run(
        &mut recognizer,
        &[press(0, 100.0, 100.0, 0), press(1, 200.0, 100.0, 10)],
    );

    // Only one finger has travelled so far.
    let first = run(&mut recognizer, &[moved(0, 100.0, 130.0, 20)]);
    assert!(first.is_empty());

    let second = run(&mut recognizer, &[moved(1, 200.0, 130.0, 30)]);
    assert_eq!(
        kinds(&second),
        vec![GestureEventKind::ScrollUpdate { dx: 0.0, dy: 30.0 }]
    );
    assert_eq!(second[0].position, TouchPoint::new(150.0, 130.0));
    assert_eq!(recognizer.state(), GestureStateId::Pinch);
}

#[test]
fn coincident_fingers_never_produce_nan() {
    let mut recognizer = GestureRecognizer::default();
    run(
        &mut recognizer,
        &[press(0, 50.0, 50.0, 0), press(1, 50.0, 50.0, 10)],
    );

    let adopt = run(&mut recognizer, &[moved(1, 80.0, 50.0, 20)]);
    assert!(adopt.is_empty());

    let events = run(
        &mut recognizer,
        &[moved(1, 110.0, 50.0, 30), release(1, 110.0, 50.0, 40)],
    );
    assert_eq!(
        kinds(&events),
        vec![
            GestureEventKind::PinchUpdate { scale: 2.0 },
            GestureEventKind::PinchEnd { scale: 2.0 },
        ]
    );
}

#[test]
fn pinch_end_without_separation_reports_unit_scale() {
    let mut recognizer = GestureRecognizer::default();
    let events = run(
        &mut recognizer,
        &[
            press(0, 50.0, 50.0, 0),
            press(1, 50.0, 50.0, 10),
            release(1, 50.0, 50.0, 20),
        ],
    );
    assert_eq!(
        events.last().map(|event| event.kind),
        Some(GestureEventKind::PinchEnd { scale: 1.0 })
    );
}

#[test]
fn third_finger_is_ignored() {
    let mut recognizer = GestureRecognizer::default();
    run(
        &mut recognizer,
        &[press(0, 100.0, 100.0, 0), press(1, 200.0, 100.0, 10)],
    );

    let events = run(&mut recognizer, &[press(2, 300.0, 100.0, 20)]);
    assert!(events.is_empty());
    assert_eq!(
        recognizer.trace().ignored,
        Some(IgnoreReason::SlotOutOfRange)
    );
    assert_eq!(recognizer.active_point_count(), 2);
    assert_eq!(recognizer.state(), GestureStateId::Pinch);
    assert_eq!(
        recognizer.tracker(slot(0)).last_position(),
        TouchPoint::new(100.0, 100.0)
    );
    assert_eq!(
        recognizer.tracker(slot(1)).last_position(),
        TouchPoint::new(200.0, 100.0)
    );
}

#[test]
fn inadmissible_samples_are_ignored_with_reason() {
    let mut recognizer = GestureRecognizer::default();

    assert!(recognizer.process(moved(1, 10.0, 10.0, 0)).is_empty());
    assert_eq!(recognizer.trace().ignored, Some(IgnoreReason::InactiveSlot));

    recognizer.process(press(0, 10.0, 10.0, 5));
    assert!(recognizer.process(press(0, 40.0, 40.0, 10)).is_empty());
    assert_eq!(
        recognizer.trace().ignored,
        Some(IgnoreReason::AlreadyPressed)
    );
    assert_eq!(
        recognizer.tracker(slot(0)).first_position(),
        TouchPoint::new(10.0, 10.0)
    );
}

#[test]
fn consumed_samples_do_not_touch_state() {
    let mut recognizer = GestureRecognizer::default();
    let events = recognizer.process(press(0, 10.0, 10.0, 0).consumed());
    assert!(events.is_empty());
    assert_eq!(recognizer.state(), GestureStateId::NoGesture);
    assert_eq!(recognizer.active_point_count(), 0);
    assert!(!recognizer.tracker(slot(0)).is_active());

    let trace = recognizer.trace();
    assert_eq!(trace.ignored, Some(IgnoreReason::Consumed));
    assert_eq!(trace.event_count, 0);
    assert_eq!(trace.t_ms, 0);
}

#[test]
fn cancel_while_pending_clears_everything() {
    let mut recognizer = GestureRecognizer::default();
    run(
        &mut recognizer,
        &[press(0, 100.0, 100.0, 0), release(0, 100.0, 100.0, 50)],
    );

    let cancelled = run(
        &mut recognizer,
        &[press(0, 100.0, 100.0, 100), cancel(0, 100.0, 100.0, 120)],
    );
    assert_eq!(kinds(&cancelled), vec![GestureEventKind::TapDown]);
    assert_eq!(recognizer.state(), GestureStateId::NoGesture);
    assert_eq!(recognizer.active_point_count(), 0);

    // The tap anchor went with the cancel.
    let tap = run(
        &mut recognizer,
        &[press(0, 100.0, 100.0, 200), release(0, 100.0, 100.0, 250)],
    );
    assert_eq!(
        kinds(&tap),
        vec![GestureEventKind::TapDown, GestureEventKind::Tap]
    );
}

#[test]
fn cancel_while_scrolling_ends_scroll() {
    let mut recognizer = GestureRecognizer::default();
    let events = run(
        &mut recognizer,
        &[
            press(0, 0.0, 0.0, 0),
            moved(0, 0.0, 40.0, 100),
            cancel(0, 0.0, 40.0, 200),
        ],
    );
    assert!(matches!(
        events.last().map(|event| event.kind),
        Some(GestureEventKind::ScrollEnd { .. })
    ));
    assert_eq!(recognizer.state(), GestureStateId::NoGesture);
    assert!(!recognizer.tracker(slot(0)).is_active());
}

#[test]
fn cancelling_one_finger_ends_pinch_and_keeps_scrolling() {
    let mut recognizer = GestureRecognizer::default();
    run(
        &mut recognizer,
        &[press(0, 100.0, 100.0, 0), press(1, 200.0, 100.0, 10)],
    );
    assert_eq!(recognizer.state(), GestureStateId::Pinch);

    let squeeze = run(&mut recognizer, &[moved(0, 140.0, 100.0, 20)]);
    assert_eq!(
        kinds(&squeeze),
        vec![GestureEventKind::PinchUpdate {
            scale: 60.0f32 / 100.0
        }]
    );
    assert_eq!(squeeze[0].position, TouchPoint::new(170.0, 100.0));

    let end = run(&mut recognizer, &[cancel(1, 200.0, 100.0, 30)]);
    assert_eq!(
        kinds(&end),
        vec![GestureEventKind::PinchEnd {
            scale: 60.0f32 / 100.0
        }]
    );
    assert_eq!(recognizer.state(), GestureStateId::Scroll);
    assert_eq!(recognizer.scroll_axis(), ScrollAxis::Free);
    assert_eq!(recognizer.active_point_count(), 1);
    assert!(!recognizer.tracker(slot(1)).is_active());

    let after = run(&mut recognizer, &[moved(0, 170.0, 100.0, 40)]);
    assert_eq!(
        kinds(&after),
        vec![GestureEventKind::ScrollUpdate { dx: 30.0, dy: 0.0 }]
    );
    assert_eq!(after[0].position, TouchPoint::new(170.0, 100.0));

    let done = run(&mut recognizer, &[release(0, 170.0, 100.0, 50)]);
    assert!(matches!(done[0].kind, GestureEventKind::ScrollEnd { .. }));
    assert_eq!(recognizer.state(), GestureStateId::NoGesture);
}

#[test]
fn reset_matches_a_fresh_recognizer() {
    let mut used = GestureRecognizer::default();
    run(
        &mut used,
        &[
            press(0, 100.0, 100.0, 0),
            release(0, 100.0, 100.0, 50),
            press(0, 100.0, 100.0, 100),
            press(1, 200.0, 100.0, 110),
        ],
    );
    assert_eq!(used.state(), GestureStateId::Pinch);

    used.reset();
    used.reset();
    assert_eq!(used.state(), GestureStateId::NoGesture);
    assert_eq!(used.active_point_count(), 0);
    assert_eq!(used.scroll_axis(), ScrollAxis::Free);

    let mut fresh = GestureRecognizer::default();
    let script = [press(0, 100.0, 100.0, 200), release(0, 100.0, 100.0, 250)];
    assert_eq!(run(&mut used, &script), run(&mut fresh, &script));
}

#[test]
fn events_carry_latest_modifiers() {
    let mut recognizer = GestureRecognizer::default();
    let down = recognizer.process(press(0, 10.0, 10.0, 0).with_modifiers(Modifiers(0b101)));
    assert_eq!(down[0].modifiers, Modifiers(0b101));

    let up = recognizer.process(release(0, 10.0, 10.0, 40).with_modifiers(Modifiers(0b001)));
    assert_eq!(up[0].kind, GestureEventKind::Tap);
    assert_eq!(up[0].modifiers, Modifiers(0b001));
}

#[test]
fn trace_reports_state_after_each_sample() {
    let mut recognizer = GestureRecognizer::default();
    recognizer.process(press(0, 0.0, 0.0, 0));
    recognizer.process(moved(0, 20.0, 1.0, 10));

    let trace = recognizer.trace();
    assert_eq!(trace.t_ms, 10);
    assert_eq!(trace.state_id, GestureStateId::Scroll);
    assert_eq!(trace.scroll_axis, ScrollAxis::Horizontal);
    assert_eq!(trace.active_points, 1);
    assert_eq!(trace.ignored, None);
    assert_eq!(trace.event_count, 2);
}
