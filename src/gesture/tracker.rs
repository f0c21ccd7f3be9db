mod velocity;

pub use velocity::{VelocityEstimator, VELOCITY_HISTORY_LEN};

use super::config::GestureConfig;
use super::types::{TouchPhase, TouchPoint};

#[derive(Clone, Copy, Debug, PartialEq)]
struct TapAnchor {
    position: TouchPoint,
    t_ms: u64,
}

/// Position and timing history of a single finger.
///
/// Trackers live in a fixed array owned by the recognizer and are reused
/// across presses of the same slot: `reset` ends an interaction without
/// forgetting where the last tap landed, `clear` forgets everything.
#[derive(Debug, Default)]
pub struct TouchPointTracker {
    active: bool,
    first_position: TouchPoint,
    first_ms: u64,
    last_position: TouchPoint,
    last_ms: u64,
    last_tap: Option<TapAnchor>,
    velocity: VelocityEstimator,
}

impl TouchPointTracker {
    pub const fn new() -> Self {
        Self {
            active: false,
            first_position: TouchPoint::new(0.0, 0.0),
            first_ms: 0,
            last_position: TouchPoint::new(0.0, 0.0),
            last_ms: 0,
            last_tap: None,
            velocity: VelocityEstimator::new(),
        }
    }

    pub fn update(&mut self, phase: TouchPhase, position: TouchPoint, t_ms: u64) {
        match phase {
            TouchPhase::Pressed => {
                self.active = true;
                self.first_position = position;
                self.first_ms = t_ms;
                self.velocity.clear();
                self.velocity.push(position, t_ms);
            }
            TouchPhase::Moved => self.velocity.push(position, t_ms),
            TouchPhase::Stationary | TouchPhase::Released | TouchPhase::Cancelled => {}
        }
        self.last_position = position;
        self.last_ms = t_ms;
    }

    /// Records the current sample as the anchor for double-tap detection and
    /// ends the interaction.
    pub fn mark_tap(&mut self) {
        self.last_tap = Some(TapAnchor {
            position: self.last_position,
            t_ms: self.last_ms,
        });
        self.reset();
    }

    /// Re-anchors deltas on the latest sample after a scroll or pinch update.
    pub fn mark_scroll_restart(&mut self) {
        self.first_position = self.last_position;
        self.first_ms = self.last_ms;
    }

    /// Ends the current interaction. The tap anchor survives.
    pub fn reset(&mut self) {
        self.active = false;
        self.first_position = TouchPoint::default();
        self.first_ms = 0;
        self.last_position = TouchPoint::default();
        self.last_ms = 0;
        self.velocity.clear();
    }

    pub fn clear(&mut self) {
        self.reset();
        self.last_tap = None;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn first_position(&self) -> TouchPoint {
        self.first_position
    }

    pub fn last_position(&self) -> TouchPoint {
        self.last_position
    }

    pub fn last_ms(&self) -> u64 {
        self.last_ms
    }

    /// Delta of the latest sample against the current anchor.
    pub fn delta(&self) -> (f32, f32) {
        self.first_position.delta_to(self.last_position)
    }

    pub fn velocity(&self) -> (f32, f32) {
        self.velocity.velocity()
    }

    pub fn in_click_window(&self, config: &GestureConfig) -> bool {
        let held_ms = self.last_ms.saturating_sub(self.first_ms);
        (config.tap.min_click_ms..config.tap.max_click_ms).contains(&held_ms)
            && self.first_position.manhattan_distance(self.last_position)
                < config.tap.click_distance_px
    }

    pub fn in_double_click_window(&self, config: &GestureConfig) -> bool {
        let Some(tap) = self.last_tap else {
            return false;
        };
        self.last_ms.saturating_sub(tap.t_ms) < config.tap.double_click_ms
            && tap.position.manhattan_distance(self.last_position) < config.tap.click_distance_px
    }

    pub fn in_scroll_window(&self, phase: TouchPhase, config: &GestureConfig) -> bool {
        phase == TouchPhase::Moved
            && self.first_position.manhattan_distance(self.last_position)
                >= config.tap.click_distance_px
    }

    pub fn has_enough_data_for_rail(&self, config: &GestureConfig) -> bool {
        let (dx, dy) = self.delta();
        dx * dx + dy * dy >= config.scroll.min_scroll_delta_squared
    }

    pub fn is_horizontal_rail(&self, config: &GestureConfig) -> bool {
        let (dx, dy) = self.delta();
        dx.abs() > config.scroll.rail_start_ratio * dy.abs()
    }

    pub fn is_vertical_rail(&self, config: &GestureConfig) -> bool {
        let (dx, dy) = self.delta();
        dy.abs() > config.scroll.rail_start_ratio * dx.abs()
    }

    pub fn breaks_horizontal_rail(&self, config: &GestureConfig) -> bool {
        let (vx, vy) = self.velocity();
        vy.abs() > config.scroll.rail_break_ratio * vx.abs() + config.scroll.rail_break_min_velocity
    }

    pub fn breaks_vertical_rail(&self, config: &GestureConfig) -> bool {
        let (vx, vy) = self.velocity();
        vx.abs() > config.scroll.rail_break_ratio * vy.abs() + config.scroll.rail_break_min_velocity
    }

    pub fn did_scroll(&self, min_px: f32) -> bool {
        let (dx, dy) = self.delta();
        dx.abs() > min_px || dy.abs() > min_px
    }

    pub fn is_over_flick_speed(&self, config: &GestureConfig) -> bool {
        self.velocity.speed_squared() >= config.scroll.min_flick_speed_squared
    }

    pub fn distance_to(&self, other: &TouchPointTracker) -> f32 {
        self.last_position.distance(other.last_position)
    }
}
