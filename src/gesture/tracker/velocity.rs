use heapless::HistoryBuffer;

use crate::gesture::types::TouchPoint;

/// Samples kept for velocity estimation; the oldest is evicted on overflow.
pub const VELOCITY_HISTORY_LEN: usize = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct VelocitySample {
    position: TouchPoint,
    t_ms: u64,
}

/// Least-squares velocity over a bounded window of recent samples.
///
/// Fits `x(t)` and `y(t)` independently with a straight line over every
/// buffered sample and reports the slopes in px/s. Fewer than two samples, or
/// samples that all share one timestamp, yield zero velocity.
#[derive(Debug)]
pub struct VelocityEstimator {
    history: HistoryBuffer<VelocitySample, VELOCITY_HISTORY_LEN>,
}

impl Default for VelocityEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityEstimator {
    pub const fn new() -> Self {
        Self {
            history: HistoryBuffer::new(),
        }
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn push(&mut self, position: TouchPoint, t_ms: u64) {
        self.history.write(VelocitySample { position, t_ms });
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.len() == 0
    }

    /// Signed `(vx, vy)` in px/s.
    pub fn velocity(&self) -> (f32, f32) {
        let n = self.history.len();
        if n < 2 {
            return (0.0, 0.0);
        }
        let Some(origin_ms) = self.history.oldest_ordered().next().map(|s| s.t_ms) else {
            return (0.0, 0.0);
        };

        // Times are rebased on the oldest sample to keep the sums small.
        let rel_t = |s: &VelocitySample| s.t_ms.saturating_sub(origin_ms) as f64;

        let count = n as f64;
        let (mut sum_t, mut sum_x, mut sum_y) = (0.0f64, 0.0f64, 0.0f64);
        for sample in self.history.oldest_ordered() {
            sum_t += rel_t(sample);
            sum_x += sample.position.x as f64;
            sum_y += sample.position.y as f64;
        }
        let (mean_t, mean_x, mean_y) = (sum_t / count, sum_x / count, sum_y / count);

        let (mut s_tt, mut s_tx, mut s_ty) = (0.0f64, 0.0f64, 0.0f64);
        for sample in self.history.oldest_ordered() {
            let dt = rel_t(sample) - mean_t;
            s_tt += dt * dt;
            s_tx += dt * (sample.position.x as f64 - mean_x);
            s_ty += dt * (sample.position.y as f64 - mean_y);
        }
        if s_tt <= f64::EPSILON {
            return (0.0, 0.0);
        }

        // Slopes are px/ms.
        ((s_tx / s_tt * 1000.0) as f32, (s_ty / s_tt * 1000.0) as f32)
    }

    pub fn speed_squared(&self) -> f32 {
        let (vx, vy) = self.velocity();
        vx * vx + vy * vy
    }
}
