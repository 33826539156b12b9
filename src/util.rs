//! Shared utilities

use std::collections::VecDeque;
use std::time::{Duration, Instant};

// ============================================================================
// FPS Counter
// ============================================================================

/// Frame timer with a rolling average.
/// Its delta feeds `OrbitControl::update`, its average feeds the FPS log.
pub struct FpsCounter {
    frame_times: VecDeque<f64>,
    last_frame: Instant,
    last_report: Instant,
    sample_count: usize,
}

impl FpsCounter {
    /// Create a new FPS counter with specified sample window
    pub fn new(sample_count: usize) -> Self {
        let now = Instant::now();
        Self {
            frame_times: VecDeque::with_capacity(sample_count),
            last_frame: now,
            last_report: now,
            sample_count: sample_count.max(1),
        }
    }

    /// Call once per frame. Returns (delta_time, average_fps).
    pub fn tick(&mut self) -> (f64, f64) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f64();
        self.last_frame = now;
        self.record(dt);
        (dt, self.avg_fps())
    }

    fn record(&mut self, dt: f64) {
        self.frame_times.push_back(dt);
        if self.frame_times.len() > self.sample_count {
            self.frame_times.pop_front();
        }
    }

    pub fn avg_fps(&self) -> f64 {
        let avg_dt = self.frame_times.iter().sum::<f64>() / self.frame_times.len().max(1) as f64;
        if avg_dt > 0.0 {
            1.0 / avg_dt
        } else {
            0.0
        }
    }

    /// Average frame time in milliseconds
    pub fn avg_frame_time_ms(&self) -> f64 {
        self.frame_times.iter().sum::<f64>() / self.frame_times.len().max(1) as f64 * 1000.0
    }

    /// True at most once per `interval`; use to throttle periodic logging
    pub fn should_report(&mut self, interval: Duration) -> bool {
        let now = Instant::now();
        if now - self.last_report >= interval {
            self.last_report = now;
            true
        } else {
            false
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_times.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_window() {
        let mut fps = FpsCounter::new(4);
        for _ in 0..10 {
            fps.record(0.02);
        }
        assert_eq!(fps.frame_count(), 4);
        assert!((fps.avg_fps() - 50.0).abs() < 1e-9);
        assert!((fps.avg_frame_time_ms() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_counter() {
        let fps = FpsCounter::new(8);
        assert_eq!(fps.avg_fps(), 0.0);
        assert_eq!(fps.avg_frame_time_ms(), 0.0);
    }

    #[test]
    fn test_tick_and_report() {
        let mut fps = FpsCounter::new(8);
        let (dt, _) = fps.tick();
        assert!(dt >= 0.0);
        assert_eq!(fps.frame_count(), 1);
        assert!(fps.should_report(Duration::ZERO));
        assert!(!fps.should_report(Duration::from_secs(3600)));
    }
}
