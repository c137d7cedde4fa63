/// Crude frame cap: a frame only advances once more than `min_dt` seconds
/// have passed since the last advanced frame, and then advances by the
/// whole elapsed time. There is no accumulator and no fixed step.
#[derive(Debug, Clone, Copy)]
pub struct FrameLimiter {
    min_dt: f64,
    last: f64,
}

impl FrameLimiter {
    pub fn new(min_dt: f64) -> Self {
        Self { min_dt, last: 0.0 }
    }

    /// Starts measuring from `now` instead of zero.
    pub fn starting_at(min_dt: f64, now: f64) -> Self {
        Self { min_dt, last: now }
    }

    pub fn min_dt(&self) -> f64 {
        self.min_dt
    }

    /// Returns the elapsed time if a frame should advance at `now` (seconds).
    pub fn tick(&mut self, now: f64) -> Option<f64> {
        let dt = now - self.last;
        if dt > self.min_dt {
            self.last = now;
            Some(dt)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_until_threshold_is_exceeded() {
        let mut limiter = FrameLimiter::new(0.05);
        assert_eq!(limiter.tick(0.02), None);
        assert_eq!(limiter.tick(0.05), None);

        let dt = limiter.tick(0.07).unwrap();
        assert!((dt - 0.07).abs() < 1e-12);

        assert_eq!(limiter.tick(0.1), None);
        let dt = limiter.tick(0.2).unwrap();
        assert!((dt - 0.13).abs() < 1e-12);
    }

    #[test]
    fn long_stall_yields_one_large_step() {
        let mut limiter = FrameLimiter::starting_at(0.05, 10.0);
        assert_eq!(limiter.tick(13.0), Some(3.0));
    }
}
