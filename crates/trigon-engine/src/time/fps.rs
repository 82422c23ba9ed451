/// Smoothed frames-per-second counter.
///
/// Accumulates frame deltas and reports roughly once per second. The elapsed
/// accumulator keeps its carryover past the one-second mark (`accum -= 1.0`
/// rather than `accum = 0.0`), so a report issued late does not inflate the
/// next window's rate.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    accum: f32,
    frames: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one frame's delta time (seconds).
    ///
    /// Returns `Some(fps)` when a full second has elapsed since the last
    /// report, `None` otherwise.
    pub fn tick(&mut self, dt: f32) -> Option<f32> {
        self.accum += dt;
        self.frames += 1;

        if self.accum <= 1.0 {
            return None;
        }

        let fps = self.frames as f32 / self.accum;
        self.accum -= 1.0;
        self.frames = 0;

        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_report_before_one_second() {
        let mut fps = FpsCounter::new();
        for _ in 0..59 {
            assert_eq!(fps.tick(1.0 / 60.0), None);
        }
    }

    #[test]
    fn reports_rate_after_one_second() {
        let mut fps = FpsCounter::new();
        let mut report = None;
        for _ in 0..61 {
            if let Some(r) = fps.tick(1.0 / 60.0) {
                report = Some(r);
                break;
            }
        }
        let rate = report.expect("one second of frames must produce a report");
        assert!((rate - 60.0).abs() < 1.0, "rate was {rate}");
    }

    #[test]
    fn carryover_is_kept_between_windows() {
        let mut fps = FpsCounter::new();
        // One big frame: 1.5s elapsed, 1 frame.
        let first = fps.tick(1.5).expect("report after 1.5s");
        assert!((first - 1.0 / 1.5).abs() < 1e-6);

        // 0.5s of carryover remains; another 0.6s crosses the next window.
        assert_eq!(fps.tick(0.3), None);
        let second = fps.tick(0.3).expect("report after carryover + 0.6s");
        // 2 frames over 1.1s of accumulated time.
        assert!((second - 2.0 / 1.1).abs() < 1e-4, "rate was {second}");
    }

    #[test]
    fn frame_count_resets_after_report() {
        let mut fps = FpsCounter::new();
        fps.tick(1.2).expect("report");
        // The next window starts counting frames from zero.
        assert_eq!(fps.tick(0.4), None);
        let rate = fps.tick(0.5).expect("second report");
        assert!((rate - 2.0 / 1.1).abs() < 1e-4);
    }
}
