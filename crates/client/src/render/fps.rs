//! Frames-per-second counter driven by the animation frame timestamp.

#[derive(Debug, Default)]
pub struct FpsCounter {
    frames: u32,
    window_start: Option<f64>,
    fps: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one frame at `now_ms`; the reading updates once per second.
    pub fn tick(&mut self, now_ms: f64) -> u32 {
        let start = *self.window_start.get_or_insert(now_ms);
        self.frames += 1;
        let elapsed = now_ms - start;
        if elapsed >= 1000.0 {
            self.fps = (self.frames as f64 * 1000.0 / elapsed).round() as u32;
            self.frames = 0;
            self.window_start = Some(now_ms);
        }
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_settles_after_one_second() {
        let mut counter = FpsCounter::new();
        for i in 0..60 {
            assert_eq!(counter.tick(i as f64 * 1000.0 / 60.0), 0);
        }
        // 61st frame lands exactly on the one second mark.
        assert_eq!(counter.tick(1000.0), 61);
        // Held until the next window closes.
        assert_eq!(counter.tick(1016.0), 61);
    }
}
