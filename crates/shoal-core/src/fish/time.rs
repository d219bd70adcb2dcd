//! Swim clock: turns uneven animation-frame deltas into whole motion ticks
//! and keeps the school's shared swim time, which drives the wave phase.

/// Swim time (seconds) of each tick owed for one frame, oldest first.
#[derive(Debug, Clone)]
pub struct Ticks {
    first: f32,
    step: f32,
    index: u32,
    count: u32,
}

impl Iterator for Ticks {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index == self.count {
            return None;
        }
        self.index += 1;
        Some(self.first + (self.index - 1) as f32 * self.step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.count - self.index) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Ticks {}

#[derive(Debug, Clone)]
pub struct SwimClock {
    tick_s: f32,
    max_ticks: u32,
    /// Frame time not yet spent on a tick.
    owed_s: f32,
    swim_time_s: f32,
}

impl SwimClock {
    /// `ticks_per_second` is clamped to at least 1; a frame never owes more
    /// than `max_ticks` so a tab coming back from the background does not
    /// fast-forward the school.
    pub fn new(ticks_per_second: f32, max_ticks: u32) -> Self {
        Self {
            tick_s: 1.0 / ticks_per_second.max(1.0),
            max_ticks: max_ticks.max(1),
            owed_s: 0.0,
            swim_time_s: 0.0,
        }
    }

    pub fn advance(&mut self, frame_dt: f32) -> Ticks {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.owed_s = (self.owed_s + frame_dt).min(self.tick_s * self.max_ticks as f32);
        }
        let count = ((self.owed_s / self.tick_s) as u32).min(self.max_ticks);
        self.owed_s -= count as f32 * self.tick_s;
        let ticks = Ticks {
            first: self.swim_time_s + self.tick_s,
            step: self.tick_s,
            index: 0,
            count,
        };
        self.swim_time_s += count as f32 * self.tick_s;
        ticks
    }

    pub fn swim_time(&self) -> f32 {
        self.swim_time_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_hz_display_swims_one_tick_per_frame() {
        let mut clock = SwimClock::new(60.0, 10);
        let ticks: Vec<f32> = clock.advance(1.0 / 60.0).collect();
        assert_eq!(ticks.len(), 1);
        assert!((ticks[0] - clock.swim_time()).abs() < 1e-6);
    }

    #[test]
    fn fast_display_carries_leftover_time() {
        let mut clock = SwimClock::new(60.0, 10);
        // 144 Hz: most frames owe nothing, but time is never lost.
        let total: usize = (0..144).map(|_| clock.advance(1.0 / 144.0).len()).sum();
        assert!((59..=60).contains(&total), "{total}");
    }

    #[test]
    fn long_pause_is_capped_and_times_increase() {
        let mut clock = SwimClock::new(60.0, 10);
        let ticks: Vec<f32> = clock.advance(3.0).collect();
        assert_eq!(ticks.len(), 10);
        assert!(ticks.windows(2).all(|w| w[1] > w[0]));
        assert!((clock.swim_time() - 10.0 / 60.0).abs() < 1e-4);
    }

    #[test]
    fn bogus_deltas_owe_nothing() {
        let mut clock = SwimClock::new(60.0, 10);
        assert_eq!(clock.advance(-1.0).len(), 0);
        assert_eq!(clock.advance(f32::NAN).len(), 0);
        assert_eq!(clock.swim_time(), 0.0);
    }
}
