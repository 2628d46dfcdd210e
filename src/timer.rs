/// Milliseconds between two decrements of a 60 Hz timer.
pub const TICK_MS: f32 = 16.66;

/// The delay timer: an 8-bit counter decremented at ~60 Hz of wall-clock
/// time, tracked with a millisecond accumulator fed by the host loop.
#[derive(Debug)]
pub struct DelayTimer {
    value: u8,
    accumulator: f32,
}

impl DelayTimer {
    pub fn new() -> Self {
        Self {
            value: 0,
            accumulator: 0.0,
        }
    }

    #[inline]
    pub fn store(&mut self, value: u8) {
        self.value = value;
    }

    #[inline]
    pub fn load(&self) -> u8 {
        self.value
    }

    /// Account for elapsed wall-clock time.
    ///
    /// One decrement per full tick crossed; the counter saturates at 0
    /// while the accumulator keeps absorbing time.
    pub fn add_time(&mut self, elapsed_ms: f32) {
        self.accumulator += elapsed_ms;
        while self.accumulator >= TICK_MS {
            self.accumulator -= TICK_MS;
            self.value = self.value.saturating_sub(1);
        }
    }
}

impl Default for DelayTimer {
    fn default() -> Self {
        Self::new()
    }
}
