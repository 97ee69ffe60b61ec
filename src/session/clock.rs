use std::time::Duration;

/// Gates simulation ticks on an integer frame count derived from elapsed
/// time, decoupling the update rate from how often the display loop calls in.
///
/// The count is compared against the last *processed* count rather than an
/// accumulated delta, so the schedule cannot drift: however irregular the
/// callbacks, at most one tick fires per crossed interval boundary.
#[derive(Debug)]
pub struct FrameClock {
    interval_ms: u128,
    last_frame: Option<u128>,
}

impl FrameClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval_ms: interval.as_millis().max(1),
            last_frame: None,
        }
    }

    /// Whether a new frame is due at `elapsed` time since session start.
    /// A due frame is marked processed.
    pub fn frame_due(&mut self, elapsed: Duration) -> bool {
        let frame = elapsed.as_millis() / self.interval_ms;

        match self.last_frame {
            Some(last) if frame <= last => false,
            _ => {
                self.last_frame = Some(frame);
                true
            }
        }
    }

    /// Forget the processed-frame marker, e.g. across a session restart.
    pub fn reset(&mut self) {
        self.last_frame = None;
    }
}
