//! Monotonic time source for the control loop.

use latchkey_core::Tick;
use tokio::time::Instant;

/// Converts the process monotonic clock into wrapping [`Tick`]s.
///
/// Milliseconds since the origin are truncated to `u32`, reproducing a
/// `millis()`-style reference clock that wraps roughly every 49.7 days.
/// All duration math downstream uses [`Tick::millis_since`], which is
/// modular, so the wrap is harmless.
///
/// Built on tokio's [`Instant`] so tests running under a paused runtime
/// clock can advance time deterministically.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock whose origin (tick zero) is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Current tick: milliseconds since the origin, wrapped to `u32`.
    pub fn now(&self) -> Tick {
        Tick::from_millis(self.origin.elapsed().as_millis() as u32)
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}
