//! Time source seam so deadline logic is testable with a paused runtime

use tokio::time::Instant;

/// Source of "now" for deadlines and TTLs.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Reads the tokio clock, which tests can pause and advance.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
