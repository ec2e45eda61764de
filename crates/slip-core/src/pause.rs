//! Artificial delays used purely for interaction feedback.

use std::time::Duration;

/// Delay while the mock analyzer "reads" a receipt.
pub const ANALYZE_DELAY: Duration = Duration::from_millis(1500);
/// Delay before saving or exporting completes.
pub const SAVE_DELAY: Duration = Duration::from_millis(300);

/// Injectable wait. Has no effect on data consistency.
pub trait Pause: Send + Sync {
    fn pause(&self, duration: Duration);
}

/// Returns immediately; used by tests and script mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPause;

impl Pause for NoPause {
    fn pause(&self, _duration: Duration) {}
}

/// Blocks the calling thread for the requested duration.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
