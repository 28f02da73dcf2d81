//! Deterministic pacing abstraction for testable retry delays.

use std::time::Duration;

/// Pacer trait for deterministic delays in tests.
pub trait Pacer: Send + Sync {
    /// Block until `duration` has elapsed.
    fn pause(&self, duration: Duration);
}

/// System pacer using actual thread sleeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPacer;

impl Pacer for SystemPacer {
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Mock pacer that records requested pauses instead of sleeping.
#[cfg(any(test, feature = "test-seams"))]
#[derive(Debug, Default)]
pub struct MockPacer {
    pauses: std::sync::Mutex<Vec<Duration>>,
}

#[cfg(any(test, feature = "test-seams"))]
impl MockPacer {
    /// Create a mock pacer with no recorded pauses.
    pub fn new() -> Self {
        Self::default()
    }

    /// All pauses requested so far, in order.
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[cfg(any(test, feature = "test-seams"))]
impl Pacer for MockPacer {
    fn pause(&self, duration: Duration) {
        self.pauses
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_pacer_pauses() {
        let pacer = SystemPacer;
        let before = std::time::Instant::now();
        pacer.pause(Duration::from_millis(1));
        assert!(before.elapsed() >= Duration::from_millis(1));
    }

    #[test]
    fn mock_pacer_records_without_sleeping() {
        let pacer = MockPacer::new();
        pacer.pause(Duration::from_secs(5));
        pacer.pause(Duration::from_secs(5));
        assert_eq!(
            pacer.pauses(),
            vec![Duration::from_secs(5), Duration::from_secs(5)]
        );
    }
}
