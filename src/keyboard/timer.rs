//! Single-shot inactivity timer that commits the pending character.

use std::time::Duration;

/// Countdown armed only while a pending character exists.
///
/// Each call to [`InactivityTimer::expired`] starts a fresh countdown, so
/// waiting again after any other event re-arms it from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InactivityTimer {
    duration: Duration,
}

impl InactivityTimer {
    /// Creates a timer firing `duration` after being armed.
    pub const fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Countdown length.
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Resolves once the countdown elapses; never resolves when not `armed`.
    pub async fn expired(&self, armed: bool) {
        if armed {
            tokio::time::sleep(self.duration).await;
        } else {
            std::future::pending::<()>().await;
        }
    }
}

impl Default for InactivityTimer {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_PENDING_TIMEOUT)
    }
}
