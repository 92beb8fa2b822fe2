//! Millisecond session clock.

use tokio::time::Instant;

use skill_core::Timestamp;

/// Milliseconds elapsed since the session started, plus an offset.
///
/// The offset only grows, so timestamps handed to the registry never move
/// backwards, even after loading a save taken later than the current reading.
#[derive(Clone, Copy, Debug)]
pub struct SessionClock {
    started: Instant,
    offset_ms: u64,
}

impl SessionClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            offset_ms: 0,
        }
    }

    pub fn now(&self) -> Timestamp {
        let elapsed = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        Timestamp(self.offset_ms.saturating_add(elapsed))
    }

    /// Jumps forward so that `now() >= at`.
    pub fn advance_to(&mut self, at: Timestamp) {
        let now = self.now();
        if at > now {
            self.offset_ms = self.offset_ms.saturating_add(at.saturating_since(now));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn follows_tokio_time() {
        let clock = SessionClock::start();
        assert_eq!(clock.now(), Timestamp::ZERO);
        tokio::time::advance(Duration::from_millis(1_500)).await;
        assert_eq!(clock.now(), Timestamp(1_500));
    }

    #[tokio::test(start_paused = true)]
    async fn advance_never_rewinds() {
        let mut clock = SessionClock::start();
        clock.advance_to(Timestamp(10_000));
        assert_eq!(clock.now(), Timestamp(10_000));

        clock.advance_to(Timestamp(2_000));
        assert_eq!(clock.now(), Timestamp(10_000));

        tokio::time::advance(Duration::from_millis(250)).await;
        assert_eq!(clock.now(), Timestamp(10_250));
    }
}
