//! Schedule-once timer for the game loop

use std::time::{Duration, Instant};

/// Holds the deadline of the next tick.
///
/// The game loop re-arms it after every tick with the delay the tick
/// returned, so ticks never stack up behind a slow frame.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    deadline: Instant,
}

impl Ticker {
    /// A ticker that is due immediately
    pub fn new(now: Instant) -> Self {
        Self { deadline: now }
    }

    /// Fire once, `delay` after `now`
    pub fn schedule_once(&mut self, now: Instant, delay: Duration) {
        self.deadline = now + delay;
    }

    /// Time left before the tick is due (zero when overdue)
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ticker_is_due() {
        let now = Instant::now();
        let ticker = Ticker::new(now);
        assert!(ticker.is_due(now));
        assert_eq!(ticker.remaining(now), Duration::ZERO);
    }

    #[test]
    fn test_schedule_once() {
        let now = Instant::now();
        let mut ticker = Ticker::new(now);
        ticker.schedule_once(now, Duration::from_millis(20));

        assert!(!ticker.is_due(now));
        assert_eq!(ticker.remaining(now), Duration::from_millis(20));

        let later = now + Duration::from_millis(15);
        assert_eq!(ticker.remaining(later), Duration::from_millis(5));
        assert!(ticker.is_due(now + Duration::from_millis(20)));
        assert_eq!(ticker.remaining(now + Duration::from_secs(1)), Duration::ZERO);
    }
}
