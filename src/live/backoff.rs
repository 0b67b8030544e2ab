use std::time::Duration;

use rand::Rng;

/// Delay before the next reconnection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay every time.
    Fixed(Duration),
    /// `base * 2^attempt`, capped, with full jitter: the actual delay is
    /// drawn uniformly from `[0, capped]`.
    Exponential { base: Duration, cap: Duration },
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Fixed(Duration::from_secs(5))
    }
}

impl Backoff {
    pub fn exponential() -> Self {
        Backoff::Exponential {
            base: Duration::from_millis(500),
            cap: Duration::from_secs(60),
        }
    }

    /// Upper bound of the delay after `attempt` consecutive failures
    /// (0 = first reconnection after a drop).
    pub fn ceiling(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base, cap } => base
                .checked_mul(2u32.saturating_pow(attempt.min(31)))
                .map_or(cap, |d| d.min(cap)),
        }
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Fixed(delay) => *delay,
            Backoff::Exponential { .. } => {
                let ceiling = self.ceiling(attempt).as_millis() as u64;
                Duration::from_millis(rand::rng().random_range(0..=ceiling))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fixed_five_seconds() {
        let backoff = Backoff::default();
        for attempt in [0, 1, 10, 1000] {
            assert_eq!(backoff.delay(attempt), Duration::from_secs(5));
        }
    }

    #[test]
    fn exponential_ceiling_doubles_then_caps() {
        let backoff = Backoff::Exponential {
            base: Duration::from_secs(1),
            cap: Duration::from_secs(30),
        };
        assert_eq!(backoff.ceiling(0), Duration::from_secs(1));
        assert_eq!(backoff.ceiling(1), Duration::from_secs(2));
        assert_eq!(backoff.ceiling(4), Duration::from_secs(16));
        assert_eq!(backoff.ceiling(5), Duration::from_secs(30));
        assert_eq!(backoff.ceiling(u32::MAX), Duration::from_secs(30));
    }

    #[test]
    fn jittered_delay_stays_under_ceiling() {
        let backoff = Backoff::exponential();
        for attempt in 0..12 {
            for _ in 0..50 {
                assert!(backoff.delay(attempt) <= backoff.ceiling(attempt));
            }
        }
    }
}
