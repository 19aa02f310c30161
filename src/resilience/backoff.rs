//! Linear backoff between retry passes.

use std::time::Duration;

/// Delay after failed pass `attempt` (1-indexed): `attempt * base`, capped at `max`.
pub fn linear_backoff(attempt: u32, base: Duration, max: Duration) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    base.checked_mul(attempt).unwrap_or(Duration::MAX).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_calculation() {
        let base = Duration::from_millis(1000);
        let max = Duration::from_secs(30);

        assert_eq!(linear_backoff(0, base, max), Duration::ZERO);
        assert_eq!(linear_backoff(1, base, max), Duration::from_secs(1));
        assert_eq!(linear_backoff(2, base, max), Duration::from_secs(2));
        assert_eq!(linear_backoff(100, base, max), max);
    }

    #[test]
    fn test_backoff_saturates() {
        let max = Duration::from_secs(5);
        assert_eq!(linear_backoff(u32::MAX, Duration::MAX, max), max);
    }
}
