//! Bounded waits that bridge unobservable host lock state
//!
//! The host releases its internal turn lock some time *after* the
//! notification that implies it, and nothing on the call surface exposes
//! the release. The orchestrator therefore waits a fixed, named delay
//! before the calls that need the lock to be free. If the host ever grows
//! a readiness probe, [`settle`] is the one place to swap it in.

use std::time::Duration;

/// Delays applied before lock-sensitive host calls
#[derive(Debug, Clone)]
pub struct SettleConfig {
    /// Wait between returning the compact acknowledgement and the first
    /// interrupt, so the requesting agent's own turn bookkeeping lands
    /// before processing is stopped.
    pub post_ack: Duration,
    /// Wait between the history-compacted notice and the quiescing
    /// interrupt; the lock release is observed to lag the notice.
    pub post_compaction: Duration,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            post_ack: Duration::from_millis(500),
            post_compaction: Duration::from_secs(2),
        }
    }
}

/// Cooperative wait. Suspends the calling task, never the runtime.
pub async fn settle(delay: Duration) {
    tokio::time::sleep(delay).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_settle_waits_the_given_delay() {
        let start = tokio::time::Instant::now();
        settle(Duration::from_secs(2)).await;
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn test_default_delays_are_ordered() {
        let config = SettleConfig::default();
        assert!(config.post_ack < config.post_compaction);
        assert!(config.post_ack > Duration::ZERO);
    }
}
