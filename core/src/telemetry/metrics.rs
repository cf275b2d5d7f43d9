use std::sync::Mutex;

/// Feed counters shared between the tracker and whatever renders status.
/// Guarded by a plain mutex so recording sites only need `&self`.
#[derive(Debug, Default)]
pub struct FeedMetrics {
    inner: Mutex<Counters>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    applied: usize,
    rejected: usize,
    feed_errors: usize,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub applied: usize,
    pub rejected: usize,
    pub feed_errors: usize,
}

impl FeedMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// An actionable snapshot reached the surface.
    pub fn record_applied(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.applied += 1;
        }
    }

    /// A snapshot was filtered out (invalid flag or missing coordinates).
    pub fn record_rejected(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.rejected += 1;
        }
    }

    /// A feed fetch failed outright.
    pub fn record_feed_error(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.feed_errors += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        match self.inner.lock() {
            Ok(counters) => MetricsSnapshot {
                applied: counters.applied,
                rejected: counters.rejected,
                feed_errors: counters.feed_errors,
            },
            Err(_) => MetricsSnapshot::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let metrics = FeedMetrics::new();
        metrics.record_applied();
        metrics.record_applied();
        metrics.record_rejected();
        metrics.record_feed_error();

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                applied: 2,
                rejected: 1,
                feed_errors: 1,
            }
        );
    }
}
