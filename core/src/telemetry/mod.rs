pub mod metrics;

pub use metrics::{FeedMetrics, MetricsSnapshot};
