pub use crate::feed::{ChangeGate, FeedClient, FeedConfig, FeedError, CAMERA_LINK_PATH, GPS_PATH};
pub use crate::map::{
    DrawingSurface, MapSurfaceAdapter, MapSurfaceState, PositionTracker, SurfaceError,
    SurfaceFactory, TrackerConfig,
};
pub use crate::model::{Fix, GpsSnapshot, StreamLocator, FALLBACK_FIX};
pub use crate::telemetry::{FeedMetrics, MetricsSnapshot};
