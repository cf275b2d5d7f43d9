//! Feed, tracking, and map-surface core for the assistive-navigation
//! dashboard.
//!
//! The modules follow the data path of the device uplink: wire records read
//! from the realtime feed, a client for the hosted key-value store, and the
//! tracker/adapter pair that keeps the map surface in sync with the latest
//! valid position.

pub mod feed;
pub mod map;
pub mod model;
pub mod prelude;
pub mod telemetry;

pub use map::{DrawingSurface, MapSurfaceAdapter, PositionTracker};
pub use model::{Fix, GpsSnapshot, StreamLocator};
