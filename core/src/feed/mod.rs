pub mod client;
pub mod gate;

pub use client::{FeedClient, FeedConfig, FeedError, CAMERA_LINK_PATH, GPS_PATH};
pub use gate::ChangeGate;
