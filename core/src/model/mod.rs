pub mod camera;
pub mod gps;

pub use camera::StreamLocator;
pub use gps::{Fix, GpsSnapshot, FALLBACK_FIX};
