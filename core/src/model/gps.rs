use serde::{Deserialize, Serialize};

/// Validated coordinate pair extracted from an actionable snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
}

impl Fix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// View center used when the surface comes up before any fix has arrived.
pub const FALLBACK_FIX: Fix = Fix {
    latitude: 29.000784,
    longitude: 77.697562333,
};

/// GPS record as stored at `blind_stick/gps`. The device publishes partial
/// records while it searches for satellites, so every field is optional on
/// the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpsSnapshot {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub valid: bool,
    pub speed_kmph: Option<f64>,
    pub satellites: Option<u32>,
}

impl GpsSnapshot {
    /// A snapshot may move the marker only if the device flagged it valid
    /// and both coordinates are present. Everything else is filtered input,
    /// not an error.
    pub fn actionable(&self) -> Option<Fix> {
        if !self.valid {
            return None;
        }
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Fix::new(latitude, longitude)),
            _ => None,
        }
    }
}
