use navcore::feed::FeedConfig;
use std::env;
use std::time::Duration;

/// How the camera panel renders the located resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Acquire the resource once per locator change and keep it on screen.
    Embedded,
    /// Re-request a still frame on every refresh tick with a cache-busting
    /// token.
    Polled,
}

pub const DEFAULT_DATABASE_URL: &str = "http://127.0.0.1:9000";
pub const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Deployment configuration, read from the environment. Endpoints and the
/// API key are opaque values supplied externally.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub database_url: String,
    pub api_key: Option<String>,
    pub tile_url_template: String,
    pub camera_mode: CameraMode,
    pub boot_delay: Duration,
    pub feed_interval: Duration,
    pub camera_refresh: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.into(),
            api_key: None,
            tile_url_template: DEFAULT_TILE_URL.into(),
            camera_mode: CameraMode::Polled,
            boot_delay: Duration::from_millis(1800),
            feed_interval: Duration::from_secs(1),
            camera_refresh: Duration::from_secs(2),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = non_empty_var("BLINDSTICK_DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(key) = non_empty_var("BLINDSTICK_API_KEY") {
            config.api_key = Some(key);
        }
        if let Some(template) = non_empty_var("BLINDSTICK_TILE_URL") {
            config.tile_url_template = template;
        }
        if let Some(raw) = non_empty_var("BLINDSTICK_CAMERA_MODE") {
            match parse_camera_mode(&raw) {
                Some(mode) => config.camera_mode = mode,
                None => log::warn!("unknown BLINDSTICK_CAMERA_MODE `{raw}`, keeping polled"),
            }
        }
        config
    }

    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            database_url: self.database_url.clone(),
            auth_token: self.api_key.clone(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_camera_mode(raw: &str) -> Option<CameraMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "embedded" => Some(CameraMode::Embedded),
        "polled" => Some(CameraMode::Polled),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_local_simulator() {
        let config = DashboardConfig::default();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.camera_mode, CameraMode::Polled);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn camera_mode_parses_case_insensitively() {
        assert_eq!(parse_camera_mode("Embedded"), Some(CameraMode::Embedded));
        assert_eq!(parse_camera_mode(" polled "), Some(CameraMode::Polled));
        assert_eq!(parse_camera_mode("iframe"), None);
    }

    #[test]
    fn feed_config_carries_endpoint_and_key() {
        let mut config = DashboardConfig::default();
        config.database_url = "https://db.example.com".into();
        config.api_key = Some("s3cret".into());

        let feed = config.feed_config();
        assert_eq!(feed.database_url, "https://db.example.com");
        assert_eq!(feed.auth_token.as_deref(), Some("s3cret"));
    }
}
