use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Scenario describing the synthetic device walk. Every field defaults so
/// a partial YAML file works.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub start_latitude: f64,
    pub start_longitude: f64,
    /// Compass heading of the walk, degrees clockwise from north.
    pub heading_deg: f64,
    pub speed_kmph: f64,
    pub satellites: u32,
    /// Uniform jitter applied to each emitted coordinate, in degrees.
    pub coord_jitter: f64,
    /// Probability in [0, 1] that a tick emits a non-actionable snapshot.
    pub invalid_ratio: f64,
    pub seed: u64,
    pub camera_link: Option<String>,
    pub description: Option<String>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            start_latitude: 29.000784,
            start_longitude: 77.697562333,
            heading_deg: 45.0,
            speed_kmph: 4.5,
            satellites: 8,
            coord_jitter: 0.000015,
            invalid_ratio: 0.05,
            seed: 0,
            camera_link: None,
            description: None,
        }
    }
}

impl ScenarioConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading scenario {}", path_ref.display()))?;
        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing scenario {}", path_ref.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_describe_a_slow_walk() {
        let config = ScenarioConfig::default();
        assert_eq!(config.satellites, 8);
        assert!(config.invalid_ratio < 0.5);
        assert!(config.camera_link.is_none());
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"speed_kmph: 6.0\nseed: 7\ncamera_link: \"https://example.com/feed\"\n")
            .unwrap();
        let path = temp.into_temp_path();
        let config = ScenarioConfig::load(&path).unwrap();
        assert_eq!(config.speed_kmph, 6.0);
        assert_eq!(config.seed, 7);
        assert_eq!(
            config.camera_link.as_deref(),
            Some("https://example.com/feed")
        );
        assert_eq!(config.satellites, ScenarioConfig::default().satellites);
    }

    #[test]
    fn missing_file_reports_path() {
        let error = ScenarioConfig::load("does/not/exist.yaml").unwrap_err();
        assert!(error.to_string().contains("does/not/exist.yaml"));
    }
}
