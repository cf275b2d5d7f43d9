use serde::{Deserialize, Serialize};

/// Opaque locator for the live camera resource, stored at
/// `live_camera/link` as a bare string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamLocator(String);

impl StreamLocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// An empty or whitespace-only locator means no feed is configured.
    pub fn is_configured(&self) -> bool {
        !self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_locator_is_unconfigured() {
        assert!(!StreamLocator::default().is_configured());
        assert!(!StreamLocator::new("   ").is_configured());
        assert!(StreamLocator::new("https://example.com/feed").is_configured());
    }

    #[test]
    fn locator_is_a_bare_string_on_the_wire() {
        let locator: StreamLocator =
            serde_json::from_str(r#""https://example.com/feed""#).unwrap();
        assert_eq!(locator.as_str(), "https://example.com/feed");
        assert_eq!(
            serde_json::to_string(&locator).unwrap(),
            r#""https://example.com/feed""#
        );
    }
}
