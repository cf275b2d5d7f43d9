use crate::model::{GpsSnapshot, StreamLocator};
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Feed path holding the GPS record.
pub const GPS_PATH: &str = "blind_stick/gps";
/// Feed path holding the camera stream locator.
pub const CAMERA_LINK_PATH: &str = "live_camera/link";

#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("feed transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("decoding `{path}` snapshot: {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },
}

/// Connection settings for the hosted key-value feed. The auth token is an
/// opaque secret supplied by the environment.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub database_url: String,
    pub auth_token: Option<String>,
}

/// Read-only client for the path-addressed realtime feed.
///
/// Constructed at shell startup and injected into whoever polls; no
/// process-wide handle exists. The backend exposes each path as
/// `GET {database_url}/{path}.json`, answering `null` for an absent record.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    config: FeedConfig,
}

impl FeedClient {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.config.database_url.trim_end_matches('/');
        match &self.config.auth_token {
            Some(token) => format!("{base}/{path}.json?auth={token}"),
            None => format!("{base}/{path}.json"),
        }
    }

    /// Fetches the current value at `path`. An absent record surfaces as
    /// `Value::Null`.
    pub async fn fetch_raw(&self, path: &str) -> Result<Value, FeedError> {
        let url = self.endpoint(path);
        debug!("feed GET {url}");
        let response = self.http.get(&url).send().await?.error_for_status()?;
        Ok(response.json::<Value>().await?)
    }

    async fn fetch_typed<T>(&self, path: &str) -> Result<T, FeedError>
    where
        T: DeserializeOwned + Default,
    {
        let value = self.fetch_raw(path).await?;
        decode_value(path, value)
    }

    pub async fn fetch_gps(&self) -> Result<GpsSnapshot, FeedError> {
        self.fetch_typed(GPS_PATH).await
    }

    pub async fn fetch_camera_link(&self) -> Result<StreamLocator, FeedError> {
        self.fetch_typed(CAMERA_LINK_PATH).await
    }
}

/// `null` means "no record yet" and decodes to the type's default; any
/// other value must decode fully.
fn decode_value<T>(path: &str, value: Value) -> Result<T, FeedError>
where
    T: DeserializeOwned + Default,
{
    match value {
        Value::Null => Ok(T::default()),
        value => serde_json::from_value(value).map_err(|source| FeedError::Decode {
            path: path.to_string(),
            source,
        }),
    }
}
