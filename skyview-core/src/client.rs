use crate::{
    Config,
    model::{CurrentWeather, Forecast},
};
use async_trait::async_trait;
use std::fmt::{self, Debug};
use thiserror::Error;

pub mod weatherapi;

pub use weatherapi::WeatherApiClient;

/// The two read-only calls the screen makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Current,
    Forecast,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Current => "current",
            Endpoint::Forecast => "forecast",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a fetch produced no data.
///
/// `Network` and `Status` both mean the service could not be reached
/// successfully; `Parse` means it answered with something unexpected.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to send {endpoint} request: {source}")]
    Network {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status { endpoint: Endpoint, status: reqwest::StatusCode, body: String },

    #[error("Failed to parse {endpoint} response: {source}")]
    Parse {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            FetchError::Network { endpoint, .. }
            | FetchError::Status { endpoint, .. }
            | FetchError::Parse { endpoint, .. } => *endpoint,
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, FetchError::Parse { .. })
    }
}

#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch_current(&self, location: &str) -> Result<CurrentWeather, FetchError>;

    /// Fetch up to `days` days; implementations never return more than three.
    async fn fetch_forecast(&self, location: &str, days: u8) -> Result<Forecast, FetchError>;
}

/// Construct the WeatherAPI.com client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<WeatherApiClient> {
    let api_key = config.api_key()?;
    Ok(WeatherApiClient::new(api_key.to_owned(), config.base_url.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = client_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No WeatherAPI key configured"));
    }

    #[test]
    fn client_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(client_from_config(&cfg).is_ok());
    }

    #[test]
    fn status_error_names_endpoint_and_status() {
        let err = FetchError::Status {
            endpoint: Endpoint::Forecast,
            status: reqwest::StatusCode::UNAUTHORIZED,
            body: "API key is invalid.".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.starts_with("forecast request failed with status 401"));
        assert!(msg.contains("API key is invalid."));
        assert_eq!(err.endpoint(), Endpoint::Forecast);
        assert!(!err.is_parse());
    }

    #[test]
    fn parse_error_is_classified() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FetchError::Parse { endpoint: Endpoint::Current, source };

        assert!(err.is_parse());
        assert!(err.to_string().contains("Failed to parse current response"));
    }
}
