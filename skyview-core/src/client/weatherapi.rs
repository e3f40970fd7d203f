use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::model::{CurrentWeather, FORECAST_DAYS, Forecast, ForecastDay, resolve_icon_url};

use super::{Endpoint, FetchError, WeatherClient};

/// WeatherAPI.com client.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { api_key, base_url, http: Client::new() }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}/{}.json", self.base_url, endpoint);
        debug!(url = %url, "Fetching {endpoint} weather");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|source| FetchError::Network { endpoint, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| FetchError::Network { endpoint, source })?;

        if !status.is_success() {
            return Err(FetchError::Status { endpoint, status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Parse { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    humidity: u8,
    wind_kph: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaCurrentResponse {
    current: WaCurrent,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    maxtemp_c: f64,
    mintemp_c: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: NaiveDate,
    day: WaDay,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    forecast: WaForecast,
}

impl From<WaCurrent> for CurrentWeather {
    fn from(current: WaCurrent) -> Self {
        Self {
            temperature_c: current.temp_c,
            condition_icon_url: resolve_icon_url(&current.condition.icon),
            condition_text: current.condition.text,
            wind_kph: current.wind_kph,
            humidity_pct: current.humidity,
        }
    }
}

impl From<WaForecastDay> for ForecastDay {
    fn from(entry: WaForecastDay) -> Self {
        Self {
            date: entry.date,
            condition_icon_url: resolve_icon_url(&entry.day.condition.icon),
            condition_text: entry.day.condition.text,
            max_temp_c: entry.day.maxtemp_c,
            min_temp_c: entry.day.mintemp_c,
        }
    }
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    #[instrument(skip(self))]
    async fn fetch_current(&self, location: &str) -> Result<CurrentWeather, FetchError> {
        let parsed: WaCurrentResponse =
            self.get(Endpoint::Current, &[("q", location), ("aqi", "no")]).await?;

        Ok(parsed.current.into())
    }

    #[instrument(skip(self))]
    async fn fetch_forecast(&self, location: &str, days: u8) -> Result<Forecast, FetchError> {
        let days = days.clamp(1, FORECAST_DAYS as u8).to_string();

        let parsed: WaForecastResponse =
            self.get(Endpoint::Forecast, &[("q", location), ("days", days.as_str())]).await?;

        Ok(Forecast::from_days(parsed.forecast.forecastday.into_iter().map(ForecastDay::from)))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
