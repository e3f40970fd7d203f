use chrono::NaiveDate;

/// Maximum number of days a [`Forecast`] ever holds.
pub const FORECAST_DAYS: usize = 3;

const RAIN_SUGGESTION: &str = "Don't forget your umbrella!";

/// Current conditions for the configured location.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub temperature_c: f64,
    pub condition_text: String,
    /// Always carries a scheme, see [`resolve_icon_url`].
    pub condition_icon_url: String,
    pub wind_kph: f64,
    pub humidity_pct: u8,
}

impl CurrentWeather {
    /// Advice shown under the screen, `None` unless the condition mentions rain.
    pub fn suggestion(&self) -> Option<&'static str> {
        self.condition_text
            .to_lowercase()
            .contains("rain")
            .then_some(RAIN_SUGGESTION)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub condition_text: String,
    pub condition_icon_url: String,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
}

/// Ordered daily forecast, never longer than [`FORECAST_DAYS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    days: Vec<ForecastDay>,
}

impl Forecast {
    /// Keeps the first [`FORECAST_DAYS`] entries and drops the rest.
    pub fn from_days(days: impl IntoIterator<Item = ForecastDay>) -> Self {
        Self { days: days.into_iter().take(FORECAST_DAYS).collect() }
    }

    pub fn days(&self) -> &[ForecastDay] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Completes the protocol-relative icon URLs WeatherAPI returns (`//cdn.../64.png`).
pub fn resolve_icon_url(raw: &str) -> String {
    if raw.starts_with("//") { format!("http:{raw}") } else { raw.to_string() }
}
