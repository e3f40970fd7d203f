//! Weather screen state and the reducer that drives it.
//!
//! [`WeatherView::dispatch`] never touches the network. It returns [`Effect`]s
//! for the owning runtime to perform; fetch outcomes come back in as
//! [`Action::CurrentLoaded`] / [`Action::ForecastLoaded`].

use std::time::Duration;

use tracing::{debug, warn};

use crate::{
    client::{FetchError, WeatherClient},
    model::{CurrentWeather, FORECAST_DAYS, Forecast},
    transition::{SlideDirection, SlideTransition},
};

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherStatus {
    Loading,
    Failed(String),
    Ready(CurrentWeather),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForecastStatus {
    Absent,
    Loading,
    Failed(String),
    Ready(Forecast),
}

/// What the screen shows, derived from [`ViewState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Failed,
    Ready,
    ForecastLoading,
    ForecastFailed,
    ForecastReady,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub weather: WeatherStatus,
    pub forecast: ForecastStatus,
    pub forecast_panel_open: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            weather: WeatherStatus::Loading,
            forecast: ForecastStatus::Absent,
            forecast_panel_open: false,
        }
    }
}

impl ViewState {
    pub fn screen(&self) -> Screen {
        match (&self.weather, self.forecast_panel_open, &self.forecast) {
            (WeatherStatus::Loading, ..) => Screen::Loading,
            (WeatherStatus::Failed(_), ..) => Screen::Failed,
            (WeatherStatus::Ready(_), false, _) => Screen::Ready,
            (WeatherStatus::Ready(_), true, ForecastStatus::Ready(_)) => Screen::ForecastReady,
            (WeatherStatus::Ready(_), true, ForecastStatus::Failed(_)) => Screen::ForecastFailed,
            (WeatherStatus::Ready(_), true, ForecastStatus::Absent | ForecastStatus::Loading) => {
                Screen::ForecastLoading
            }
        }
    }

    pub fn current(&self) -> Option<&CurrentWeather> {
        match &self.weather {
            WeatherStatus::Ready(weather) => Some(weather),
            _ => None,
        }
    }

    pub fn weather_error(&self) -> Option<&str> {
        match &self.weather {
            WeatherStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        match &self.forecast {
            ForecastStatus::Ready(forecast) => Some(forecast),
            _ => None,
        }
    }

    /// Rain advice for the current conditions, empty when there is none.
    pub fn suggestion(&self) -> &'static str {
        self.current().and_then(CurrentWeather::suggestion).unwrap_or_default()
    }
}

#[derive(Debug)]
pub enum Action {
    /// The screen came up; load current conditions.
    Mount,
    /// The user pressed the forecast button.
    ToggleForecast,
    CurrentLoaded { generation: u64, result: Result<CurrentWeather, FetchError> },
    ForecastLoaded { generation: u64, result: Result<Forecast, FetchError> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Current,
    Forecast,
}

/// A fetch the runtime must perform, tagged with the generation that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub kind: FetchKind,
    pub generation: u64,
}

impl FetchRequest {
    /// Performs the request and wraps the outcome in the matching completion action.
    pub async fn run(self, client: &dyn WeatherClient, location: &str) -> Action {
        match self.kind {
            FetchKind::Current => {
                let result = client.fetch_current(location).await;
                if let Err(err) = &result {
                    warn!(error = %err, "Error fetching weather data");
                }
                Action::CurrentLoaded { generation: self.generation, result }
            }
            FetchKind::Forecast => {
                let result = client.fetch_forecast(location, FORECAST_DAYS as u8).await;
                if let Err(err) = &result {
                    warn!(error = %err, "Error fetching forecast data");
                }
                Action::ForecastLoaded { generation: self.generation, result }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Fetch(FetchRequest),
    Slide(SlideTransition),
}

#[derive(Debug)]
pub struct WeatherView {
    state: ViewState,
    slide_duration: Duration,
    current_generation: u64,
    forecast_generation: u64,
}

impl WeatherView {
    pub fn new(slide_duration: Duration) -> Self {
        Self {
            state: ViewState::default(),
            slide_duration,
            current_generation: 0,
            forecast_generation: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Mount => {
                self.current_generation += 1;
                self.state.weather = WeatherStatus::Loading;
                vec![Effect::Fetch(FetchRequest {
                    kind: FetchKind::Current,
                    generation: self.current_generation,
                })]
            }
            Action::ToggleForecast => self.toggle_forecast(),
            Action::CurrentLoaded { generation, result } => {
                if generation != self.current_generation {
                    debug!(generation, latest = self.current_generation, "Dropping stale weather");
                    return Vec::new();
                }
                self.state.weather = match result {
                    Ok(weather) => WeatherStatus::Ready(weather),
                    Err(err) => WeatherStatus::Failed(err.to_string()),
                };
                Vec::new()
            }
            Action::ForecastLoaded { generation, result } => {
                if generation != self.forecast_generation {
                    debug!(generation, latest = self.forecast_generation, "Dropping stale forecast");
                    return Vec::new();
                }
                self.state.forecast = match result {
                    Ok(forecast) => ForecastStatus::Ready(forecast),
                    Err(err) => ForecastStatus::Failed(err.to_string()),
                };
                Vec::new()
            }
        }
    }

    fn toggle_forecast(&mut self) -> Vec<Effect> {
        if self.state.current().is_none() {
            return Vec::new();
        }

        let opening = !self.state.forecast_panel_open;
        self.state.forecast_panel_open = opening;

        let mut effects = Vec::with_capacity(2);
        // Loading and Ready are left alone: an in-flight or cached forecast is reused.
        if opening && matches!(self.state.forecast, ForecastStatus::Absent | ForecastStatus::Failed(_))
        {
            self.forecast_generation += 1;
            self.state.forecast = ForecastStatus::Loading;
            effects.push(Effect::Fetch(FetchRequest {
                kind: FetchKind::Forecast,
                generation: self.forecast_generation,
            }));
        }

        let direction = if opening { SlideDirection::Open } else { SlideDirection::Close };
        effects.push(Effect::Slide(SlideTransition::new(direction, self.slide_duration)));
        effects
    }
}
