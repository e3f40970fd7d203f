//! Core library for the `skyview` weather screen.
//!
//! This crate defines:
//! - Configuration (API key, location, display settings)
//! - The WeatherAPI.com client behind the [`WeatherClient`] trait
//! - The screen state machine, its slide transition and text rendering
//!
//! It is used by `skyview-cli`, but the view can be driven by any runtime that
//! performs the [`Effect`]s it returns.

pub mod client;
pub mod config;
pub mod model;
pub mod render;
pub mod transition;
pub mod view;

pub use client::{Endpoint, FetchError, WeatherApiClient, WeatherClient, client_from_config};
pub use config::Config;
pub use model::{CurrentWeather, FORECAST_DAYS, Forecast, ForecastDay};
pub use render::render_screen;
pub use transition::{SlideDirection, SlideTransition};
pub use view::{Action, Effect, FetchKind, FetchRequest, Screen, ViewState, WeatherView};
