//! Plain-text rendering of the weather screen.

use crate::{
    model::{CurrentWeather, Forecast},
    view::{Screen, ViewState},
};

pub const OPEN_LABEL: &str = "View 3-Day Forecast";
pub const CLOSE_LABEL: &str = "Hide 3-Day Forecast";

const RULE_WIDTH: usize = 40;

/// Renders the whole screen.
///
/// `panel_offset_rows` pushes the forecast panel down by that many blank lines,
/// which is how the slide transition is drawn.
pub fn render_screen(state: &ViewState, heading: &str, panel_offset_rows: usize) -> String {
    let panel = match state.screen() {
        Screen::Loading => return "Loading...\n".to_string(),
        Screen::Failed => {
            let message = state.weather_error().unwrap_or_default();
            return format!("Could not load weather: {message}\n");
        }
        Screen::Ready => None,
        Screen::ForecastLoading => Some("Loading forecast...\n".to_string()),
        Screen::ForecastFailed => Some("Forecast unavailable\n".to_string()),
        Screen::ForecastReady => state.forecast().map(render_forecast),
    };
    let Some(weather) = state.current() else {
        return "Loading...\n".to_string();
    };

    let mut out = render_current(weather, heading);

    let label = if state.forecast_panel_open { CLOSE_LABEL } else { OPEN_LABEL };
    out.push_str(&format!("[ {label} ]\n"));

    if let Some(panel) = panel {
        out.push_str(&"\n".repeat(panel_offset_rows));
        out.push_str(&panel);
    }

    out.push_str(&format!("\n{}\n", state.suggestion()));
    out
}

fn render_current(weather: &CurrentWeather, heading: &str) -> String {
    format!(
        "Weather in {heading}\n\
         {rule}\n\
         {temp}°C\n\
         {condition}\n\
         {icon}\n\
         Wind: {wind} km/h\n\
         Humidity: {humidity}%\n\
         \n",
        rule = "-".repeat(RULE_WIDTH),
        temp = weather.temperature_c,
        condition = weather.condition_text,
        icon = weather.condition_icon_url,
        wind = weather.wind_kph,
        humidity = weather.humidity_pct,
    )
}

fn render_forecast(forecast: &Forecast) -> String {
    let mut out = String::from("3-Day Forecast:\n");
    for day in forecast.days() {
        out.push_str(&format!(
            "\n  {date}\n  {icon}\n  {condition}\n  Max: {max}°C\n  Min: {min}°C\n",
            date = day.date.format("%Y-%m-%d"),
            icon = day.condition_icon_url,
            condition = day.condition_text,
            max = day.max_temp_c,
            min = day.min_temp_c,
        ));
    }
    out
}
