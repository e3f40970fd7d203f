//! Interactive terminal screen.
//!
//! One loop owns the [`WeatherView`]. Fetches run on spawned tasks and report
//! back through a channel, so the view is only ever touched from here.

use std::{
    io::{self, Write},
    sync::Arc,
    time::Duration,
};

use anyhow::Context;
use skyview_core::{
    Action, Config, Effect, FetchRequest, SlideDirection, SlideTransition, WeatherClient,
    WeatherView, render_screen,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
    time::{Instant, interval},
};
use tracing::debug;

/// Rows the forecast panel travels during a slide.
const PANEL_SLIDE_ROWS: usize = 6;
const FRAME_INTERVAL: Duration = Duration::from_millis(40);

const CLEAR: &str = "\x1B[2J\x1B[H";
const HELP: &str = "\n[f/Enter] toggle forecast  [q] quit\n";

pub async fn run<C: WeatherClient + 'static>(config: Config, client: C) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut terminal = Terminal::new(config, Arc::new(client), tx, io::stdout());
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    terminal.dispatch(Action::Mount).await?;

    loop {
        tokio::select! {
            Some(action) = rx.recv() => terminal.dispatch(action).await?,
            line = input.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                match line.trim() {
                    "q" | "quit" => break,
                    "" | "f" => terminal.dispatch(Action::ToggleForecast).await?,
                    other => debug!(input = other, "Ignoring unknown key"),
                }
            }
        }
    }

    Ok(())
}

struct Terminal<W> {
    view: WeatherView,
    client: Arc<dyn WeatherClient>,
    config: Config,
    tx: mpsc::UnboundedSender<Action>,
    out: W,
}

impl<W: Write> Terminal<W> {
    fn new(
        config: Config,
        client: Arc<dyn WeatherClient>,
        tx: mpsc::UnboundedSender<Action>,
        out: W,
    ) -> Self {
        Self { view: WeatherView::new(config.slide_duration()), client, config, tx, out }
    }

    async fn dispatch(&mut self, action: Action) -> anyhow::Result<()> {
        let mut slide = None;
        for effect in self.view.dispatch(action) {
            match effect {
                Effect::Fetch(request) => self.spawn_fetch(request),
                Effect::Slide(transition) => slide = Some(transition),
            }
        }

        match slide {
            Some(transition) => self.animate(transition).await,
            None => self.draw(0),
        }
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        let client = Arc::clone(&self.client);
        let location = self.config.location.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let action = request.run(client.as_ref(), &location).await;
            // Fails only once the screen has been closed.
            let _ = tx.send(action);
        });
    }

    async fn animate(&mut self, transition: SlideTransition) -> anyhow::Result<()> {
        // The view has already closed the panel; keep drawing it until it has slid out.
        let mut sliding_out = self.view.state().clone();
        sliding_out.forecast_panel_open = true;

        let start = Instant::now();
        let mut ticker = interval(FRAME_INTERVAL);

        loop {
            ticker.tick().await;
            let elapsed = start.elapsed();
            if transition.is_finished(elapsed) {
                break;
            }

            let rows = transition.offset_rows(elapsed, PANEL_SLIDE_ROWS);
            match transition.direction {
                SlideDirection::Open => self.draw(rows)?,
                SlideDirection::Close => {
                    let frame = render_screen(&sliding_out, self.config.heading(), rows);
                    self.write_frame(&frame)?;
                }
            }
        }

        self.draw(0)
    }

    fn draw(&mut self, panel_offset_rows: usize) -> anyhow::Result<()> {
        let frame = render_screen(self.view.state(), self.config.heading(), panel_offset_rows);
        self.write_frame(&frame)
    }

    fn write_frame(&mut self, frame: &str) -> anyhow::Result<()> {
        write!(self.out, "{CLEAR}{frame}{HELP}").context("Failed to draw screen")?;
        self.out.flush().context("Failed to draw screen")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use skyview_core::{CurrentWeather, FetchError, Forecast};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct FakeClient {
        current_calls: AtomicUsize,
        forecast_calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherClient for FakeClient {
        async fn fetch_current(&self, location: &str) -> Result<CurrentWeather, FetchError> {
            assert_eq!(location, "Colombo");
            self.current_calls.fetch_add(1, Ordering::SeqCst);
            Ok(CurrentWeather {
                temperature_c: 28.5,
                condition_text: "Patchy rain possible".to_string(),
                condition_icon_url: "http://x/64.png".to_string(),
                wind_kph: 10.0,
                humidity_pct: 70,
            })
        }

        async fn fetch_forecast(&self, _location: &str, _days: u8) -> Result<Forecast, FetchError> {
            self.forecast_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Forecast::default())
        }
    }

    type Harness = (Terminal<Vec<u8>>, mpsc::UnboundedReceiver<Action>, Arc<FakeClient>);

    fn terminal(slide_duration_ms: u64) -> Harness {
        let client = Arc::new(FakeClient::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let config = Config { slide_duration_ms, ..Config::default() };
        let terminal = Terminal::new(config, client.clone(), tx, Vec::new());
        (terminal, rx, client)
    }

    fn frames(terminal: &Terminal<Vec<u8>>) -> Vec<String> {
        String::from_utf8_lossy(&terminal.out)
            .split(CLEAR)
            .filter(|frame| !frame.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn last_frame(terminal: &Terminal<Vec<u8>>) -> String {
        frames(terminal).pop().unwrap_or_default()
    }

    /// Dispatches `action`, then feeds the completion of the fetch it spawned back in.
    async fn dispatch_and_complete(
        terminal: &mut Terminal<Vec<u8>>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
        action: Action,
    ) {
        terminal.dispatch(action).await.expect("dispatch");
        let completion = rx.recv().await.expect("fetch completion");
        terminal.dispatch(completion).await.expect("completion");
    }

    #[tokio::test(start_paused = true)]
    async fn mount_fetches_in_background_and_redraws_on_completion() {
        let (mut terminal, mut rx, client) = terminal(500);

        terminal.dispatch(Action::Mount).await.expect("mount");
        assert_eq!(last_frame(&terminal), format!("Loading...\n{HELP}"));

        let completion = rx.recv().await.expect("fetch completion");
        assert!(matches!(completion, Action::CurrentLoaded { generation: 1, result: Ok(_) }));
        terminal.dispatch(completion).await.expect("completion");

        let frame = last_frame(&terminal);
        assert!(frame.starts_with("Weather in Colombo, Sri Lanka\n"));
        assert!(frame.contains("\n28.5°C\n"));
        assert!(frame.contains("Don't forget your umbrella!"));
        assert_eq!(client.current_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn opening_panel_slides_in_over_several_frames() {
        let (mut terminal, mut rx, client) = terminal(500);
        dispatch_and_complete(&mut terminal, &mut rx, Action::Mount).await;
        terminal.out.clear();

        terminal.dispatch(Action::ToggleForecast).await.expect("toggle");

        let frames = frames(&terminal);
        assert!(frames.len() > 2, "expected an animation, got {} frames", frames.len());
        let hidden = format!("]\n{}Loading forecast...", "\n".repeat(PANEL_SLIDE_ROWS));
        assert!(frames[0].contains(&hidden));
        assert!(frames[frames.len() - 1].contains("]\nLoading forecast..."));

        let completion = rx.recv().await.expect("forecast completion");
        terminal.dispatch(completion).await.expect("completion");
        assert!(last_frame(&terminal).contains("3-Day Forecast:"));
        assert_eq!(client.forecast_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn closing_panel_slides_out_before_hiding() {
        let (mut terminal, mut rx, client) = terminal(500);
        dispatch_and_complete(&mut terminal, &mut rx, Action::Mount).await;
        dispatch_and_complete(&mut terminal, &mut rx, Action::ToggleForecast).await;
        terminal.out.clear();

        terminal.dispatch(Action::ToggleForecast).await.expect("toggle");

        let frames = frames(&terminal);
        assert!(frames.len() > 2, "expected an animation, got {} frames", frames.len());
        assert!(frames[0].contains("]\n3-Day Forecast:"));
        let last = &frames[frames.len() - 1];
        assert!(!last.contains("3-Day Forecast:"));
        assert!(last.contains("View 3-Day Forecast"));

        assert!(rx.try_recv().is_err());
        assert_eq!(client.forecast_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_slide_draws_single_frame() {
        let (mut terminal, mut rx, _client) = terminal(0);
        dispatch_and_complete(&mut terminal, &mut rx, Action::Mount).await;
        terminal.out.clear();

        terminal.dispatch(Action::ToggleForecast).await.expect("toggle");

        assert_eq!(frames(&terminal).len(), 1);
    }
}
