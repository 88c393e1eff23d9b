//! deskboard: a terminal dashboard with todos, calendar, clock, weather,
//! crypto prices and an on-screen keyboard for pointer input.

mod app;
mod auth;
mod db;
mod error;
mod event;
mod input;
mod keyboard;
mod remote;
mod todos;
mod ui;

use std::fs::File;
use std::io::{self, Stdout};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self as term_event, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use crate::app::{App, AppConfig};
use crate::auth::LocalAuth;
use crate::db::Database;
use crate::remote::{CachedPrices, CoinGeckoClient, HttpClient, OpenWeatherClient, RemoteWorker};
use crate::todos::SqliteTodoStore;

/// Upper bound between redraws so the clock and key highlights stay live
const POLL_INTERVAL: Duration = Duration::from_millis(100);

type Term = Terminal<CrosstermBackend<Stdout>>;

fn main() -> Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config)?;
    tracing::info!(db = %config.db_path.display(), "starting deskboard");

    let db = Rc::new(
        Database::open(&config.db_path)
            .with_context(|| format!("failed to open database at {}", config.db_path.display()))?,
    );
    let remote = spawn_remote(&config)?;

    let auth = Box::new(LocalAuth::new(db.clone()));
    let store = Box::new(SqliteTodoStore::new(db));
    let mut app = App::new(config, auth, store, Some(remote));
    app.start().context("failed to restore session")?;

    let mut terminal = setup_terminal().context("failed to initialize terminal")?;
    let result = run(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "event loop failed");
    }
    tracing::info!("deskboard stopped");
    result
}

fn init_tracing(config: &AppConfig) -> Result<()> {
    if let Some(dir) = config.log_path.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("failed to open log file {}", config.log_path.display()))?;

    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

fn spawn_remote(config: &AppConfig) -> Result<RemoteWorker> {
    let http = HttpClient::new().context("failed to build HTTP client")?;
    let weather = OpenWeatherClient::new(
        http.clone(),
        config.weather_api_key.clone(),
        config.city.clone(),
        config.country.clone(),
    );
    let prices = CachedPrices::new(Box::new(CoinGeckoClient::new(http)), config.price_ttl);
    RemoteWorker::spawn(Box::new(weather), prices).context("failed to start remote worker")
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run(terminal: &mut Term, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| app.render(frame))?;

        if term_event::poll(POLL_INTERVAL)? {
            match term_event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Mouse(mouse) => app.handle_mouse_event(mouse),
                _ => {}
            }
        }
        app.tick();
    }
    Ok(())
}
