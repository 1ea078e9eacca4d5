//! Terminal Client
//!
//! Interactive ratatui front end over the session and list views, plus a
//! headless one-shot renderer.

mod app;
mod render;

pub use app::{App, AppEvent, Clients, ListMsg};
pub use render::ui;

use std::io::stdout;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend, TestBackend},
    Terminal,
};
use tracing::info;

use crate::config::ExplorerConfig;
use crate::graphql::{DataClient, Launches};
use crate::session::{SessionContext, SessionStore};
use crate::views::Route;

const TICK: Duration = Duration::from_millis(50);

impl Clients {
    pub fn from_config(config: &ExplorerConfig) -> Self {
        Self {
            characters: DataClient::connect(&config.characters_endpoint, config.request_timeout()),
            launches: DataClient::connect(&config.launches_endpoint, config.request_timeout()),
        }
    }
}

pub struct ExplorerTui {
    app: App,
}

impl ExplorerTui {
    pub fn new(app: App) -> Self {
        Self { app }
    }

    pub async fn run(mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        stdout().execute(EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

        let result = event_loop(&mut terminal, &mut self.app).await;

        disable_raw_mode()?;
        stdout().execute(LeaveAlternateScreen)?;
        info!("Terminal client stopped");
        result
    }
}

async fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        while let Some(event) = app.try_next_event() {
            app.apply_event(event);
        }
        app.poll_session();

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
        tokio::task::yield_now().await;
    }
}

/// Renders the screen for `route` once, without storage, as plain text.
/// With no storage there is never an identity, so this is always the gate.
pub fn render_headless(config: &ExplorerConfig, route: Route, width: u16, height: u16) -> Result<String> {
    let session = SessionContext::mount(SessionStore::detached());
    let app = App::new(
        session,
        Clients::from_config(config),
        Launches::new(config.launches_page_size),
        route,
    );
    snapshot(&app, width, height)
}

/// Draws the app into an off-screen buffer and returns its text.
pub fn snapshot(app: &App, width: u16, height: u16) -> Result<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height))?;
    terminal.draw(|f| ui(f, app))?;

    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        let mut line = String::new();
        for x in 0..buffer.area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                line.push_str(cell.symbol());
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    Ok(out)
}
