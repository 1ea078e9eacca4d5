//! Gated Explorer
//!
//! `gated_explorer [ROUTE]` starts the interactive client at ROUTE
//! (default `/characters`). `gated_explorer render [ROUTE]` prints a headless
//! render of ROUTE and exits.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use gated_explorer::graphql::Launches;
use gated_explorer::session::{FileStorage, SessionContext, SessionStore};
use gated_explorer::tui::{render_headless, App, Clients, ExplorerTui};
use gated_explorer::utils::logging;
use gated_explorer::views::Route;
use gated_explorer::ExplorerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ExplorerConfig::load().context("Failed to load configuration")?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("render") => {
            let _guard = logging::init_stderr_logging()?;
            let route = Route::parse(args.get(1).map(String::as_str).unwrap_or("/"));
            print!("{}", render_headless(&config, route, 100, 30)?);
            Ok(())
        }
        other => {
            let _guard = logging::init_file_logging(&config.log_dir)?;
            let route = Route::parse(other.unwrap_or("/"));
            info!("Starting explorer at {} (storage {:?})", route, config.storage_path);

            let storage = Arc::new(FileStorage::new(&config.storage_path));
            let session = SessionContext::mount(SessionStore::new(storage));
            let app = App::new(
                session.clone(),
                Clients::from_config(&config),
                Launches::new(config.launches_page_size),
                route,
            );

            let result = ExplorerTui::new(app).run().await;
            session.unmount();
            result
        }
    }
}
