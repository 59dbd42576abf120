//! Tiling Puzzle - terminal tile-swap game.

#![warn(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use tiling_puzzle::{
    AppConfig, Cli, ImageLoader, TerminalGuard, TerminalRenderer, Viewport, build_session, run,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log to a file so output does not tear through the game screen.
    let log_file = std::fs::File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .init();

    info!("Starting Tiling Puzzle");

    let config = AppConfig::resolve(cli.config.as_deref()).context("Failed to load config")?;
    let mut loader = ImageLoader::new();
    let mut session = match build_session(&config, &mut loader, cli.seed) {
        Ok(session) => session,
        Err(e) => {
            error!(error = ?e, "Startup failed");
            return Err(e);
        }
    };

    let layout = config.layout();
    let viewport = Viewport::new(*config.pixels_per_cell());

    let guard = TerminalGuard::acquire().context("Failed to set up terminal")?;
    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let mut renderer =
        TerminalRenderer::new(terminal, layout.canvas_width, layout.canvas_height, viewport);

    let result = run(&mut session, &mut renderer, *config.fps());
    drop(renderer);
    drop(guard);

    if let Err(e) = &result {
        error!(error = ?e, "Game loop error");
    }
    info!("Shutting down");
    result
}
