//! Tiling Puzzle - terminal frontend for the tile-swap puzzle.
//!
//! Wires the pure game logic in `tiling_core` to the platform:
//!
//! - **Config**: TOML settings with built-in defaults
//! - **Assets**: PNG decoding with the `image` crate
//! - **Canvas**: software compositing of the per-frame draw list
//! - **Terminal**: half-block display, mouse/key input and the frame loop

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod assets;
mod canvas;
mod cli;
mod config;
mod terminal;

use anyhow::{Context, Result};
use tiling_core::{
    Assets, ClockSeed, GeometryTable, PuzzleLibrary, ResourceLoader, RngSeed, SeedSource, Session,
};
use tracing::{info, instrument};

// Crate-level exports - Configuration
pub use cli::Cli;
pub use config::{AppConfig, ConfigError, DEFAULT_CONFIG_FILE};

// Crate-level exports - Resources and rendering
pub use assets::{ImageLoader, Texture};
pub use canvas::Canvas;
pub use terminal::{CanvasView, TerminalGuard, TerminalRenderer, Viewport, run, translate};

/// Loads every resource named by `config` and deals the first puzzle.
///
/// Fails before any puzzle is shown if the layout is invalid, the puzzle
/// directory has no usable images, or an overlay asset is missing.
#[instrument(skip_all, fields(puzzles_dir = %config.puzzles_dir().display(), seed = ?seed))]
pub fn build_session<L>(
    config: &AppConfig,
    loader: &mut L,
    seed: Option<u64>,
) -> Result<Session<L::Handle>>
where
    L: ResourceLoader,
{
    let geometry = GeometryTable::new(*config.layout()).context("Invalid board layout")?;

    let library = PuzzleLibrary::load(loader, config.puzzles_dir(), geometry.source_size())
        .context("Failed to load puzzle images")?;

    let assets = Assets::load(loader, config.selected_overlay(), config.solved_banner())
        .context("Failed to load overlay assets")?;

    let seeds: Box<dyn SeedSource> = match seed {
        Some(seed) => Box::new(RngSeed::new(seed)),
        None => Box::new(ClockSeed),
    };

    let mut session = Session::new(geometry, library, assets, seeds);
    session.start();
    info!(puzzles = session.library().len(), "Session ready");
    Ok(session)
}
