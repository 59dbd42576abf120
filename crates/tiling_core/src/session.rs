//! The game session and its phase state machine.
//!
//! A [`Session`] owns everything the game mutates: the puzzle library, the
//! board, the fixed geometry, the overlay assets, the seed source and the
//! current [`Phase`]. The frame loop feeds it one event per tick through
//! [`Session::step`].
//!
//! | Phase        | Event            | Effect                               | Next         |
//! |--------------|------------------|--------------------------------------|--------------|
//! | `Startup`    | `start()`        | shuffle library, reset + shuffle board | `Play`     |
//! | any live     | `Quit`           |                                      | `Shutdown`   |
//! | `Play`       | primary click    | select / deselect / swap             | `Play` or `Transition` when solved |
//! | `Play`       | secondary click  | clear selection                      | `Play`       |
//! | `Play`       | tertiary click   | toggle reference image               | `Play`       |
//! | `Play`       | key `s`          | next puzzle, reshuffled              | `Play`       |
//! | `Transition` | space            | next puzzle, reshuffled              | `Play`       |
//!
//! Every other pair is ignored, and `Shutdown` ignores everything.

use crate::board::{Board, SelectionOutcome};
use crate::error::ResourceLoadError;
use crate::event::{InputEvent, Intent};
use crate::geometry::GeometryTable;
use crate::library::{PuzzleLibrary, ResourceLoader};
use crate::seed::SeedSource;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, trace, warn};

/// Program phase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Phase {
    /// Resources are loaded but the first puzzle has not been dealt.
    Startup,
    /// The player is swapping tiles.
    Play,
    /// The puzzle is solved and the banner is up.
    Transition,
    /// The game is over; the loop should exit.
    Shutdown,
}

impl Phase {
    /// True until the session reaches `Shutdown`.
    pub fn is_running(self) -> bool {
        self != Phase::Shutdown
    }
}

/// Fixed images drawn on top of the tiles.
#[derive(Debug)]
pub struct Assets<H> {
    /// Drawn over the selected tile.
    pub selected_overlay: H,
    /// Drawn while a solved puzzle waits for the player to continue.
    pub solved_banner: H,
}

impl<H> Assets<H> {
    /// Loads both overlay assets.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceLoadError`] if either asset is missing or undecodable.
    #[instrument(skip(loader, overlay, banner), fields(overlay = %overlay.display(), banner = %banner.display()))]
    pub fn load<L>(loader: &mut L, overlay: &Path, banner: &Path) -> Result<Self, ResourceLoadError>
    where
        L: ResourceLoader<Handle = H>,
    {
        Ok(Self {
            selected_overlay: loader.load_asset(overlay)?,
            solved_banner: loader.load_asset(banner)?,
        })
    }
}

/// Owned game context driven by the frame loop.
#[derive(Debug)]
pub struct Session<H> {
    geometry: GeometryTable,
    library: PuzzleLibrary<H>,
    board: Board,
    assets: Assets<H>,
    phase: Phase,
    seeds: Box<dyn SeedSource>,
}

impl<H> Session<H> {
    /// Assembles a session in the `Startup` phase with a solved board.
    #[instrument(skip_all, fields(tiles = geometry.tile_count(), puzzles = library.len()))]
    pub fn new(
        geometry: GeometryTable,
        library: PuzzleLibrary<H>,
        assets: Assets<H>,
        seeds: Box<dyn SeedSource>,
    ) -> Self {
        let board = Board::new(geometry.reference().clone());
        Self {
            geometry,
            library,
            board,
            assets,
            phase: Phase::Startup,
            seeds,
        }
    }

    /// Deals the first puzzle and enters `Play`.
    ///
    /// Shuffles the library order and the board once. Has no effect outside
    /// `Startup`.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn start(&mut self) -> Phase {
        if self.phase != Phase::Startup {
            warn!("Session already started");
            return self.phase;
        }
        self.library.shuffle_all(self.seeds.as_mut());
        self.board.reset();
        self.board.shuffle_slots(self.seeds.as_mut());
        self.phase = Phase::Play;
        info!(puzzle = self.library.index(), "Game started");
        self.phase
    }

    /// Processes one input event and returns the resulting phase.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn step(&mut self, event: InputEvent) -> Phase {
        let Some(intent) = Intent::from_event(event) else {
            trace!("Unmapped event");
            return self.phase;
        };

        let next = match (self.phase, intent) {
            (Phase::Shutdown, _) => Phase::Shutdown,

            (_, Intent::Quit) => {
                info!("Quit requested");
                Phase::Shutdown
            }

            (Phase::Play, Intent::Pick(point)) => match self.board.apply_selection(point) {
                SelectionOutcome::Swapped { solved: true, .. } => {
                    info!(puzzle = self.library.index(), "Puzzle solved!");
                    Phase::Transition
                }
                _ => Phase::Play,
            },

            (Phase::Play, Intent::Cancel) => {
                self.board.cancel_selection();
                Phase::Play
            }

            (Phase::Play, Intent::ToggleReference) => {
                self.board.toggle_reference_display();
                Phase::Play
            }

            (Phase::Play, Intent::Skip) => {
                info!(puzzle = self.library.index(), "Puzzle skipped");
                self.next_puzzle();
                Phase::Play
            }

            (Phase::Transition, Intent::Continue) => {
                self.next_puzzle();
                Phase::Play
            }

            (Phase::Startup, _)
            | (Phase::Play, Intent::Continue)
            | (
                Phase::Transition,
                Intent::Pick(_) | Intent::Cancel | Intent::ToggleReference | Intent::Skip,
            ) => {
                trace!(%intent, "Ignored in this phase");
                self.phase
            }
        };

        if next != self.phase {
            debug!(from = %self.phase, to = %next, "Phase transition");
        }
        self.phase = next;
        self.phase
    }

    /// Advances to the next puzzle with a freshly shuffled board.
    fn next_puzzle(&mut self) {
        self.library.advance(self.seeds.as_mut());
        self.board.reset();
        self.board.shuffle_slots(self.seeds.as_mut());
        debug!(puzzle = self.library.index(), "Next puzzle dealt");
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Board state.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Puzzle library.
    pub fn library(&self) -> &PuzzleLibrary<H> {
        &self.library
    }

    /// Fixed geometry.
    pub fn geometry(&self) -> &GeometryTable {
        &self.geometry
    }

    /// Overlay assets.
    pub fn assets(&self) -> &Assets<H> {
        &self.assets
    }
}
