//! Tiling puzzle core - swap-style tile puzzle logic.
//!
//! An image is carved into a grid of tiles, the tiles are shuffled across the
//! board, and the player swaps pairs until the picture is whole again.
//!
//! # Architecture
//!
//! - **Geometry**: fixed source regions and solved slots, computed once
//! - **Library**: the puzzle images in play order, reshuffled on wrap
//! - **Board**: current slots, selection, solved check
//! - **Session**: the phase state machine fed one event per frame
//! - **Present**: the per-frame draw list handed to a [`Renderer`]
//!
//! Image decoding, windows and input devices live outside this crate behind
//! the [`ResourceLoader`] and [`Renderer`] traits.
//!
//! # Example
//!
//! ```
//! use tiling_core::{
//!     Assets, GeometryTable, InputEvent, Layout, Phase, PuzzleLibrary, RngSeed, Session,
//! };
//!
//! let geometry = GeometryTable::new(Layout::default()).unwrap();
//! let library = PuzzleLibrary::from_handles(vec!["sunset", "harbour"]).unwrap();
//! let assets = Assets { selected_overlay: "overlay", solved_banner: "banner" };
//!
//! let mut session = Session::new(geometry, library, assets, Box::new(RngSeed::new(1)));
//! assert_eq!(session.start(), Phase::Play);
//! assert_eq!(session.step(InputEvent::Quit), Phase::Shutdown);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod error;
mod event;
mod geometry;
mod library;
mod present;
mod seed;
mod session;

// Crate-level exports - Geometry
pub use geometry::{GeometryTable, Layout, Point, Rect, grid_rects};

// Crate-level exports - Errors
pub use error::{LayoutError, ResourceLoadError, ResourceLoadErrorKind};

// Crate-level exports - Randomness
pub use seed::{ClockSeed, RngSeed, SeedSource, shuffle_with};

// Crate-level exports - Game state
pub use board::{Board, SelectionOutcome};
pub use event::{InputEvent, Intent, Key};
pub use library::{PuzzleLibrary, ResourceLoader};
pub use session::{Assets, Phase, Session};

// Crate-level exports - Presentation
pub use present::{DrawCommand, Layer, Renderer, draw_list, present};
