//! The ordered collection of puzzle images.

use crate::error::{ResourceLoadError, ResourceLoadErrorKind};
use crate::seed::{SeedSource, shuffle_with};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Acquires drawable handles for puzzle images and fixed assets.
///
/// Implemented by the platform layer; the core never decodes images itself.
pub trait ResourceLoader {
    /// Opaque drawable handle produced by this loader.
    type Handle;

    /// Lists the puzzle images in a directory in a stable order.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceLoadError`] if the directory cannot be read.
    fn list_puzzles(&mut self, dir: &Path) -> Result<Vec<PathBuf>, ResourceLoadError>;

    /// Loads one puzzle image, rejecting any whose size differs from `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceLoadError`] if the image cannot be read, decoded or has
    /// the wrong dimensions.
    fn load_puzzle(
        &mut self,
        path: &Path,
        expected: (u32, u32),
    ) -> Result<Self::Handle, ResourceLoadError>;

    /// Loads a fixed asset such as the selection overlay.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceLoadError`] if the asset is missing or cannot be decoded.
    fn load_asset(&mut self, path: &Path) -> Result<Self::Handle, ResourceLoadError>;
}

/// Puzzle images in play order, with the index of the active one.
///
/// Never empty: construction fails rather than produce a library with
/// nothing to show, so [`PuzzleLibrary::current`] always has a handle.
#[derive(Debug)]
pub struct PuzzleLibrary<H> {
    handles: Vec<H>,
    index: usize,
}

impl<H> PuzzleLibrary<H> {
    /// Wraps already-acquired handles.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceLoadErrorKind::EmptyDirectory`] if `handles` is empty.
    #[track_caller]
    pub fn from_handles(handles: Vec<H>) -> Result<Self, ResourceLoadError> {
        if handles.is_empty() {
            return Err(ResourceLoadErrorKind::EmptyDirectory("<no handles>".to_string()).into());
        }
        Ok(Self { handles, index: 0 })
    }

    /// Loads every puzzle image found in `dir`.
    ///
    /// Any failure aborts the whole load; a game with a partial or empty
    /// library is not started.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceLoadError`] if the directory has no images or any
    /// image fails to load.
    #[instrument(skip(loader, dir), fields(dir = %dir.display()))]
    pub fn load<L>(loader: &mut L, dir: &Path, expected: (u32, u32)) -> Result<Self, ResourceLoadError>
    where
        L: ResourceLoader<Handle = H>,
    {
        let paths = loader.list_puzzles(dir)?;
        if paths.is_empty() {
            return Err(ResourceLoadErrorKind::EmptyDirectory(dir.display().to_string()).into());
        }

        let handles = paths
            .iter()
            .map(|path| {
                debug!(path = %path.display(), "Loading puzzle");
                loader.load_puzzle(path, expected)
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(count = handles.len(), "Puzzle library loaded");
        Ok(Self { handles, index: 0 })
    }

    /// Randomly permutes the play order. Does not move the index.
    #[instrument(skip_all, fields(len = self.handles.len()))]
    pub fn shuffle_all(&mut self, seeds: &mut dyn SeedSource) {
        shuffle_with(&mut self.handles, seeds);
    }

    /// Steps to the next puzzle, reshuffling and restarting at the end.
    #[instrument(skip_all, fields(index = self.index, len = self.handles.len()))]
    pub fn advance(&mut self, seeds: &mut dyn SeedSource) -> &H {
        if self.index + 1 < self.handles.len() {
            self.index += 1;
        } else {
            debug!("Reached end of library, reshuffling");
            self.shuffle_all(seeds);
            self.index = 0;
        }
        &self.handles[self.index]
    }

    /// The active puzzle's handle.
    pub fn current(&self) -> &H {
        &self.handles[self.index]
    }

    /// Index of the active puzzle.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of puzzles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Always false; an empty library cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// All handles in current play order.
    pub fn handles(&self) -> &[H] {
        &self.handles
    }
}
