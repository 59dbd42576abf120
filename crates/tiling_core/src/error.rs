//! Error types for startup failures.
//!
//! Nothing inside the frame loop is an error: misses, re-clicks and skips are
//! ordinary no-ops. Errors only arise while acquiring resources or validating
//! the layout, and both abort startup.

use derive_more::{Display, Error};
use tracing::instrument;

/// What went wrong while acquiring an image resource.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ResourceLoadErrorKind {
    /// The puzzle directory holds no usable images.
    #[display("no puzzle images found in {}", _0)]
    EmptyDirectory(String),

    /// A file or directory could not be read.
    #[display("failed to read {}: {}", path, reason)]
    Unreadable {
        /// Offending path.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },

    /// A file was read but is not a decodable image.
    #[display("failed to decode {}: {}", path, reason)]
    Decode {
        /// Offending path.
        path: String,
        /// Decoder message.
        reason: String,
    },

    /// A puzzle image does not have the dimensions the grid was built for.
    #[display(
        "{} is {}x{} pixels, puzzles must be {}x{}",
        path,
        width,
        height,
        expected_width,
        expected_height
    )]
    Dimensions {
        /// Offending path.
        path: String,
        /// Decoded width.
        width: u32,
        /// Decoded height.
        height: u32,
        /// Width required by the geometry.
        expected_width: u32,
        /// Height required by the geometry.
        expected_height: u32,
    },

    /// A fixed asset (overlay or banner) does not exist.
    #[display("missing asset {}", _0)]
    MissingAsset(String),
}

/// Resource acquisition failure with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Resource load error: {} at {}:{}", kind, file, line)]
pub struct ResourceLoadError {
    /// What failed.
    pub kind: ResourceLoadErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ResourceLoadError {
    /// Creates a new resource error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: ResourceLoadErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<ResourceLoadErrorKind> for ResourceLoadError {
    #[track_caller]
    fn from(kind: ResourceLoadErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Invalid board layout.
#[derive(Debug, Clone, Display, Error)]
#[display("Layout error: {} at {}:{}", message, file, line)]
pub struct LayoutError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LayoutError {
    /// Creates a new layout error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
