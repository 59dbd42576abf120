//! Per-frame projection of the session into draw commands.

use crate::geometry::Rect;
use crate::session::{Phase, Session};
use tracing::instrument;

/// Which part of the scene a draw command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Layer {
    /// A puzzle tile, by tile index.
    Tile(usize),
    /// The overlay on the selected tile.
    Selection,
    /// The full-image reference thumbnail.
    Reference,
    /// The "puzzle complete" banner.
    Banner,
}

/// Copy `source` of `handle` (or all of it) into `dest`.
#[derive(Debug, PartialEq, Eq)]
pub struct DrawCommand<'a, H> {
    /// Scene layer, for diagnostics and tests.
    pub layer: Layer,
    /// Image to sample.
    pub handle: &'a H,
    /// Sub-rectangle of the image, or `None` for the whole image.
    pub source: Option<Rect>,
    /// Destination on the canvas.
    pub dest: Rect,
}

/// Draw target consumed by [`present`].
pub trait Renderer {
    /// Image handle type the renderer can draw.
    type Handle;
    /// Failure while presenting a frame.
    type Error;

    /// Clears the frame to the background colour.
    fn clear(&mut self);

    /// Draws `source` of `handle` (or the whole image) scaled into `dest`.
    fn copy(&mut self, handle: &Self::Handle, source: Option<Rect>, dest: Rect);

    /// Shows the finished frame.
    ///
    /// # Errors
    ///
    /// Returns the renderer's error if the frame cannot be shown.
    fn present(&mut self) -> Result<(), Self::Error>;
}

/// Builds the draw list for the current frame, bottom layer first.
///
/// Tiles come first, then the selection overlay, the reference thumbnail
/// when enabled, and the solved banner while in [`Phase::Transition`].
pub fn draw_list<H>(session: &Session<H>) -> Vec<DrawCommand<'_, H>> {
    let board = session.board();
    let puzzle = session.library().current();
    let layout = session.geometry().layout();

    let mut commands: Vec<DrawCommand<'_, H>> = session
        .geometry()
        .sources()
        .iter()
        .zip(board.slots())
        .enumerate()
        .map(|(index, (source, slot))| DrawCommand {
            layer: Layer::Tile(index),
            handle: puzzle,
            source: Some(*source),
            dest: *slot,
        })
        .collect();

    if let Some(selected) = board.selection() {
        commands.push(DrawCommand {
            layer: Layer::Selection,
            handle: &session.assets().selected_overlay,
            source: None,
            dest: board.slots()[selected],
        });
    }

    if board.reference_displayed() {
        commands.push(DrawCommand {
            layer: Layer::Reference,
            handle: puzzle,
            source: None,
            dest: layout.reference_rect,
        });
    }

    if session.phase() == Phase::Transition {
        commands.push(DrawCommand {
            layer: Layer::Banner,
            handle: &session.assets().solved_banner,
            source: None,
            dest: layout.banner_rect,
        });
    }

    commands
}

/// Renders one frame of `session` through `renderer`.
///
/// # Errors
///
/// Returns the renderer's error if presenting fails.
#[instrument(skip_all, fields(phase = %session.phase()))]
pub fn present<R>(session: &Session<R::Handle>, renderer: &mut R) -> Result<(), R::Error>
where
    R: Renderer,
{
    renderer.clear();
    for command in draw_list(session) {
        renderer.copy(command.handle, command.source, command.dest);
    }
    renderer.present()
}
