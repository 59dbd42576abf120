//! Rectangles and the fixed tile geometry of the board.
//!
//! The geometry is computed once from a [`Layout`] and never changes: the
//! source regions carve the puzzle image into a grid, the reference layout
//! places that grid on the board at the configured offset.

use crate::error::LayoutError;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A point in board pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, new)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

/// An axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, new)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl Rect {
    /// Returns true if the point lies inside the rectangle or on any of its edges.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x.saturating_add(self.w)
            && point.y >= self.y
            && point.y <= self.y.saturating_add(self.h)
    }

    /// Bottom-right corner, or `None` if it does not fit in `i32`.
    pub fn far_corner(&self) -> Option<Point> {
        Some(Point::new(
            self.x.checked_add(self.w)?,
            self.y.checked_add(self.h)?,
        ))
    }

    /// Returns true if both rectangles share the same top-left corner.
    pub fn same_origin(&self, other: &Rect) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// Board layout parameters.
///
/// Defaults reproduce the classic board: a 4×4 grid of 100 px tiles drawn
/// at (100, 20) on a 600×600 canvas, with the reference thumbnail and the
/// solved banner underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Edge length of one square tile in pixels.
    pub tile_size: i32,
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Top-left corner of the board on the canvas.
    pub board_offset: Point,
    /// Where the full-image reference thumbnail is drawn.
    pub reference_rect: Rect,
    /// Where the "puzzle complete" banner is drawn.
    pub banner_rect: Rect,
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            tile_size: 100,
            columns: 4,
            rows: 4,
            board_offset: Point::new(100, 20),
            reference_rect: Rect::new(100, 450, 100, 100),
            banner_rect: Rect::new(200, 450, 300, 100),
            canvas_width: 600,
            canvas_height: 600,
        }
    }
}

impl Layout {
    /// Total number of tiles on the board.
    pub fn tile_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Checks that the layout describes a non-empty grid of non-empty tiles
    /// whose every rectangle fits in pixel coordinates.
    #[instrument]
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.tile_size <= 0 {
            return Err(LayoutError::new(format!(
                "tile size must be positive, got {}",
                self.tile_size
            )));
        }
        if self.tile_count() == 0 {
            return Err(LayoutError::new(format!(
                "grid must have at least one tile, got {}x{}",
                self.columns, self.rows
            )));
        }
        if self.board_extent().is_none() {
            return Err(LayoutError::new(format!(
                "{}x{} grid of {} px tiles at ({}, {}) overflows pixel coordinates",
                self.columns, self.rows, self.tile_size, self.board_offset.x, self.board_offset.y
            )));
        }
        for (name, rect) in [
            ("reference_rect", self.reference_rect),
            ("banner_rect", self.banner_rect),
        ] {
            if rect.far_corner().is_none() {
                return Err(LayoutError::new(format!(
                    "{} {:?} overflows pixel coordinates",
                    name, rect
                )));
            }
        }
        Ok(())
    }

    /// Board width and height in pixels, if the grid and its far corner fit in `i32`.
    fn board_extent(&self) -> Option<(i32, i32)> {
        let width = i32::try_from(self.columns)
            .ok()?
            .checked_mul(self.tile_size)?;
        let height = i32::try_from(self.rows).ok()?.checked_mul(self.tile_size)?;
        Rect::new(self.board_offset.x, self.board_offset.y, width, height).far_corner()?;
        Some((width, height))
    }
}

/// Computes `columns × rows` square rectangles in row-major order.
///
/// Rectangle `i` sits at `(ox + (i mod columns)·size, oy + (i / columns)·size)`.
pub fn grid_rects(tile_size: i32, columns: u32, rows: u32, offset: Point) -> Vec<Rect> {
    let count = columns as usize * rows as usize;
    (0..count)
        .map(|i| {
            let col = (i % columns as usize) as i32;
            let row = (i / columns as usize) as i32;
            Rect::new(
                offset.x + col * tile_size,
                offset.y + row * tile_size,
                tile_size,
                tile_size,
            )
        })
        .collect()
}

/// The fixed rectangles derived from a layout, computed once per run.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GeometryTable {
    /// Sub-rectangles of the source image, indexed by tile.
    sources: Vec<Rect>,
    /// Solved destination slots on the board, indexed by tile.
    reference: Vec<Rect>,
    /// The layout this table was built from.
    layout: Layout,
}

impl GeometryTable {
    /// Builds the source-region and reference-layout tables.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if the layout has no tiles or a non-positive tile size.
    #[instrument]
    pub fn new(layout: Layout) -> Result<Self, LayoutError> {
        layout.validate()?;
        let sources = grid_rects(layout.tile_size, layout.columns, layout.rows, Point::default());
        let reference = grid_rects(
            layout.tile_size,
            layout.columns,
            layout.rows,
            layout.board_offset,
        );
        debug!(tiles = sources.len(), "Geometry table computed");
        Ok(Self {
            sources,
            reference,
            layout,
        })
    }

    /// Number of tiles.
    pub fn tile_count(&self) -> usize {
        self.sources.len()
    }

    /// Pixel dimensions every puzzle image must have.
    pub fn source_size(&self) -> (u32, u32) {
        let size = self.layout.tile_size as u32;
        (self.layout.columns * size, self.layout.rows * size)
    }
}
