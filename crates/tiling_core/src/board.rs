//! Board state: where every tile currently sits and which one is picked.
//!
//! Tile `i` always samples source region `i`; only its destination slot moves.
//! Swapping two tiles exchanges their slot rectangles, and the board is solved
//! when every slot is back at its reference position.

use crate::geometry::{Point, Rect};
use crate::seed::{SeedSource, shuffle_with};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// What a primary click did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionOutcome {
    /// Nothing was selected and the click picked this tile.
    Selected(usize),
    /// The selected tile was clicked again and released.
    Deselected(usize),
    /// Two tiles traded slots.
    Swapped {
        /// The tile that was selected before the click.
        first: usize,
        /// The tile that was clicked.
        second: usize,
        /// Whether the swap completed the puzzle.
        solved: bool,
    },
    /// The click hit no tile.
    Ignored,
}

/// Mutable tile arrangement plus the immutable solved layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    slots: Vec<Rect>,
    reference: Box<[Rect]>,
    selection: Option<usize>,
    show_reference: bool,
}

impl Board {
    /// Creates a solved board whose slots equal `reference`.
    #[instrument(skip(reference), fields(tiles = reference.len()))]
    pub fn new(reference: Vec<Rect>) -> Self {
        Self {
            slots: reference.clone(),
            reference: reference.into_boxed_slice(),
            selection: None,
            show_reference: false,
        }
    }

    /// Puts every tile back in its reference slot and clears the selection.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.slots.clear();
        self.slots.extend_from_slice(&self.reference);
        self.selection = None;
    }

    /// Randomly permutes the slots. The reference layout is untouched.
    #[instrument(skip_all)]
    pub fn shuffle_slots(&mut self, seeds: &mut dyn SeedSource) {
        shuffle_with(&mut self.slots, seeds);
    }

    /// Returns the first tile, in index order, whose slot contains `point`.
    pub fn select_at(&self, point: Point) -> Option<usize> {
        self.slots.iter().position(|slot| slot.contains(point))
    }

    /// Applies a primary click at `point`.
    ///
    /// With nothing selected, a hit selects that tile. With a tile selected,
    /// hitting it again deselects it, hitting another tile swaps the two and
    /// clears the selection, and a miss leaves everything as it was.
    #[instrument(skip(self), fields(selected = ?self.selection))]
    pub fn apply_selection(&mut self, point: Point) -> SelectionOutcome {
        let Some(hit) = self.select_at(point) else {
            return SelectionOutcome::Ignored;
        };

        match self.selection {
            None => {
                debug!(tile = hit, "Tile selected");
                self.selection = Some(hit);
                SelectionOutcome::Selected(hit)
            }
            Some(selected) if selected == hit => {
                debug!(tile = hit, "Tile deselected");
                self.selection = None;
                SelectionOutcome::Deselected(hit)
            }
            Some(selected) => {
                self.slots.swap(selected, hit);
                self.selection = None;
                let solved = self.is_solved();
                debug!(first = selected, second = hit, solved, "Tiles swapped");
                SelectionOutcome::Swapped {
                    first: selected,
                    second: hit,
                    solved,
                }
            }
        }
    }

    /// Drops the current selection, if any.
    #[instrument(skip(self))]
    pub fn cancel_selection(&mut self) {
        self.selection = None;
    }

    /// Returns true when every slot sits at its reference position.
    ///
    /// Only positions are compared; tile sizes never change.
    pub fn is_solved(&self) -> bool {
        self.slots
            .iter()
            .zip(self.reference.iter())
            .all(|(slot, reference)| slot.same_origin(reference))
    }

    /// Flips whether the full reference image is shown.
    #[instrument(skip(self))]
    pub fn toggle_reference_display(&mut self) {
        self.show_reference = !self.show_reference;
    }

    /// Current slot of every tile.
    pub fn slots(&self) -> &[Rect] {
        &self.slots
    }

    /// Solved slot of every tile.
    pub fn reference(&self) -> &[Rect] {
        &self.reference
    }

    /// The selected tile, if any.
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// Whether the reference image is shown.
    pub fn reference_displayed(&self) -> bool {
        self.show_reference
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True for a board without tiles.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Replaces the slots with an explicit arrangement.
    ///
    /// The arrangement must have one slot per tile; the selection is cleared.
    #[cfg(test)]
    pub(crate) fn set_slots(&mut self, slots: Vec<Rect>) {
        assert_eq!(slots.len(), self.reference.len());
        self.slots = slots;
        self.selection = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::grid_rects;
    use crate::seed::RngSeed;

    fn board() -> Board {
        Board::new(grid_rects(100, 4, 4, Point::new(100, 20)))
    }

    fn centre(rect: Rect) -> Point {
        Point::new(rect.x + rect.w / 2, rect.y + rect.h / 2)
    }

    #[test]
    fn test_new_board_is_solved() {
        assert!(board().is_solved());
    }

    #[test]
    fn test_select_at_finds_tile() {
        let board = board();
        assert_eq!(board.select_at(Point::new(150, 70)), Some(0));
        assert_eq!(board.select_at(Point::new(450, 370)), Some(15));
        assert_eq!(board.select_at(Point::new(10, 10)), None);
    }

    #[test]
    fn test_shared_edge_hits_lower_index() {
        let board = board();
        assert_eq!(board.select_at(Point::new(200, 70)), Some(0));
    }

    #[test]
    fn test_reclick_deselects_without_swap() {
        let mut board = board();
        let before = board.slots().to_vec();
        let point = centre(board.slots()[2]);
        assert_eq!(board.apply_selection(point), SelectionOutcome::Selected(2));
        assert_eq!(board.apply_selection(point), SelectionOutcome::Deselected(2));
        assert_eq!(board.selection(), None);
        assert_eq!(board.slots(), &before[..]);
    }

    #[test]
    fn test_miss_keeps_selection() {
        let mut board = board();
        board.apply_selection(centre(board.slots()[4]));
        assert_eq!(board.apply_selection(Point::new(5, 5)), SelectionOutcome::Ignored);
        assert_eq!(board.selection(), Some(4));
    }

    #[test]
    fn test_swap_exchanges_slots() {
        let mut board = board();
        let a = board.slots()[1];
        let b = board.slots()[6];
        board.apply_selection(centre(a));
        let outcome = board.apply_selection(centre(b));
        assert_eq!(
            outcome,
            SelectionOutcome::Swapped {
                first: 1,
                second: 6,
                solved: false
            }
        );
        assert_eq!(board.slots()[1], b);
        assert_eq!(board.slots()[6], a);
        assert_eq!(board.selection(), None);
    }

    #[test]
    fn test_swapping_back_solves() {
        let mut board = board();
        let a = centre(board.slots()[0]);
        let b = centre(board.slots()[1]);
        board.apply_selection(a);
        board.apply_selection(b);
        assert!(!board.is_solved());
        board.apply_selection(a);
        let outcome = board.apply_selection(b);
        assert!(matches!(outcome, SelectionOutcome::Swapped { solved: true, .. }));
    }

    #[test]
    fn test_cancel_clears_selection() {
        let mut board = board();
        board.apply_selection(centre(board.slots()[3]));
        board.cancel_selection();
        assert_eq!(board.selection(), None);
    }

    #[test]
    fn test_reset_restores_reference() {
        let mut board = board();
        board.shuffle_slots(&mut RngSeed::new(11));
        board.apply_selection(centre(board.slots()[0]));
        board.reset();
        assert!(board.is_solved());
        assert_eq!(board.selection(), None);
        assert_eq!(board.slots(), board.reference());
    }

    #[test]
    fn test_shuffle_keeps_reference() {
        let mut board = board();
        let reference = board.reference().to_vec();
        board.shuffle_slots(&mut RngSeed::new(5));
        assert_eq!(board.reference(), &reference[..]);

        let mut slots = board.slots().to_vec();
        slots.sort_by_key(|r| (r.y, r.x));
        assert_eq!(slots, reference);
    }

    #[test]
    fn test_solved_ignores_size() {
        let mut board = board();
        let resized = board
            .reference()
            .iter()
            .map(|r| Rect::new(r.x, r.y, 1, 1))
            .collect();
        board.set_slots(resized);
        assert!(board.is_solved());
    }

    #[test]
    fn test_toggle_reference_display() {
        let mut board = board();
        assert!(!board.reference_displayed());
        board.toggle_reference_display();
        assert!(board.reference_displayed());
        board.toggle_reference_display();
        assert!(!board.reference_displayed());
    }
}
