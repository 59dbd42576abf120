//! Property tests for board swapping and solving.

use proptest::prelude::*;
use tiling_core::{Board, Point, Rect, RngSeed, SelectionOutcome, grid_rects};

fn shuffled_board(seed: u64) -> Board {
    let mut board = Board::new(grid_rects(100, 4, 4, Point::new(100, 20)));
    board.shuffle_slots(&mut RngSeed::new(seed));
    board
}

fn centre(rect: Rect) -> Point {
    Point::new(rect.x + rect.w / 2, rect.y + rect.h / 2)
}

fn click_tile(board: &mut Board, tile: usize) -> SelectionOutcome {
    let point = centre(board.slots()[tile]);
    board.apply_selection(point)
}

proptest! {
    #[test]
    fn swap_is_commutative(seed in any::<u64>(), a in 0usize..16, b in 0usize..16) {
        prop_assume!(a != b);

        let mut forward = shuffled_board(seed);
        let mut backward = forward.clone();

        click_tile(&mut forward, a);
        click_tile(&mut forward, b);
        click_tile(&mut backward, b);
        click_tile(&mut backward, a);

        prop_assert_eq!(forward.slots(), backward.slots());
        prop_assert_eq!(forward.selection(), None);
        prop_assert_eq!(backward.selection(), None);
    }

    #[test]
    fn reclick_never_swaps(seed in any::<u64>(), a in 0usize..16) {
        let mut board = shuffled_board(seed);
        let before = board.slots().to_vec();

        prop_assert_eq!(click_tile(&mut board, a), SelectionOutcome::Selected(a));
        prop_assert_eq!(click_tile(&mut board, a), SelectionOutcome::Deselected(a));
        prop_assert_eq!(board.slots(), &before[..]);
        prop_assert_eq!(board.selection(), None);
    }

    #[test]
    fn reset_always_solves(seed in any::<u64>(), rounds in 1usize..5) {
        let mut board = shuffled_board(seed);
        let mut seeds = RngSeed::new(seed.wrapping_add(1));
        for _ in 0..rounds {
            board.shuffle_slots(&mut seeds);
        }
        board.reset();
        prop_assert!(board.is_solved());
        prop_assert_eq!(board.selection(), None);
    }

    #[test]
    fn swap_preserves_slot_set(seed in any::<u64>(), a in 0usize..16, b in 0usize..16) {
        prop_assume!(a != b);
        let mut board = shuffled_board(seed);
        click_tile(&mut board, a);
        click_tile(&mut board, b);

        let mut slots = board.slots().to_vec();
        slots.sort_by_key(|r| (r.y, r.x));
        prop_assert_eq!(&slots[..], board.reference());
    }
}

#[test]
fn test_solved_is_positional_not_historical() {
    let mut board = Board::new(grid_rects(100, 4, 4, Point::new(100, 20)));

    // Rotate three tiles around and back again through a different path.
    click_tile(&mut board, 0);
    click_tile(&mut board, 1);
    click_tile(&mut board, 1);
    click_tile(&mut board, 2);
    assert!(!board.is_solved());

    click_tile(&mut board, 0);
    click_tile(&mut board, 2);
    assert!(!board.is_solved());
    click_tile(&mut board, 1);
    let outcome = click_tile(&mut board, 2);

    assert!(board.is_solved());
    assert!(matches!(outcome, SelectionOutcome::Swapped { solved: true, .. }));
    assert_eq!(board.slots(), board.reference());
}

#[test]
fn test_secondary_cancel_ignores_position() {
    let mut board = shuffled_board(4);
    click_tile(&mut board, 9);
    assert_eq!(board.selection(), Some(9));
    board.cancel_selection();
    assert_eq!(board.selection(), None);
}
