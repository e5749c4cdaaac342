//! Board tests - grid access, collision and line clearing

use blockfall::core::{Board, Tetromino};
use blockfall::types::{PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

#[test]
fn test_board_new_empty() {
    let board = Board::default();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);

    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert_eq!(board.get(x, y), Some(None), "cell ({}, {})", x, y);
        }
    }
    assert_eq!(board.filled_count(), 0);
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new(8, 12);

    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(8, 0), None);
    assert_eq!(board.get(0, 12), None);
    assert!(board.is_out_of_bounds(8, 11));
    assert!(!board.is_out_of_bounds(7, 11));
}

#[test]
fn test_board_set_and_get() {
    let mut board = Board::default();

    assert!(board.set(5, 10, Some(PieceKind::T)));
    assert_eq!(board.get(5, 10), Some(Some(PieceKind::T)));
    assert!(board.is_occupied(5, 10));

    assert!(board.set(5, 10, None));
    assert!(!board.is_occupied(5, 10));

    assert!(!board.set(-1, 0, Some(PieceKind::I)));
    assert!(!board.set(0, BOARD_HEIGHT as i8, Some(PieceKind::I)));
}

#[test]
fn test_above_board_is_open_space() {
    let board = Board::default();

    // Rows above the top only check horizontal bounds
    assert!(board.accepts(0, -2));
    assert!(board.accepts(9, -1));
    assert!(!board.accepts(-1, -1));
    assert!(!board.accepts(10, -1));
    assert!(!board.accepts(0, 20));
}

#[test]
fn test_valid_position_against_walls_and_blocks() {
    let mut board = Board::default();
    let t = Tetromino::spawn(PieceKind::T, BOARD_WIDTH);

    assert!(board.is_valid_position(&t, 0, 0, None));
    // T North spans three columns starting at x=3
    assert!(board.is_valid_position(&t, -3, 0, None));
    assert!(!board.is_valid_position(&t, -4, 0, None));
    assert!(board.is_valid_position(&t, 4, 0, None));
    assert!(!board.is_valid_position(&t, 5, 0, None));

    // Rotation override uses the target mask without touching the piece
    assert!(board.is_valid_position(&t, 0, 0, Some(Rotation::East)));
    assert_eq!(t.rotation, Rotation::North);

    // Every rotation except North reaches (4, 2)
    board.set(4, 2, Some(PieceKind::O));
    assert!(board.is_valid_position(&t, 0, 0, None));
    assert!(!board.is_valid_position(&t, 0, 1, None));
    assert!(!board.is_valid_position(&t, 0, 0, Some(Rotation::East)));
}

#[test]
fn test_lock_piece_discards_cells_above_board() {
    let mut board = Board::default();
    let mut i = Tetromino::spawn(PieceKind::I, BOARD_WIDTH);
    i.rotation = Rotation::East;
    i.y = -2;

    // Vertical I at rows -2..=1, column 5
    let written = board.lock_piece(&i);
    assert_eq!(written, 2);
    assert_eq!(board.filled_count(), 2);
    assert_eq!(board.get(5, 0), Some(Some(PieceKind::I)));
    assert_eq!(board.get(5, 1), Some(Some(PieceKind::I)));
}

#[test]
fn test_clear_lines_none() {
    let mut board = Board::default();
    board.fill_row_except(19, PieceKind::J, &[4]);
    assert_eq!(board.clear_lines(), 0);
    assert_eq!(board.filled_count(), 9);
}

#[test]
fn test_clear_lines_shifts_rows_down() {
    let mut board = Board::default();
    board.fill_row_except(19, PieceKind::I, &[]);
    board.fill_row_except(18, PieceKind::I, &[]);
    board.set(0, 17, Some(PieceKind::T));

    assert_eq!(board.clear_lines(), 2);
    assert_eq!(board.get(0, 19), Some(Some(PieceKind::T)));
    assert_eq!(board.filled_count(), 1);
}

#[test]
fn test_clear_lines_non_adjacent() {
    let mut board = Board::default();
    board.fill_row_except(19, PieceKind::L, &[]);
    board.fill_row_except(18, PieceKind::S, &[2]);
    board.fill_row_except(17, PieceKind::L, &[]);
    board.fill_row_except(16, PieceKind::Z, &[7]);

    assert_eq!(board.clear_lines(), 2);

    // Survivors keep their relative order
    assert_eq!(board.get(2, 19), Some(None));
    assert_eq!(board.get(0, 19), Some(Some(PieceKind::S)));
    assert_eq!(board.get(7, 18), Some(None));
    assert_eq!(board.get(0, 18), Some(Some(PieceKind::Z)));
    assert!(board.row(17).unwrap().iter().all(|c| c.is_none()));
}

#[test]
fn test_clear_four_lines() {
    let mut board = Board::new(6, 8);
    for y in 4..8 {
        board.fill_row_except(y, PieceKind::I, &[]);
    }
    assert_eq!(board.clear_lines(), 4);
    assert_eq!(board.filled_count(), 0);
}

#[test]
fn test_rows_iterate_top_to_bottom() {
    let mut board = Board::new(4, 5);
    board.set(1, 4, Some(PieceKind::O));

    let rows: Vec<&[_]> = board.rows().collect();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[4][1], Some(PieceKind::O));
    assert!(rows[0].iter().all(|c| c.is_none()));
}

#[test]
fn test_clear_resets_everything() {
    let mut board = Board::default();
    board.fill_row_except(10, PieceKind::T, &[]);
    board.clear();
    assert_eq!(board.filled_count(), 0);
}
