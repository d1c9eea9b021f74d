//! Pieces, kick table and rotation tests

use blockfall::core::kicks::{kick_offsets, KickFamily};
use blockfall::core::pieces::{get_shape, get_spawn_shape, shape_table};
use blockfall::core::{collides, rotate, Board, Piece, Position};
use blockfall::types::{Cell, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

// ============== Shape Tests ==============

#[test]
fn test_spawn_shapes() {
    assert_eq!(get_spawn_shape(PieceKind::I), [(0, -1), (0, 0), (0, 1), (0, 2)]);
    assert_eq!(get_spawn_shape(PieceKind::T), [(-1, 0), (0, 0), (1, 0), (0, 1)]);
    assert_eq!(get_spawn_shape(PieceKind::O), [(0, 0), (1, 0), (0, 1), (1, 1)]);
}

#[test]
fn test_i_s_z_repeat_first_two_states() {
    for kind in [PieceKind::I, PieceKind::S, PieceKind::Z] {
        assert_eq!(get_shape(kind, Rotation::North), get_shape(kind, Rotation::South));
        assert_eq!(get_shape(kind, Rotation::East), get_shape(kind, Rotation::West));
    }
}

#[test]
fn test_state_counts() {
    assert_eq!(shape_table(PieceKind::O).len(), 1);
    for kind in [
        PieceKind::I,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ] {
        assert_eq!(shape_table(kind).len(), 4);
    }
}

// ============== Kick Table Tests ==============

#[test]
fn test_kick_tables_cover_quarter_turns_only() {
    for family in [KickFamily::I, KickFamily::Jlstz] {
        for from in Rotation::ALL {
            assert!(kick_offsets(family, from, from.rotate_cw()).is_some());
            assert!(kick_offsets(family, from, from.rotate_ccw()).is_some());
            assert!(kick_offsets(family, from, from.rotate_cw().rotate_cw()).is_none());
        }
    }
}

#[test]
fn test_kick_families() {
    assert_eq!(KickFamily::of(PieceKind::O), None);
    assert_eq!(KickFamily::of(PieceKind::I), Some(KickFamily::I));
    assert_eq!(KickFamily::of(PieceKind::S), Some(KickFamily::Jlstz));
}

#[test]
fn test_every_kick_list_starts_in_place() {
    for family in [KickFamily::I, KickFamily::Jlstz] {
        for from in Rotation::ALL {
            let offsets = kick_offsets(family, from, from.rotate_cw()).unwrap();
            assert_eq!(offsets[0], (0, 0));
        }
    }
}

// ============== Collision Tests ==============

#[test]
fn test_walls_collide_in_every_state() {
    let board = Board::new();
    for kind in PieceKind::ALL {
        for rotation in Rotation::ALL {
            let piece = Piece { kind, rotation };
            for row in 0..BOARD_HEIGHT as i8 {
                // Far enough out that every shape has a cell past the wall.
                assert!(collides(&board, &piece, Position::new(-3, row)));
                assert!(collides(&board, &piece, Position::new(BOARD_WIDTH as i8 + 2, row)));
            }
            assert!(collides(&board, &piece, Position::new(4, BOARD_HEIGHT as i8 + 2)));
        }
    }
}

#[test]
fn test_filled_cells_collide() {
    let mut board = Board::new();
    board.set(4, 1, Cell::Filled(PieceKind::O));
    // T spawn covers (4, 1) with its stem.
    assert!(collides(&board, &Piece::new(PieceKind::T), Position::spawn()));
    assert!(!collides(&board, &Piece::new(PieceKind::T), Position::new(4, 5)));
}

// ============== Rotation Tests ==============

#[test]
fn test_rotation_is_deterministic() {
    let board = Board::from_ascii(&["##...#####", "#...######", "##.#######"]);
    let piece = Piece::new(PieceKind::T);
    let first = rotate(&board, &piece, Position::new(2, 16), true);
    for _ in 0..10 {
        assert_eq!(rotate(&board, &piece, Position::new(2, 16), true), first);
    }
}

#[test]
fn test_blocked_rotation_fails() {
    // I in a one-wide shaft cannot turn flat.
    let mut board = Board::new();
    for row in 0..BOARD_HEIGHT as i8 {
        for col in 0..BOARD_WIDTH as i8 {
            if col != 4 {
                board.set(col, row, Cell::Filled(PieceKind::Z));
            }
        }
    }
    let i = Piece::new(PieceKind::I);
    assert!(!collides(&board, &i, Position::new(4, 10)));
    assert_eq!(rotate(&board, &i, Position::new(4, 10), true), None);
    assert_eq!(rotate(&board, &i, Position::new(4, 10), false), None);
}

#[test]
fn test_counter_clockwise_uses_its_own_entry() {
    let board = Board::new();
    let t = Piece::new(PieceKind::T);
    let (rotated, pos) = rotate(&board, &t, Position::new(4, 5), false).unwrap();
    assert_eq!(rotated.rotation, Rotation::West);
    assert_eq!(pos, Position::new(4, 5));
}

#[test]
fn test_i_kick_off_right_wall() {
    let board = Board::new();
    // Vertical I against the right wall; flat needs col-1..=col+2.
    let i = Piece::new(PieceKind::I);
    let (rotated, pos) = rotate(&board, &i, Position::new(9, 5), true).unwrap();
    assert_eq!(rotated.rotation, Rotation::East);
    // In place collides for N->E; the (-2, 0) candidate fits.
    assert_eq!(pos, Position::new(7, 5));
}
