//! Integration tests for kifu-gen.
//!
//! End-to-end coverage of the record -> replay -> feature pipeline, plus
//! randomized invariant checks of the incremental group tracker against an
//! independent flood-fill oracle.

use std::collections::BTreeSet;

use kifu_gen::board::{Board, MoveError};
use kifu_gen::features::{
    encode_planes, encode_scalars, NUM_FEATURE_PLANES, NUM_FEATURE_SCALARS,
};
use kifu_gen::sgf::{self, GameRecord, LoadError, RecordFault};
use kifu_gen::types::{Color, Coord, GameResult, Move};

// =============================================================================
// Helpers
// =============================================================================

fn c(x: usize, y: usize) -> Coord {
    Coord::new(x, y)
}

fn b(x: usize, y: usize) -> Move {
    Move::place(Color::Black, Coord::new(x, y))
}

fn w(x: usize, y: usize) -> Move {
    Move::place(Color::White, Coord::new(x, y))
}

fn on_board_neighbors(board: &Board, p: Coord) -> Vec<Coord> {
    let mut out = Vec::new();
    if p.x > 0 {
        out.push(c(p.x - 1, p.y));
    }
    if p.x + 1 < board.width() {
        out.push(c(p.x + 1, p.y));
    }
    if p.y > 0 {
        out.push(c(p.x, p.y - 1));
    }
    if p.y + 1 < board.height() {
        out.push(c(p.x, p.y + 1));
    }
    out
}

/// Flood-fill oracle: recomputes a stone's group and liberty set from
/// nothing but per-cell colors, independently of the incremental tracker.
fn oracle_group(board: &Board, start: Coord) -> (Vec<Coord>, BTreeSet<Coord>) {
    let color = board.color_at(start);
    assert!(color.is_stone());
    let mut members = Vec::new();
    let mut libs = BTreeSet::new();
    let mut seen = BTreeSet::new();
    let mut stack = vec![start];
    seen.insert(start);
    while let Some(p) = stack.pop() {
        members.push(p);
        for n in on_board_neighbors(board, p) {
            match board.color_at(n) {
                Color::Empty => {
                    libs.insert(n);
                }
                other if other == color => {
                    if seen.insert(n) {
                        stack.push(n);
                    }
                }
                _ => {}
            }
        }
    }
    members.sort();
    (members, libs)
}

/// Every occupied intersection belongs to exactly one group whose liberty
/// set equals the empty intersections adjacent to its members.
fn assert_group_invariants(board: &Board) {
    for y in 0..board.height() {
        for x in 0..board.width() {
            let p = c(x, y);
            if !board.color_at(p).is_stone() {
                assert_eq!(board.liberties_of(p), 0);
                assert!(board.group_of(p).is_empty());
                continue;
            }
            let (members, libs) = oracle_group(board, p);
            let mut reported = board.group_of(p);
            reported.sort();
            assert_eq!(reported, members, "group mismatch at {p}");
            assert_eq!(board.liberties_of(p), libs.len(), "liberty mismatch at {p}");
        }
    }
}

fn stone_count(board: &Board) -> usize {
    let mut count = 0;
    for y in 0..board.height() {
        for x in 0..board.width() {
            if board.color_at(c(x, y)).is_stone() {
                count += 1;
            }
        }
    }
    count
}

// =============================================================================
// End-to-end record scenarios
// =============================================================================

#[test]
fn three_move_record_replays_cleanly() {
    let record = "(;GM[1]FF[4]SZ[9]KM[6.5]RU[Chinese]RE[B+2.5];B[ee];W[ce];B[cc])";
    let game = sgf::load_game(record).unwrap();
    assert!(game.record.is_valid());

    let mut board = game.board;
    sgf::replay(&mut board, &game.moves, |_, _| {}).unwrap();

    assert_eq!(board.move_count(), 3);
    assert_eq!(stone_count(&board), 3);
    assert_eq!(board.captures(Color::Black), 0);
    assert_eq!(board.captures(Color::White), 0);
    assert_eq!(board.ko_point(), None);
    assert_eq!(board.color_at(c(4, 4)), Color::Black);
    assert_eq!(board.color_at(c(2, 4)), Color::White);
    assert_eq!(board.color_at(c(2, 2)), Color::Black);
}

#[test]
fn record_ending_in_ko_recapture_is_rejected() {
    // The final W[bb] captures the lone black stone at cb; the immediate
    // B[cb] recapture would recreate the previous position.
    let record = "(;SZ[5]KM[7.5]RU[Chinese]RE[B+1.5]\
                  ;B[ba];W[ca];B[ab];W[db];B[bc];W[cc];B[cb];W[bb];B[cb])";
    let game = sgf::load_game(record).unwrap();
    let mut board = game.board;
    let err = sgf::replay(&mut board, &game.moves, |_, _| {}).unwrap_err();
    match err {
        LoadError::IllegalMove { index, source } => {
            assert_eq!(index, 8);
            assert_eq!(source, MoveError::Ko);
        }
        other => panic!("unexpected error: {other}"),
    }
    // The board stops at the last good position.
    assert_eq!(board.move_count(), 8);
    assert_eq!(board.ko_point(), Some(c(2, 1)));
}

#[test]
fn ko_recapture_after_exchange_elsewhere_is_accepted() {
    let record = "(;SZ[5]KM[7.5]RU[Chinese]RE[B+1.5]\
                  ;B[ba];W[ca];B[ab];W[db];B[bc];W[cc];B[cb];W[bb];B[ee];W[ed];B[cb])";
    let game = sgf::load_game(record).unwrap();
    let mut board = game.board;
    sgf::replay(&mut board, &game.moves, |_, _| {}).unwrap();
    assert_eq!(board.move_count(), 11);
    // Black retook the ko: the white ko stone is gone again.
    assert_eq!(board.color_at(c(1, 1)), Color::Empty);
    assert_eq!(board.color_at(c(2, 1)), Color::Black);
}

#[test]
fn superko_rules_flow_from_record_to_board() {
    // Same ko fight, but under a positional-superko rule string. Passing
    // clears the simple-ko point, yet the recapture would recreate the
    // pre-capture whole-board position and stays forbidden.
    let record = "(;SZ[5]KM[7.5]RU[koPOSITIONALscoreAREAsui1]RE[B+1.5]\
                  ;B[ba];W[ca];B[ab];W[db];B[bc];W[cc];B[cb];W[bb])";
    let game = sgf::load_game(record).unwrap();
    let mut board = game.board;
    sgf::replay(&mut board, &game.moves, |_, _| {}).unwrap();

    board.play(Move::pass(Color::Black)).unwrap();
    board.play(Move::pass(Color::White)).unwrap();
    assert_eq!(board.play(b(2, 1)), Err(MoveError::Ko));
}

#[test]
fn oversized_record_is_invalid_and_unreplayable() {
    let record = "(;SZ[25]KM[6.5]RU[Chinese]RE[B+1.5];B[aa];W[bb])";
    let parsed = GameRecord::parse(record).unwrap();
    assert!(!parsed.is_valid());
    assert_eq!(
        parsed.fault,
        Some(RecordFault::UnsupportedSize {
            width: 25,
            height: 25
        })
    );

    match sgf::load_game(record) {
        Err(LoadError::InvalidRecord(RecordFault::UnsupportedSize { .. })) => {}
        other => panic!("expected invalid-record error, got {other:?}"),
    }
}

#[test]
fn handicap_record_with_setup_stones() {
    let record = "(;SZ[9]KM[0.5]HA[2]RU[Japanese]RE[W+3.5]AB[cc][gg];W[ee];W[ge];B[ce])";
    let game = sgf::load_game(record).unwrap();
    assert_eq!(game.record.handicap, 2);

    let mut board = game.board;
    assert_eq!(board.color_at(c(2, 2)), Color::Black);
    assert_eq!(board.color_at(c(6, 6)), Color::Black);
    assert_eq!(board.num_setup_stones(), 2);

    // White moves twice in a row here; records drive the colors.
    sgf::replay(&mut board, &game.moves, |_, _| {}).unwrap();
    assert_eq!(board.move_count(), 3);
    assert_eq!(stone_count(&board), 5);
}

#[test]
fn variation_branches_are_ignored() {
    let record = "(;SZ[9]KM[6.5]RU[Chinese]RE[B+0.5];B[aa];W[bb](;B[cc])(;B[dd];W[ee]))";
    let game = sgf::load_game(record).unwrap();
    let mut board = game.board;
    sgf::replay(&mut board, &game.moves, |_, _| {}).unwrap();
    // Main line is B[aa] W[bb] B[cc]; the sibling branch never plays.
    assert_eq!(board.move_count(), 3);
    assert_eq!(board.color_at(c(2, 2)), Color::Black);
    assert_eq!(board.color_at(c(3, 3)), Color::Empty);
}

// =============================================================================
// Tracker invariants under randomized play
// =============================================================================

#[test]
fn group_invariants_hold_through_random_games() {
    fastrand::seed(0x5eed);
    for _ in 0..3 {
        let mut board = Board::new(9, 9, 7.5);
        for _ in 0..120 {
            let color = board.to_play();
            let candidates = board.legal_moves(color);
            if candidates.is_empty() {
                break;
            }
            let coord = candidates[fastrand::usize(..candidates.len())];
            board.play(Move::place(color, coord)).unwrap();

            // Captures are exhaustive and the move is never suicide.
            assert!(board.liberties_of(coord) >= 1);
            for n in on_board_neighbors(&board, coord) {
                if board.color_at(n).is_stone() {
                    assert!(board.liberties_of(n) >= 1);
                }
            }
        }
        assert_group_invariants(&board);
    }
}

#[test]
fn invariants_hold_at_every_step_of_a_short_game() {
    fastrand::seed(0x60a7);
    let mut board = Board::new(5, 5, 7.5);
    for _ in 0..40 {
        let color = board.to_play();
        let candidates = board.legal_moves(color);
        if candidates.is_empty() {
            break;
        }
        let coord = candidates[fastrand::usize(..candidates.len())];
        board.play(Move::place(color, coord)).unwrap();
        assert_group_invariants(&board);
    }
}

// =============================================================================
// Feature encoding over replayed games
// =============================================================================

#[test]
fn features_are_stable_and_fixed_shape_across_replay() {
    let record = "(;SZ[9]KM[6.5]RU[Chinese]RE[B+2.5];B[ee];W[ce];B[cc];W[cd];B[dc])";
    let game = sgf::load_game(record).unwrap();
    let mut board = game.board;

    sgf::replay(&mut board, &game.moves, |_, board| {
        for perspective in [Color::Black, Color::White] {
            let planes = encode_planes(board, perspective);
            assert_eq!(
                planes.shape(),
                &[NUM_FEATURE_PLANES, board.height(), board.width()]
            );
            assert_eq!(planes, encode_planes(board, perspective));

            let scalars = encode_scalars(board, perspective);
            assert_eq!(scalars.len(), NUM_FEATURE_SCALARS);
            assert_eq!(scalars, encode_scalars(board, perspective));
        }
    })
    .unwrap();
}

#[test]
fn rejected_moves_leave_features_bit_identical() {
    let mut board = Board::new(5, 5, 7.5);
    for mv in [b(1, 0), w(2, 0), b(0, 1), w(3, 1), b(1, 2), w(2, 2), b(2, 1), w(1, 1)] {
        board.play(mv).unwrap();
    }
    assert_eq!(board.ko_point(), Some(c(2, 1)));

    let planes_before = encode_planes(&board, Color::Black);
    let scalars_before = encode_scalars(&board, Color::Black);

    assert_eq!(board.play(b(2, 1)), Err(MoveError::Ko));
    assert_eq!(board.play(b(1, 1)), Err(MoveError::Occupied));

    assert_eq!(planes_before, encode_planes(&board, Color::Black));
    assert_eq!(scalars_before, encode_scalars(&board, Color::Black));
}

#[test]
fn legality_plane_respects_ko() {
    let mut board = Board::new(5, 5, 7.5);
    for mv in [b(1, 0), w(2, 0), b(0, 1), w(3, 1), b(1, 2), w(2, 2), b(2, 1), w(1, 1)] {
        board.play(mv).unwrap();
    }
    let ko = board.ko_point().unwrap();
    let planes = encode_planes(&board, Color::Black);
    assert_eq!(planes[[16, ko.y, ko.x]], 0.0);
    // The ko plane marks exactly that point.
    assert_eq!(planes[[17, ko.y, ko.x]], 1.0);
}

#[test]
fn rectangular_boards_encode_their_own_shape() {
    let record = "(;SZ[9:13]KM[7]RU[Japanese]RE[B+4.5];B[ah];W[bh])";
    let game = sgf::load_game(record).unwrap();
    let mut board = game.board;
    sgf::replay(&mut board, &game.moves, |_, _| {}).unwrap();
    let planes = encode_planes(&board, Color::Black);
    assert_eq!(planes.shape(), &[NUM_FEATURE_PLANES, 13, 9]);
}

// =============================================================================
// Result conventions
// =============================================================================

#[test]
fn result_margins_favor_black_when_positive() {
    let game =
        sgf::load_game("(;SZ[9]KM[6.5]RU[Chinese]RE[W+12.5];B[ee])").unwrap();
    assert_eq!(game.record.result, GameResult::Score(-12.5));
    assert_eq!(game.record.result.signed_margin(), -12.5);

    let game = sgf::load_game("(;SZ[9]KM[6.5]RU[Chinese]RE[B+R];B[ee])").unwrap();
    assert_eq!(game.record.result, GameResult::Resignation(Color::Black));
    assert_eq!(game.record.result.signed_margin(), 1000.0);
}
