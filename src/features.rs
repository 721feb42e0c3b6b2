//! Board state -> tensor encoding for neural network training data.
//!
//! Produces a `[NUM_FEATURE_PLANES, height, width]` f32 plane stack and a
//! `[NUM_FEATURE_SCALARS]` scalar vector, both relative to a caller-supplied
//! perspective color. Every channel is a pure function of the board, so
//! encoding the same position twice yields bit-identical tensors. The
//! channel layout below is a stable contract consumed positionally by
//! downstream model code.
//!
//! Plane layout (one `height` x `width` map per channel):
//!   0       own stones
//!   1       opponent stones
//!   2       empty intersections
//!   3..6    own stones in groups with 1, 2, 3, >=4 liberties
//!   7..10   opponent stones in groups with 1, 2, 3, >=4 liberties
//!   11..15  one-hot location of the last 5 moves (11 = most recent;
//!           passes and not-yet-played slots leave the plane zero)
//!   16      legal moves for the perspective color (full rule check,
//!           ko and superko included)
//!   17      the simple-ko forbidden point
//!
//! Scalar layout:
//!   0       komi from the perspective's side, / 15 (positive = favors it)
//!   1       move count / board area, clamped to 1
//!   2       last move was a pass
//!   3       second-to-last move was a pass
//!   4       ko rule: simple 0.0, positional superko 0.5, situational 1.0
//!   5       suicide allowed under the rule set
//!   6       scoring: area 0.0, territory 1.0
//!   7       capture balance (own minus opponent captures) / board area

use ndarray::{Array1, Array3};

use crate::board::Board;
use crate::constants::KOMI_NORMALIZATION;
use crate::rules::{KoRule, ScoringRule, SuicideRule};
use crate::types::{Color, Coord, Move};

/// Number of spatial feature channels. Invariant across calls and board
/// sizes; planes are sized to the board's height x width.
pub const NUM_FEATURE_PLANES: usize = 18;

/// Number of scalar features. Invariant across calls and board sizes.
pub const NUM_FEATURE_SCALARS: usize = 8;

const PLANE_OWN: usize = 0;
const PLANE_OPPONENT: usize = 1;
const PLANE_EMPTY: usize = 2;
const PLANE_OWN_LIBS: usize = 3;
const PLANE_OPPONENT_LIBS: usize = 7;
const LIBERTY_BUCKETS: usize = 4;
const PLANE_HISTORY: usize = 11;
const HISTORY_LENGTH: usize = 5;
const PLANE_LEGAL: usize = 16;
const PLANE_KO: usize = 17;

/// Encodes the spatial feature planes of `board` from the point of view of
/// `perspective`.
///
/// # Panics
/// Panics when `perspective` is not a player color.
pub fn encode_planes(board: &Board, perspective: Color) -> Array3<f32> {
    assert!(perspective.is_stone(), "perspective must be Black or White");
    let (w, h) = (board.width(), board.height());
    let mut planes = Array3::zeros((NUM_FEATURE_PLANES, h, w));

    for y in 0..h {
        for x in 0..w {
            let coord = Coord::new(x, y);
            match board.color_at(coord) {
                Color::Empty => planes[[PLANE_EMPTY, y, x]] = 1.0,
                stone => {
                    let base = if stone == perspective {
                        planes[[PLANE_OWN, y, x]] = 1.0;
                        PLANE_OWN_LIBS
                    } else {
                        planes[[PLANE_OPPONENT, y, x]] = 1.0;
                        PLANE_OPPONENT_LIBS
                    };
                    // Settled positions never hold zero-liberty groups, but
                    // raw setup stones can; those count with the 1-liberty
                    // bucket rather than poisoning the encoding.
                    let bucket = board.liberties_of(coord).min(LIBERTY_BUCKETS).saturating_sub(1);
                    planes[[base + bucket, y, x]] = 1.0;
                }
            }
        }
    }

    for (age, mv) in board.history().iter().rev().take(HISTORY_LENGTH).enumerate() {
        if let Some(coord) = mv.coord {
            planes[[PLANE_HISTORY + age, coord.y, coord.x]] = 1.0;
        }
    }

    for coord in board.legal_moves(perspective) {
        planes[[PLANE_LEGAL, coord.y, coord.x]] = 1.0;
    }

    if let Some(ko) = board.ko_point() {
        planes[[PLANE_KO, ko.y, ko.x]] = 1.0;
    }

    planes
}

/// Encodes the scalar feature vector of `board` from the point of view of
/// `perspective`.
///
/// # Panics
/// Panics when `perspective` is not a player color.
pub fn encode_scalars(board: &Board, perspective: Color) -> Array1<f32> {
    assert!(perspective.is_stone(), "perspective must be Black or White");
    let area = (board.width() * board.height()) as f32;
    let opponent = perspective.opposite();
    let mut scalars = Array1::zeros(NUM_FEATURE_SCALARS);

    // Komi compensates White, so it counts toward a White perspective.
    scalars[0] = match perspective {
        Color::White => board.komi(),
        _ => -board.komi(),
    } / KOMI_NORMALIZATION;

    scalars[1] = (board.move_count() as f32 / area).min(1.0);

    let history = board.history();
    scalars[2] = pass_flag(history.last());
    scalars[3] = pass_flag(history.len().checked_sub(2).and_then(|i| history.get(i)));

    let rules = board.ruleset();
    scalars[4] = match rules.ko_rule {
        KoRule::Simple => 0.0,
        KoRule::PositionalSuperko => 0.5,
        KoRule::SituationalSuperko => 1.0,
    };
    scalars[5] = match rules.suicide_rule {
        SuicideRule::Allowed => 1.0,
        SuicideRule::Disallowed => 0.0,
    };
    scalars[6] = match rules.scoring_rule {
        ScoringRule::Area => 0.0,
        ScoringRule::Territory => 1.0,
    };

    scalars[7] =
        (board.captures(perspective) as f32 - board.captures(opponent) as f32) / area;

    scalars
}

fn pass_flag(mv: Option<&Move>) -> f32 {
    match mv {
        Some(mv) if mv.is_pass() => 1.0,
        _ => 0.0,
    }
}
