//! Go board state and move execution.
//!
//! This module provides the rules layer on top of [`crate::grid`]:
//! - move legality (occupied intersections, suicide, ko and superko)
//! - capture execution and ko-point bookkeeping
//! - pre-game setup stones that bypass legality
//! - the read-only query surface consumed by feature encoding
//!
//! A [`Board`] is exclusively owned by one replay session. Calls are
//! synchronous and CPU-bound; there is no internal locking, and the natural
//! unit of parallelism is one board per game.

use std::fmt;

use thiserror::Error;

use crate::constants::DEFAULT_KOMI;
use crate::grid::Grid;
use crate::rules::{KoRule, Ruleset};
use crate::types::{Color, Coord, Move};
use crate::zobrist;

/// Why a move is rejected. Illegal moves never mutate board state, so a
/// replay driver can stop cleanly at the first bad move of a corrupt
/// record instead of crashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("illegal move: intersection is occupied")]
    Occupied,
    #[error("illegal move: suicide")]
    Suicide,
    #[error("illegal move: retakes ko")]
    Ko,
}

/// Legality verdict for a candidate move, derived without mutating state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveLegality {
    Legal,
    Occupied,
    Suicide,
    Ko,
}

/// A Go position: grid plus replay state (turn, ko, history, captures).
#[derive(Clone, Debug)]
pub struct Board {
    grid: Grid,
    komi: f32,
    ruleset: Ruleset,
    to_play: Color,
    move_count: usize,
    ko: Option<Coord>,
    history: Vec<Move>,
    /// Stones captured by Black and by White.
    captures: [usize; 2],
    num_setup_stones: usize,
    position_hash: u64,
    /// One entry per reached position (the seed entry is the setup
    /// position): positional hash plus the player to move from it.
    hash_history: Vec<(u64, Color)>,
}

impl Default for Board {
    /// A full-size 19x19 board with default komi, Tromp-Taylor rules.
    fn default() -> Self {
        Board::new(19, 19, DEFAULT_KOMI)
    }
}

impl Board {
    /// Creates an empty board under Tromp-Taylor rules.
    ///
    /// # Panics
    /// Panics when either dimension is outside the supported range
    /// (2 through 19).
    pub fn new(width: usize, height: usize, komi: f32) -> Self {
        Self::with_rules(width, height, komi, Ruleset::default())
    }

    /// Creates an empty board under the given rule set.
    pub fn with_rules(width: usize, height: usize, komi: f32, ruleset: Ruleset) -> Self {
        Board {
            grid: Grid::new(width, height),
            komi,
            ruleset,
            to_play: Color::Black,
            move_count: 0,
            ko: None,
            history: Vec::new(),
            captures: [0, 0],
            num_setup_stones: 0,
            position_hash: 0,
            hash_history: vec![(0, Color::Black)],
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn komi(&self) -> f32 {
        self.komi
    }

    pub fn ruleset(&self) -> Ruleset {
        self.ruleset
    }

    pub fn to_play(&self) -> Color {
        self.to_play
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// The simple-ko forbidden point, if the previous move created one.
    pub fn ko_point(&self) -> Option<Coord> {
        self.ko
    }

    /// All moves played so far, oldest first. Setup stones are not moves
    /// and do not appear here.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().copied()
    }

    /// Number of stones `color` has captured so far.
    pub fn captures(&self, color: Color) -> usize {
        match color {
            Color::Black => self.captures[0],
            Color::White => self.captures[1],
            Color::Empty => panic!("Empty does not capture"),
        }
    }

    pub fn num_setup_stones(&self) -> usize {
        self.num_setup_stones
    }

    /// Positional Zobrist hash of the stones currently on the board.
    pub fn position_hash(&self) -> u64 {
        self.position_hash
    }

    /// Color of the intersection at `coord`.
    ///
    /// # Panics
    /// Panics when `coord` lies outside the board.
    pub fn color_at(&self, coord: Coord) -> Color {
        self.grid.color_at(coord)
    }

    /// Liberty count of the group at `coord` (0 for an empty intersection).
    pub fn liberties_of(&self, coord: Coord) -> usize {
        self.grid.liberties_of(coord)
    }

    /// Members of the group at `coord` (empty for an empty intersection).
    pub fn group_of(&self, coord: Coord) -> Vec<Coord> {
        self.grid.group_of(coord)
    }

    /// Places a pre-game stone, bypassing legality, ko, and history
    /// bookkeeping; `Color::Empty` erases. Used for handicap and `AB`/`AW`/
    /// `AE` setup properties.
    ///
    /// # Panics
    /// Panics when called after normal play has begun, or on a pass.
    pub fn setup_stone(&mut self, mv: Move) {
        assert!(
            self.move_count == 0,
            "setup stones must precede all moves"
        );
        let coord = mv.coord.expect("setup stones carry a coordinate");
        self.grid.set_cell(coord, mv.color);
        self.grid.rebuild_groups();
        self.num_setup_stones += 1;
        self.position_hash = self.full_hash();
        self.hash_history[0] = (self.position_hash, self.to_play);
    }

    /// Classifies a candidate move without mutating any state. `play`
    /// shares this exact logic, so a `Legal` verdict here is a guarantee
    /// that `play` will succeed on the unchanged board.
    pub fn move_legality(&self, mv: Move) -> MoveLegality {
        assert!(mv.color.is_stone(), "moves must be Black or White");
        let Some(coord) = mv.coord else {
            return MoveLegality::Legal;
        };
        if self.grid.color_at(coord) != Color::Empty {
            return MoveLegality::Occupied;
        }
        if self.ko == Some(coord) {
            return MoveLegality::Ko;
        }
        if self.is_suicide(coord, mv.color) {
            return MoveLegality::Suicide;
        }
        if self.ruleset.ko_rule != KoRule::Simple && self.recreates_earlier_position(coord, mv.color)
        {
            return MoveLegality::Ko;
        }
        MoveLegality::Legal
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.move_legality(mv) == MoveLegality::Legal
    }

    /// Every coordinate on which `color` may currently play.
    pub fn legal_moves(&self, color: Color) -> Vec<Coord> {
        let mut moves = Vec::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                let coord = Coord::new(x, y);
                if self.grid.color_at(coord) == Color::Empty
                    && self.is_legal(Move::place(color, coord))
                {
                    moves.push(coord);
                }
            }
        }
        moves
    }

    /// Plays a move, performing captures and ko bookkeeping.
    ///
    /// A pass always succeeds, clears any ko restriction, and advances the
    /// turn. Placements are checked for occupancy, suicide, and ko (plus
    /// superko when the rule set demands it) before any mutation, so a
    /// rejected move leaves the board bit-identical.
    ///
    /// The move carries its own color: records may contain consecutive
    /// same-color moves (handicap games), so the engine does not enforce
    /// alternation. After the move, the opponent is to play.
    pub fn play(&mut self, mv: Move) -> Result<(), MoveError> {
        match self.move_legality(mv) {
            MoveLegality::Legal => {}
            MoveLegality::Occupied => return Err(MoveError::Occupied),
            MoveLegality::Suicide => return Err(MoveError::Suicide),
            MoveLegality::Ko => return Err(MoveError::Ko),
        }

        if let Some(coord) = mv.coord {
            let report = self.grid.place(coord, mv.color);

            self.position_hash ^= zobrist::stone_key(coord, mv.color);
            let enemy = mv.color.opposite();
            for &captured in &report.captured {
                self.position_hash ^= zobrist::stone_key(captured, enemy);
            }
            match mv.color {
                Color::Black => self.captures[0] += report.captured.len(),
                _ => self.captures[1] += report.captured.len(),
            }

            // Simple ko: a single-stone capture by a lone stone whose only
            // liberty is the vacated point forbids the immediate recapture.
            self.ko = if report.captured.len() == 1
                && report.liberties == 1
                && self.grid.group_size(coord) == 1
            {
                Some(report.captured[0])
            } else {
                None
            };
        } else {
            self.ko = None;
        }

        self.to_play = mv.color.opposite();
        self.move_count += 1;
        self.history.push(mv);
        self.hash_history.push((self.position_hash, self.to_play));
        Ok(())
    }

    /// True when placing `color` at `coord` would leave its own group
    /// without liberties even after captures.
    fn is_suicide(&self, coord: Coord, color: Color) -> bool {
        let v = self.grid.vertex_of(coord);
        for nv in self.grid.neighbors_of(v) {
            if self.grid.is_empty_vertex(nv) {
                return false;
            }
            match self.grid.stone_at_vertex(nv) {
                Some(c) if c == color => {
                    // A friendly group keeps a liberty besides this point.
                    if self.grid.group_libs_at_rep(self.grid.rep_of_vertex(nv)) > 1 {
                        return false;
                    }
                }
                Some(_) => {
                    // An enemy group in atari here gets captured, freeing
                    // at least the vacated point.
                    if self.grid.group_libs_at_rep(self.grid.rep_of_vertex(nv)) == 1 {
                        return false;
                    }
                }
                None => {}
            }
        }
        true
    }

    /// Positional hash of the board as it would stand after `color` plays
    /// at `coord`, captures included, computed without mutation.
    fn post_move_hash(&self, coord: Coord, color: Color) -> u64 {
        let v = self.grid.vertex_of(coord);
        let enemy = color.opposite();
        let mut hash = self.position_hash ^ zobrist::stone_key(coord, color);
        let mut seen_reps: Vec<usize> = Vec::with_capacity(4);
        for nv in self.grid.neighbors_of(v) {
            if self.grid.stone_at_vertex(nv) != Some(enemy) {
                continue;
            }
            let rep = self.grid.rep_of_vertex(nv);
            if seen_reps.contains(&rep) {
                continue;
            }
            seen_reps.push(rep);
            // An adjacent enemy group holding exactly one liberty must hold
            // this very point, so the placement captures it whole.
            if self.grid.group_libs_at_rep(rep) == 1 {
                for member in self.grid.group_members_at(nv) {
                    hash ^= zobrist::stone_key(self.grid.coord_of(member), enemy);
                }
            }
        }
        hash
    }

    fn recreates_earlier_position(&self, coord: Coord, color: Color) -> bool {
        let hash = self.post_move_hash(coord, color);
        let next = color.opposite();
        match self.ruleset.ko_rule {
            KoRule::Simple => false,
            KoRule::PositionalSuperko => self.hash_history.iter().any(|&(h, _)| h == hash),
            KoRule::SituationalSuperko => {
                self.hash_history.iter().any(|&(h, p)| h == hash && p == next)
            }
        }
    }

    fn full_hash(&self) -> u64 {
        let mut hash = 0;
        for y in 0..self.height() {
            for x in 0..self.width() {
                let coord = Coord::new(x, y);
                match self.grid.color_at(coord) {
                    Color::Empty => {}
                    stone => hash ^= zobrist::stone_key(coord, stone),
                }
            }
        }
        hash
    }
}

/// Column letter in board coordinates, skipping 'I' per Go convention.
fn column_letter(x: usize) -> char {
    let mut c = b'A' + x as u8;
    if c >= b'I' {
        c += 1;
    }
    c as char
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self.last_move().and_then(|mv| mv.coord);
        write!(f, "  ")?;
        for x in 0..self.width() {
            write!(f, " {} ", column_letter(x))?;
        }
        writeln!(f)?;
        for y in 0..self.height() {
            write!(f, "{:>2}", self.height() - y)?;
            for x in 0..self.width() {
                let coord = Coord::new(x, y);
                let stone = match self.color_at(coord) {
                    Color::Black => "X",
                    Color::White => "O",
                    Color::Empty => ".",
                };
                if last == Some(coord) {
                    write!(f, "[{stone}]")?;
                } else {
                    write!(f, " {stone} ")?;
                }
            }
            writeln!(f, "{:>2}", self.height() - y)?;
        }
        write!(f, "  ")?;
        for x in 0..self.width() {
            write!(f, " {} ", column_letter(x))?;
        }
        writeln!(f)
    }
}
