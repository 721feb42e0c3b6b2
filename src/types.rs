//! Core value types shared across the engine: stone colors, board
//! coordinates, moves, and game results.

use std::fmt;

/// State of an intersection, and the color attached to moves and setup
/// stones. `Empty` appears in moves only for `AE` setup erasure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Empty,
    Black,
    White,
}

impl Color {
    /// The opposing player color.
    ///
    /// # Panics
    /// Panics when called on `Empty`; only player colors have an opponent.
    pub fn opposite(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
            Color::Empty => panic!("Empty has no opposite color"),
        }
    }

    /// True for `Black` and `White`.
    pub fn is_stone(self) -> bool {
        matches!(self, Color::Black | Color::White)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Empty => write!(f, "Empty"),
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}

/// A zero-based board coordinate. `x` runs left to right, `y` runs top to
/// bottom, matching SGF letter order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub fn new(x: usize, y: usize) -> Self {
        Coord { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A single move: a stone placement or a pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub color: Color,
    /// `None` is a pass.
    pub coord: Option<Coord>,
}

impl Move {
    pub fn place(color: Color, coord: Coord) -> Self {
        Move {
            color,
            coord: Some(coord),
        }
    }

    pub fn pass(color: Color) -> Self {
        Move { color, coord: None }
    }

    pub fn is_pass(&self) -> bool {
        self.coord.is_none()
    }
}

/// Final outcome of a recorded game.
///
/// The sign convention is fixed: positive margins always favor Black,
/// negative margins favor White. Callers needing the conventional display
/// form (`B+3.5`, `W+R`) use the `Display` implementation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GameResult {
    /// Win by score margin; positive = Black leads.
    Score(f32),
    /// Win by the opponent resigning.
    Resignation(Color),
    /// Drawn or voided game.
    Draw,
    /// Result present but undetermined (`RE[?]`).
    Unknown,
}

impl GameResult {
    /// Collapses the result to the signed-float convention consumed by
    /// training pipelines: the margin as-is, `±1000.0` for resignations
    /// (positive for Black), and `0.0` for draws and unknowns.
    pub fn signed_margin(self) -> f32 {
        match self {
            GameResult::Score(margin) => margin,
            GameResult::Resignation(Color::Black) => crate::constants::RESIGNATION_MARGIN,
            GameResult::Resignation(_) => -crate::constants::RESIGNATION_MARGIN,
            GameResult::Draw | GameResult::Unknown => 0.0,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Score(m) if *m > 0.0 => write!(f, "B+{m}"),
            GameResult::Score(m) if *m < 0.0 => write!(f, "W+{}", -m),
            GameResult::Score(_) => write!(f, "0"),
            GameResult::Resignation(Color::Black) => write!(f, "B+R"),
            GameResult::Resignation(_) => write!(f, "W+R"),
            GameResult::Draw => write!(f, "0"),
            GameResult::Unknown => write!(f, "?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_colors() {
        assert_eq!(Color::Black.opposite(), Color::White);
        assert_eq!(Color::White.opposite(), Color::Black);
    }

    #[test]
    #[should_panic]
    fn opposite_of_empty_panics() {
        let _ = Color::Empty.opposite();
    }

    #[test]
    fn signed_margin_convention() {
        assert_eq!(GameResult::Score(2.5).signed_margin(), 2.5);
        assert_eq!(GameResult::Score(-6.5).signed_margin(), -6.5);
        assert_eq!(GameResult::Resignation(Color::Black).signed_margin(), 1000.0);
        assert_eq!(GameResult::Resignation(Color::White).signed_margin(), -1000.0);
        assert_eq!(GameResult::Draw.signed_margin(), 0.0);
    }

    #[test]
    fn result_display() {
        assert_eq!(GameResult::Score(2.5).to_string(), "B+2.5");
        assert_eq!(GameResult::Score(-0.5).to_string(), "W+0.5");
        assert_eq!(GameResult::Resignation(Color::White).to_string(), "W+R");
        assert_eq!(GameResult::Draw.to_string(), "0");
    }
}
