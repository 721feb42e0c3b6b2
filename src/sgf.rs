//! SGF game-record loading.
//!
//! Parses the bracketed property-list format used by Go servers into a
//! [`GameRecord`]: board geometry, komi, rule set, setup stones, the main
//! move line, and the final result. Only the main line of play is read; at
//! every variation point the first subtree is taken and siblings are
//! skipped. Comment and annotation properties are ignored, and property
//! values honor `\]` escapes.
//!
//! Structurally broken input (no game tree, unparseable `SZ`/`KM`,
//! malformed coordinates) is a hard [`LoadError`]. Records that parse but
//! are unusable for training (unsupported board size, unknown rule string,
//! missing result) come back `Ok` with a [`RecordFault`] set; such records
//! must not be replayed, and [`load_game`] refuses them.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::board::{Board, MoveError};
use crate::constants::{MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::rules::Ruleset;
use crate::types::{Color, Coord, GameResult, Move};

/// Structural load failure: the text cannot be turned into a record at all,
/// or replay preparation hit an illegal move. Carries enough detail for a
/// batch driver to log and skip the offending file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("record contains no game tree")]
    NoGameTree,
    #[error("unterminated property value")]
    UnterminatedValue,
    #[error("record contains no SZ property")]
    MissingSize,
    #[error("malformed SZ property {0:?}")]
    MalformedSize(String),
    #[error("record contains no KM property")]
    MissingKomi,
    #[error("malformed KM property {0:?}")]
    MalformedKomi(String),
    #[error("malformed coordinate {text:?} for a {width}x{height} board")]
    MalformedCoordinate {
        text: String,
        width: usize,
        height: usize,
    },
    #[error("record is not usable for training: {0}")]
    InvalidRecord(RecordFault),
    #[error("illegal move at index {index}: {source}")]
    IllegalMove {
        index: usize,
        #[source]
        source: MoveError,
    },
}

/// Why a parseable record is unusable for training.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordFault {
    #[error("unsupported board size {width}x{height}")]
    UnsupportedSize { width: usize, height: usize },
    #[error("record carries no RU property")]
    MissingRules,
    #[error("unrecognized rule string {0:?}")]
    UnrecognizedRules(String),
    #[error("record carries no RE property")]
    MissingResult,
    #[error("malformed RE property {0:?}")]
    MalformedResult(String),
    #[error("game began in the cleanup (encore) phase")]
    EncorePhase,
}

/// A parsed game record. Read-only after parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub width: usize,
    pub height: usize,
    pub komi: f32,
    /// Declared handicap stone count (`HA`); the stones themselves arrive
    /// as setup stones.
    pub handicap: usize,
    /// Raw content of the `RU` property, empty when absent.
    pub rules_text: String,
    /// Parsed rule set; `None` when `RU` is absent or unrecognized.
    pub rules: Option<Ruleset>,
    /// Pre-game placements (`AB`/`AW`/`AE`), in order of appearance.
    pub setup: Vec<Move>,
    /// The main move line, truncated after two consecutive passes.
    pub moves: Vec<Move>,
    pub result: GameResult,
    /// Number of leading moves that are replay-time setup rather than
    /// training data (`startTurnIdx` export annotation; 0 when absent).
    pub start_turn: usize,
    /// First reason this record is unusable for training, if any.
    pub fault: Option<RecordFault>,
}

impl GameRecord {
    /// Parses a record from SGF text.
    pub fn parse(text: &str) -> Result<GameRecord, LoadError> {
        let props = main_line_properties(text)?;

        let size_text = find_prop(&props, "SZ").ok_or(LoadError::MissingSize)?;
        let (width, height) = parse_size(size_text)?;

        let komi_text = find_prop(&props, "KM").ok_or(LoadError::MissingKomi)?;
        let komi: f32 = komi_text
            .trim()
            .parse()
            .map_err(|_| LoadError::MalformedKomi(komi_text.to_string()))?;

        let handicap = find_prop(&props, "HA")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);

        let rules_text = find_prop(&props, "RU").map(str::to_string);
        let rules = rules_text.as_deref().and_then(Ruleset::from_sgf);

        let mut setup = Vec::new();
        for (id, values) in &props {
            let color = match id.as_str() {
                "AB" => Color::Black,
                "AW" => Color::White,
                "AE" => Color::Empty,
                _ => continue,
            };
            for value in values {
                setup.push(Move {
                    color,
                    coord: Some(parse_coord(value, width, height)?),
                });
            }
        }

        let mut moves = Vec::new();
        let mut consecutive_passes = 0;
        for (id, values) in &props {
            let color = match id.as_str() {
                "B" => Color::Black,
                "W" => Color::White,
                _ => continue,
            };
            let value = values.first().map(String::as_str).unwrap_or("");
            if is_pass_value(value, width, height) {
                consecutive_passes += 1;
                moves.push(Move::pass(color));
            } else {
                consecutive_passes = 0;
                moves.push(Move::place(color, parse_coord(value, width, height)?));
            }
            if consecutive_passes >= 2 {
                break;
            }
        }

        let result_text = find_prop(&props, "RE");
        let result = result_text.and_then(parse_result);

        let size_supported = (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&width)
            && (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&height);

        let fault = if text.contains("beganInEncorePhase") {
            Some(RecordFault::EncorePhase)
        } else if !size_supported {
            Some(RecordFault::UnsupportedSize { width, height })
        } else if rules_text.is_none() {
            Some(RecordFault::MissingRules)
        } else if rules.is_none() {
            Some(RecordFault::UnrecognizedRules(
                rules_text.clone().unwrap_or_default(),
            ))
        } else if result_text.is_none() {
            Some(RecordFault::MissingResult)
        } else if result.is_none() {
            Some(RecordFault::MalformedResult(
                result_text.unwrap_or_default().to_string(),
            ))
        } else {
            None
        };

        Ok(GameRecord {
            width,
            height,
            komi,
            handicap,
            rules_text: rules_text.unwrap_or_default(),
            rules,
            setup,
            moves,
            result: result.unwrap_or(GameResult::Unknown),
            start_turn: start_turn_index(text),
            fault,
        })
    }

    /// True when the record is usable for training and may be replayed.
    pub fn is_valid(&self) -> bool {
        self.fault.is_none()
    }
}

/// A record prepared for replay: setup stones (and any start-turn prefix)
/// already applied to the board, remaining moves ready for `play`.
#[derive(Debug, Clone)]
pub struct LoadedGame {
    pub record: GameRecord,
    pub board: Board,
    pub moves: Vec<Move>,
}

/// Loads a record and prepares it for replay. Invalid records are refused
/// here so they can never reach a board.
pub fn load_game(text: &str) -> Result<LoadedGame, LoadError> {
    let record = GameRecord::parse(text)?;
    if let Some(fault) = &record.fault {
        return Err(LoadError::InvalidRecord(fault.clone()));
    }
    let rules = record.rules.expect("valid records carry a parsed rule set");
    let mut board = Board::with_rules(record.width, record.height, record.komi, rules);
    for &mv in &record.setup {
        board.setup_stone(mv);
    }

    // The start-turn prefix is replayed as regular moves but excluded from
    // the training move list.
    let mut moves = record.moves.clone();
    let prefix = record.start_turn.min(moves.len());
    for (index, mv) in moves.drain(..prefix).enumerate() {
        board
            .play(mv)
            .map_err(|source| LoadError::IllegalMove { index, source })?;
    }

    Ok(LoadedGame {
        record,
        board,
        moves,
    })
}

/// Reads and loads a record from disk.
pub fn load_game_file(path: impl AsRef<Path>) -> Result<LoadedGame, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_game(&text)
}

/// Replays `moves` onto `board`, invoking `visit` after every applied move
/// (the feature-snapshot hook). Stops at the first illegal move and reports
/// its index, leaving the board at the last good position.
pub fn replay<F>(board: &mut Board, moves: &[Move], mut visit: F) -> Result<(), LoadError>
where
    F: FnMut(usize, &Board),
{
    for (index, &mv) in moves.iter().enumerate() {
        board
            .play(mv)
            .map_err(|source| LoadError::IllegalMove { index, source })?;
        visit(index, board);
    }
    Ok(())
}

/// Extracts the `(identifier, values)` list of the record's main line.
///
/// SGF game trees are `( sequence subtree* )` with variations last, so the
/// main line is simply everything up to the first `)`: descending into a
/// `(` continues the first branch, and the close of that branch ends the
/// line before any sibling variation begins.
fn main_line_properties(text: &str) -> Result<Vec<(String, Vec<String>)>, LoadError> {
    let bytes = text.as_bytes();
    let start = text.find('(').ok_or(LoadError::NoGameTree)?;
    let mut props = Vec::new();
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b')' => break,
            b'(' | b';' => i += 1,
            c if c.is_ascii_whitespace() => i += 1,
            c if c.is_ascii_alphabetic() => {
                let id_start = i;
                while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                    i += 1;
                }
                let ident = text[id_start..i].to_string();

                let mut values = Vec::new();
                loop {
                    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    if i >= bytes.len() || bytes[i] != b'[' {
                        break;
                    }
                    i += 1;
                    let mut value = Vec::new();
                    loop {
                        match bytes.get(i) {
                            None => return Err(LoadError::UnterminatedValue),
                            Some(b'\\') => {
                                i += 1;
                                match bytes.get(i) {
                                    None => return Err(LoadError::UnterminatedValue),
                                    Some(&c) => {
                                        value.push(c);
                                        i += 1;
                                    }
                                }
                            }
                            Some(b']') => {
                                i += 1;
                                break;
                            }
                            Some(&c) => {
                                value.push(c);
                                i += 1;
                            }
                        }
                    }
                    values.push(String::from_utf8_lossy(&value).into_owned());
                }
                // A bare identifier without values is tolerated and dropped.
                if !values.is_empty() {
                    props.push((ident, values));
                }
            }
            _ => i += 1,
        }
    }
    Ok(props)
}

/// First value of the first occurrence of a property.
fn find_prop<'a>(props: &'a [(String, Vec<String>)], id: &str) -> Option<&'a str> {
    props
        .iter()
        .find(|(pid, _)| pid == id)
        .and_then(|(_, values)| values.first())
        .map(String::as_str)
}

fn parse_size(value: &str) -> Result<(usize, usize), LoadError> {
    let err = || LoadError::MalformedSize(value.to_string());
    match value.split_once(':') {
        Some((w, h)) => Ok((
            w.trim().parse().map_err(|_| err())?,
            h.trim().parse().map_err(|_| err())?,
        )),
        None => {
            let n: usize = value.trim().parse().map_err(|_| err())?;
            Ok((n, n))
        }
    }
}

/// Two-letter SGF coordinate: `a`-`z` then `A`-`Z`, zero-based.
fn parse_coord(value: &str, width: usize, height: usize) -> Result<Coord, LoadError> {
    let err = || LoadError::MalformedCoordinate {
        text: value.to_string(),
        width,
        height,
    };
    let bytes = value.as_bytes();
    if bytes.len() != 2 {
        return Err(err());
    }
    let axis = |c: u8| match c {
        b'a'..=b'z' => Ok((c - b'a') as usize),
        b'A'..=b'Z' => Ok((c - b'A') as usize + 26),
        _ => Err(err()),
    };
    let coord = Coord::new(axis(bytes[0])?, axis(bytes[1])?);
    if coord.x >= width || coord.y >= height {
        return Err(err());
    }
    Ok(coord)
}

/// Empty values are passes; so is `tt` on boards small enough that the
/// point does not exist (FF[3] convention).
fn is_pass_value(value: &str, width: usize, height: usize) -> bool {
    value.is_empty() || (value == "tt" && width <= 19 && height <= 19)
}

fn parse_result(text: &str) -> Option<GameResult> {
    let text = text.trim();
    match text {
        "0" | "Draw" | "draw" | "Void" | "void" | "Jigo" | "jigo" => return Some(GameResult::Draw),
        "?" => return Some(GameResult::Unknown),
        _ => {}
    }
    let (winner_text, margin_text) = text.split_once('+')?;
    let winner = match winner_text {
        "B" => Color::Black,
        "W" => Color::White,
        _ => return None,
    };
    if margin_text.eq_ignore_ascii_case("R") || margin_text.eq_ignore_ascii_case("Resign") {
        return Some(GameResult::Resignation(winner));
    }
    let margin: f32 = margin_text.parse().ok()?;
    Some(GameResult::Score(if winner == Color::Black {
        margin
    } else {
        -margin
    }))
}

fn start_turn_index(text: &str) -> usize {
    let Some(pos) = text.find("startTurnIdx=") else {
        return 0;
    };
    let digits: String = text[pos + "startTurnIdx=".len()..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}
