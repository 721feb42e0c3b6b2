//! Kifu-Gen: supervised training-data generation for Go neural networks.
//!
//! This crate replays recorded games and snapshots positions into
//! fixed-shape feature tensors. Its core is the board engine: incremental
//! group and liberty tracking, move legality with captures and (super)ko,
//! SGF record loading, and deterministic feature encoding. It performs no
//! search, move selection, or model training.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry limits and normalization constants
//! - [`types`] - Colors, coordinates, moves, and game results
//! - [`rules`] - Rule sets and SGF rule-string parsing
//! - [`grid`] - Incremental stone/group/liberty tracking
//! - [`board`] - Move legality, captures, ko, and the query surface
//! - [`sgf`] - Game-record loading and replay
//! - [`features`] - Feature plane and scalar encoding
//!
//! ## Example
//!
//! ```
//! use kifu_gen::features::{encode_planes, NUM_FEATURE_PLANES};
//! use kifu_gen::sgf;
//!
//! let record = "(;GM[1]FF[4]SZ[9]KM[6.5]RU[Chinese]RE[B+2.5];B[ee];W[ce];B[cc])";
//! let game = sgf::load_game(record).unwrap();
//!
//! let mut board = game.board;
//! sgf::replay(&mut board, &game.moves, |_, board| {
//!     let planes = encode_planes(board, board.to_play());
//!     assert_eq!(planes.shape()[0], NUM_FEATURE_PLANES);
//! })
//! .unwrap();
//! assert_eq!(board.move_count(), 3);
//! ```
//!
//! Boards are exclusively owned by their replay session: `play` and
//! feature-extraction calls on one board must be serialized by the caller,
//! while independent boards parallelize freely.

pub mod board;
pub mod constants;
pub mod features;
pub mod grid;
pub mod rules;
pub mod sgf;
pub mod types;

mod zobrist;
