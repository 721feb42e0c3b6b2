//! Zobrist hashing for superko detection.
//!
//! Each (intersection, color) pair gets a fixed pseudo-random 64-bit key;
//! a position's hash is the XOR of the keys of its stones, so placing and
//! removing stones are O(1) incremental updates. A separate key marks the
//! player to move, distinguishing situational from positional repetition.

use std::sync::LazyLock;

use crate::constants::MAX_BOARD_SIZE;
use crate::types::{Color, Coord};

const NUM_POINTS: usize = MAX_BOARD_SIZE * MAX_BOARD_SIZE;

struct ZobristKeys {
    /// Keys indexed by [point][color] with Black = 0, White = 1.
    stones: [[u64; 2]; NUM_POINTS],
    /// XORed into the hash when White is to move.
    white_to_play: u64,
}

/// SplitMix64 step; deterministic so hashes are stable across runs.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e3779b97f4a7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

impl ZobristKeys {
    fn new() -> Self {
        let mut seed = 0x6a09e667f3bcc908;
        let mut stones = [[0u64; 2]; NUM_POINTS];
        for point in stones.iter_mut() {
            point[0] = splitmix64(&mut seed);
            point[1] = splitmix64(&mut seed);
        }
        ZobristKeys {
            stones,
            white_to_play: splitmix64(&mut seed),
        }
    }
}

static KEYS: LazyLock<ZobristKeys> = LazyLock::new(ZobristKeys::new);

/// Key for a stone of `color` at `coord`.
///
/// # Panics
/// Panics on `Color::Empty` or coordinates outside the maximum board area.
#[inline]
pub fn stone_key(coord: Coord, color: Color) -> u64 {
    let slot = match color {
        Color::Black => 0,
        Color::White => 1,
        Color::Empty => panic!("empty intersections have no Zobrist key"),
    };
    KEYS.stones[coord.y * MAX_BOARD_SIZE + coord.x][slot]
}

/// Key distinguishing White-to-move situations from Black-to-move ones.
#[inline]
pub fn side_to_play_key() -> u64 {
    KEYS.white_to_play
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic() {
        let c = Coord::new(3, 4);
        assert_eq!(stone_key(c, Color::Black), stone_key(c, Color::Black));
        assert_ne!(stone_key(c, Color::Black), stone_key(c, Color::White));
    }

    #[test]
    fn keys_are_distinct_across_points() {
        let a = stone_key(Coord::new(0, 0), Color::Black);
        let b = stone_key(Coord::new(18, 18), Color::Black);
        assert_ne!(a, b);
        assert_ne!(a, side_to_play_key());
    }
}
