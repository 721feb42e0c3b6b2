//! Constants for board geometry and engine limits.
//!
//! Boards are sized at construction time for the requested dimensions;
//! rectangular shapes such as 9x13 are allowed, up to 19 on each axis.
//! Internally every board uses a 1D array representation with a
//! one-intersection ring of off-board padding for boundary detection.

// =============================================================================
// Board Geometry
// =============================================================================

/// Largest supported dimension on either axis.
pub const MAX_BOARD_SIZE: usize = 19;

/// Smallest supported dimension on either axis.
pub const MIN_BOARD_SIZE: usize = 2;

/// Komi used when constructing a board without an explicit value.
pub const DEFAULT_KOMI: f32 = 7.5;

// =============================================================================
// Result and Feature Normalization
// =============================================================================

/// Divisor applied to komi before it enters the scalar feature vector.
/// Real-world komi values fall well inside [-15, 15].
pub const KOMI_NORMALIZATION: f32 = 15.0;

/// Sentinel margin reported for games decided by resignation.
pub const RESIGNATION_MARGIN: f32 = 1000.0;
