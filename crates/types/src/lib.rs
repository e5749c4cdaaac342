//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no I/O, making them usable in any context
//! (core logic, session runtime, JSON driver).
//!
//! # Board Dimensions
//!
//! Default playfield dimensions (configurable per session through [`GameConfig`]):
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//!
//! # Scoring
//!
//! | Event | Points |
//! |-------|--------|
//! | 1 line | 100 x level |
//! | 2 lines | 300 x level |
//! | 3 lines | 500 x level |
//! | 4 lines | 800 x level |
//! | Soft drop | 1 per manual down-step |
//! | Hard drop | 2 per cell fallen |
//!
//! # Drop Intervals by Level
//!
//! Gravity increases with level (milliseconds per row):
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 800ms |
//! | 5 | 470ms |
//! | 10 | 100ms |
//! | 11-13 | 80ms |
//! | 14-16 | 70ms |
//! | 17-18 | 50ms |
//! | 19-20 | 30ms |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Direction, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Direction::from_str("left"), Some(Direction::Left));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Default board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Default board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Smallest accepted board edge; the I piece needs four columns.
pub const MIN_BOARD_DIM: u8 = 4;

/// Largest accepted board edge. Keeps every coordinate inside `i8`.
pub const MAX_BOARD_DIM: u8 = 40;

/// First level of a session.
pub const MIN_LEVEL: u32 = 1;

/// Level cap.
pub const MAX_LEVEL: u32 = 20;

/// Cleared lines needed per level step.
pub const LINES_PER_LEVEL: u32 = 10;

/// Line clear scoring table, indexed by lines cleared in one lock.
///
/// Points are multiplied by the current level.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Points per manual soft-drop step
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per cell of hard-drop distance
pub const HARD_DROP_POINTS: u32 = 2;

/// Drop intervals by level (milliseconds per row)
///
/// Index 0 = Level 1, Index 19 = Level 20
pub const DROP_INTERVALS: [u32; 20] = [
    800, 720, 630, 550, 470, 380, 300, 220, 130, 100, 80, 80, 80, 70, 70, 70, 50, 50, 30, 30,
];

/// Wall kick offsets tried, in order, after the base rotation fails.
///
/// The list is the same for every piece and every rotation transition.
pub const WALL_KICKS: [(i8, i8); 5] = [(-1, 0), (1, 0), (0, -1), (-2, 0), (2, 0)];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_intervals_never_increase() {
        for pair in DROP_INTERVALS.windows(2) {
            assert!(pair[0] >= pair[1], "{} then {}", pair[0], pair[1]);
        }
        assert_eq!(DROP_INTERVALS[0], 800);
        assert_eq!(DROP_INTERVALS[9], 100);
        assert_eq!(DROP_INTERVALS[19], 30);
    }

    #[test]
    fn plateau_levels_stay_between_50_and_80() {
        for level in 11..=18 {
            let ms = DROP_INTERVALS[level - 1];
            assert!((50..=80).contains(&ms), "level {} -> {}ms", level, ms);
        }
    }

    #[test]
    fn kick_order_is_fixed() {
        assert_eq!(WALL_KICKS, [(-1, 0), (1, 0), (0, -1), (-2, 0), (2, 0)]);
    }

    #[test]
    fn config_deserializes_camel_case_with_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"width":12,"initialLevel":3}"#).unwrap();
        assert_eq!(config.width, 12);
        assert_eq!(config.height, BOARD_HEIGHT);
        assert_eq!(config.initial_level, 3);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn config_normalized_clamps_out_of_range_values() {
        let config = GameConfig {
            width: 2,
            height: 200,
            initial_level: 0,
            seed: Some(7),
        }
        .normalized();
        assert_eq!(config.width, MIN_BOARD_DIM);
        assert_eq!(config.height, MAX_BOARD_DIM);
        assert_eq!(config.initial_level, MIN_LEVEL);
        assert_eq!(config.seed, Some(7));

        let config = GameConfig {
            initial_level: 99,
            ..GameConfig::default()
        }
        .normalized();
        assert_eq!(config.initial_level, MAX_LEVEL);
    }
}

/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and color:
/// - **I**: Cyan, horizontal bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Purple, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds, in shape-table order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Position of this kind in [`PieceKind::ALL`]
    pub fn index(self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::S => 3,
            PieceKind::Z => 4,
            PieceKind::J => 5,
            PieceKind::L => 6,
        }
    }

    /// Kind at `index % 7`
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Display color as `#rrggbb`
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.color(), "#00f0f0");
    /// ```
    pub fn color(&self) -> &'static str {
        match self {
            PieceKind::I => "#00f0f0",
            PieceKind::O => "#f0f000",
            PieceKind::T => "#a000f0",
            PieceKind::S => "#00f000",
            PieceKind::Z => "#f00000",
            PieceKind::J => "#0000f0",
            PieceKind::L => "#f0a000",
        }
    }
}

/// Rotation states, indexed 0 to 3
///
/// - **North** (0): Spawn orientation
/// - **East** (1): Rotated 90° clockwise
/// - **South** (2): Rotated 180°
/// - **West** (3): Rotated 90° counter-clockwise
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotate one step in the given direction
    pub fn rotated(&self, clockwise: bool) -> Self {
        if clockwise {
            self.rotate_cw()
        } else {
            self.rotate_ccw()
        }
    }

    /// Rotation index in `0..4`
    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Rotation for `index % 4`
    pub fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Unit movement directions accepted by `move_piece`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    /// Board offset `(dx, dy)` for one step
    pub fn offset(&self) -> (i8, i8) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }

    /// Parse direction from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("DOWN"), Some(Direction::Down));
    /// assert_eq!(Direction::from_str("up"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Locked cell, tagged with the kind that filled it
pub type Cell = Option<PieceKind>;

/// Per-session configuration
///
/// Every field is optional when deserialized; missing keys take the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub width: u8,
    pub height: u8,
    pub initial_level: u32,
    /// RNG seed for the piece sequence. Derived from the clock when absent.
    pub seed: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            initial_level: MIN_LEVEL,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create from environment variables
    ///
    /// Reads `BLOCKFALL_WIDTH`, `BLOCKFALL_HEIGHT`, `BLOCKFALL_INITIAL_LEVEL` and
    /// `BLOCKFALL_SEED`. Missing or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let width = env::var("BLOCKFALL_WIDTH")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.width);
        let height = env::var("BLOCKFALL_HEIGHT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.height);
        let initial_level = env::var("BLOCKFALL_INITIAL_LEVEL")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.initial_level);
        let seed = env::var("BLOCKFALL_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok());

        Self {
            width,
            height,
            initial_level,
            seed,
        }
        .normalized()
    }

    /// Clamp dimensions and level into the supported ranges
    pub fn normalized(self) -> Self {
        Self {
            width: self.width.clamp(MIN_BOARD_DIM, MAX_BOARD_DIM),
            height: self.height.clamp(MIN_BOARD_DIM, MAX_BOARD_DIM),
            initial_level: self.initial_level.clamp(MIN_LEVEL, MAX_LEVEL),
            seed: self.seed,
        }
    }
}
