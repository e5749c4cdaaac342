//! Core game logic module - pure, in-memory, and testable
//!
//! This crate contains all the game rules, state management, and simulation logic.
//! It has **zero dependencies** on rendering, input, networking, or persistence:
//!
//! - **Self-contained**: A session lives entirely in one [`GameState`] value
//! - **Testable**: Every rule is covered by unit tests next to its module
//! - **Clock-free gravity**: The drop scheduler is advanced by the caller, so the same
//!   state machine runs under a fixed-timestep loop or an async runtime
//!
//! # Module Structure
//!
//! - [`board`]: Grid of locked cells with collision testing and line clearing
//! - [`game_state`]: Session aggregate, commands, callbacks
//! - [`pieces`]: Shape table, active piece, rotation with wall kicks
//! - [`rng`]: Uniform random piece selection
//! - [`scheduler`]: Repeating gravity timer
//! - [`scoring`]: Line/drop points, leveling, gravity table lookup
//! - [`snapshot`]: Owned copies of the observable state
//!
//! # Game Rules
//!
//! - **Uniform randomizer**: Each next piece is drawn independently (no 7-bag)
//! - **Fixed wall kicks**: `(-1,0), (1,0), (0,-1), (-2,0), (2,0)` after the base rotation
//! - **Hold**: Once per piece; the first hold spawns from the queue, later holds swap
//! - **Ghost Piece**: Shows where the current piece will land
//! - **Game over**: Only when a freshly spawned piece does not fit
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_types::{Direction, GameConfig};
//!
//! let mut game = GameState::new(GameConfig { seed: Some(12345), ..GameConfig::default() });
//!
//! game.move_piece(Direction::Right);
//! game.rotate(true);
//! game.hard_drop();
//!
//! // Hard drop awards points
//! assert!(game.state().score > 0);
//! ```
//!
//! # Timing
//!
//! Call [`GameState::tick`](game_state::GameState::tick) with elapsed milliseconds.
//! Gravity fires every [`get_drop_interval_ms`] of the current level.

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scheduler;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::{GameState, LineClearCallback, StateChangeCallback};
pub use pieces::{get_shape, try_rotate, Shape, Tetromino};
pub use rng::{PieceRandomizer, SimpleRng};
pub use scheduler::DropScheduler;
pub use scoring::{
    calculate_drop_score, calculate_level, calculate_line_score, get_drop_interval_ms,
};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
