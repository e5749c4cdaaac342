//! Scoring module - line clear points, drop points, leveling and gravity
//!
//! - A lock that clears `n` lines scores `LINE_SCORES[n] * level`.
//! - Soft drop scores 1 point per manual down-step, hard drop 2 points per cell.
//! - Level is `floor(lines / 10) + 1`, never below the session's starting level, capped at 20.

use crate::types::{
    DROP_INTERVALS, HARD_DROP_POINTS, LINES_PER_LEVEL, LINE_SCORES, MAX_LEVEL, MIN_LEVEL,
    SOFT_DROP_POINTS,
};

/// Calculate line clear score
/// lines: number of lines cleared (1-4)
/// level: current level (1-based)
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines >= LINE_SCORES.len() {
        return 0;
    }
    LINE_SCORES[lines].saturating_mul(level)
}

/// Calculate drop score
/// soft_drop: +1 per cell
/// hard_drop: +2 per cell
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool) -> u32 {
    if is_hard_drop {
        cells.saturating_mul(HARD_DROP_POINTS)
    } else {
        cells.saturating_mul(SOFT_DROP_POINTS)
    }
}

/// Level management
/// Level increases every 10 lines cleared, starting from `initial_level`
pub fn calculate_level(total_lines: u32, initial_level: u32) -> u32 {
    let earned = total_lines / LINES_PER_LEVEL + 1;
    earned.max(initial_level).clamp(MIN_LEVEL, MAX_LEVEL)
}

/// Get drop interval for a level (in milliseconds)
/// Levels past the table use its last entry
pub fn get_drop_interval_ms(level: u32) -> u32 {
    let idx = (level.max(MIN_LEVEL) - 1) as usize;
    DROP_INTERVALS[idx.min(DROP_INTERVALS.len() - 1)]
}
