//! Game state module - manages the complete game session
//!
//! This module ties together all core components: board, pieces, RNG, scoring and the
//! drop scheduler. It owns the session aggregate, applies commands, and notifies the
//! registered callbacks after every mutation.
//!
//! Commands never fail loudly: an illegal move, a blocked rotation, a second hold, or
//! any command while paused or after game over simply returns `false`.

use std::fmt;
use std::time::{Duration, Instant};

use crate::board::Board;
use crate::pieces::{try_rotate, Tetromino};
use crate::rng::PieceRandomizer;
use crate::scheduler::DropScheduler;
use crate::scoring::{
    calculate_drop_score, calculate_level, calculate_line_score, get_drop_interval_ms,
};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::*;

/// Called with a fresh snapshot after every mutating command.
pub type StateChangeCallback = Box<dyn FnMut(&GameSnapshot) + Send>;

/// Called with the line count once per lock that clears at least one line.
pub type LineClearCallback = Box<dyn FnMut(u32) + Send>;

/// Wall-clock play time, excluding pauses and frozen at game over.
#[derive(Debug, Clone, Copy)]
struct PlayClock {
    started_at: Instant,
    paused_at: Option<Instant>,
    stopped_at: Option<Instant>,
    paused_total: Duration,
}

impl PlayClock {
    fn start() -> Self {
        Self {
            started_at: Instant::now(),
            paused_at: None,
            stopped_at: None,
            paused_total: Duration::ZERO,
        }
    }

    fn pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
        }
    }

    fn resume(&mut self) {
        if let Some(at) = self.paused_at.take() {
            self.paused_total += at.elapsed();
        }
    }

    fn stop(&mut self) {
        if self.stopped_at.is_none() {
            self.stopped_at = Some(Instant::now());
        }
    }

    fn elapsed(&self) -> Duration {
        let end = self
            .stopped_at
            .or(self.paused_at)
            .unwrap_or_else(Instant::now);
        end.saturating_duration_since(self.started_at)
            .saturating_sub(self.paused_total)
    }
}

/// Complete game state
pub struct GameState {
    config: GameConfig,
    board: Board,
    active: Option<Tetromino>,
    next: PieceKind,
    hold: Option<PieceKind>,
    can_hold: bool,
    randomizer: PieceRandomizer,
    scheduler: DropScheduler,
    clock: PlayClock,
    score: u32,
    level: u32,
    lines: u32,
    paused: bool,
    game_over: bool,
    on_state_change: Option<StateChangeCallback>,
    on_line_clear: Option<LineClearCallback>,
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("config", &self.config)
            .field("active", &self.active)
            .field("next", &self.next)
            .field("hold", &self.hold)
            .field("can_hold", &self.can_hold)
            .field("score", &self.score)
            .field("level", &self.level)
            .field("lines", &self.lines)
            .field("paused", &self.paused)
            .field("game_over", &self.game_over)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl GameState {
    /// Create a new session and spawn its first piece
    ///
    /// The config is normalized first; see [`GameConfig::normalized`].
    pub fn new(config: GameConfig) -> Self {
        let config = config.normalized();
        let mut randomizer = match config.seed {
            Some(seed) => PieceRandomizer::new(seed),
            None => PieceRandomizer::from_clock(),
        };
        let next = randomizer.draw();
        let level = calculate_level(0, config.initial_level);

        let mut state = Self {
            config,
            board: Board::new(config.width, config.height),
            active: None,
            next,
            hold: None,
            can_hold: true,
            randomizer,
            scheduler: DropScheduler::new(),
            clock: PlayClock::start(),
            score: 0,
            level,
            lines: 0,
            paused: false,
            game_over: false,
            on_state_change: None,
            on_line_clear: None,
        };
        state.scheduler.start(get_drop_interval_ms(level));
        state.spawn_piece();
        state
    }

    /// Discard the current session and start a new one
    ///
    /// Registered callbacks survive. Without a config the previous one is reused
    /// (with a fresh clock-derived seed if it had none).
    pub fn new_game(&mut self, config: Option<GameConfig>) {
        let config = config.unwrap_or(self.config);
        let on_state_change = self.on_state_change.take();
        let on_line_clear = self.on_line_clear.take();

        *self = Self::new(config);
        self.on_state_change = on_state_change;
        self.on_line_clear = on_line_clear;
        self.notify();
    }

    /// Register the state-changed callback, replacing any previous one
    pub fn on_state_change(&mut self, callback: impl FnMut(&GameSnapshot) + Send + 'static) {
        self.on_state_change = Some(Box::new(callback));
    }

    /// Register the lines-cleared callback, replacing any previous one
    pub fn on_line_clear(&mut self, callback: impl FnMut(u32) + Send + 'static) {
        self.on_line_clear = Some(Box::new(callback));
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn next_piece(&self) -> PieceKind {
        self.next
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn scheduler(&self) -> &DropScheduler {
        &self.scheduler
    }

    /// Seed of the piece sequence
    pub fn seed(&self) -> u32 {
        self.randomizer.seed()
    }

    /// Time spent playing, excluding pauses
    pub fn play_time(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Current gravity interval based on level
    pub fn drop_interval_ms(&self) -> u32 {
        get_drop_interval_ms(self.level)
    }

    /// Owned snapshot of the observable state
    pub fn state(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            active: self.active.map(ActiveSnapshot::from),
            ghost_y: self.ghost_y(),
            next: self.next,
            hold: self.hold,
            can_hold: self.can_hold,
            paused: self.paused,
            game_over: self.game_over,
            score: self.score,
            level: self.level,
            lines: self.lines,
            drop_interval_ms: self.drop_interval_ms(),
            play_time_ms: self.play_time().as_millis() as u64,
        }
    }

    /// Check a piece against the board; see [`Board::is_valid_position`]
    pub fn is_valid_position(
        &self,
        piece: &Tetromino,
        offset_x: i8,
        offset_y: i8,
        rotation: Option<Rotation>,
    ) -> bool {
        self.board
            .is_valid_position(piece, offset_x, offset_y, rotation)
    }

    fn playable(&self) -> bool {
        !self.paused && !self.game_over
    }

    fn notify(&mut self) {
        if self.on_state_change.is_none() {
            return;
        }
        let snapshot = self.state();
        if let Some(callback) = self.on_state_change.as_mut() {
            callback(&snapshot);
        }
    }

    /// Spawn the next piece
    ///
    /// The queued kind becomes active at rotation 0, centered at the top, and a new
    /// kind is drawn for the queue. If the new piece does not fit the game is over.
    pub fn spawn_piece(&mut self) -> bool {
        let kind = self.next;
        self.next = self.randomizer.draw();
        self.can_hold = true;

        let piece = Tetromino::spawn(kind, self.board.width());
        if !self.board.is_valid_position(&piece, 0, 0, None) {
            self.active = None;
            self.game_over = true;
            self.scheduler.stop();
            self.clock.stop();
            return false;
        }

        self.active = Some(piece);
        true
    }

    /// Move the active piece one cell
    ///
    /// A blocked downward move means the piece has landed: it is locked, lines are
    /// cleared and the next piece spawns. Returns true only if the piece moved.
    pub fn move_piece(&mut self, direction: Direction) -> bool {
        if !self.playable() || self.active.is_none() {
            return false;
        }

        let moved = self.step(direction, true);
        if moved || direction == Direction::Down {
            self.notify();
        }
        moved
    }

    fn step(&mut self, direction: Direction, scored: bool) -> bool {
        let Some(active) = self.active else {
            return false;
        };

        let (dx, dy) = direction.offset();
        if self.board.is_valid_position(&active, dx, dy, None) {
            self.active = Some(active.shifted(dx, dy));
            if scored && direction == Direction::Down {
                self.score += calculate_drop_score(1, false);
            }
            return true;
        }

        if direction == Direction::Down {
            self.lock_piece();
        }
        false
    }

    /// Rotate the active piece with wall kicks
    ///
    /// Either rotation and position both change to the first fitting candidate, or
    /// nothing changes.
    pub fn rotate(&mut self, clockwise: bool) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let result = try_rotate(active.rotation, clockwise, |rotation, dx, dy| {
            self.board.is_valid_position(&active, dx, dy, Some(rotation))
        });

        let Some((rotation, (dx, dy))) = result else {
            return false;
        };

        self.active = Some(Tetromino {
            rotation,
            ..active.shifted(dx, dy)
        });
        self.notify();
        true
    }

    /// Hard drop the active piece to the bottom and lock it
    pub fn hard_drop(&mut self) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let distance = self.drop_distance(&active);
        self.active = Some(active.shifted(0, distance));
        self.score += calculate_drop_score(distance as u32, true);

        self.lock_piece();
        self.notify();
        true
    }

    /// Put the active piece aside
    ///
    /// With an empty hold slot the active kind is stored and the next piece spawns.
    /// Otherwise active and held kinds swap and the queue is untouched. Allowed once
    /// per spawned piece.
    pub fn hold(&mut self) -> bool {
        if !self.playable() || !self.can_hold {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        match self.hold {
            Some(held) => {
                let swapped = Tetromino::spawn(held, self.board.width());
                // A swap is not a spawn, so it cannot end the game; refuse it instead.
                if !self.board.is_valid_position(&swapped, 0, 0, None) {
                    return false;
                }
                self.hold = Some(active.kind);
                self.active = Some(swapped);
            }
            None => {
                self.hold = Some(active.kind);
                self.active = None;
                self.spawn_piece();
            }
        }

        self.can_hold = false;
        self.notify();
        true
    }

    /// Pause or resume the session
    ///
    /// Pausing stops gravity; resuming restarts it at the current level's interval.
    pub fn toggle_pause(&mut self) -> bool {
        if self.game_over {
            return false;
        }

        self.paused = !self.paused;
        if self.paused {
            self.scheduler.stop();
            self.clock.pause();
        } else {
            self.scheduler.start(self.drop_interval_ms());
            self.clock.resume();
        }
        self.notify();
        true
    }

    /// Lock the active piece onto the board and handle line clears
    pub fn lock_piece(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        self.board.lock_piece(&active);

        let cleared = self.board.clear_lines();
        if cleared > 0 {
            self.score += calculate_line_score(cleared, self.level);
            self.lines += cleared as u32;

            let level = calculate_level(self.lines, self.config.initial_level);
            if level > self.level {
                self.level = level;
                self.scheduler.restart(get_drop_interval_ms(level));
            }

            if let Some(callback) = self.on_line_clear.as_mut() {
                callback(cleared as u32);
            }
        }

        self.spawn_piece();
    }

    /// Rows the piece can fall before it would collide
    fn drop_distance(&self, piece: &Tetromino) -> i8 {
        let mut distance = 0;
        while self.board.is_valid_position(piece, 0, distance + 1, None) {
            distance += 1;
        }
        distance
    }

    /// Where the active piece would land if dropped straight down
    pub fn ghost_position(&self) -> Option<Tetromino> {
        let active = self.active?;
        Some(active.shifted(0, self.drop_distance(&active)))
    }

    /// Calculate the ghost piece Y position (where piece would land)
    pub fn ghost_y(&self) -> Option<i8> {
        self.ghost_position().map(|ghost| ghost.y)
    }

    /// Advance the drop scheduler by `elapsed_ms` and apply due gravity steps
    ///
    /// Gravity steps are not scored. A level-up during the call restarts the timer,
    /// so the remaining time runs at the new interval. Returns true if any step ran.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        let mut budget = elapsed_ms;
        let mut stepped = false;

        while let Some(remaining) = self.scheduler.remaining_ms() {
            let slice = budget.min(remaining);
            budget -= slice;
            if !self.scheduler.advance(slice) {
                break;
            }
            self.step(Direction::Down, false);
            self.notify();
            stepped = true;
        }

        stepped
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
