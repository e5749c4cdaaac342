//! Line protocol for the stdio driver
//!
//! Input is one plain-text command per line:
//!
//! ```text
//! left | right | down | cw | ccw | drop | hold | pause
//! new [{"width":12,"height":22,"initialLevel":3,"seed":7}]
//! state | ghost | time | config | quit
//! ```
//!
//! Output is one JSON object per line, tagged by `type`.

use anyhow::{bail, Context, Result};
use serde::Serialize;

use blockfall_core::{ActiveSnapshot, GameSnapshot};
use blockfall_types::{Direction, GameConfig};

use crate::session::{Command, SessionEvent};

/// Parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    State,
    Ghost,
    PlayTime,
    Config,
    Quit,
}

/// Parse one input line
///
/// # Examples
///
/// ```
/// use blockfall_runtime::protocol::{parse_input, Input};
/// use blockfall_runtime::Command;
///
/// assert_eq!(parse_input("drop").unwrap(), Input::Command(Command::HardDrop));
/// assert!(parse_input("fly").is_err());
/// ```
pub fn parse_input(line: &str) -> Result<Input> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let word = word.to_lowercase();
    let input = match word.as_str() {
        "left" | "right" | "down" => match Direction::from_str(&word) {
            Some(direction) => Input::Command(Command::Move(direction)),
            None => bail!("unknown direction: {}", word),
        },
        "cw" | "rotate" => Input::Command(Command::Rotate { clockwise: true }),
        "ccw" => Input::Command(Command::Rotate { clockwise: false }),
        "drop" => Input::Command(Command::HardDrop),
        "hold" => Input::Command(Command::Hold),
        "pause" => Input::Command(Command::TogglePause),
        "new" => {
            let config = if rest.is_empty() {
                None
            } else {
                Some(serde_json::from_str::<GameConfig>(rest).context("invalid game config")?)
            };
            Input::Command(Command::NewGame(config))
        }
        "state" => Input::State,
        "ghost" => Input::Ghost,
        "time" => Input::PlayTime,
        "config" => Input::Config,
        "quit" | "exit" => Input::Quit,
        "" => bail!("empty command"),
        other => bail!("unknown command: {}", other),
    };

    if !rest.is_empty() && word != "new" {
        bail!("unexpected arguments for {}", word);
    }
    Ok(input)
}

/// Output line
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Output {
    Ack { command: &'static str, ok: bool },
    State { state: GameSnapshot },
    Ghost { ghost: Option<ActiveSnapshot> },
    PlayTime { ms: u64 },
    Config { config: GameConfig },
    LinesCleared { count: u32 },
    Error { message: String },
}

impl From<SessionEvent> for Output {
    fn from(event: SessionEvent) -> Self {
        match event {
            SessionEvent::StateChanged(state) => Output::State { state },
            SessionEvent::LinesCleared(count) => Output::LinesCleared { count },
        }
    }
}

impl Output {
    /// Serialize as a single JSON line (no trailing newline)
    pub fn to_line(&self) -> Result<String> {
        serde_json::to_string(self).context("serialize output")
    }
}
