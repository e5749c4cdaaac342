//! Runtime configuration

use blockfall_types::GameConfig;

/// Session runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Config for the first game; later `new_game` calls may replace it.
    pub game: GameConfig,
    /// Capacity of the command channel into the session task.
    pub max_pending_commands: usize,
    /// Append a JSONL record per command to this file.
    pub log_path: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            max_pending_commands: 32,
            log_path: None,
        }
    }
}

impl RuntimeConfig {
    /// Create from environment variables
    ///
    /// Game settings come from [`GameConfig::from_env`]; runtime settings from
    /// `BLOCKFALL_MAX_PENDING` and `BLOCKFALL_LOG_PATH`.
    pub fn from_env() -> Self {
        use std::env;

        let max_pending_commands = env::var("BLOCKFALL_MAX_PENDING")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(32);

        let log_path = env::var("BLOCKFALL_LOG_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        Self {
            game: GameConfig::from_env(),
            max_pending_commands,
            log_path,
        }
    }
}
