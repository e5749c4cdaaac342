//! Runtime module - serialized game sessions on tokio
//!
//! A [`GameState`](blockfall_core::GameState) is not shared between threads. Instead
//! [`spawn`] moves it into a task that:
//!
//! 1. **Receives commands** over a bounded mpsc channel from [`SessionHandle`] clones
//! 2. **Fires gravity** with `tokio::time::sleep_until` at the drop scheduler's deadline
//! 3. **Publishes events** (state changes, line clears) on a broadcast channel
//!
//! Both sources are polled from a single `select!` loop, so every command and every
//! gravity step runs to completion before the next one starts.
//!
//! # Environment Variables
//!
//! - `BLOCKFALL_WIDTH`, `BLOCKFALL_HEIGHT`, `BLOCKFALL_INITIAL_LEVEL`, `BLOCKFALL_SEED`:
//!   first game's config
//! - `BLOCKFALL_MAX_PENDING`: command channel capacity (default: 32)
//! - `BLOCKFALL_LOG_PATH`: append one JSON line per command to this file
//!
//! # Example
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use blockfall_runtime::{spawn, RuntimeConfig};
//!
//! let session = spawn(RuntimeConfig::default());
//! session.rotate(true).await?;
//! session.hard_drop().await?;
//! println!("score: {}", session.state().await?.score);
//! session.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod event_log;
pub mod protocol;
pub mod session;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use config::RuntimeConfig;
pub use event_log::{EventLog, LogRecord};
pub use session::{spawn, Command, SessionEvent, SessionHandle};
