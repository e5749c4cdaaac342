//! Blockfall (workspace facade crate).
//!
//! Re-exports the engine crates under `blockfall::{core,runtime,types}` so binaries,
//! integration tests and benches need a single dependency.

pub use blockfall_core as core;
pub use blockfall_runtime as runtime;
pub use blockfall_types as types;
