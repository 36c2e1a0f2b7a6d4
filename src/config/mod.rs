//! Configuration for whisperkey.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each subsystem,
//! `AppPaths` for cross-platform directories, and TOML persistence via
//! `AppConfig::load` / `AppConfig::save`.  The orchestrator consumes the
//! loaded config as an immutable snapshot; changing settings requires a
//! restart.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, AudioConfig, HotkeyConfig, InsertionConfig, LlmConfig, MediaConfig, OutputFormat,
    SttConfig,
};
