//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (`config.toml`):
//!   Windows: %APPDATA%\whisperkey\
//!   macOS:   ~/Library/Application Support/whisperkey/
//!   Linux:   ~/.config/whisperkey/
//!
//! Data dir (GGML models):
//!   Windows: %LOCALAPPDATA%\whisperkey\
//!   macOS:   ~/Library/Application Support/whisperkey/
//!   Linux:   ~/.local/share/whisperkey/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory containing `config.toml`.
    pub config_dir: PathBuf,
    /// Full path to `config.toml`.
    pub config_file: PathBuf,
    /// Directory for downloaded GGML model files.
    pub models_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "whisperkey";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let config_file = config_dir.join("config.toml");
        let models_dir = data_dir.join("models");

        Self {
            config_dir,
            config_file,
            models_dir,
        }
    }

    /// Resolve a model name (e.g. `"base.en"`) to the expected GGML file.
    pub fn model_file(&self, model: &str) -> PathBuf {
        self.models_dir.join(format!("ggml-{model}.bin"))
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths.models_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .config_file
            .file_name()
            .is_some_and(|n| n == "config.toml"));
    }

    #[test]
    fn model_file_naming() {
        let paths = AppPaths::new();
        let file = paths.model_file("base.en");
        assert!(file
            .file_name()
            .is_some_and(|n| n == "ggml-base.en.bin"));
    }
}
