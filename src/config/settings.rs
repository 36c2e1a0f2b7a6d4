//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Every field carries a serde default so partial config files keep working
//! when new options are added.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for microphone capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Target sample rate in Hz fed to the STT engine (must be 16 000).
    pub sample_rate: u32,
    /// Maximum recording length in seconds; recording stops automatically
    /// even if the release event is lost.
    pub max_duration_secs: f32,
    /// Recordings shorter than this are discarded without transcription.
    pub min_duration_secs: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            max_duration_secs: 60.0,
            min_duration_secs: 0.5,
        }
    }
}

impl AudioConfig {
    /// Maximum recording duration as a [`Duration`].
    pub fn max_duration(&self) -> Duration {
        Duration::from_secs_f32(self.max_duration_secs)
    }

    /// Hard cap on buffered samples, derived from the max duration.
    pub fn max_samples(&self) -> usize {
        (self.sample_rate as f32 * self.max_duration_secs) as usize
    }

    /// Minimum sample count below which a recording is discarded.
    pub fn min_samples(&self) -> usize {
        (self.sample_rate as f32 * self.min_duration_secs) as usize
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the Whisper STT engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// GGML model name / file stem (e.g. `"base.en"`), resolved to
    /// `<models_dir>/ggml-<model>.bin`.
    pub model: String,
    /// Speech language as an ISO-639-1 code, or `"auto"` for built-in
    /// language detection.
    pub language: String,
    /// Beam width for decoding; `1` selects greedy sampling.
    pub beam_size: i32,
    /// Optional prompt biasing the decoder toward domain vocabulary.
    pub initial_prompt: Option<String>,
    /// Maximum seconds the orchestrator waits for one transcription call.
    pub timeout_secs: f32,
    /// Literal substring replacements applied to every transcript
    /// (e.g. `"react" = "React"`).
    pub word_replacements: BTreeMap<String, String>,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "base.en".into(),
            language: "en".into(),
            beam_size: 1,
            initial_prompt: None,
            timeout_secs: 60.0,
            word_replacements: BTreeMap::new(),
        }
    }
}

impl SttConfig {
    /// Per-call transcription timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f32(self.timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// OutputFormat
// ---------------------------------------------------------------------------

/// How formatter output is normalized before insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Collapse every whitespace run (including newlines) to a single space.
    /// The right choice when pasting into chat inputs where Enter submits.
    SingleLine,
    /// Preserve line breaks as produced by the formatter.
    MultiLine,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::SingleLine
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the optional LLM formatting step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Whether LLM formatting runs at all.  When `false` the raw transcript
    /// is inserted unchanged.
    pub enabled: bool,
    /// Base URL of an OpenAI-compatible endpoint.
    ///
    /// - Ollama default: `http://localhost:11434`
    /// - OpenAI: `https://api.openai.com`
    pub base_url: String,
    /// API key — `None` for local providers.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Completion token cap for one formatting call.
    pub max_tokens: u32,
    /// Maximum seconds to wait for a formatting response.
    pub timeout_secs: f32,
    /// Whitespace normalization applied to formatter output.
    pub output_format: OutputFormat,
    /// Skip the formatter for short transcripts that contain no fillers.
    pub skip_short: bool,
    /// Character threshold for `skip_short`.
    pub skip_short_max_chars: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:11434".into(),
            api_key: None,
            model: "qwen2.5:7b-instruct".into(),
            temperature: 0.3,
            max_tokens: 512,
            timeout_secs: 30.0,
            output_format: OutputFormat::default(),
            skip_short: true,
            skip_short_max_chars: 20,
        }
    }
}

impl LlmConfig {
    /// Per-call formatting timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f32(self.timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// HotkeyConfig
// ---------------------------------------------------------------------------

/// Push-to-talk trigger binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Trigger key name (e.g. `"RightAlt"`, `"F9"`).
    pub trigger_key: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            trigger_key: "RightAlt".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// InsertionConfig
// ---------------------------------------------------------------------------

/// Settings for clipboard-paste text insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertionConfig {
    /// Milliseconds between writing the clipboard and simulating the paste
    /// chord, giving the clipboard manager time to flush.
    pub pre_paste_delay_ms: u64,
    /// Restore the previous clipboard contents after pasting.
    pub restore_clipboard: bool,
}

impl Default for InsertionConfig {
    fn default() -> Self {
        Self {
            pre_paste_delay_ms: 50,
            restore_clipboard: true,
        }
    }
}

// ---------------------------------------------------------------------------
// MediaConfig
// ---------------------------------------------------------------------------

/// Settings for media pause/resume around the recording window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Send a play/pause media key when recording starts and resume when the
    /// pipeline finishes.  Off by default: without an OS-level playback
    /// probe the toggle fires whether or not anything is playing.
    pub enabled: bool,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self { enabled: false }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `config.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use whisperkey::config::AppConfig;
///
/// // Load (returns Default when the file is missing)
/// let config = AppConfig::load().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Maximum seconds shutdown waits for an in-flight pipeline worker.
    pub shutdown_timeout_secs: f32,
    /// Microphone capture settings.
    pub audio: AudioConfig,
    /// STT engine settings.
    pub stt: SttConfig,
    /// LLM formatting settings.
    pub llm: LlmConfig,
    /// Push-to-talk binding.
    pub hotkey: HotkeyConfig,
    /// Text insertion settings.
    pub insertion: InsertionConfig,
    /// Media pause/resume settings.
    pub media: MediaConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout_secs: 30.0,
            audio: AudioConfig::default(),
            stt: SttConfig::default(),
            llm: LlmConfig::default(),
            hotkey: HotkeyConfig::default(),
            insertion: InsertionConfig::default(),
            media: MediaConfig::default(),
        }
    }
}

impl AppConfig {
    /// Shutdown worker-join timeout as a [`Duration`].
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs_f32(self.shutdown_timeout_secs)
    }

    /// Load configuration from the platform-appropriate `config.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().config_file)
    }

    /// Load from an explicit path (the optional CLI argument, and tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to an explicit path, creating parent directories
    /// as needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
