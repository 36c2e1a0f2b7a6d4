//! LLM formatting module.
//!
//! The formatter is an enhancement, never a dependency of correctness: the
//! pipeline falls back to the raw transcript whenever a call fails or times
//! out, and short transcripts without filler words can bypass it entirely.
//!
//! * [`TextFormatter`] — async trait implemented by formatter backends.
//! * [`ApiFormatter`] — OpenAI-compatible REST formatter (Ollama, LM Studio,
//!   any `/v1/chat/completions` provider).
//! * [`should_skip_formatting`] / [`normalize_output`] — the gating and
//!   whitespace rules the pipeline applies around the call.

pub mod formatter;
pub mod normalize;

pub use formatter::{ApiFormatter, LlmError, TextFormatter};
pub use normalize::{normalize_output, should_skip_formatting};
