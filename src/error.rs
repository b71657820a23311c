use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `DualMind`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum DualMindError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Model backend ───────────────────────────────────────────────────
    #[error("provider: {0}")]
    Provider(#[from] ProviderError),

    // ── Transcript log ──────────────────────────────────────────────────
    #[error("transcript: {0}")]
    Transcript(#[from] TranscriptError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

/// Fatal at startup: no partial run is attempted on any of these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("failed to read system prompt file {path}: {source}")]
    PromptFile {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid override {name}={value}: {reason}")]
    Override {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── Provider errors ────────────────────────────────────────────────────────

/// Failures talking to the model-serving backend.
///
/// An empty-but-successful completion is `Ok(String::new())` at the call
/// site, never an error; only transport, HTTP, and decode failures land
/// here. The turn engine does not retry any of these.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },

    #[error("backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed backend response: {0}")]
    InvalidResponse(String),
}

// ─── Transcript errors ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("failed to write conversation log {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, DualMindError>;
