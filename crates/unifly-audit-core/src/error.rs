// ── Core error types ──
//
// The matchers themselves are total and never fail. Everything fallible in
// this crate sits at the edges: reading a snapshot from disk, validating the
// normalized records it contains, and looking rules up by id.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Snapshot I/O ─────────────────────────────────────────────────
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML snapshot: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML snapshot: {0}")]
    Toml(#[from] toml::de::Error),

    // ── Validation errors ────────────────────────────────────────────
    #[error("Invalid port spec '{spec}': {reason}")]
    InvalidPortSpec { spec: String, reason: String },

    #[error("Rule {rule} is invalid: {reason}")]
    InvalidRule { rule: String, reason: String },

    #[error("Duplicate rule id: {id}")]
    DuplicateRule { id: String },

    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Rule not found: {id}")]
    RuleNotFound { id: String },
}
