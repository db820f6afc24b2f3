//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use unifly_audit_config::ConfigError;
use unifly_audit_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Snapshot ─────────────────────────────────────────────────────

    #[error("Could not read snapshot {path}")]
    #[diagnostic(
        code(unifly_audit::snapshot_unreadable),
        help("Check that the file exists and is readable.")
    )]
    SnapshotUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse {format} snapshot: {reason}")]
    #[diagnostic(
        code(unifly_audit::parse_failed),
        help(
            "A snapshot holds normalized rules, e.g. {{\"rules\": [{{\"id\": \"...\"}}]}}.\n\
             The format is picked from the extension: .json, .yaml/.yml or .toml."
        )
    )]
    ParseFailed { format: String, reason: String },

    #[error("Snapshot is invalid: {reason}")]
    #[diagnostic(
        code(unifly_audit::invalid_snapshot),
        help("Fix the offending rule in the snapshot and run again.")
    )]
    InvalidSnapshot { reason: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(unifly_audit::not_found),
        help("Run: unifly-audit {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Audit outcome ────────────────────────────────────────────────

    #[error("{count} finding(s) at or above '{threshold}' severity")]
    #[diagnostic(
        code(unifly_audit::findings),
        help("Resolve the reported rules, or raise the threshold with --fail-on.")
    )]
    FindingsAtThreshold { count: usize, threshold: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(unifly_audit::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(unifly_audit::config),
        help("Inspect the resolved settings with: unifly-audit config show")
    )]
    Config(Box<figment::Error>),

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(unifly_audit::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error("Failed to render {format} output: {reason}")]
    #[diagnostic(code(unifly_audit::render))]
    Render { format: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::InvalidSnapshot { .. } | Self::ConfigExists { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Io(source) => CliError::Io(source),

            CoreError::Json(e) => CliError::ParseFailed {
                format: "json".into(),
                reason: e.to_string(),
            },
            CoreError::Yaml(e) => CliError::ParseFailed {
                format: "yaml".into(),
                reason: e.to_string(),
            },
            CoreError::Toml(e) => CliError::ParseFailed {
                format: "toml".into(),
                reason: e.to_string(),
            },

            err @ (CoreError::InvalidPortSpec { .. }
            | CoreError::InvalidRule { .. }
            | CoreError::DuplicateRule { .. }) => CliError::InvalidSnapshot {
                reason: err.to_string(),
            },

            CoreError::RuleNotFound { id } => CliError::NotFound {
                resource_type: "rule".into(),
                identifier: id,
                list_command: "rules <SNAPSHOT>".into(),
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Serialization(e) => CliError::Render {
                format: "toml".into(),
                reason: e.to_string(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
