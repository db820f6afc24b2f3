//! CLI configuration: thin wrapper around `unifly_audit_config`.
//!
//! Re-exports the shared types and resolves the effective output settings,
//! where `GlobalOpts` flags win over `[defaults]` from the config file.

use std::path::PathBuf;

use clap::ValueEnum;

use unifly_audit_core::Severity;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat, SeverityArg};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use unifly_audit_config::{Config, config_path, load_config, save_config};

// ── Resolved settings ───────────────────────────────────────────────

/// Everything a command needs to render, after flags and config are merged.
#[derive(Debug)]
pub struct Settings {
    pub output: OutputFormat,
    pub color: ColorMode,
    pub quiet: bool,
    pub config: Config,
}

impl Settings {
    pub fn resolve(global: &GlobalOpts) -> Result<Self, CliError> {
        let config = load_config(global.config.as_deref())?;
        Ok(Self::merge(global, config))
    }

    fn merge(global: &GlobalOpts, config: Config) -> Self {
        let output = global
            .output
            .or_else(|| OutputFormat::from_str(&config.defaults.output, true).ok())
            .unwrap_or(OutputFormat::Table);
        let color = global
            .color
            .or_else(|| ColorMode::from_str(&config.defaults.color, true).ok())
            .unwrap_or(ColorMode::Auto);

        Self {
            output,
            color,
            quiet: global.quiet,
            config,
        }
    }
}

/// Path the config is read from: `--config` or the platform default.
pub fn active_config_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

pub fn severity(arg: SeverityArg) -> Severity {
    match arg {
        SeverityArg::Low => Severity::Low,
        SeverityArg::Medium => Severity::Medium,
        SeverityArg::High => Severity::High,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global() -> GlobalOpts {
        GlobalOpts {
            config: None,
            output: None,
            color: None,
            verbose: 0,
            quiet: false,
        }
    }

    #[test]
    fn config_defaults_apply_without_flags() {
        let mut config = Config::default();
        config.defaults.output = "json-compact".into();
        config.defaults.color = "never".into();

        let settings = Settings::merge(&global(), config);
        assert_eq!(settings.output, OutputFormat::JsonCompact);
        assert_eq!(settings.color, ColorMode::Never);
    }

    #[test]
    fn flags_override_config() {
        let mut config = Config::default();
        config.defaults.output = "yaml".into();
        let opts = GlobalOpts {
            output: Some(OutputFormat::Plain),
            ..global()
        };

        assert_eq!(Settings::merge(&opts, config).output, OutputFormat::Plain);
    }

    #[test]
    fn severity_args_map_one_to_one() {
        assert_eq!(severity(SeverityArg::Low), Severity::Low);
        assert_eq!(severity(SeverityArg::Medium), Severity::Medium);
        assert_eq!(severity(SeverityArg::High), Severity::High);
    }
}
