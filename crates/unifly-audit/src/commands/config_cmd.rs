//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Settings};
use crate::error::CliError;
use crate::output;

fn config_detail(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|_| format!("{cfg:#?}"))
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::active_config_path(global);

    match args.command {
        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let settings = Settings::resolve(global)?;
            let out = output::render_single(
                settings.output,
                &settings.config,
                config_detail,
                |_| path.display().to_string(),
            )?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        // ── Init: write defaults ────────────────────────────────────
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            config::save_config(&Config::default(), &path)?;
            tracing::info!(path = %path.display(), "config written");
            if !global.quiet {
                eprintln!("✓ Configuration written to {}", path.display());
            }
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
    }
}
