mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::Settings;
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Logs go to stderr so structured output on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands resolve the file themselves; `init` must work even
        // when the existing one is broken.
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "unifly-audit", &mut std::io::stdout());
            Ok(())
        }

        Command::Audit(args) => {
            let settings = Settings::resolve(&cli.global)?;
            tracing::debug!(snapshot = %args.snapshot.display(), "dispatching audit");
            commands::audit::handle(args, &settings)
        }

        Command::Overlap(args) => {
            let settings = Settings::resolve(&cli.global)?;
            commands::overlap::handle(args, &settings)
        }

        Command::Rules(args) => {
            let settings = Settings::resolve(&cli.global)?;
            commands::rules::handle(args, &settings)
        }
    }
}
