//! devkit-detect CLI entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use console::style;
use devkit_detect::cli::{resolve_config, Cli, CommandDispatcher};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("devkit_detect=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("devkit_detect=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("devkit-detect starting with args: {:?}", cli);

    let result = resolve_config(&cli).and_then(|config| {
        tracing::debug!("Using cache file {}", config.cache_path().display());
        let dispatcher = CommandDispatcher::new(config);
        dispatcher.dispatch(&cli.command, &mut io::stdout().lock())
    });

    match result {
        Ok(result) => ExitCode::from(result.process_exit_code()),
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            ExitCode::from(1)
        }
    }
}
