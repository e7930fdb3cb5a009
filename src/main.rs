//! cairn CLI entry point.

use std::process::ExitCode;

use cairn::cli::{commands, Cli};
use cairn::env::Environment;
use cairn::error::{CairnError, EXIT_UPDATE_AVAILABLE};
use cairn::ui;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("cairn=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cairn=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }
    ui::set_quiet(cli.quiet);

    let env = match Environment::detect() {
        Ok(env) => env,
        Err(e) => {
            ui::error(&format!("Error: {e}"));
            return ExitCode::from(1);
        }
    };

    match commands::dispatch(&cli, &env) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(CairnError::UpdateAvailable { current, latest }) => {
            ui::info(&format!("update available: {current} -> {latest}"));
            ExitCode::from(EXIT_UPDATE_AVAILABLE)
        }
        Err(e) => {
            ui::error(&format!("Error: {e}"));
            ExitCode::from(1)
        }
    }
}
