//! ojs - OpenStack Swift CLI Client
//!
//! A command-line interface for Swift compatible object storage services.
//! Designed for ConoHa object storage and other Keystone v2 backends.

use clap::Parser;
use clap::error::ErrorKind;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use ojs_cli::commands::{self, Cli};
use ojs_cli::exit_code::ExitCode;

const DEBUG_FILTER: &str = "ojs_core=debug,ojs_swift=debug,ojs_cli=debug";

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayVersion => ExitCode::Success,
                ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    ExitCode::Usage
                }
                _ => ExitCode::ParseFlagError,
            };
            let _ = e.print();
            std::process::exit(code.as_i32());
        }
    };

    init_tracing(cli.debug);

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}

/// Initialize the tracing subscriber; logs go to stderr
///
/// `RUST_LOG` wins over `--debug`.
fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new(DEBUG_FILTER)
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
