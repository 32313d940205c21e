//! Baton CLI binary entry point.

use baton::cli::Cli;
use baton::config::RunConfig;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let cli = Cli::parse_args();

    let config = match RunConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if !config.tracing_disabled {
        let default_level = if cli.verbose { "debug" } else { "warn" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match baton::cli::run(&cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
