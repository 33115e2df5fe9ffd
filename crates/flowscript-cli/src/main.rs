//! flowscript: generate Lighthouse user-flow scripts from recordings
//!
//! ## Usage
//!
//! ```bash
//! flowscript stringify recording.json                  # Script to stdout
//! flowscript stringify recording.json -o flow.js --manifest
//! flowscript inspect recording.json --format json      # Measurement plan
//! flowscript verify flow.js                            # Detect hand edits
//! ```

use clap::Parser;
use flowscript_cli::{
    handlers, init_logging, Cli, CliConfig, CliResult, ColorChoice, Commands, Reporter, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    init_logging(&config);
    let reporter = Reporter::from_config(&config);

    match cli.command {
        Commands::Stringify(args) => handlers::execute_stringify(&args, &reporter),
        Commands::Inspect(args) => handlers::execute_inspect(&args),
        Commands::Verify(args) => handlers::execute_verify(&args, &reporter),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_quiet_wins() {
        let cli = Cli::parse_from(["flowscript", "-q", "-vv", "verify", "flow.js"]);
        let config = build_config(&cli);
        assert_eq!(config.verbosity, Verbosity::Quiet);
    }

    #[test]
    fn test_build_config_color() {
        let cli = Cli::parse_from(["flowscript", "--color", "always", "verify", "flow.js"]);
        assert_eq!(build_config(&cli).color, ColorChoice::Always);
    }
}
