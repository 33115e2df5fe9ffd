//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// flowscript: turn recorded browser flows into Lighthouse user-flow scripts
#[derive(Parser, Debug)]
#[command(name = "flowscript")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a replay script from a recording
    Stringify(StringifyArgs),

    /// Show how a recording will be split into measurements
    Inspect(InspectArgs),

    /// Check a generated script against its manifest
    Verify(VerifyArgs),
}

/// Arguments for the stringify command
#[derive(Parser, Debug)]
pub struct StringifyArgs {
    /// Recorder JSON file
    pub flow: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Plain Puppeteer replay without Lighthouse instrumentation
    #[arg(long)]
    pub plain: bool,

    /// Write <OUTPUT>.manifest.json next to the script
    #[arg(long, requires = "output")]
    pub manifest: bool,

    /// YAML file with script options (indent, timeout_ms)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Default page timeout in milliseconds (overrides --config)
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the inspect command
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Recorder JSON file
    pub flow: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: InspectFormat,
}

/// Arguments for the verify command
#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Generated script
    pub script: PathBuf,
}

/// Inspect output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InspectFormat {
    /// Human-readable table
    #[default]
    Text,
    /// JSON document
    Json,
}

/// Color output argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::config::ColorChoice;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_stringify_command() {
            let cli = Cli::parse_from(["flowscript", "stringify", "flow.json"]);
            match cli.command {
                Commands::Stringify(args) => {
                    assert_eq!(args.flow, PathBuf::from("flow.json"));
                    assert!(args.output.is_none());
                    assert!(!args.plain);
                    assert!(!args.manifest);
                }
                other => panic!("expected stringify, got {other:?}"),
            }
        }

        #[test]
        fn test_parse_stringify_all_flags() {
            let cli = Cli::parse_from([
                "flowscript",
                "stringify",
                "flow.json",
                "-o",
                "flow.js",
                "--plain",
                "--manifest",
                "--config",
                "opts.yaml",
                "--timeout",
                "9000",
            ]);
            let Commands::Stringify(args) = cli.command else {
                panic!("expected stringify");
            };
            assert_eq!(args.output, Some(PathBuf::from("flow.js")));
            assert!(args.plain);
            assert!(args.manifest);
            assert_eq!(args.config, Some(PathBuf::from("opts.yaml")));
            assert_eq!(args.timeout, Some(9000));
        }

        #[test]
        fn test_manifest_requires_output() {
            let result =
                Cli::try_parse_from(["flowscript", "stringify", "flow.json", "--manifest"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_parse_inspect_json() {
            let cli = Cli::parse_from(["flowscript", "inspect", "flow.json", "--format", "json"]);
            let Commands::Inspect(args) = cli.command else {
                panic!("expected inspect");
            };
            assert_eq!(args.format, InspectFormat::Json);
        }

        #[test]
        fn test_parse_verify() {
            let cli = Cli::parse_from(["flowscript", "verify", "flow.js"]);
            assert!(matches!(cli.command, Commands::Verify(_)));
        }

        #[test]
        fn test_global_flags() {
            let cli = Cli::parse_from([
                "flowscript",
                "inspect",
                "flow.json",
                "-vv",
                "--color",
                "never",
            ]);
            assert_eq!(cli.verbose, 2);
            assert!(!cli.quiet);
            assert!(matches!(cli.color, ColorArg::Never));
        }

        #[test]
        fn test_missing_subcommand_fails() {
            assert!(Cli::try_parse_from(["flowscript"]).is_err());
        }
    }

    mod color_arg_tests {
        use super::*;

        #[test]
        fn test_color_conversion() {
            assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
            assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
            assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
        }
    }
}
