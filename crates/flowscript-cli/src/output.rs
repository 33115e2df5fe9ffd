//! Status reporting on stderr

use crate::config::CliConfig;
use console::{style, Term};

/// Status reporter; stdout is reserved for generated scripts.
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            use_color,
            quiet,
        }
    }

    /// Reporter matching the CLI configuration
    #[must_use]
    pub fn from_config(config: &CliConfig) -> Self {
        Self::new(config.color.should_color(), config.verbosity.is_quiet())
    }

    /// Format a status line without printing it
    #[must_use]
    pub fn format_line(&self, kind: Status, message: &str) -> String {
        let prefix = if self.use_color {
            match kind {
                Status::Success => style("✓").green().bold().to_string(),
                Status::Failure => style("✗").red().bold().to_string(),
                Status::Warning => style("⚠").yellow().bold().to_string(),
                Status::Info => style("ℹ").blue().bold().to_string(),
            }
        } else {
            kind.label().to_string()
        };
        format!("{prefix} {message}")
    }

    fn emit(&self, kind: Status, message: &str) {
        if self.quiet && kind != Status::Failure {
            return;
        }
        let _ = self.term.write_line(&self.format_line(kind, message));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        self.emit(Status::Success, message);
    }

    /// Print a failure message, even in quiet mode
    pub fn failure(&self, message: &str) {
        self.emit(Status::Failure, message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        self.emit(Status::Warning, message);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        self.emit(Status::Info, message);
    }
}

/// Kind of status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Completed successfully
    Success,
    /// Failed
    Failure,
    /// Needs attention
    Warning,
    /// Informational
    Info,
}

impl Status {
    /// Plain-text prefix used without colors
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::Failure => "FAIL",
            Self::Warning => "WARN",
            Self::Info => "INFO",
        }
    }
}
