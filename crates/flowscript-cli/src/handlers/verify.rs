//! Verify command handler

use crate::commands::VerifyArgs;
use crate::error::CliResult;
use crate::output::Reporter;
use flowscript::manifest::verify;

/// Execute the verify command
pub fn execute_verify(args: &VerifyArgs, reporter: &Reporter) -> CliResult<()> {
    let manifest = verify(&args.script)?;
    reporter.success(&format!(
        "{} matches its manifest ({} {}, {})",
        args.script.display(),
        manifest.generation.tool,
        manifest.generation.version,
        manifest.generation.timestamp
    ));
    Ok(())
}
