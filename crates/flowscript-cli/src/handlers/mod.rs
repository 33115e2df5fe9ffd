//! Command handlers - extracted from main.rs for testability

pub mod inspect;
pub mod stringify;
pub mod verify;

pub use inspect::{build_report, execute_inspect, render_text, InspectReport};
pub use stringify::{execute_stringify, load_options, regenerate_command, render_script};
pub use verify::execute_verify;

use crate::error::{CliError, CliResult};
use flowscript::Flow;
use std::path::Path;

/// Read a recording, returning its raw JSON and the parsed flow.
pub fn read_flow(path: &Path) -> CliResult<(String, Flow)> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        CliError::invalid_argument(format!("cannot read {}: {e}", path.display()))
    })?;
    let flow = Flow::from_json(&json)?;
    tracing::debug!(path = %path.display(), steps = flow.steps.len(), "loaded flow");
    Ok((json, flow))
}
