//! Read-only pre-pass that derives session configuration from a flow.

use crate::flow::{Flow, Step};
use serde::{Deserialize, Serialize};

/// Session-level settings decided before any script text is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Use the default (mobile) audit config instead of the desktop one
    pub use_mobile_config: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            use_mobile_config: true,
        }
    }
}

/// Scan `flow` for its final emulation state.
///
/// The last `setViewport` step decides; earlier ones are overwritten.
/// With no viewport steps the session stays mobile.
#[must_use]
pub fn scan(flow: &Flow) -> SessionConfig {
    let use_mobile_config = flow
        .steps
        .iter()
        .rev()
        .find_map(Step::viewport_is_mobile)
        .unwrap_or(SessionConfig::default().use_mobile_config);

    tracing::debug!(use_mobile_config, "scanned flow emulation");
    SessionConfig { use_mobile_config }
}
