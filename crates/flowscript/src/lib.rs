//! flowscript: turn recorded browser flows into Lighthouse user-flow scripts.
//!
//! A recording (Chrome DevTools Recorder JSON) is replayed as a Puppeteer
//! script. [`AuditedRenderer`] wraps the replay so it also drives a
//! Lighthouse flow, splitting it into navigation and timespan measurements:
//!
//! ```text
//! setViewport ─────────────────────────────── (no measurement)
//! click, change, keyDown ──── startTimespan … endTimespan
//! navigate ─────────────── startNavigation … endNavigation
//! click ───────────────────── startTimespan … endTimespan (closed at end)
//! ```
//!
//! # Example
//!
//! ```rust
//! use flowscript::prelude::*;
//!
//! let flow = Flow::new(
//!     Some("Checkout".into()),
//!     vec![Step::navigate("https://example.com"), Step::click("#buy")],
//! );
//! let js = lighthouse_script(&flow, &ScriptOptions::default()).unwrap();
//! assert!(js.contains("await lhFlow.startNavigation();"));
//! assert!(js.contains("flow.report.html"));
//! ```

#![warn(missing_docs)]

pub mod audit;
pub mod bracket;
mod builder;
pub mod classify;
pub mod codegen;
mod error;
pub mod flow;
pub mod hir;
pub mod manifest;
pub mod options;
pub mod renderer;
pub mod scanner;
pub mod stringify;
pub mod writer;

pub use audit::AuditedRenderer;
pub use bracket::{BracketPlan, BracketState, Directive, Segment, StepClass};
pub use classify::{AssertedEventClassifier, StepClassifier};
pub use error::{FlowScriptError, Result};
pub use flow::{Flow, Selector, Step, StepKind};
pub use options::ScriptOptions;
pub use renderer::{PuppeteerRenderer, StepRenderer};
pub use scanner::{scan, SessionConfig};
pub use stringify::{
    lighthouse_script, replay_script, stringify, stringify_into, stringify_step, stringify_with,
};
pub use writer::{InMemoryLineWriter, LineWriter};

/// Convenient imports for generating scripts.
pub mod prelude {
    pub use crate::audit::AuditedRenderer;
    pub use crate::bracket::{BracketPlan, BracketState, Directive, StepClass};
    pub use crate::classify::{AssertedEventClassifier, StepClassifier};
    pub use crate::codegen;
    pub use crate::error::{FlowScriptError, Result};
    pub use crate::flow::{Flow, Selector, Step, StepKind};
    pub use crate::hir::{Expr, Identifier, Stmt};
    pub use crate::options::ScriptOptions;
    pub use crate::renderer::{PuppeteerRenderer, StepRenderer};
    pub use crate::scanner::{scan, SessionConfig};
    pub use crate::stringify::{
        lighthouse_script, replay_script, stringify, stringify_into, stringify_step,
        stringify_with,
    };
    pub use crate::writer::{InMemoryLineWriter, LineWriter};
}
