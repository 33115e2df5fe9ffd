//! Measurement bracketing state machine.
//!
//! Each step is placed in exactly one of three segments:
//!
//! - viewport changes sit outside every bracket;
//! - navigations get their own bracket, opened and closed around the step;
//! - every other step joins the currently open timespan, opening one if
//!   none is running. A timespan stays open until the next navigation or
//!   the end of the flow.
//!
//! The transition function is pure. [`crate::audit::AuditedRenderer`]
//! drives it and writes the directives it returns.

use crate::classify::StepClassifier;
use crate::flow::{Flow, Step};
use crate::hir::{Expr, Stmt};
use serde::{Deserialize, Serialize};

/// Identifier of the audit flow handle in generated scripts.
pub const FLOW_HANDLE: &str = "lhFlow";

/// Lifecycle call emitted around rendered steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Directive {
    /// `await lhFlow.startNavigation();`
    StartNavigation,
    /// `await lhFlow.endNavigation();`
    EndNavigation,
    /// `await lhFlow.startTimespan();`
    StartTimespan,
    /// `await lhFlow.endTimespan();`
    EndTimespan,
}

impl Directive {
    /// Method invoked on the flow handle.
    #[must_use]
    pub const fn method(self) -> &'static str {
        match self {
            Self::StartNavigation => "startNavigation",
            Self::EndNavigation => "endNavigation",
            Self::StartTimespan => "startTimespan",
            Self::EndTimespan => "endTimespan",
        }
    }

    /// The awaited call as a statement.
    #[must_use]
    pub fn to_stmt(self) -> Stmt {
        Stmt::expr(
            Expr::ident_unchecked(FLOW_HANDLE)
                .dot_unchecked(self.method())
                .call(vec![])
                .await_expr(),
        )
    }
}

/// How the bracketer treats a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepClass {
    /// Device emulation change; never bracketed
    ViewportChange,
    /// Full page transition; bracketed alone
    Navigation,
    /// Anything else; batched into timespans
    Interaction,
}

impl StepClass {
    /// Classify `step`. Viewport changes are recognised before the
    /// classifier is consulted.
    pub fn of<C: StepClassifier + ?Sized>(step: &Step, classifier: &C) -> Self {
        if step.is_viewport_change() {
            Self::ViewportChange
        } else if classifier.is_navigation_step(step) {
            Self::Navigation
        } else {
            Self::Interaction
        }
    }
}

/// Bracket state between steps. Navigation brackets never outlive the
/// step that opened them, so only an open timespan needs remembering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BracketState {
    /// No bracket open
    #[default]
    Idle,
    /// A timespan was opened by an earlier step and is still running
    TimespanOpen,
}

/// Result of feeding one step to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Directives to emit before the step's rendered code
    pub before: &'static [Directive],
    /// Directives to emit after the step's rendered code
    pub after: &'static [Directive],
    /// State after the step
    pub next: BracketState,
}

impl BracketState {
    /// Whether a timespan is running.
    #[must_use]
    pub const fn is_timespan_open(self) -> bool {
        matches!(self, Self::TimespanOpen)
    }

    /// Transition for a step of class `class`.
    #[must_use]
    pub const fn on_step(self, class: StepClass) -> Transition {
        use Directive::*;

        match (self, class) {
            (state, StepClass::ViewportChange) => Transition {
                before: &[],
                after: &[],
                next: state,
            },
            (Self::Idle, StepClass::Navigation) => Transition {
                before: &[StartNavigation],
                after: &[EndNavigation],
                next: Self::Idle,
            },
            (Self::TimespanOpen, StepClass::Navigation) => Transition {
                before: &[EndTimespan, StartNavigation],
                after: &[EndNavigation],
                next: Self::Idle,
            },
            (Self::Idle, StepClass::Interaction) => Transition {
                before: &[StartTimespan],
                after: &[],
                next: Self::TimespanOpen,
            },
            (Self::TimespanOpen, StepClass::Interaction) => Transition {
                before: &[],
                after: &[],
                next: Self::TimespanOpen,
            },
        }
    }

    /// Directive that closes whatever is still open at the end of a flow.
    #[must_use]
    pub const fn finish(self) -> Option<Directive> {
        match self {
            Self::Idle => None,
            Self::TimespanOpen => Some(Directive::EndTimespan),
        }
    }
}

/// Which measurement a step ends up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "segment", rename_all = "snake_case")]
pub enum Segment {
    /// Outside every bracket
    Unmeasured,
    /// The n-th navigation (0-based)
    Navigation {
        /// Measurement index within its kind
        index: usize,
    },
    /// The n-th timespan (0-based)
    Timespan {
        /// Measurement index within its kind
        index: usize,
    },
}

/// One row of a [`BracketPlan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedStep {
    /// Position in the flow
    pub position: usize,
    /// Recorder type tag
    pub step_type: String,
    /// How the step was classified
    pub class: StepClass,
    /// Measurement the step belongs to
    pub segment: Segment,
    /// Directives emitted before the step
    pub before: Vec<Directive>,
    /// Directives emitted after the step
    pub after: Vec<Directive>,
}

/// Dry run of the state machine over a whole flow, without rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketPlan {
    /// Per-step placement
    pub steps: Vec<PlannedStep>,
    /// Directive emitted by the finalizer, if any
    pub closing: Option<Directive>,
    /// Number of navigation measurements
    pub navigations: usize,
    /// Number of timespan measurements
    pub timespans: usize,
}

impl BracketPlan {
    /// Plan `flow` with `classifier`.
    pub fn build<C: StepClassifier + ?Sized>(flow: &Flow, classifier: &C) -> Self {
        let mut state = BracketState::Idle;
        let mut navigations = 0;
        let mut timespans = 0;
        let mut steps = Vec::with_capacity(flow.steps.len());

        for (position, step) in flow.steps.iter().enumerate() {
            let class = StepClass::of(step, classifier);
            let transition = state.on_step(class);

            let segment = match class {
                StepClass::ViewportChange => Segment::Unmeasured,
                StepClass::Navigation => {
                    navigations += 1;
                    Segment::Navigation {
                        index: navigations - 1,
                    }
                }
                StepClass::Interaction => {
                    if !state.is_timespan_open() {
                        timespans += 1;
                    }
                    Segment::Timespan {
                        index: timespans - 1,
                    }
                }
            };

            steps.push(PlannedStep {
                position,
                step_type: step.type_name().to_string(),
                class,
                segment,
                before: transition.before.to_vec(),
                after: transition.after.to_vec(),
            });
            state = transition.next;
        }

        Self {
            steps,
            closing: state.finish(),
            navigations,
            timespans,
        }
    }
}
