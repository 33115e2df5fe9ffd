//! Navigation step classification.

use crate::flow::{Step, StepKind};

/// Decides whether a step causes a full page transition.
///
/// Implementations must be pure: the bracketer may call this at most once
/// per step and relies on the answer being stable.
pub trait StepClassifier {
    /// `true` when `step` should be measured as a navigation.
    fn is_navigation_step(&self, step: &Step) -> bool;
}

/// Classifies `navigate` steps, and any step whose recording asserted a
/// navigation event, as navigations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssertedEventClassifier;

impl StepClassifier for AssertedEventClassifier {
    fn is_navigation_step(&self, step: &Step) -> bool {
        matches!(step.kind, StepKind::Navigate { .. }) || step.asserts_navigation()
    }
}

impl<F> StepClassifier for F
where
    F: Fn(&Step) -> bool,
{
    fn is_navigation_step(&self, step: &Step) -> bool {
        self(step)
    }
}
