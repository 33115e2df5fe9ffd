//! Inspect command handler

use super::read_flow;
use crate::commands::{InspectArgs, InspectFormat};
use crate::error::CliResult;
use flowscript::bracket::PlannedStep;
use flowscript::{scan, AssertedEventClassifier, BracketPlan, Directive, Flow, Segment, SessionConfig};
use serde::Serialize;

/// What the generated script will measure, without rendering it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    /// Flow display name
    pub title: String,
    /// Session configuration chosen by the scanner
    pub session: SessionConfig,
    /// Bracket placement per step
    pub plan: BracketPlan,
}

/// Scan and plan `flow` with the default classifier.
#[must_use]
pub fn build_report(flow: &Flow) -> InspectReport {
    InspectReport {
        title: flow.display_name().to_string(),
        session: scan(flow),
        plan: BracketPlan::build(flow, &AssertedEventClassifier),
    }
}

fn segment_label(segment: Segment) -> String {
    match segment {
        Segment::Unmeasured => "unmeasured".to_string(),
        Segment::Navigation { index } => format!("navigation #{}", index + 1),
        Segment::Timespan { index } => format!("timespan #{}", index + 1),
    }
}

fn directives_label(directives: &[Directive]) -> String {
    directives
        .iter()
        .map(|d| d.method())
        .collect::<Vec<_>>()
        .join(", ")
}

fn step_row(step: &PlannedStep) -> String {
    let mut row = format!(
        "{:>4}  {:<26}{}",
        step.position,
        step.step_type,
        segment_label(step.segment)
    );
    if !step.before.is_empty() {
        row.push_str(&format!("  before: {}", directives_label(&step.before)));
    }
    if !step.after.is_empty() {
        row.push_str(&format!("  after: {}", directives_label(&step.after)));
    }
    row
}

/// Human-readable report.
#[must_use]
pub fn render_text(report: &InspectReport) -> String {
    let config = if report.session.use_mobile_config {
        "mobile (default)"
    } else {
        "desktop"
    };
    let mut lines = vec![
        format!("Flow: {}", report.title),
        format!("Config: {config}"),
        format!(
            "Measurements: {} navigation(s), {} timespan(s)",
            report.plan.navigations, report.plan.timespans
        ),
        String::new(),
    ];
    lines.extend(report.plan.steps.iter().map(step_row));
    if let Some(closing) = report.plan.closing {
        lines.push(String::new());
        lines.push(format!("Closing: {}", closing.method()));
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Execute the inspect command
pub fn execute_inspect(args: &InspectArgs) -> CliResult<()> {
    let (_, flow) = read_flow(&args.flow)?;
    let report = build_report(&flow);
    match args.format {
        InspectFormat::Text => print!("{}", render_text(&report)),
        InspectFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
