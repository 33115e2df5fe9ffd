//! Lighthouse user-flow instrumentation.
//!
//! [`AuditedRenderer`] decorates a base [`StepRenderer`] so the generated
//! replay also drives a Lighthouse flow: the preamble starts the flow, each
//! step is wrapped in the directives chosen by [`BracketState`], and the
//! finalizer closes any open timespan before the report is generated and
//! written next to the script.

use crate::bracket::{BracketState, Directive, StepClass, FLOW_HANDLE};
use crate::classify::{AssertedEventClassifier, StepClassifier};
use crate::codegen::emit_stmts;
use crate::error::Result;
use crate::flow::{Flow, Step};
use crate::hir::{Expr, Stmt};
use crate::renderer::StepRenderer;
use crate::scanner::{scan, SessionConfig};
use crate::writer::LineWriter;

/// Module path of the Lighthouse user-flow API.
pub const LIGHTHOUSE_API_MODULE: &str = "lighthouse/lighthouse-core/fraggle-rock/api.js";

/// Module path of the desktop Lighthouse config.
pub const DESKTOP_CONFIG_MODULE: &str = "lighthouse/lighthouse-core/config/desktop-config.js";

/// Report file written next to the generated script.
pub const REPORT_FILE_NAME: &str = "flow.report.html";

/// Imports and config selection, emitted before the base prologue.
#[must_use]
pub fn preamble_stmts(session: SessionConfig) -> Vec<Stmt> {
    let config = if session.use_mobile_config {
        Expr::Undefined
    } else {
        Expr::require(DESKTOP_CONFIG_MODULE)
    };
    vec![
        Stmt::const_unchecked("fs", Expr::require("fs")),
        Stmt::const_unchecked("lhApi", Expr::require(LIGHTHOUSE_API_MODULE)),
        Stmt::const_unchecked("config", config),
    ]
}

/// `const lhFlow = await lhApi.startFlow(page, {...});`
///
/// Screen emulation is disabled because the replay's own `setViewport`
/// steps already control it.
#[must_use]
pub fn start_flow_stmt(flow: &Flow) -> Stmt {
    let config_context = Expr::object(vec![(
        "settingsOverrides",
        Expr::object(vec![(
            "screenEmulation",
            Expr::object(vec![("disabled", Expr::bool(true))]),
        )]),
    )]);
    let options = Expr::object(vec![
        ("name", Expr::str(flow.display_name())),
        ("config", Expr::ident_unchecked("config")),
        ("configContext", config_context),
    ]);
    Stmt::const_unchecked(
        FLOW_HANDLE,
        Expr::ident_unchecked("lhApi")
            .dot_unchecked("startFlow")
            .call(vec![Expr::ident_unchecked("page"), options])
            .await_expr(),
    )
}

/// Report generation and persistence, emitted after the last bracket closes.
#[must_use]
pub fn report_stmts() -> Vec<Stmt> {
    vec![
        Stmt::const_unchecked(
            "lhFlowReport",
            Expr::ident_unchecked(FLOW_HANDLE)
                .dot_unchecked("generateReport")
                .call(vec![])
                .await_expr(),
        ),
        Stmt::expr(
            Expr::ident_unchecked("fs")
                .dot_unchecked("writeFileSync")
                .call(vec![
                    Expr::ident_unchecked("__dirname").add(Expr::str(format!("/{REPORT_FILE_NAME}"))),
                    Expr::ident_unchecked("lhFlowReport"),
                ]),
        ),
    ]
}

/// Decorator that brackets an inner renderer's steps in Lighthouse
/// navigation and timespan measurements.
#[derive(Debug, Clone)]
pub struct AuditedRenderer<R, C = AssertedEventClassifier> {
    inner: R,
    classifier: C,
    state: BracketState,
}

impl<R: StepRenderer> AuditedRenderer<R> {
    /// Wrap `inner` using the default navigation classifier.
    pub fn new(inner: R) -> Self {
        Self::with_classifier(inner, AssertedEventClassifier)
    }
}

impl<R: StepRenderer, C: StepClassifier> AuditedRenderer<R, C> {
    /// Wrap `inner` using `classifier` to detect navigations.
    pub fn with_classifier(inner: R, classifier: C) -> Self {
        Self {
            inner,
            classifier,
            state: BracketState::Idle,
        }
    }

    /// Current bracket state.
    pub const fn state(&self) -> BracketState {
        self.state
    }

    /// Unwrap the inner renderer.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn emit_directives(out: &mut dyn LineWriter, directives: &[Directive]) {
        for directive in directives {
            tracing::debug!(directive = directive.method(), "emitting directive");
            emit_stmts(&[directive.to_stmt()], out);
        }
    }
}

impl<R: StepRenderer, C: StepClassifier> StepRenderer for AuditedRenderer<R, C> {
    fn before_all(&mut self, out: &mut dyn LineWriter, flow: &Flow) -> Result<()> {
        self.state = BracketState::Idle;
        let session = scan(flow);
        emit_stmts(&preamble_stmts(session), out);
        self.inner.before_all(out, flow)?;
        emit_stmts(&[start_flow_stmt(flow)], out);
        Ok(())
    }

    fn render_step(&mut self, out: &mut dyn LineWriter, step: &Step) -> Result<()> {
        let class = StepClass::of(step, &self.classifier);
        let transition = self.state.on_step(class);
        Self::emit_directives(out, transition.before);
        self.state = transition.next;
        self.inner.render_step(out, step)?;
        Self::emit_directives(out, transition.after);
        Ok(())
    }

    fn after_all(&mut self, out: &mut dyn LineWriter, flow: &Flow) -> Result<()> {
        if let Some(closing) = self.state.finish() {
            Self::emit_directives(out, &[closing]);
        }
        self.state = BracketState::Idle;
        emit_stmts(&report_stmts(), out);
        self.inner.after_all(out, flow)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codegen::stmt_to_js;
    use crate::writer::InMemoryLineWriter;
    use pretty_assertions::assert_eq;

    /// Renders each step as a one-line marker so tests can read the
    /// directive interleaving directly.
    #[derive(Debug, Default)]
    struct MarkerRenderer {
        rendered: usize,
    }

    impl StepRenderer for MarkerRenderer {
        fn before_all(&mut self, out: &mut dyn LineWriter, _flow: &Flow) -> Result<()> {
            out.append_line("<before>");
            Ok(())
        }

        fn render_step(&mut self, out: &mut dyn LineWriter, step: &Step) -> Result<()> {
            self.rendered += 1;
            out.append_line(&format!("<{}>", step.type_name()));
            Ok(())
        }

        fn after_all(&mut self, out: &mut dyn LineWriter, _flow: &Flow) -> Result<()> {
            out.append_line("<after>");
            Ok(())
        }
    }

    fn run(flow: &Flow) -> Vec<String> {
        let mut renderer = AuditedRenderer::new(MarkerRenderer::default());
        let mut out = InMemoryLineWriter::default();
        renderer.before_all(&mut out, flow).unwrap();
        for step in &flow.steps {
            renderer.render_step(&mut out, step).unwrap();
        }
        renderer.after_all(&mut out, flow).unwrap();
        assert_eq!(renderer.state(), BracketState::Idle);
        assert_eq!(renderer.into_inner().rendered, flow.steps.len());
        out.lines().to_vec()
    }

    #[test]
    fn preamble_mobile_and_desktop() {
        let mobile: Vec<_> = preamble_stmts(SessionConfig::default())
            .iter()
            .map(stmt_to_js)
            .collect();
        assert_eq!(
            mobile,
            [
                r#"const fs = require("fs");"#,
                r#"const lhApi = require("lighthouse/lighthouse-core/fraggle-rock/api.js");"#,
                "const config = undefined;",
            ]
        );

        let desktop = preamble_stmts(SessionConfig {
            use_mobile_config: false,
        });
        assert_eq!(
            stmt_to_js(&desktop[2]),
            r#"const config = require("lighthouse/lighthouse-core/config/desktop-config.js");"#
        );
    }

    #[test]
    fn start_flow_uses_title() {
        let flow = Flow::new(Some("Checkout 'fast'".into()), vec![]);
        assert_eq!(
            stmt_to_js(&start_flow_stmt(&flow)),
            concat!(
                r#"const lhFlow = await lhApi.startFlow(page, {name: "Checkout 'fast'", "#,
                r#"config: config, configContext: {settingsOverrides: {screenEmulation: {disabled: true}}}});"#
            )
        );
    }

    #[test]
    fn start_flow_without_title_is_undefined_string() {
        let js = stmt_to_js(&start_flow_stmt(&Flow::default()));
        assert!(js.contains(r#"{name: "undefined", "#));
    }

    #[test]
    fn report_lines() {
        let lines: Vec<_> = report_stmts().iter().map(stmt_to_js).collect();
        assert_eq!(
            lines,
            [
                "const lhFlowReport = await lhFlow.generateReport();",
                r#"fs.writeFileSync(__dirname + "/flow.report.html", lhFlowReport);"#,
            ]
        );
    }

    #[test]
    fn desktop_click_navigate_click() {
        let flow = Flow::new(
            None,
            vec![
                Step::set_viewport(1280, 720, false),
                Step::click("#a"),
                Step::navigate("https://a.test"),
                Step::click("#b"),
            ],
        );
        assert_eq!(
            run(&flow),
            [
                r#"const fs = require("fs");"#,
                r#"const lhApi = require("lighthouse/lighthouse-core/fraggle-rock/api.js");"#,
                r#"const config = require("lighthouse/lighthouse-core/config/desktop-config.js");"#,
                "<before>",
                r#"const lhFlow = await lhApi.startFlow(page, {name: "undefined", config: config, configContext: {settingsOverrides: {screenEmulation: {disabled: true}}}});"#,
                "<setViewport>",
                "await lhFlow.startTimespan();",
                "<click>",
                "await lhFlow.endTimespan();",
                "await lhFlow.startNavigation();",
                "<navigate>",
                "await lhFlow.endNavigation();",
                "await lhFlow.startTimespan();",
                "<click>",
                "await lhFlow.endTimespan();",
                "const lhFlowReport = await lhFlow.generateReport();",
                r#"fs.writeFileSync(__dirname + "/flow.report.html", lhFlowReport);"#,
                "<after>",
            ]
        );
    }

    #[test]
    fn single_navigation_never_opens_timespan() {
        let lines = run(&Flow::new(None, vec![Step::navigate("https://a.test")]));
        assert_eq!(
            &lines[5..],
            [
                "await lhFlow.startNavigation();",
                "<navigate>",
                "await lhFlow.endNavigation();",
                "const lhFlowReport = await lhFlow.generateReport();",
                r#"fs.writeFileSync(__dirname + "/flow.report.html", lhFlowReport);"#,
                "<after>",
            ]
        );
        assert!(!lines.iter().any(|l| l.contains("Timespan")));
    }

    #[test]
    fn consecutive_interactions_share_one_timespan() {
        let lines = run(&Flow::new(
            None,
            vec![Step::click("#a"), Step::key_down("x"), Step::change("#b", "c")],
        ));
        let starts = lines.iter().filter(|l| l.contains("startTimespan")).count();
        let ends = lines.iter().filter(|l| l.contains("endTimespan")).count();
        assert_eq!((starts, ends), (1, 1));
    }

    #[test]
    fn viewport_inside_timespan_keeps_it_open() {
        let lines = run(&Flow::new(
            None,
            vec![
                Step::click("#a"),
                Step::set_viewport(390, 844, true),
                Step::click("#b"),
            ],
        ));
        assert_eq!(
            &lines[5..9],
            [
                "await lhFlow.startTimespan();",
                "<click>",
                "<setViewport>",
                "<click>",
            ]
        );
        assert_eq!(lines[2], "const config = undefined;");
    }

    #[test]
    fn custom_classifier_is_used() {
        let keys_navigate = |step: &Step| step.type_name() == "keyDown";
        let mut renderer =
            AuditedRenderer::with_classifier(MarkerRenderer::default(), keys_navigate);
        let mut out = InMemoryLineWriter::default();
        renderer
            .render_step(&mut out, &Step::key_down("Enter"))
            .unwrap();
        assert_eq!(
            out.lines(),
            [
                "await lhFlow.startNavigation();",
                "<keyDown>",
                "await lhFlow.endNavigation();",
            ]
        );
    }

    #[test]
    fn state_is_reset_between_runs() {
        let flow = Flow::new(None, vec![Step::click("#a")]);
        let mut renderer = AuditedRenderer::new(MarkerRenderer::default());
        let mut out = InMemoryLineWriter::default();
        renderer.before_all(&mut out, &flow).unwrap();
        renderer.render_step(&mut out, &flow.steps[0]).unwrap();
        assert_eq!(renderer.state(), BracketState::TimespanOpen);

        // Abandoned run: the next before_all starts from Idle again.
        let mut out = InMemoryLineWriter::default();
        renderer.before_all(&mut out, &flow).unwrap();
        assert_eq!(renderer.state(), BracketState::Idle);
    }
}
