//! Step renderers.
//!
//! A [`StepRenderer`] turns a flow into script text through three hooks.
//! [`PuppeteerRenderer`] is the base replay renderer; decorators such as
//! [`crate::audit::AuditedRenderer`] wrap another renderer and add lines
//! around its output.

use crate::codegen::{emit_stmt, emit_stmts, str_to_js};
use crate::error::{FlowScriptError, Result};
use crate::flow::{Flow, Selector, Step, StepKind};
use crate::hir::{Expr, Stmt};
use crate::options::ScriptOptions;
use crate::writer::LineWriter;

/// Renders a flow into a [`LineWriter`].
///
/// The driver calls `before_all` once, `render_step` exactly once per step
/// in order, then `after_all` once.
pub trait StepRenderer {
    /// Emit the script prologue.
    fn before_all(&mut self, out: &mut dyn LineWriter, flow: &Flow) -> Result<()>;

    /// Emit the code for one step.
    fn render_step(&mut self, out: &mut dyn LineWriter, step: &Step) -> Result<()>;

    /// Emit the script epilogue.
    fn after_all(&mut self, out: &mut dyn LineWriter, flow: &Flow) -> Result<()>;
}

impl<R: StepRenderer + ?Sized> StepRenderer for Box<R> {
    fn before_all(&mut self, out: &mut dyn LineWriter, flow: &Flow) -> Result<()> {
        (**self).before_all(out, flow)
    }

    fn render_step(&mut self, out: &mut dyn LineWriter, step: &Step) -> Result<()> {
        (**self).render_step(out, step)
    }

    fn after_all(&mut self, out: &mut dyn LineWriter, flow: &Flow) -> Result<()> {
        (**self).after_all(out, flow)
    }
}

impl<R: StepRenderer + ?Sized> StepRenderer for &mut R {
    fn before_all(&mut self, out: &mut dyn LineWriter, flow: &Flow) -> Result<()> {
        (**self).before_all(out, flow)
    }

    fn render_step(&mut self, out: &mut dyn LineWriter, step: &Step) -> Result<()> {
        (**self).render_step(out, step)
    }

    fn after_all(&mut self, out: &mut dyn LineWriter, flow: &Flow) -> Result<()> {
        (**self).after_all(out, flow)
    }
}

/// Renders steps as a Puppeteer script.
///
/// The script body runs inside an async IIFE that owns `browser` and
/// `page`; each step gets its own block binding `targetPage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuppeteerRenderer {
    timeout_ms: u64,
}

impl Default for PuppeteerRenderer {
    fn default() -> Self {
        Self::new(&ScriptOptions::default())
    }
}

fn target_page() -> Expr {
    Expr::ident_unchecked("targetPage")
}

fn first_query(step: &Step, selectors: &[Selector]) -> Result<Expr> {
    selectors
        .first()
        .map(|s| Expr::str(s.to_query()))
        .ok_or_else(|| FlowScriptError::invalid_step(step.type_name(), "no selectors recorded"))
}

/// Append `{timeout: N}` when the step carries its own timeout.
fn with_timeout(step: &Step, mut args: Vec<Expr>) -> Vec<Expr> {
    if let Some(ms) = step.timeout {
        args.push(Expr::object(vec![("timeout", Expr::num(ms as f64))]));
    }
    args
}

fn offset(offset_x: f64, offset_y: f64) -> Expr {
    Expr::object(vec![("x", Expr::num(offset_x)), ("y", Expr::num(offset_y))])
}

impl PuppeteerRenderer {
    /// Create a renderer using `options.timeout_ms` as the page timeout.
    #[must_use]
    pub const fn new(options: &ScriptOptions) -> Self {
        Self {
            timeout_ms: options.timeout_ms,
        }
    }

    /// The awaited page call (or comment) that replays `step`.
    pub fn action(&self, step: &Step) -> Result<Stmt> {
        let page = target_page();
        let call = match &step.kind {
            StepKind::SetViewport { width, height, .. } => page
                .dot_unchecked("setViewport")
                .call(vec![Expr::object(vec![
                    ("width", Expr::num(*width)),
                    ("height", Expr::num(*height)),
                ])]),
            StepKind::Navigate { url } => page
                .dot_unchecked("goto")
                .call(with_timeout(step, vec![Expr::str(url)])),
            StepKind::Click {
                selectors,
                offset_x,
                offset_y,
            } => page.dot_unchecked("click").call(vec![
                first_query(step, selectors)?,
                Expr::object(vec![("offset", offset(*offset_x, *offset_y))]),
            ]),
            StepKind::DoubleClick {
                selectors,
                offset_x,
                offset_y,
            } => page.dot_unchecked("click").call(vec![
                first_query(step, selectors)?,
                Expr::object(vec![
                    ("clickCount", Expr::num(2)),
                    ("offset", offset(*offset_x, *offset_y)),
                ]),
            ]),
            StepKind::Hover { selectors } => page
                .dot_unchecked("hover")
                .call(vec![first_query(step, selectors)?]),
            StepKind::Change { selectors, value } => page
                .dot_unchecked("type")
                .call(vec![first_query(step, selectors)?, Expr::str(value)]),
            StepKind::KeyDown { key } => page
                .dot_unchecked("keyboard")
                .dot_unchecked("down")
                .call(vec![Expr::str(key)]),
            StepKind::KeyUp { key } => page
                .dot_unchecked("keyboard")
                .dot_unchecked("up")
                .call(vec![Expr::str(key)]),
            StepKind::Scroll { selectors, x, y } => {
                let coords = [Expr::num(*x), Expr::num(*y)];
                if let Some(selector) = selectors.first() {
                    let scroll = Expr::arrow(
                        &["el", "x", "y"],
                        vec![Stmt::expr(Expr::ident_unchecked("el").dot_unchecked("scroll").call(
                            vec![Expr::ident_unchecked("x"), Expr::ident_unchecked("y")],
                        ))],
                    )?;
                    let mut args = vec![Expr::str(selector.to_query()), scroll];
                    args.extend(coords);
                    page.dot_unchecked("$eval").call(args)
                } else {
                    let scroll = Expr::arrow(
                        &["x", "y"],
                        vec![Stmt::expr(
                            Expr::ident_unchecked("window")
                                .dot_unchecked("scroll")
                                .call(vec![Expr::ident_unchecked("x"), Expr::ident_unchecked("y")]),
                        )],
                    )?;
                    let mut args = vec![scroll];
                    args.extend(coords);
                    page.dot_unchecked("evaluate").call(args)
                }
            }
            StepKind::WaitForElement { selectors } => page
                .dot_unchecked("waitForSelector")
                .call(with_timeout(step, vec![first_query(step, selectors)?])),
            StepKind::WaitForExpression { expression } => page
                .dot_unchecked("waitForFunction")
                .call(with_timeout(step, vec![Expr::str(expression)])),
            StepKind::EmulateNetworkConditions {
                download,
                upload,
                latency,
            } => page
                .dot_unchecked("emulateNetworkConditions")
                .call(vec![Expr::object(vec![
                    ("download", Expr::num(*download)),
                    ("upload", Expr::num(*upload)),
                    ("latency", Expr::num(*latency)),
                ])]),
            StepKind::Close => page.dot_unchecked("close").call(vec![]),
            StepKind::CustomStep { name, .. } => {
                return Ok(Stmt::comment(format!(
                    "Custom step {} has no Puppeteer equivalent",
                    str_to_js(name)
                )));
            }
        };
        Ok(Stmt::expr(call.await_expr()))
    }
}

impl StepRenderer for PuppeteerRenderer {
    fn before_all(&mut self, out: &mut dyn LineWriter, _flow: &Flow) -> Result<()> {
        emit_stmts(
            &[
                Stmt::const_unchecked("puppeteer", Expr::require("puppeteer")),
                Stmt::Blank,
            ],
            out,
        );
        out.append_line("(async () => {");
        out.start_block();
        let browser = Expr::ident_unchecked("browser");
        let page = Expr::ident_unchecked("page");
        emit_stmts(
            &[
                Stmt::const_unchecked(
                    "browser",
                    Expr::ident_unchecked("puppeteer")
                        .dot_unchecked("launch")
                        .call(vec![])
                        .await_expr(),
                ),
                Stmt::const_unchecked(
                    "page",
                    browser.dot_unchecked("newPage").call(vec![]).await_expr(),
                ),
                Stmt::const_unchecked("timeout", Expr::num(self.timeout_ms as f64)),
                Stmt::expr(
                    page.dot_unchecked("setDefaultTimeout")
                        .call(vec![Expr::ident_unchecked("timeout")]),
                ),
                Stmt::Blank,
            ],
            out,
        );
        Ok(())
    }

    fn render_step(&mut self, out: &mut dyn LineWriter, step: &Step) -> Result<()> {
        let action = self.action(step)?;
        tracing::trace!(step_type = step.type_name(), "rendering step");

        let mut body = vec![Stmt::const_unchecked("targetPage", Expr::ident_unchecked("page"))];
        if step.asserts_navigation() {
            body.push(Stmt::const_unchecked("promises", Expr::array(vec![])));
            body.push(Stmt::expr(
                Expr::ident_unchecked("promises")
                    .dot_unchecked("push")
                    .call(vec![target_page()
                        .dot_unchecked("waitForNavigation")
                        .call(with_timeout(step, vec![]))]),
            ));
            body.push(action);
            body.push(Stmt::expr(
                Expr::ident_unchecked("Promise")
                    .dot_unchecked("all")
                    .call(vec![Expr::ident_unchecked("promises")])
                    .await_expr(),
            ));
        } else {
            body.push(action);
        }
        emit_stmt(&Stmt::block(body), out);
        Ok(())
    }

    fn after_all(&mut self, out: &mut dyn LineWriter, _flow: &Flow) -> Result<()> {
        emit_stmt(
            &Stmt::expr(
                Expr::ident_unchecked("browser")
                    .dot_unchecked("close")
                    .call(vec![])
                    .await_expr(),
            ),
            out,
        );
        out.end_block();
        out.append_line("})();");
        Ok(())
    }
}
