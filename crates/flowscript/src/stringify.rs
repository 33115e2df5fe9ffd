//! Drives a [`StepRenderer`] over a flow.

use crate::audit::AuditedRenderer;
use crate::error::Result;
use crate::flow::{Flow, Step};
use crate::options::ScriptOptions;
use crate::renderer::{PuppeteerRenderer, StepRenderer};
use crate::writer::{InMemoryLineWriter, LineWriter};

/// Render `flow` into `out`.
///
/// Errors propagate as soon as a hook fails; lines already written stay in
/// `out`.
pub fn stringify_into<R: StepRenderer + ?Sized>(
    flow: &Flow,
    renderer: &mut R,
    out: &mut dyn LineWriter,
) -> Result<()> {
    renderer.before_all(out, flow)?;
    for step in &flow.steps {
        renderer.render_step(out, step)?;
    }
    renderer.after_all(out, flow)
}

/// Render `flow` to a string with default options.
pub fn stringify<R: StepRenderer + ?Sized>(flow: &Flow, renderer: &mut R) -> Result<String> {
    stringify_with(flow, renderer, &ScriptOptions::default())
}

/// Render `flow` to a string, indenting with `options.indent`.
pub fn stringify_with<R: StepRenderer + ?Sized>(
    flow: &Flow,
    renderer: &mut R,
    options: &ScriptOptions,
) -> Result<String> {
    let mut out = InMemoryLineWriter::new(options.indent.clone());
    stringify_into(flow, renderer, &mut out)?;
    tracing::info!(
        title = flow.display_name(),
        steps = flow.steps.len(),
        lines = out.lines().len(),
        "stringified flow"
    );
    Ok(out.into_string())
}

/// Render a single step with no prologue or epilogue.
pub fn stringify_step<R: StepRenderer + ?Sized>(
    step: &Step,
    renderer: &mut R,
    options: &ScriptOptions,
) -> Result<String> {
    let mut out = InMemoryLineWriter::new(options.indent.clone());
    renderer.render_step(&mut out, step)?;
    Ok(out.into_string())
}

/// Plain Puppeteer replay script for `flow`.
pub fn replay_script(flow: &Flow, options: &ScriptOptions) -> Result<String> {
    stringify_with(flow, &mut PuppeteerRenderer::new(options), options)
}

/// Puppeteer replay script instrumented with a Lighthouse user flow.
pub fn lighthouse_script(flow: &Flow, options: &ScriptOptions) -> Result<String> {
    let mut renderer = AuditedRenderer::new(PuppeteerRenderer::new(options));
    stringify_with(flow, &mut renderer, options)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::FlowScriptError;
    use crate::flow::StepKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn replay_has_no_lighthouse_calls() {
        let flow = Flow::new(None, vec![Step::navigate("https://a.test")]);
        let js = replay_script(&flow, &ScriptOptions::default()).unwrap();
        assert!(!js.contains("lhFlow"));
        assert!(js.contains(r#"await targetPage.goto("https://a.test");"#));
    }

    #[test]
    fn stringify_step_renders_only_the_step() {
        let js = stringify_step(
            &Step::key_down("Tab"),
            &mut PuppeteerRenderer::default(),
            &ScriptOptions::new().with_indent("\t"),
        )
        .unwrap();
        assert_eq!(
            js,
            "{\n\tconst targetPage = page;\n\tawait targetPage.keyboard.down(\"Tab\");\n}\n"
        );
    }

    #[test]
    fn failing_step_aborts_and_keeps_prefix() {
        let flow = Flow::new(
            None,
            vec![
                Step::click("#ok"),
                Step::new(StepKind::Click {
                    selectors: vec![],
                    offset_x: 0.0,
                    offset_y: 0.0,
                }),
                Step::click("#never"),
            ],
        );
        let mut renderer = AuditedRenderer::new(PuppeteerRenderer::default());
        let mut out = InMemoryLineWriter::default();
        let err = stringify_into(&flow, &mut renderer, &mut out).unwrap_err();
        assert!(matches!(err, FlowScriptError::InvalidStep { .. }));

        let text = out.into_string();
        assert!(text.contains("#ok"));
        assert!(!text.contains("#never"));
        assert!(!text.contains("generateReport"));
    }

    #[test]
    fn boxed_renderers_work() {
        let mut renderer: Box<dyn StepRenderer> = Box::new(PuppeteerRenderer::default());
        let js = stringify(&Flow::default(), &mut renderer).unwrap();
        assert!(js.ends_with("})();\n"));
    }
}
