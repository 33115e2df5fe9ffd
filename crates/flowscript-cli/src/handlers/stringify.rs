//! Stringify command handler

use super::read_flow;
use crate::commands::StringifyArgs;
use crate::error::{CliError, CliResult};
use crate::output::Reporter;
use flowscript::manifest::{write_with_manifest, GenerationMetadata};
use flowscript::{lighthouse_script, replay_script, Flow, ScriptOptions};
use std::io::Write;
use std::path::Path;

/// Execute the stringify command
pub fn execute_stringify(args: &StringifyArgs, reporter: &Reporter) -> CliResult<()> {
    let (json, flow) = read_flow(&args.flow)?;
    let options = load_options(args.config.as_deref(), args.timeout)?;
    let script = render_script(&flow, &options, args.plain)?;

    let Some(output) = &args.output else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(script.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    };

    if args.manifest {
        let metadata = GenerationMetadata::for_input(&json, regenerate_command(args));
        let manifest_path = write_with_manifest(output, &script, metadata)?;
        reporter.info(&format!("Manifest: {}", manifest_path.display()));
    } else {
        std::fs::write(output, &script)?;
    }

    reporter.success(&format!(
        "Wrote {} ({} steps from \"{}\")",
        output.display(),
        flow.steps.len(),
        flow.display_name()
    ));
    Ok(())
}

/// Script options from an optional YAML file, with the timeout override applied.
pub fn load_options(config: Option<&Path>, timeout: Option<u64>) -> CliResult<ScriptOptions> {
    let mut options = match config {
        Some(path) => ScriptOptions::from_yaml_path(path)
            .map_err(|e| CliError::config(format!("{}: {e}", path.display())))?,
        None => ScriptOptions::default(),
    };
    if let Some(timeout_ms) = timeout {
        options = options.with_timeout_ms(timeout_ms);
    }
    Ok(options)
}

/// Render `flow` as an instrumented script, or a plain replay when `plain`.
pub fn render_script(flow: &Flow, options: &ScriptOptions, plain: bool) -> CliResult<String> {
    let script = if plain {
        replay_script(flow, options)?
    } else {
        lighthouse_script(flow, options)?
    };
    Ok(script)
}

/// Command line recorded in the manifest.
#[must_use]
pub fn regenerate_command(args: &StringifyArgs) -> String {
    let mut cmd = format!("flowscript stringify {}", args.flow.display());
    if let Some(output) = &args.output {
        cmd.push_str(&format!(" -o {}", output.display()));
    }
    if args.plain {
        cmd.push_str(" --plain");
    }
    if let Some(config) = &args.config {
        cmd.push_str(&format!(" --config {}", config.display()));
    }
    if let Some(timeout) = args.timeout {
        cmd.push_str(&format!(" --timeout {timeout}"));
    }
    if args.manifest {
        cmd.push_str(" --manifest");
    }
    cmd
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use flowscript::manifest::verify;
    use flowscript::Step;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args(flow: PathBuf, output: Option<PathBuf>) -> StringifyArgs {
        StringifyArgs {
            flow,
            output,
            plain: false,
            manifest: false,
            config: None,
            timeout: None,
        }
    }

    fn write_flow(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("flow.json");
        let flow = Flow::new(
            Some("Checkout".into()),
            vec![Step::navigate("https://a.test"), Step::click("#buy")],
        );
        std::fs::write(&path, flow.to_json().unwrap()).unwrap();
        path
    }

    #[test]
    fn test_load_options_defaults() {
        let options = load_options(None, None).unwrap();
        assert_eq!(options, ScriptOptions::default());
    }

    #[test]
    fn test_load_options_yaml_and_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("opts.yaml");
        std::fs::write(&path, "indent: \"    \"\ntimeout_ms: 1000\n").unwrap();

        let options = load_options(Some(&path), None).unwrap();
        assert_eq!(options.indent, "    ");
        assert_eq!(options.timeout_ms, 1000);

        let options = load_options(Some(&path), Some(42)).unwrap();
        assert_eq!(options.timeout_ms, 42);
    }

    #[test]
    fn test_load_options_bad_yaml_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("opts.yaml");
        std::fs::write(&path, "timeout_ms: soon\n").unwrap();
        let err = load_options(Some(&path), None).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
        assert!(err.to_string().contains("opts.yaml"));
    }

    #[test]
    fn test_render_script_plain_vs_audited() {
        let flow = Flow::new(None, vec![Step::navigate("https://a.test")]);
        let options = ScriptOptions::default();
        assert!(render_script(&flow, &options, false)
            .unwrap()
            .contains("lhFlow.startNavigation()"));
        assert!(!render_script(&flow, &options, true)
            .unwrap()
            .contains("lhFlow"));
    }

    #[test]
    fn test_regenerate_command() {
        let mut a = args(PathBuf::from("flow.json"), Some(PathBuf::from("flow.js")));
        a.manifest = true;
        a.timeout = Some(100);
        assert_eq!(
            regenerate_command(&a),
            "flowscript stringify flow.json -o flow.js --timeout 100 --manifest"
        );
    }

    #[test]
    fn test_execute_writes_script_and_manifest() {
        let dir = TempDir::new().unwrap();
        let flow_path = write_flow(&dir);
        let out = dir.path().join("flow.js");
        let mut a = args(flow_path, Some(out.clone()));
        a.manifest = true;

        execute_stringify(&a, &Reporter::new(false, true)).unwrap();

        let script = std::fs::read_to_string(&out).unwrap();
        assert!(script.contains(r#"{name: "Checkout""#));
        let manifest = verify(&out).unwrap();
        assert_eq!(manifest.output_path, "flow.js");
        assert!(manifest.generation.regenerate_cmd.ends_with("--manifest"));
    }

    #[test]
    fn test_execute_without_manifest() {
        let dir = TempDir::new().unwrap();
        let flow_path = write_flow(&dir);
        let out = dir.path().join("flow.js");

        execute_stringify(&args(flow_path, Some(out.clone())), &Reporter::new(false, true))
            .unwrap();

        assert!(out.exists());
        assert!(!dir.path().join("flow.js.manifest.json").exists());
    }
}
