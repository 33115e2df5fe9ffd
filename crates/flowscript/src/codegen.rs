//! HIR to JavaScript text.
//!
//! Output is a pure function of the HIR: the same statements always
//! produce the same bytes.

use crate::hir::{Expr, Stmt};
use crate::writer::LineWriter;

/// Emit a statement into `out`, one line per JS line.
pub fn emit_stmt(stmt: &Stmt, out: &mut dyn LineWriter) {
    match stmt {
        Stmt::Block(body) => {
            out.append_line("{");
            out.start_block();
            emit_stmts(body, out);
            out.end_block();
            out.append_line("}");
        }
        Stmt::Comment(text) => {
            for line in comment_lines(text) {
                out.append_line(&format!("// {line}"));
            }
        }
        other => out.append_line(&stmt_to_js(other)),
    }
}

/// Split comment text at every JS line terminator, not only `\n`.
fn comment_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .flat_map(|line| line.split(['\r', '\u{2028}', '\u{2029}']))
}

/// Emit statements in order.
pub fn emit_stmts(stmts: &[Stmt], out: &mut dyn LineWriter) {
    for stmt in stmts {
        emit_stmt(stmt, out);
    }
}

/// Render a statement on a single line.
#[must_use]
pub fn stmt_to_js(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Const { name, value } => format!("const {name} = {};", expr_to_js(value)),
        Stmt::Expr(e) => format!("{};", expr_to_js(e)),
        Stmt::Block(body) => inline_block(body),
        Stmt::Comment(text) => format!("/* {} */", text.replace("*/", "* /")),
        Stmt::Blank => String::new(),
    }
}

/// Render an expression.
#[must_use]
pub fn expr_to_js(expr: &Expr) -> String {
    match expr {
        Expr::Undefined => "undefined".to_string(),
        Expr::Bool(b) => b.to_string(),
        Expr::Num(n) => num_to_js(*n),
        Expr::Str(s) => str_to_js(s),
        Expr::Ident(id) => id.to_string(),
        Expr::Member { object, property } => format!("{}.{property}", operand(object)),
        Expr::Call { callee, args } => format!("{}({})", operand(callee), join(args)),
        Expr::Await(inner) => format!("await {}", operand(inner)),
        Expr::Binary { left, op, right } => {
            format!("{} {} {}", operand(left), op.as_str(), operand(right))
        }
        Expr::Object(pairs) => {
            if pairs.is_empty() {
                return "{}".to_string();
            }
            let fields = pairs
                .iter()
                .map(|(key, value)| format!("{}: {}", object_key(key), expr_to_js(value)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{{fields}}}")
        }
        Expr::Array(items) => format!("[{}]", join(items)),
        Expr::Arrow { params, body } => {
            let params = params
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!("({params}) => {}", inline_block(body))
        }
    }
}

fn join(items: &[Expr]) -> String {
    items.iter().map(expr_to_js).collect::<Vec<_>>().join(", ")
}

/// Wrap compound expressions in parentheses when used as an operand.
fn operand(expr: &Expr) -> String {
    match expr {
        Expr::Await(_) | Expr::Binary { .. } | Expr::Arrow { .. } => {
            format!("({})", expr_to_js(expr))
        }
        _ => expr_to_js(expr),
    }
}

fn inline_block(body: &[Stmt]) -> String {
    if body.is_empty() {
        return "{}".to_string();
    }
    let inner = body.iter().map(stmt_to_js).collect::<Vec<_>>().join(" ");
    format!("{{ {inner} }}")
}

fn object_key(key: &str) -> String {
    if crate::hir::Identifier::is_valid(key) {
        key.to_string()
    } else {
        str_to_js(key)
    }
}

fn num_to_js(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        (if n > 0.0 { "Infinity" } else { "-Infinity" }).to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Double-quoted JS string literal. JSON string escaping is a subset of
/// what JS accepts, so serde_json does the work. U+2028 and U+2029 are
/// escaped as well so a literal never spans two lines.
pub(crate) fn str_to_js(s: &str) -> String {
    serde_json::to_string(s)
        .unwrap_or_else(|_| format!("\"{}\"", s.escape_default()))
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}
