//! High-level Intermediate Representation for the generated JavaScript.
//!
//! Only the constructs a replay script needs are modelled. Every line the
//! crate emits goes through this layer so literals are escaped in one place
//! and output is deterministic.

use serde::{Deserialize, Serialize};

/// JavaScript statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// Constant declaration: `const name = expr;`
    Const {
        /// Constant name
        name: Identifier,
        /// Value
        value: Expr,
    },
    /// Expression statement: `expr;`
    Expr(Expr),
    /// Block: `{ stmts }`
    Block(Vec<Stmt>),
    /// Comment: `// text`
    Comment(String),
    /// Empty line
    Blank,
}

/// JavaScript expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// `undefined`
    Undefined,
    /// Boolean literal
    Bool(bool),
    /// Number literal
    Num(f64),
    /// String literal (will be properly escaped)
    Str(String),
    /// Identifier reference
    Ident(Identifier),
    /// Member access: `obj.prop`
    Member {
        /// Object
        object: Box<Expr>,
        /// Property name
        property: Identifier,
    },
    /// Function call: `func(args)`
    Call {
        /// Function expression
        callee: Box<Expr>,
        /// Arguments
        args: Vec<Expr>,
    },
    /// `await expr`
    Await(Box<Expr>),
    /// Binary operation: `left op right`
    Binary {
        /// Left operand
        left: Box<Expr>,
        /// Operator
        op: BinOp,
        /// Right operand
        right: Box<Expr>,
    },
    /// Object literal: `{key: value, ...}`
    Object(Vec<(String, Expr)>),
    /// Array literal: `[expr, ...]`
    Array(Vec<Expr>),
    /// Arrow function with block: `(params) => { stmts }`
    Arrow {
        /// Parameters
        params: Vec<Identifier>,
        /// Body statements
        body: Vec<Stmt>,
    },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    /// Addition / concatenation: `+`
    Add,
}

impl BinOp {
    /// Get the JavaScript operator string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
        }
    }
}

/// A validated JavaScript identifier.
///
/// Identifiers are validated at construction time to ensure they:
/// - Are not reserved words
/// - Contain only valid characters
/// - Don't start with a digit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier(String);

impl Identifier {
    /// JavaScript reserved words that cannot be used as identifiers.
    pub const RESERVED_WORDS: &'static [&'static str] = &[
        "break",
        "case",
        "catch",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "finally",
        "for",
        "function",
        "if",
        "in",
        "instanceof",
        "new",
        "return",
        "switch",
        "this",
        "throw",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "class",
        "const",
        "enum",
        "export",
        "extends",
        "import",
        "super",
        "implements",
        "interface",
        "let",
        "package",
        "private",
        "protected",
        "public",
        "static",
        "yield",
        "await",
        "null",
        "true",
        "false",
    ];

    /// Create a new identifier, validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty, a reserved word,
    /// contains invalid characters or starts with a digit.
    pub fn new(name: impl Into<String>) -> crate::Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(crate::FlowScriptError::InvalidIdentifier {
                name,
                reason: "identifier cannot be empty".to_string(),
            });
        }

        if name.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(crate::FlowScriptError::InvalidIdentifier {
                name,
                reason: "identifier cannot start with a digit".to_string(),
            });
        }

        if let Some(c) = name
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '_' && *c != '$')
        {
            return Err(crate::FlowScriptError::InvalidIdentifier {
                reason: format!("invalid character '{c}'"),
                name,
            });
        }

        if Self::RESERVED_WORDS.contains(&name.as_str()) {
            return Err(crate::FlowScriptError::InvalidIdentifier {
                name,
                reason: "reserved word".to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Create an identifier without validation.
    ///
    /// Only for names fixed at compile time (`page`, `lhFlow`, ...).
    #[must_use]
    pub fn new_unchecked(name: &'static str) -> Self {
        Self(name.to_string())
    }

    /// Get the identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `key` can be written as a bare object-literal key.
    #[must_use]
    pub fn is_valid(key: &str) -> bool {
        Self::new(key).is_ok()
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
