//! Fluent helpers for constructing HIR nodes.
//!
//! ```rust
//! use flowscript::prelude::*;
//!
//! let stmt = Stmt::expr(
//!     Expr::ident_unchecked("lhFlow")
//!         .dot_unchecked("startNavigation")
//!         .call(vec![])
//!         .await_expr(),
//! );
//! assert_eq!(codegen::stmt_to_js(&stmt), "await lhFlow.startNavigation();");
//! ```

use crate::hir::*;
use crate::Result;

/// Expression builder helpers.
impl Expr {
    /// Create a boolean literal.
    #[must_use]
    pub const fn bool(v: bool) -> Self {
        Self::Bool(v)
    }

    /// Create a number literal.
    #[must_use]
    pub fn num(v: impl Into<f64>) -> Self {
        Self::Num(v.into())
    }

    /// Create a string literal.
    #[must_use]
    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// Identifier reference for a name fixed at compile time.
    #[must_use]
    pub fn ident_unchecked(name: &'static str) -> Self {
        Self::Ident(Identifier::new_unchecked(name))
    }

    /// Member access for a property name fixed at compile time.
    #[must_use]
    pub fn dot_unchecked(self, prop: &'static str) -> Self {
        Self::Member {
            object: Box::new(self),
            property: Identifier::new_unchecked(prop),
        }
    }

    /// Function call.
    #[must_use]
    pub fn call(self, args: Vec<Expr>) -> Self {
        Self::Call {
            callee: Box::new(self),
            args,
        }
    }

    /// Await expression.
    #[must_use]
    pub fn await_expr(self) -> Self {
        Self::Await(Box::new(self))
    }

    /// Addition / concatenation: `self + other`
    #[must_use]
    pub fn add(self, other: Expr) -> Self {
        Self::Binary {
            left: Box::new(self),
            op: BinOp::Add,
            right: Box::new(other),
        }
    }

    /// Object literal. Keys keep insertion order.
    #[must_use]
    pub fn object(pairs: Vec<(&str, Expr)>) -> Self {
        Self::Object(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    /// Array literal.
    #[must_use]
    pub fn array(items: Vec<Expr>) -> Self {
        Self::Array(items)
    }

    /// Arrow function with a block body.
    pub fn arrow(params: &[&str], body: Vec<Stmt>) -> Result<Self> {
        let params = params
            .iter()
            .map(|p| Identifier::new(*p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::Arrow { params, body })
    }

    /// `require(path)`
    #[must_use]
    pub fn require(path: impl Into<String>) -> Self {
        Self::ident_unchecked("require").call(vec![Self::str(path)])
    }
}

/// Statement builder helpers.
impl Stmt {
    /// `const name = value;` for a name fixed at compile time.
    #[must_use]
    pub fn const_unchecked(name: &'static str, value: Expr) -> Self {
        Self::Const {
            name: Identifier::new_unchecked(name),
            value,
        }
    }

    /// `expr;`
    #[must_use]
    pub fn expr(e: Expr) -> Self {
        Self::Expr(e)
    }

    /// `// text`
    #[must_use]
    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment(text.into())
    }

    /// `{ body }`
    #[must_use]
    pub fn block(body: Vec<Stmt>) -> Self {
        Self::Block(body)
    }
}
