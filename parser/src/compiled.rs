//! Compiled constraint expressions.

use crate::ast::{Expr, Root};
use crate::error::{ParseError, ParseResult};
use crate::intrinsics::intrinsic_arity;
use crate::parser::parse_expr;
use std::fmt;

/// An expression parsed once at schema build time, together with its
/// source text for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpr {
    source: String,
    expr: Expr,
}

impl CompiledExpr {
    /// Compile expression source. A surrounding `{{ ... }}` template
    /// wrapper is accepted and stripped; error columns still point into
    /// the original text. Every function call must name an intrinsic and
    /// pass it an accepted number of arguments.
    pub fn compile(source: &str) -> ParseResult<Self> {
        let expr = parse_expr(&strip_braces(source))?;
        check_calls(&expr)?;
        Ok(Self {
            source: source.trim().to_string(),
            expr,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Sibling fields this expression reads through `block`.
    pub fn block_references(&self) -> Vec<&str> {
        self.expr.root_references(Root::Block)
    }

    /// Returns true if this expression reads `block` as a whole, so it may
    /// see any sibling field.
    pub fn reads_whole_block(&self) -> bool {
        self.expr.reads_whole_root(Root::Block)
    }
}

impl fmt::Display for CompiledExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Reject the first call to an unknown function or with a wrong argument count.
fn check_calls(expr: &Expr) -> ParseResult<()> {
    let mut error = None;
    expr.walk(&mut |e| {
        if error.is_some() {
            return;
        }
        if let Expr::FnCall(call) = e {
            error = match intrinsic_arity(&call.name) {
                None => Some(ParseError::unknown_function(call.span, &call.name)),
                Some(arity) if !arity.accepts(call.args.len()) => Some(ParseError::arity(
                    call.span,
                    &call.name,
                    arity,
                    call.args.len(),
                )),
                Some(_) => None,
            };
        }
    });
    error.map_or(Ok(()), Err)
}

/// Blank out a `{{ }}` wrapper, keeping every other character in place.
fn strip_braces(source: &str) -> String {
    let trimmed = source.trim();
    if trimmed.starts_with("{{") && trimmed.ends_with("}}") && trimmed.len() >= 4 {
        let open = source.find("{{").unwrap_or(0);
        let close = source.rfind("}}").unwrap_or(source.len() - 2);
        let mut out = String::with_capacity(source.len());
        out.push_str(&source[..open]);
        out.push_str("  ");
        out.push_str(&source[open + 2..close]);
        out.push_str("  ");
        out.push_str(&source[close + 2..]);
        out
    } else {
        source.to_string()
    }
}
