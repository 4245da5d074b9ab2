//! Abstract Syntax Tree types for constraint expressions.

use regex_lite::Regex;
use std::fmt;

/// Source location for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

// ==================== EXPRESSIONS ====================

/// Expression types.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal(Literal),
    /// One of the context roots: this, block, root
    Root(Root, Span),
    /// Field access: expr.name
    Field(Box<Expr>, String, Span),
    /// Index access: expr[index]
    Index(Box<Expr>, Box<Expr>, Span),
    /// Binary operation
    BinaryOp(BinaryOp, Box<Expr>, Box<Expr>, Span),
    /// Chained comparison: a < b <= c
    Compare(Box<Expr>, Vec<(CompareOp, Expr)>, Span),
    /// Unary operation
    UnaryOp(UnaryOp, Box<Expr>, Span),
    /// Regular expression match against a pattern compiled at parse time
    Matches(Box<Expr>, Pattern, Span),
    /// Intrinsic call, also produced by filter pipes: x|f(a) is f(x, a)
    FnCall(FnCall),
    /// List literal: [a, b, c]
    List(Vec<Expr>, Span),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(lit) => lit.span,
            Expr::Root(_, span) => *span,
            Expr::Field(_, _, span) => *span,
            Expr::Index(_, _, span) => *span,
            Expr::BinaryOp(_, _, _, span) => *span,
            Expr::Compare(_, _, span) => *span,
            Expr::UnaryOp(_, _, span) => *span,
            Expr::Matches(_, _, span) => *span,
            Expr::FnCall(fc) => fc.span,
            Expr::List(_, span) => *span,
        }
    }

    /// Visit this expression and every sub-expression, pre-order, left to right.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        f(self);
        match self {
            Expr::Literal(_) | Expr::Root(_, _) => {}
            Expr::Field(base, _, _) => base.walk(f),
            Expr::Index(base, index, _) => {
                base.walk(f);
                index.walk(f);
            }
            Expr::BinaryOp(_, left, right, _) => {
                left.walk(f);
                right.walk(f);
            }
            Expr::Compare(first, rest, _) => {
                first.walk(f);
                for (_, operand) in rest {
                    operand.walk(f);
                }
            }
            Expr::UnaryOp(_, operand, _) => operand.walk(f),
            Expr::Matches(operand, _, _) => operand.walk(f),
            Expr::FnCall(fc) => {
                for arg in &fc.args {
                    arg.walk(f);
                }
            }
            Expr::List(items, _) => {
                for item in items {
                    item.walk(f);
                }
            }
        }
    }

    /// Names of the fields reached directly through a root, in textual order
    /// without duplicates. `block.a.b` and `block["a"]` both yield `a`.
    pub fn root_references(&self, root: Root) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        self.walk(&mut |expr| {
            let name = match expr {
                Expr::Field(base, name, _) if base.is_root(root) => Some(name.as_str()),
                Expr::Index(base, index, _) if base.is_root(root) => match index.as_ref() {
                    Expr::Literal(Literal {
                        kind: LiteralKind::String(name),
                        ..
                    }) => Some(name.as_str()),
                    _ => None,
                },
                _ => None,
            };
            if let Some(name) = name {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        });
        names
    }

    /// Returns true if any sub-expression uses the given root.
    pub fn uses_root(&self, root: Root) -> bool {
        let mut found = false;
        self.walk(&mut |expr| {
            if expr.is_root(root) {
                found = true;
            }
        });
        found
    }

    /// Returns true if the root is read as a whole rather than only through
    /// `root.name` or `root["name"]`, as in `block|values`, `block[this]` or
    /// `'x' in block`.
    pub fn reads_whole_root(&self, root: Root) -> bool {
        if !self.uses_root(root) {
            return false;
        }
        let mut uses = 0;
        let mut named = 0;
        self.walk(&mut |expr| match expr {
            Expr::Root(r, _) if *r == root => uses += 1,
            Expr::Field(base, _, _) if base.is_root(root) => named += 1,
            Expr::Index(base, index, _) if base.is_root(root) => {
                if matches!(
                    index.as_ref(),
                    Expr::Literal(Literal {
                        kind: LiteralKind::String(_),
                        ..
                    })
                ) {
                    named += 1;
                }
            }
            _ => {}
        });
        uses > named
    }

    fn is_root(&self, root: Root) -> bool {
        matches!(self, Expr::Root(r, _) if *r == root)
    }
}

/// Context roots an expression can start a path from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Root {
    /// The value the constraint is attached to.
    This,
    /// The object enclosing the constrained field.
    Block,
    /// The top-level value of the validation call.
    Root,
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Root::This => write!(f, "this"),
            Root::Block => write!(f, "block"),
            Root::Root => write!(f, "root"),
        }
    }
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralKind::Null => write!(f, "null"),
            LiteralKind::Bool(b) => write!(f, "{}", b),
            LiteralKind::Int(i) => write!(f, "{}", i),
            LiteralKind::Float(fl) => write!(f, "{}", fl),
            LiteralKind::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Logical (short-circuit)
    And,
    Or,
    // Membership
    In,
    NotIn,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Sub => write!(f, "-"),
            BinaryOp::Mul => write!(f, "*"),
            BinaryOp::Div => write!(f, "/"),
            BinaryOp::Mod => write!(f, "%"),
            BinaryOp::And => write!(f, "and"),
            BinaryOp::Or => write!(f, "or"),
            BinaryOp::In => write!(f, "in"),
            BinaryOp::NotIn => write!(f, "not in"),
        }
    }
}

/// Comparison operators, chainable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::NotEq => write!(f, "!="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::LtEq => write!(f, "<="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::GtEq => write!(f, ">="),
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

/// Intrinsic function call.
#[derive(Debug, Clone, PartialEq)]
pub struct FnCall {
    pub name: String,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// A regular expression compiled once when the expression is parsed.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Result<Self, regex_lite::Error> {
        let source = source.into();
        let regex = Regex::new(&source)?;
        Ok(Self { source, regex })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Unanchored search, like Python's `re.search`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}
