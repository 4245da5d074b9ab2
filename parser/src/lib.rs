//! Vigil Parser
//!
//! This crate parses constraint expressions:
//! - Lexing with line and column tracking
//! - Expression parsing (logic, chained comparison, arithmetic, membership,
//!   regex matching, paths, indexing, filter pipes, function calls)
//! - Compiled expressions carrying their source and the sibling fields they read,
//!   with intrinsic names and argument counts checked up front

mod ast;
mod compiled;
mod error;
mod intrinsics;
mod lexer;
mod parser;

pub use ast::*;
pub use compiled::CompiledExpr;
pub use error::*;
pub use intrinsics::{intrinsic_arity, Arity};
pub use parser::{parse_expr, Parser};
