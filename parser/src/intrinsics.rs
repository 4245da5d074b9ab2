//! Names and argument counts of the intrinsic functions.

use std::fmt;

/// Argument counts an intrinsic accepts, counting a piped value as the
/// first argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Between(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::Between(lo, hi) => (lo..=hi).contains(&count),
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::Between(lo, hi) => write!(f, "{} or {}", lo, hi),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// Arity of the named intrinsic, or `None` if there is no such function.
/// Names are matched case-insensitively.
pub fn intrinsic_arity(name: &str) -> Option<Arity> {
    let arity = match name.to_lowercase().as_str() {
        "length" | "len" | "lower" | "upper" | "trim" | "unique" | "sum" | "abs" | "keys"
        | "values" | "first" | "last" | "is_null" => Arity::Exact(1),
        "contains" | "starts_with" | "ends_with" | "regex_match" | "pluck" | "map" => {
            Arity::Exact(2)
        }
        "round" => Arity::Between(1, 2),
        "min" | "max" => Arity::AtLeast(1),
        _ => return None,
    };
    Some(arity)
}
